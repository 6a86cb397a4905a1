// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use serde::{Deserialize, Serialize};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
// Element
////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ElementType {
    #[default]
    Numeric,
    String,
    Consolidated,
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Element {
    pub name: String,
    #[serde(rename = "Type", default)]
    pub element_type: ElementType,
    /// Position of the element in the hierarchy as reported by the server
    #[serde(default)]
    pub index: Option<i64>,
}

impl Element {
    pub fn new(name: impl Into<String>, element_type: ElementType) -> Self {
        Self {
            name: name.into(),
            element_type,
            index: None,
        }
    }

    pub fn is_consolidated(&self) -> bool {
        self.element_type == ElementType::Consolidated
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
// Edge
////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Directed consolidation link between two elements of the same hierarchy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Edge {
    pub parent_name: String,
    /// TM1 calls the child side of an edge `ComponentName` on the wire
    #[serde(rename = "ComponentName")]
    pub child_name: String,
    /// Omitted from payloads when zero and read back as [`Edge::DEFAULT_WEIGHT`]
    /// when absent, so a zero weight does not survive a body round-trip: it
    /// decodes as `1.0`.
    #[serde(default = "Edge::default_weight", skip_serializing_if = "Edge::is_zero_weight")]
    pub weight: f64,
}

impl Edge {
    pub const DEFAULT_WEIGHT: f64 = 1.0;

    pub fn new(parent_name: impl Into<String>, child_name: impl Into<String>, weight: f64) -> Self {
        Self {
            parent_name: parent_name.into(),
            child_name: child_name.into(),
            weight,
        }
    }

    fn default_weight() -> f64 {
        Self::DEFAULT_WEIGHT
    }

    #[allow(clippy::float_cmp, clippy::trivially_copy_pass_by_ref)]
    fn is_zero_weight(weight: &f64) -> bool {
        *weight == 0.0
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
// ElementAttribute
////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ElementAttributeType {
    #[default]
    String,
    Numeric,
    Alias,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ElementAttribute {
    pub name: String,
    #[serde(rename = "Type", default)]
    pub attribute_type: ElementAttributeType,
}

impl ElementAttribute {
    pub fn new(name: impl Into<String>, attribute_type: ElementAttributeType) -> Self {
        Self {
            name: name.into(),
            attribute_type,
        }
    }
}
