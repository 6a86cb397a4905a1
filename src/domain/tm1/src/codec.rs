// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{BodyError, EncodeError, MissingBindingError};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Namespace prefix of TM1 entity types used in `@odata.type` discriminators
pub const TM1_TYPE_NAMESPACE: &str = "#ibm.tm1.api.v1.";

pub type JsonMap = Map<String, Value>;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Renders a payload built by one of the `body_as_map` emitters
pub(crate) fn encode_body(body: JsonMap) -> Result<String, BodyError> {
    serde_json::to_string(&Value::Object(body))
        .map_err(EncodeError::from)
        .map_err(Into::into)
}

/// Serializes an entity that maps directly onto its TM1 schema
pub(crate) fn to_json_map<T: Serialize>(value: &T) -> Result<JsonMap, EncodeError> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(EncodeError::from(<serde_json::Error as serde::ser::Error>::custom(
            format!("expected an object, got {other}"),
        ))),
    }
}

/// Fails when a back-pointer or required field of an entity is empty
pub(crate) fn require<'a>(
    value: &'a str,
    entity: &'static str,
    name: &str,
    field: &'static str,
) -> Result<&'a str, MissingBindingError> {
    if value.is_empty() {
        Err(MissingBindingError::new(entity, name, field))
    } else {
        Ok(value)
    }
}

pub(crate) fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|v| !v.is_empty())
}

/// TM1 object names are case-insensitive
pub(crate) fn names_match(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}

/// Extracts the first segment of a unique name like `[Dim].[Hier].[Subset]`.
/// Closing brackets inside a segment are escaped as `]]`.
pub(crate) fn first_bracketed_segment(unique_name: &str) -> Option<String> {
    let mut chars = unique_name.trim_start().strip_prefix('[')?.chars().peekable();
    let mut segment = String::new();

    while let Some(c) = chars.next() {
        if c == ']' {
            if chars.peek() == Some(&']') {
                chars.next();
            } else {
                return Some(segment);
            }
        }
        segment.push(c);
    }

    None
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
// Expanded navigation properties
////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct NamedWire {
    #[serde(default)]
    pub name: Option<String>,
}

/// Expanded `Hierarchy` sub-object carrying `Name` and `Dimension.Name`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct HierarchyWire {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub dimension: Option<NamedWire>,
}

impl HierarchyWire {
    pub fn dimension_name(&self) -> Option<&str> {
        self.dimension.as_ref()?.name.as_deref()
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
