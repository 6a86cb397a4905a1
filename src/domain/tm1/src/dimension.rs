// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use serde::Deserialize;
use serde_json::Value;
use serde_with::{DefaultOnNull, serde_as};

use crate::codec::{names_match, require};
use crate::*;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Dimension owning an ordered list of hierarchies. Every owned hierarchy
/// points back at the dimension through its `dimension_name`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dimension {
    name: String,
    hierarchies: Vec<Hierarchy>,
}

impl Dimension {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            hierarchies: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.restamp();
    }

    pub fn hierarchies(&self) -> &[Hierarchy] {
        &self.hierarchies
    }

    /// Hierarchy names in insertion order
    pub fn hierarchy_names(&self) -> Vec<&str> {
        self.hierarchies.iter().map(|h| h.name.as_str()).collect()
    }

    pub fn get_hierarchy(&self, name: &str) -> Option<&Hierarchy> {
        self.hierarchies.iter().find(|h| names_match(&h.name, name))
    }

    /// Mutable access to an owned hierarchy. Re-pointing it at another
    /// dimension is undone by the next [`Dimension::rename`].
    pub fn get_hierarchy_mut(&mut self, name: &str) -> Option<&mut Hierarchy> {
        self.hierarchies
            .iter_mut()
            .find(|h| names_match(&h.name, name))
    }

    pub fn contains_hierarchy(&self, name: &str) -> bool {
        self.get_hierarchy(name).is_some()
    }

    pub fn add_hierarchy(&mut self, mut hierarchy: Hierarchy) -> Result<(), DuplicateNameError> {
        if self.contains_hierarchy(&hierarchy.name) {
            return Err(DuplicateNameError {
                entity: "hierarchy",
                name: hierarchy.name,
                owner: self.name.clone(),
            });
        }
        hierarchy.stamp(&self.name);
        self.hierarchies.push(hierarchy);
        Ok(())
    }

    pub fn remove_hierarchy(&mut self, name: &str) -> Option<Hierarchy> {
        let i = self
            .hierarchies
            .iter()
            .position(|h| names_match(&h.name, name))?;
        Some(self.hierarchies.remove(i))
    }

    fn restamp(&mut self) {
        for hierarchy in &mut self.hierarchies {
            hierarchy.stamp(&self.name);
        }
    }

    ////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

    pub fn body_as_map(&self) -> Result<JsonMap, BodyError> {
        let name = require(&self.name, "dimension", &self.name, "name")?;

        let hierarchies = self
            .hierarchies
            .iter()
            .map(|h| h.body_as_map().map(Value::Object))
            .collect::<Result<Vec<_>, _>>()?;

        let mut body = JsonMap::new();
        body.insert("Name".to_string(), name.into());
        body.insert("Hierarchies".to_string(), Value::Array(hierarchies));
        Ok(body)
    }

    pub fn body(&self) -> Result<String, BodyError> {
        encode_body(self.body_as_map()?)
    }

    ////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

    pub fn from_json(json: &str) -> Result<Self, DecodeError> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(&value)
    }

    /// Decodes a dimension with its expanded hierarchies. The hierarchy
    /// payloads do not need to name their dimension: back-pointers are
    /// restored from the owner.
    pub fn from_value(value: &Value) -> Result<Self, DecodeError> {
        let wire = DimensionWire::deserialize(value)?;

        let hierarchies = wire
            .hierarchies
            .iter()
            .map(Hierarchy::from_value)
            .collect::<Result<Vec<_>, _>>()?;

        let mut dimension = Self {
            name: wire.name,
            hierarchies,
        };
        dimension.restamp();

        tracing::debug!(
            dimension = %dimension.name,
            hierarchies = dimension.hierarchies.len(),
            "Restored hierarchy back-pointers"
        );

        Ok(dimension)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[serde_as]
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DimensionWire {
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    name: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    hierarchies: Vec<Value>,
}
