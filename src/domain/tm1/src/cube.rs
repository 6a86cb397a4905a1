// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::collections::HashSet;

use odata_binding::{bind_key, cube_ref, dimension_ref};
use serde::Deserialize;
use serde_json::Value;
use serde_with::{DefaultOnNull, serde_as};

use crate::codec::{names_match, non_empty, require};
use crate::*;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cube {
    pub name: String,
    /// Dimensions referenced by name only
    pub dimension_names: Vec<String>,
    /// Dimensions carried as full objects, e.g. when decoded from an expanded
    /// payload
    pub dimensions: Vec<Dimension>,
    pub rules: Option<String>,
    pub drillthrough_rules: Option<String>,
    views: Vec<View>,
}

impl Cube {
    pub fn new<I, S>(name: impl Into<String>, dimension_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            dimension_names: dimension_names.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    pub fn with_rules(mut self, rules: impl Into<String>) -> Self {
        self.rules = Some(rules.into());
        self
    }

    /// Canonical dimension list of the cube: explicit names followed by the
    /// names of owned dimensions, without empty names and keeping the first
    /// occurrence of duplicates
    pub fn dimension_names_resolved(&self) -> Vec<String> {
        let mut seen = HashSet::new();

        self.dimension_names
            .iter()
            .map(String::as_str)
            .chain(self.dimensions.iter().map(Dimension::name))
            .filter(|name| !name.is_empty() && seen.insert(*name))
            .map(str::to_string)
            .collect()
    }

    pub fn has_rules(&self) -> bool {
        non_empty(self.rules.as_ref()).is_some()
    }

    pub fn views(&self) -> &[View] {
        &self.views
    }

    pub fn get_view(&self, name: &str) -> Option<&View> {
        self.views.iter().find(|v| names_match(v.name(), name))
    }

    /// Takes ownership of the view, binding it to this cube
    pub fn add_view(&mut self, mut view: View) -> Result<(), DuplicateNameError> {
        if self.get_view(view.name()).is_some() {
            return Err(DuplicateNameError {
                entity: "view",
                name: view.name().to_string(),
                owner: self.name.clone(),
            });
        }
        view.set_cube_name(self.name.clone());
        self.views.push(view);
        Ok(())
    }

    /// `Cubes('<cube>')`
    pub fn reference(&self) -> Result<String, BodyError> {
        Ok(cube_ref(&self.name)?)
    }

    ////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

    /// Payload for creating the cube. Dimensions are bound by reference and
    /// no `@odata.*` control fields are echoed back.
    pub fn body_as_map(&self) -> Result<JsonMap, BodyError> {
        let name = require(&self.name, "cube", &self.name, "name")?;

        let mut body = JsonMap::new();
        body.insert("Name".to_string(), name.into());

        let dimension_names = self.dimension_names_resolved();
        if !dimension_names.is_empty() {
            let refs = dimension_names
                .iter()
                .map(|d| dimension_ref(d).map(Value::String))
                .collect::<Result<Vec<_>, _>>()?;
            body.insert(bind_key("Dimensions"), Value::Array(refs));
        }
        if let Some(rules) = non_empty(self.rules.as_ref()) {
            body.insert("Rules".to_string(), rules.into());
        }
        if let Some(rules) = non_empty(self.drillthrough_rules.as_ref()) {
            body.insert("DrillthroughRules".to_string(), rules.into());
        }

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

    /// Decodes a cube, including expanded `Dimensions` and `Views` when
    /// present. Decoded views are bound to the cube.
    pub fn from_value(value: &Value) -> Result<Self, DecodeError> {
        let wire = CubeWire::deserialize(value)?;

        let dimensions = wire
            .dimensions
            .iter()
            .map(Dimension::from_value)
            .collect::<Result<Vec<_>, _>>()?;

        let mut cube = Self {
            name: wire.name,
            dimension_names: Vec::new(),
            dimensions,
            rules: wire.rules.filter(|r| !r.is_empty()),
            drillthrough_rules: wire.drillthrough_rules.filter(|r| !r.is_empty()),
            views: Vec::with_capacity(wire.views.len()),
        };

        for view in &wire.views {
            let mut view = View::from_value(view)?;
            view.set_cube_name(cube.name.clone());
            cube.views.push(view);
        }

        Ok(cube)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[serde_as]
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct CubeWire {
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    name: String,
    #[serde(default)]
    rules: Option<String>,
    #[serde(default)]
    drillthrough_rules: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    dimensions: Vec<Value>,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    views: Vec<Value>,
}
