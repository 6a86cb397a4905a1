// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use odata_binding::{
    bind_key,
    element_ref,
    hierarchy_ref,
    parse_element_ref,
    parse_hierarchy_ref,
    subset_ref,
};
use serde::Deserialize;
use serde_json::Value;
use serde_with::{DefaultOnNull, serde_as};

use crate::codec::{HierarchyWire, NamedWire, first_bracketed_segment, non_empty, require};
use crate::{BodyError, DecodeError, JsonMap, encode_body};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Named set of elements of a hierarchy.
///
/// A subset is either static (a fixed element list) or dynamic (an MDX
/// expression), never both: setting an expression drops the elements and
/// adding elements drops the expression.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Subset {
    pub name: String,
    pub alias: Option<String>,
    /// Back-pointer to the owning dimension, never serialized as a field
    pub dimension_name: String,
    /// Back-pointer to the owning hierarchy, never serialized as a field
    pub hierarchy_name: String,
    expression: Option<String>,
    elements: Vec<String>,
}

impl Subset {
    /// Creates an empty static subset. An empty hierarchy name stands for the
    /// default hierarchy of the dimension.
    pub fn new(
        name: impl Into<String>,
        dimension_name: impl Into<String>,
        hierarchy_name: impl Into<String>,
    ) -> Self {
        let dimension_name = dimension_name.into();
        let mut hierarchy_name = hierarchy_name.into();
        if hierarchy_name.is_empty() {
            hierarchy_name.clone_from(&dimension_name);
        }

        Self {
            name: name.into(),
            alias: None,
            dimension_name,
            hierarchy_name,
            expression: None,
            elements: Vec::new(),
        }
    }

    pub fn new_static<I, S>(
        name: impl Into<String>,
        dimension_name: impl Into<String>,
        hierarchy_name: impl Into<String>,
        elements: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut subset = Self::new(name, dimension_name, hierarchy_name);
        subset.add_elements(elements);
        subset
    }

    pub fn new_dynamic(
        name: impl Into<String>,
        dimension_name: impl Into<String>,
        hierarchy_name: impl Into<String>,
        expression: impl Into<String>,
    ) -> Self {
        let mut subset = Self::new(name, dimension_name, hierarchy_name);
        subset.set_expression(expression);
        subset
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn expression(&self) -> Option<&str> {
        self.expression.as_deref()
    }

    pub fn elements(&self) -> &[String] {
        &self.elements
    }

    /// Appends elements, turning the subset static
    pub fn add_elements<I, S>(&mut self, elements: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.expression = None;
        self.elements.extend(elements.into_iter().map(Into::into));
    }

    /// Replaces the element list with an MDX expression, turning the subset
    /// dynamic. An empty expression leaves an empty static subset.
    pub fn set_expression(&mut self, expression: impl Into<String>) {
        let expression = expression.into();
        self.elements.clear();
        self.expression = (!expression.is_empty()).then_some(expression);
    }

    pub fn is_dynamic(&self) -> bool {
        self.expression.as_ref().is_some_and(|e| !e.is_empty())
    }

    pub fn is_static(&self) -> bool {
        !self.is_dynamic()
    }

    /// `Dimensions('<d>')/Hierarchies('<h>')/Subsets('<s>')`
    pub fn reference(&self) -> Result<String, BodyError> {
        let (dimension_name, hierarchy_name) = self.binding()?;
        Ok(subset_ref(dimension_name, hierarchy_name, &self.name)?)
    }

    ////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
    // Bodies
    ////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

    /// Payload for creating or updating the subset through its hierarchy
    pub fn body_as_map(&self) -> Result<JsonMap, BodyError> {
        self.render(true)
    }

    pub fn body(&self) -> Result<String, BodyError> {
        encode_body(self.body_as_map()?)
    }

    /// Payload of a subset inlined into a view axis. With `use_static` unset
    /// an element-only subset carries neither its elements nor an expression.
    pub fn axis_body_as_map(&self, use_static: bool) -> Result<JsonMap, BodyError> {
        self.render(use_static)
    }

    fn binding(&self) -> Result<(&str, &str), BodyError> {
        let dimension_name = require(&self.dimension_name, "subset", &self.name, "dimension name")?;
        let hierarchy_name = require(&self.hierarchy_name, "subset", &self.name, "hierarchy name")?;
        Ok((dimension_name, hierarchy_name))
    }

    fn render(&self, materialize_elements: bool) -> Result<JsonMap, BodyError> {
        let name = require(&self.name, "subset", &self.name, "name")?;
        let (dimension_name, hierarchy_name) = self.binding()?;

        let mut body = JsonMap::new();
        body.insert("Name".to_string(), name.into());
        if let Some(alias) = non_empty(self.alias.as_ref()) {
            body.insert("Alias".to_string(), alias.into());
        }
        body.insert(
            bind_key("Hierarchy"),
            hierarchy_ref(dimension_name, hierarchy_name)?.into(),
        );

        if materialize_elements && !self.elements.is_empty() {
            let elements = self
                .elements
                .iter()
                .map(|e| element_ref(dimension_name, hierarchy_name, e).map(Value::String))
                .collect::<Result<Vec<_>, _>>()?;
            body.insert(bind_key("Elements"), Value::Array(elements));
        } else if let Some(expression) = non_empty(self.expression.as_ref()) {
            body.insert("Expression".to_string(), expression.into());
        }

        Ok(body)
    }

    ////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
    // Decoding
    ////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

    pub fn from_json(json: &str) -> Result<Self, DecodeError> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(&value)
    }

    /// Decodes a subset as returned by the server, with or without an expanded
    /// `Hierarchy`. The owning dimension comes from `Hierarchy.Dimension.Name`,
    /// then from the first segment of `UniqueName`, then from
    /// `Hierarchy@odata.bind`. Element bindings are read when no expanded
    /// `Elements` are present, so a body emitted by [`Self::body_as_map`]
    /// decodes back into the same subset.
    pub fn from_value(value: &Value) -> Result<Self, DecodeError> {
        let wire = SubsetWire::deserialize(value)?;

        let (mut dimension_name, mut hierarchy_name) = match &wire.hierarchy {
            Some(h) => (
                h.dimension_name().unwrap_or_default().to_string(),
                h.name.clone().unwrap_or_default(),
            ),
            None => (String::new(), String::new()),
        };
        if dimension_name.is_empty() {
            if let Some(unique_name) = &wire.unique_name {
                dimension_name = first_bracketed_segment(unique_name).unwrap_or_default();
            }
        }
        if dimension_name.is_empty() || hierarchy_name.is_empty() {
            if let Some(binding) = non_empty(wire.hierarchy_binding.as_ref()) {
                let (bound_dimension, bound_hierarchy) = parse_hierarchy_ref(binding)?;
                if dimension_name.is_empty() {
                    dimension_name = bound_dimension;
                }
                if hierarchy_name.is_empty() {
                    hierarchy_name = bound_hierarchy;
                }
            }
        }
        if hierarchy_name.is_empty() {
            tracing::debug!(
                subset = %wire.name,
                dimension = %dimension_name,
                "Defaulting subset hierarchy to its dimension"
            );
            hierarchy_name.clone_from(&dimension_name);
        }

        let mut subset = Self {
            name: wire.name,
            alias: wire.alias.filter(|a| !a.is_empty()),
            dimension_name,
            hierarchy_name,
            expression: None,
            elements: Vec::new(),
        };

        match wire.expression.filter(|e| !e.is_empty()) {
            Some(expression) => subset.set_expression(expression),
            None if wire.elements.is_empty() => {
                let elements = wire
                    .element_bindings
                    .iter()
                    .map(|b| parse_element_ref(b).map(|(_, _, element)| element))
                    .collect::<Result<Vec<_>, _>>()?;
                subset.add_elements(elements);
            }
            None => subset.add_elements(
                wire.elements
                    .into_iter()
                    .map(|e| e.name.unwrap_or_default()),
            ),
        }

        Ok(subset)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[serde_as]
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct SubsetWire {
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    name: String,
    #[serde(default)]
    alias: Option<String>,
    #[serde(default)]
    expression: Option<String>,
    #[serde(default)]
    hierarchy: Option<HierarchyWire>,
    #[serde(default)]
    unique_name: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    elements: Vec<NamedWire>,
    #[serde(rename = "Hierarchy@odata.bind", default)]
    hierarchy_binding: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(rename = "Elements@odata.bind", default)]
    element_bindings: Vec<String>,
}
