// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use serde::Deserialize;
use serde_json::{Value, json};
use serde_with::{DefaultOnNull, serde_as};

use crate::codec::{NamedWire, first_bracketed_segment, names_match, require};
use crate::*;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Named DAG of elements inside a dimension
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Hierarchy {
    pub name: String,
    /// Back-pointer to the owning dimension, never serialized as a field
    pub dimension_name: String,
    pub elements: Vec<Element>,
    pub edges: Vec<Edge>,
    pub element_attributes: Vec<ElementAttribute>,
    subsets: Vec<Subset>,
}

impl Hierarchy {
    /// An empty hierarchy name stands for the default hierarchy, which carries
    /// the name of its dimension
    pub fn new(dimension_name: impl Into<String>, name: impl Into<String>) -> Self {
        let dimension_name = dimension_name.into();
        let mut name = name.into();
        if name.is_empty() {
            name.clone_from(&dimension_name);
        }

        Self {
            name,
            dimension_name,
            ..Default::default()
        }
    }

    pub fn get_element(&self, name: &str) -> Option<&Element> {
        self.elements.iter().find(|e| names_match(&e.name, name))
    }

    pub fn add_element(
        &mut self,
        name: impl Into<String>,
        element_type: ElementType,
    ) -> Result<(), DuplicateNameError> {
        let name = name.into();
        if self.get_element(&name).is_some() {
            return Err(self.duplicate("element", name));
        }
        self.elements.push(Element::new(name, element_type));
        Ok(())
    }

    /// Inserts a consolidation link, updating the weight of an existing one
    pub fn add_edge(
        &mut self,
        parent_name: impl Into<String>,
        child_name: impl Into<String>,
        weight: f64,
    ) {
        let edge = Edge::new(parent_name, child_name, weight);
        match self.edges.iter_mut().find(|e| {
            names_match(&e.parent_name, &edge.parent_name)
                && names_match(&e.child_name, &edge.child_name)
        }) {
            Some(existing) => existing.weight = edge.weight,
            None => self.edges.push(edge),
        }
    }

    pub fn remove_edge(&mut self, parent_name: &str, child_name: &str) -> Option<Edge> {
        let i = self.edges.iter().position(|e| {
            names_match(&e.parent_name, parent_name) && names_match(&e.child_name, child_name)
        })?;
        Some(self.edges.remove(i))
    }

    pub fn add_element_attribute(
        &mut self,
        name: impl Into<String>,
        attribute_type: ElementAttributeType,
    ) -> Result<(), DuplicateNameError> {
        let name = name.into();
        if self
            .element_attributes
            .iter()
            .any(|a| names_match(&a.name, &name))
        {
            return Err(self.duplicate("element attribute", name));
        }
        self.element_attributes
            .push(ElementAttribute::new(name, attribute_type));
        Ok(())
    }

    pub fn subsets(&self) -> &[Subset] {
        &self.subsets
    }

    pub fn get_subset(&self, name: &str) -> Option<&Subset> {
        self.subsets.iter().find(|s| names_match(&s.name, name))
    }

    /// Takes ownership of the subset, pointing it at this hierarchy
    pub fn add_subset(&mut self, mut subset: Subset) -> Result<(), DuplicateNameError> {
        if self.get_subset(&subset.name).is_some() {
            return Err(self.duplicate("subset", subset.name));
        }
        subset.dimension_name.clone_from(&self.dimension_name);
        subset.hierarchy_name.clone_from(&self.name);
        self.subsets.push(subset);
        Ok(())
    }

    pub fn remove_subset(&mut self, name: &str) -> Option<Subset> {
        let i = self.subsets.iter().position(|s| names_match(&s.name, name))?;
        Some(self.subsets.remove(i))
    }

    /// Points the hierarchy and all of its subsets at the given dimension
    pub(crate) fn stamp(&mut self, dimension_name: &str) {
        dimension_name.clone_into(&mut self.dimension_name);
        for subset in &mut self.subsets {
            dimension_name.clone_into(&mut subset.dimension_name);
            subset.hierarchy_name.clone_from(&self.name);
        }
    }

    fn duplicate(&self, entity: &'static str, name: String) -> DuplicateNameError {
        DuplicateNameError {
            entity,
            name,
            owner: format!("{}:{}", self.dimension_name, self.name),
        }
    }

    ////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

    /// Payload for creating or updating the hierarchy. Subsets are managed
    /// through their own endpoint and are not part of it.
    pub fn body_as_map(&self) -> Result<JsonMap, BodyError> {
        let name = require(&self.name, "hierarchy", &self.name, "name")?;

        let elements: Vec<Value> = self
            .elements
            .iter()
            .map(|e| json!({ "Name": e.name, "Type": e.element_type }))
            .collect();
        let edges = serde_json::to_value(&self.edges).map_err(EncodeError::from)?;
        let attributes =
            serde_json::to_value(&self.element_attributes).map_err(EncodeError::from)?;

        let mut body = JsonMap::new();
        body.insert("Name".to_string(), name.into());
        body.insert("Elements".to_string(), Value::Array(elements));
        body.insert("Edges".to_string(), edges);
        body.insert("ElementAttributes".to_string(), attributes);
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

    /// Decodes a hierarchy and points all owned subsets back at it. The owning
    /// dimension is taken from an expanded `Dimension` or from `UniqueName`.
    pub fn from_value(value: &Value) -> Result<Self, DecodeError> {
        let wire = HierarchyBodyWire::deserialize(value)?;

        let dimension_name = wire
            .dimension
            .and_then(|d| d.name)
            .filter(|n| !n.is_empty())
            .or_else(|| wire.unique_name.as_deref().and_then(first_bracketed_segment))
            .unwrap_or_default();

        let subsets = wire
            .subsets
            .iter()
            .map(Subset::from_value)
            .collect::<Result<Vec<_>, _>>()?;

        let mut hierarchy = Self {
            name: wire.name,
            dimension_name: String::new(),
            elements: wire.elements,
            edges: wire.edges,
            element_attributes: wire.element_attributes,
            subsets,
        };
        hierarchy.stamp(&dimension_name);

        Ok(hierarchy)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[serde_as]
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct HierarchyBodyWire {
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    name: String,
    #[serde(default)]
    dimension: Option<NamedWire>,
    #[serde(default)]
    unique_name: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    elements: Vec<Element>,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    edges: Vec<Edge>,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    element_attributes: Vec<ElementAttribute>,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    subsets: Vec<Value>,
}
