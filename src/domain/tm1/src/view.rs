// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::collections::BTreeMap;

use odata_binding::{ODATA_TYPE, bind_key, element_ref, odata_type, view_ref};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use serde_with::{DefaultOnNull, serde_as};

use crate::codec::{HierarchyWire, non_empty, require};
use crate::*;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub const NATIVE_VIEW_ODATA_TYPE: &str = "#ibm.tm1.api.v1.NativeView";
pub const MDX_VIEW_ODATA_TYPE: &str = "#ibm.tm1.api.v1.MDXView";

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
// View
////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Cube view, discriminated on the wire by `@odata.type`
#[derive(Debug, Clone, PartialEq)]
pub enum View {
    Native(NativeView),
    Mdx(MdxView),
}

impl View {
    pub fn name(&self) -> &str {
        match self {
            View::Native(v) => &v.name,
            View::Mdx(v) => &v.name,
        }
    }

    pub fn cube_name(&self) -> Option<&str> {
        match self {
            View::Native(v) => v.cube_name.as_deref(),
            View::Mdx(v) => v.cube_name.as_deref(),
        }
    }

    pub fn set_cube_name(&mut self, cube_name: impl Into<String>) {
        let cube_name = Some(cube_name.into());
        match self {
            View::Native(v) => v.cube_name = cube_name,
            View::Mdx(v) => v.cube_name = cube_name,
        }
    }

    pub fn odata_type(&self) -> &'static str {
        match self {
            View::Native(_) => NATIVE_VIEW_ODATA_TYPE,
            View::Mdx(_) => MDX_VIEW_ODATA_TYPE,
        }
    }

    /// `Cubes('<cube>')/Views('<view>')`, requires the view to be bound to a
    /// cube
    pub fn reference(&self) -> Result<String, BodyError> {
        let cube_name = require(
            self.cube_name().unwrap_or_default(),
            "view",
            self.name(),
            "cube name",
        )?;
        Ok(view_ref(cube_name, self.name())?)
    }

    /// Emits the view payload. `use_static` only matters for native views: it
    /// decides whether static axis subsets are materialized with explicit
    /// element bindings.
    pub fn body_as_map(&self, use_static: bool) -> Result<JsonMap, BodyError> {
        match self {
            View::Native(v) => v.body_as_map(use_static),
            View::Mdx(v) => v.body_as_map(),
        }
    }

    pub fn body(&self, use_static: bool) -> Result<String, BodyError> {
        encode_body(self.body_as_map(use_static)?)
    }

    pub fn from_json(json: &str) -> Result<Self, DecodeError> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(&value)
    }

    /// Selects the variant by `@odata.type` before decoding the rest of the
    /// object. A missing or unrecognized discriminator is rejected.
    pub fn from_value(value: &Value) -> Result<Self, DecodeError> {
        match odata_type(value) {
            Some(NATIVE_VIEW_ODATA_TYPE) => Ok(View::Native(NativeView::from_value(value)?)),
            Some(MDX_VIEW_ODATA_TYPE) => Ok(View::Mdx(MdxView::from_value(value)?)),
            other => {
                tracing::debug!(odata_type = ?other, "Rejecting view with unknown type");
                Err(UnknownTypeError {
                    entity: "view",
                    odata_type: other.map(str::to_string),
                }
                .into())
            }
        }
    }
}

impl From<NativeView> for View {
    fn from(value: NativeView) -> Self {
        View::Native(value)
    }
}

impl From<MdxView> for View {
    fn from(value: MdxView) -> Self {
        View::Mdx(value)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
// NativeView
////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// View defined by subsets placed on column, row and title axes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NativeView {
    pub cube_name: Option<String>,
    pub name: String,
    pub columns: Vec<ViewAxisSelection>,
    pub rows: Vec<ViewAxisSelection>,
    pub titles: Vec<ViewTitleSelection>,
    pub suppress_empty_columns: bool,
    pub suppress_empty_rows: bool,
    pub format_string: Option<String>,
}

impl NativeView {
    pub fn new(cube_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            cube_name: Some(cube_name.into()),
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn add_column(&mut self, subset: Subset) {
        self.columns.push(ViewAxisSelection::new(subset));
    }

    pub fn add_row(&mut self, subset: Subset) {
        self.rows.push(ViewAxisSelection::new(subset));
    }

    pub fn add_title(&mut self, subset: Subset, selected: impl Into<String>) {
        self.titles.push(ViewTitleSelection::new(subset, selected));
    }

    pub fn suppress_empty_cells(&self) -> bool {
        self.suppress_empty_columns && self.suppress_empty_rows
    }

    pub fn body_as_map(&self, use_static: bool) -> Result<JsonMap, BodyError> {
        let name = require(&self.name, "view", &self.name, "name")?;

        let columns = self
            .columns
            .iter()
            .map(|axis| self.axis_body(axis.subset.as_ref(), None, use_static))
            .collect::<Result<Vec<_>, _>>()?;
        let rows = self
            .rows
            .iter()
            .map(|axis| self.axis_body(axis.subset.as_ref(), None, use_static))
            .collect::<Result<Vec<_>, _>>()?;
        let titles = self
            .titles
            .iter()
            .map(|axis| {
                self.axis_body(axis.subset.as_ref(), axis.selected.as_ref(), use_static)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut body = JsonMap::new();
        body.insert(ODATA_TYPE.to_string(), NATIVE_VIEW_ODATA_TYPE.into());
        body.insert("Name".to_string(), name.into());
        body.insert("Columns".to_string(), Value::Array(columns));
        body.insert("Rows".to_string(), Value::Array(rows));
        if !titles.is_empty() {
            body.insert("Titles".to_string(), Value::Array(titles));
        }
        if self.suppress_empty_columns {
            body.insert("SuppressEmptyColumns".to_string(), true.into());
        }
        if self.suppress_empty_rows {
            body.insert("SuppressEmptyRows".to_string(), true.into());
        }
        if let Some(format_string) = non_empty(self.format_string.as_ref()) {
            body.insert("FormatString".to_string(), format_string.into());
        }

        Ok(body)
    }

    /// `{ Subset: {...}, Selected@odata.bind?: "..." }`
    fn axis_body(
        &self,
        subset: Option<&Subset>,
        selected: Option<&SelectedElement>,
        use_static: bool,
    ) -> Result<Value, BodyError> {
        let subset =
            subset.ok_or_else(|| MissingBindingError::new("view", &self.name, "axis subset"))?;

        let mut body = JsonMap::new();
        body.insert(
            "Subset".to_string(),
            Value::Object(subset.axis_body_as_map(use_static)?),
        );

        if let Some(selected) = selected.filter(|s| !s.name.is_empty()) {
            body.insert(bind_key("Selected"), selected.reference()?.into());
        }

        Ok(Value::Object(body))
    }

    pub fn from_value(value: &Value) -> Result<Self, DecodeError> {
        let wire = NativeViewWire::deserialize(value)?;

        let axes = |axes: Vec<AxisWire>| -> Result<Vec<ViewAxisSelection>, DecodeError> {
            axes.into_iter()
                .map(|a| -> Result<ViewAxisSelection, DecodeError> {
                    Ok(ViewAxisSelection {
                        subset: a.subset.as_ref().map(Subset::from_value).transpose()?,
                    })
                })
                .collect()
        };

        let columns = axes(wire.columns)?;
        let rows = axes(wire.rows)?;
        let titles = wire
            .titles
            .into_iter()
            .map(|t| -> Result<ViewTitleSelection, DecodeError> {
                Ok(ViewTitleSelection {
                    subset: t.subset.as_ref().map(Subset::from_value).transpose()?,
                    selected: t.selected.map(SelectedElement::from),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            cube_name: None,
            name: wire.name,
            columns,
            rows,
            titles,
            suppress_empty_columns: wire.suppress_empty_columns,
            suppress_empty_rows: wire.suppress_empty_rows,
            format_string: wire.format_string.filter(|f| !f.is_empty()),
        })
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Column or row axis of a native view
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewAxisSelection {
    pub subset: Option<Subset>,
}

impl ViewAxisSelection {
    pub fn new(subset: Subset) -> Self {
        Self {
            subset: Some(subset),
        }
    }
}

/// Title axis of a native view with the element currently selected on it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewTitleSelection {
    pub subset: Option<Subset>,
    pub selected: Option<SelectedElement>,
}

impl ViewTitleSelection {
    /// The selected element lives in the hierarchy of the subset
    pub fn new(subset: Subset, selected: impl Into<String>) -> Self {
        let selected = SelectedElement::new(
            subset.dimension_name.clone(),
            subset.hierarchy_name.clone(),
            selected,
        );
        Self {
            subset: Some(subset),
            selected: Some(selected),
        }
    }
}

/// Element selected on a title axis. Dimension and hierarchy names are only
/// needed to emit the element binding and are never serialized as fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectedElement {
    pub dimension_name: String,
    pub hierarchy_name: String,
    pub name: String,
}

impl SelectedElement {
    pub fn new(
        dimension_name: impl Into<String>,
        hierarchy_name: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        let dimension_name = dimension_name.into();
        let mut hierarchy_name = hierarchy_name.into();
        if hierarchy_name.is_empty() {
            hierarchy_name.clone_from(&dimension_name);
        }
        Self {
            dimension_name,
            hierarchy_name,
            name: name.into(),
        }
    }

    pub fn reference(&self) -> Result<String, BodyError> {
        let dimension_name =
            require(&self.dimension_name, "selected element", &self.name, "dimension name")?;
        let hierarchy_name =
            require(&self.hierarchy_name, "selected element", &self.name, "hierarchy name")?;
        Ok(element_ref(dimension_name, hierarchy_name, &self.name)?)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
// MdxView
////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// View defined by an MDX query
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MdxView {
    pub cube_name: Option<String>,
    pub name: String,
    pub mdx: String,
    pub meta: Option<MdxViewMeta>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MdxViewMeta {
    #[serde(default)]
    pub aliases: BTreeMap<String, String>,
    #[serde(default)]
    pub context_sets: BTreeMap<String, BTreeMap<String, String>>,
    #[serde(default)]
    pub expand_aboves: BTreeMap<String, bool>,
}

impl MdxView {
    pub fn new(
        cube_name: impl Into<String>,
        name: impl Into<String>,
        mdx: impl Into<String>,
    ) -> Self {
        Self {
            cube_name: Some(cube_name.into()),
            name: name.into(),
            mdx: mdx.into(),
            meta: None,
        }
    }

    pub fn body_as_map(&self) -> Result<JsonMap, BodyError> {
        let name = require(&self.name, "view", &self.name, "name")?;

        let mut body = JsonMap::new();
        body.insert(ODATA_TYPE.to_string(), MDX_VIEW_ODATA_TYPE.into());
        body.insert("Name".to_string(), name.into());
        body.insert("MDX".to_string(), self.mdx.clone().into());
        if let Some(meta) = &self.meta {
            body.insert(
                "Meta".to_string(),
                serde_json::to_value(meta).map_err(EncodeError::from)?,
            );
        }

        Ok(body)
    }

    pub fn from_value(value: &Value) -> Result<Self, DecodeError> {
        let wire = MdxViewWire::deserialize(value)?;

        Ok(Self {
            cube_name: None,
            name: wire.name,
            mdx: wire.mdx,
            meta: wire.meta,
        })
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
// Wire
////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[serde_as]
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct NativeViewWire {
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    name: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    columns: Vec<AxisWire>,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    rows: Vec<AxisWire>,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    titles: Vec<TitleWire>,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    suppress_empty_columns: bool,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    suppress_empty_rows: bool,
    #[serde(default)]
    format_string: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AxisWire {
    #[serde(default)]
    subset: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct TitleWire {
    #[serde(default)]
    subset: Option<Value>,
    #[serde(default)]
    selected: Option<SelectedWire>,
}

#[serde_as]
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct SelectedWire {
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    name: String,
    #[serde(default)]
    hierarchy: Option<HierarchyWire>,
}

impl From<SelectedWire> for SelectedElement {
    fn from(value: SelectedWire) -> Self {
        let (dimension_name, hierarchy_name) = match value.hierarchy {
            Some(h) => (
                h.dimension_name().unwrap_or_default().to_string(),
                h.name.unwrap_or_default(),
            ),
            None => (String::new(), String::new()),
        };
        SelectedElement::new(dimension_name, hierarchy_name, value.name)
    }
}

#[serde_as]
#[derive(Debug, Deserialize)]
struct MdxViewWire {
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(rename = "Name", default)]
    name: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(rename = "MDX", default)]
    mdx: String,
    #[serde(rename = "Meta", default)]
    meta: Option<MdxViewMeta>,
}
