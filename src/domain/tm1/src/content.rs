// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use chrono::{DateTime, Utc};
use odata_binding::odata_type;
use serde::Deserialize;
use serde_json::Value;
use serde_with::{DefaultOnNull, serde_as};

use crate::DecodeError;
use crate::codec::TM1_TYPE_NAMESPACE;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ContentKind {
    Folder,
    Document,
    Link,
    /// No discriminator was present
    #[default]
    Unknown,
    /// Unrecognized discriminator, kept as is
    Other(String),
}

impl ContentKind {
    fn from_odata_type(odata_type: Option<&str>) -> Self {
        let Some(odata_type) = odata_type else {
            return ContentKind::Unknown;
        };
        match odata_type.strip_prefix(TM1_TYPE_NAMESPACE) {
            Some("Folder") => ContentKind::Folder,
            Some("Document") => ContentKind::Document,
            Some("Link") => ContentKind::Link,
            _ => ContentKind::Other(odata_type.to_string()),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Node of the server file-system tree. Folders own ordered children,
/// documents don't.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Content {
    pub id: String,
    pub name: String,
    pub kind: ContentKind,
    pub size: Option<u64>,
    pub last_updated: Option<DateTime<Utc>>,
    pub media_type: Option<String>,
    pub contents: Vec<Content>,
}

impl Content {
    pub fn folder(name: impl Into<String>, contents: Vec<Content>) -> Self {
        let name = name.into();
        Self {
            id: name.clone(),
            name,
            kind: ContentKind::Folder,
            contents,
            ..Default::default()
        }
    }

    pub fn document(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: name.clone(),
            name,
            kind: ContentKind::Document,
            ..Default::default()
        }
    }

    pub fn is_folder(&self) -> bool {
        self.kind == ContentKind::Folder || !self.contents.is_empty()
    }

    /// Depth-first list of slash-joined paths, starting with the node itself
    pub fn flatten_paths(&self) -> Vec<String> {
        let mut paths = Vec::new();
        self.collect_paths("", &mut paths);
        paths
    }

    fn collect_paths(&self, parent_path: &str, paths: &mut Vec<String>) {
        let path = if parent_path.is_empty() {
            self.name.clone()
        } else {
            format!("{parent_path}/{}", self.name)
        };
        paths.push(path.clone());
        for child in &self.contents {
            child.collect_paths(&path, paths);
        }
    }

    /// Resolves a path in the form produced by [`Self::flatten_paths`]
    pub fn find(&self, path: &str) -> Option<&Content> {
        let mut segments = path.split('/');
        if segments.next()? != self.name {
            return None;
        }
        segments.try_fold(self, |node, segment| {
            node.contents.iter().find(|c| c.name == segment)
        })
    }

    ////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

    pub fn from_json(json: &str) -> Result<Self, DecodeError> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(&value)
    }

    pub fn from_value(value: &Value) -> Result<Self, DecodeError> {
        let wire = ContentWire::deserialize(value)?;

        let contents = wire
            .contents
            .iter()
            .map(Content::from_value)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            id: wire.id,
            name: wire.name,
            kind: ContentKind::from_odata_type(odata_type(value)),
            size: wire.size,
            last_updated: wire.last_updated,
            media_type: wire.media_type,
            contents,
        })
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[serde_as]
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ContentWire {
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(rename = "ID", default)]
    id: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    name: String,
    #[serde(default)]
    size: Option<u64>,
    #[serde(default)]
    last_updated: Option<DateTime<Utc>>,
    #[serde(rename = "@odata.mediaContentType", default)]
    media_type: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    contents: Vec<Value>,
}
