// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::codec::to_json_map;
use crate::{BodyError, DecodeError, JsonMap, encode_body};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
// Requests
////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Single entry of a JSON `$batch` request. `depends_on` lists ids of entries
/// the server has to complete first.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchRequest {
    pub method: String,
    pub url: String,
    pub id: String,
    pub body: Option<Value>,
    pub headers: Option<BTreeMap<String, String>>,
    #[serde(
        rename = "dependsOn",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub depends_on: Vec<String>,
}

impl BatchRequest {
    pub fn new(id: impl Into<String>, method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            url: url.into(),
            id: id.into(),
            body: None,
            headers: None,
            depends_on: Vec::new(),
        }
    }

    pub fn with_body(mut self, body: impl Into<Value>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .get_or_insert_with(BTreeMap::new)
            .insert(name.into(), value.into());
        self
    }

    pub fn with_dependency(mut self, id: impl Into<String>) -> Self {
        self.depends_on.push(id.into());
        self
    }
}

/// `{ "requests": [...] }` envelope. Entries keep the order they were pushed
/// in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchRequests {
    pub requests: Vec<BatchRequest>,
}

impl BatchRequests {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, request: BatchRequest) {
        self.requests.push(request);
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    pub fn body_as_map(&self) -> Result<JsonMap, BodyError> {
        Ok(to_json_map(self)?)
    }

    pub fn body(&self) -> Result<String, BodyError> {
        encode_body(self.body_as_map()?)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
// Responses
////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchResponse {
    pub id: String,
    pub status: u16,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    #[serde(default)]
    pub body: Option<Value>,
}

impl BatchResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// `{ "responses": [...] }` envelope
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchResponses {
    #[serde(default)]
    pub responses: Vec<BatchResponse>,
}

impl BatchResponses {
    pub fn from_json(json: &str) -> Result<Self, DecodeError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn find(&self, id: &str) -> Option<&BatchResponse> {
        self.responses.iter().find(|r| r.id == id)
    }

    pub fn failed(&self) -> impl Iterator<Item = &BatchResponse> {
        self.responses.iter().filter(|r| !r.is_success())
    }
}
