// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use odata_binding::ReferenceError;
use thiserror::Error;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
// Decoding
////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Malformed payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    UnknownType(#[from] UnknownTypeError),

    #[error(transparent)]
    InvalidReference(#[from] ReferenceError),
}

/// A polymorphic entity carried an `@odata.type` discriminator that does not
/// map to any known variant
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown {entity} type: {}", odata_type.as_deref().unwrap_or("<absent>"))]
pub struct UnknownTypeError {
    pub entity: &'static str,
    pub odata_type: Option<String>,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
// Body emission
////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Error, Debug)]
pub enum BodyError {
    #[error(transparent)]
    MissingBinding(#[from] MissingBindingError),

    #[error(transparent)]
    InvalidReference(#[from] ReferenceError),

    #[error(transparent)]
    Encode(#[from] EncodeError),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Cannot emit body of {entity} `{name}`: {field} is not set")]
pub struct MissingBindingError {
    pub entity: &'static str,
    pub name: String,
    pub field: &'static str,
}

impl MissingBindingError {
    pub fn new(entity: &'static str, name: impl Into<String>, field: &'static str) -> Self {
        Self {
            entity,
            name: name.into(),
            field,
        }
    }
}

#[derive(Error, Debug)]
#[error("Failed to encode payload")]
pub struct EncodeError {
    #[from]
    source: serde_json::Error,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
// Mutation
////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{entity} `{name}` already exists in `{owner}`")]
pub struct DuplicateNameError {
    pub entity: &'static str,
    pub name: String,
    pub owner: String,
}
