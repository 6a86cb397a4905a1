// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! In-memory model of TM1 REST API entities.
//!
//! Entities are decoded from the OData JSON returned by the server and turned
//! back into request payloads by their `body_as_map` emitters, which replace
//! nested objects with `@odata.bind` references.

mod batch;
mod breakpoint;
mod codec;
mod config;
mod content;
mod cube;
mod dimension;
mod element;
mod errors;
mod hierarchy;
mod process;
mod subset;
mod user;
mod view;

pub use batch::*;
pub use breakpoint::*;
pub use codec::{JsonMap, TM1_TYPE_NAMESPACE};
pub(crate) use codec::encode_body;
pub use config::*;
pub use content::*;
pub use cube::*;
pub use dimension::*;
pub use element::*;
pub use errors::*;
pub use hierarchy::*;
pub use process::*;
pub use subset::*;
pub use user::*;
pub use view::*;
