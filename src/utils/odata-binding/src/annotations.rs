// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use serde_json::Value;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Annotation carrying the type discriminator of a polymorphic entity
pub const ODATA_TYPE: &str = "@odata.type";

/// Suffix turning a navigation property into a reference binding
pub const ODATA_BIND_SUFFIX: &str = "@odata.bind";

pub const ODATA_MEDIA_CONTENT_TYPE: &str = "@odata.mediaContentType";

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Key under which a navigation property is bound by reference, e.g.
/// `Hierarchy` -> `Hierarchy@odata.bind`
pub fn bind_key(property: &str) -> String {
    format!("{property}{ODATA_BIND_SUFFIX}")
}

/// Reads the `@odata.type` discriminator of an object without decoding the
/// rest of it
pub fn odata_type(value: &Value) -> Option<&str> {
    value.as_object()?.get(ODATA_TYPE)?.as_str()
}
