// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use serde::{Deserialize, Serialize};
use thiserror::Error;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Controls how outbound payloads are adapted to the TM1 server they target
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct CompatibilityConfig {
    /// Product version of the target server. Unknown versions are treated as
    /// current ones.
    pub server_version: Option<ServerVersion>,
}

impl CompatibilityConfig {
    pub fn for_version(server_version: ServerVersion) -> Self {
        Self {
            server_version: Some(server_version),
        }
    }

    /// Servers before 11.3 reject the `Type` field of process parameters
    pub fn supports_process_parameter_types(&self) -> bool {
        self.server_version
            .is_none_or(|v| v >= ServerVersion::PROCESS_PARAMETER_TYPES)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ServerVersion {
    pub major: u32,
    pub minor: u32,
}

impl ServerVersion {
    pub const PROCESS_PARAMETER_TYPES: ServerVersion = ServerVersion::new(11, 3);

    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// Parses product versions like `11.8.01300.1`. Only the first two
    /// components are significant.
    pub fn parse(s: &str) -> Result<Self, ServerVersionParseError> {
        let err = || ServerVersionParseError {
            value: s.to_string(),
        };

        let mut parts = s.trim().split('.');
        let major = parts.next().and_then(|p| p.parse().ok()).ok_or_else(err)?;
        let minor = match parts.next() {
            None => 0,
            Some(p) => p.parse().map_err(|_| err())?,
        };

        Ok(Self { major, minor })
    }
}

impl std::str::FromStr for ServerVersion {
    type Err = ServerVersionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ServerVersion {
    type Error = ServerVersionParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ServerVersion> for String {
    fn from(value: ServerVersion) -> Self {
        value.to_string()
    }
}

impl std::fmt::Display for ServerVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid TM1 server version `{value}`")]
pub struct ServerVersionParseError {
    pub value: String,
}
