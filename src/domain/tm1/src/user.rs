// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use odata_binding::{bind_key, group_ref};
use serde::Deserialize;
use serde_json::Value;
use serde_with::{DefaultOnNull, serde_as};
use thiserror::Error;

use crate::codec::{NamedWire, names_match, non_empty, require};
use crate::*;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    strum::Display,
    strum::EnumString,
    strum::IntoStaticStr,
)]
#[strum(ascii_case_insensitive)]
pub enum UserType {
    User,
    SecurityAdmin,
    DataAdmin,
    Admin,
    OperationsAdmin,
}

impl UserType {
    pub fn as_str(self) -> &'static str {
        self.into()
    }

    /// Case-insensitive, surrounding whitespace is ignored
    pub fn parse(s: &str) -> Result<Self, UserTypeParseError> {
        let s = s.trim();
        s.parse().map_err(|_| UserTypeParseError {
            value: s.to_string(),
        })
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown user type `{value}`")]
pub struct UserTypeParseError {
    pub value: String,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct User {
    pub name: String,
    pub friendly_name: Option<String>,
    /// Write-only, never present in decoded users
    pub password: Option<String>,
    pub enabled: Option<bool>,
    /// Type as reported by the server, see [`User::user_type`]
    pub user_type_raw: String,
    pub groups: Vec<String>,
}

impl User {
    pub fn new(name: impl Into<String>, user_type: UserType) -> Self {
        Self {
            name: name.into(),
            user_type_raw: user_type.as_str().to_string(),
            ..Default::default()
        }
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    pub fn user_type(&self) -> Option<UserType> {
        UserType::parse(&self.user_type_raw).ok()
    }

    pub fn is_admin(&self) -> bool {
        self.user_type() == Some(UserType::Admin)
    }

    pub fn is_security_admin(&self) -> bool {
        matches!(
            self.user_type(),
            Some(UserType::SecurityAdmin | UserType::Admin)
        )
    }

    /// Names of the groups the user belongs to, in server order
    pub fn group_names(&self) -> Vec<&str> {
        self.groups.iter().map(String::as_str).collect()
    }

    pub fn is_member_of(&self, group_name: &str) -> bool {
        self.groups.iter().any(|g| names_match(g, group_name))
    }

    pub fn add_group(&mut self, group_name: impl Into<String>) {
        let group_name = group_name.into();
        if !self.is_member_of(&group_name) {
            self.groups.push(group_name);
        }
    }

    pub fn remove_group(&mut self, group_name: &str) {
        self.groups.retain(|g| !names_match(g, group_name));
    }

    ////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

    pub fn body_as_map(&self) -> Result<JsonMap, BodyError> {
        let name = require(&self.name, "user", &self.name, "name")?;

        let mut body = JsonMap::new();
        body.insert("Name".to_string(), name.into());
        if let Some(friendly_name) = non_empty(self.friendly_name.as_ref()) {
            body.insert("FriendlyName".to_string(), friendly_name.into());
        }
        if let Some(password) = &self.password {
            body.insert("Password".to_string(), password.clone().into());
        }
        if let Some(enabled) = self.enabled {
            body.insert("Enabled".to_string(), enabled.into());
        }
        match self.user_type() {
            Some(user_type) => {
                body.insert("Type".to_string(), user_type.as_str().into());
            }
            None if !self.user_type_raw.trim().is_empty() => {
                body.insert("Type".to_string(), self.user_type_raw.trim().into());
            }
            None => {}
        }
        let groups = self
            .groups
            .iter()
            .map(|g| group_ref(g).map(Value::String))
            .collect::<Result<Vec<_>, _>>()?;
        body.insert(bind_key("Groups"), Value::Array(groups));

        Ok(body)
    }

    pub fn body(&self) -> Result<String, BodyError> {
        encode_body(self.body_as_map()?)
    }

    pub fn from_json(json: &str) -> Result<Self, DecodeError> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(&value)
    }

    pub fn from_value(value: &Value) -> Result<Self, DecodeError> {
        let wire = UserWire::deserialize(value)?;

        Ok(Self {
            name: wire.name,
            friendly_name: wire.friendly_name,
            password: None,
            enabled: wire.enabled,
            user_type_raw: wire.user_type,
            groups: wire
                .groups
                .into_iter()
                .filter_map(|g| g.name)
                .collect(),
        })
    }
}

/// Null users are neither admins nor security admins
pub fn is_admin(user: Option<&User>) -> bool {
    user.is_some_and(User::is_admin)
}

pub fn is_security_admin(user: Option<&User>) -> bool {
    user.is_some_and(User::is_security_admin)
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[serde_as]
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct UserWire {
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    name: String,
    #[serde(default)]
    friendly_name: Option<String>,
    #[serde(default)]
    enabled: Option<bool>,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(rename = "Type", default)]
    user_type: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    groups: Vec<NamedWire>,
}
