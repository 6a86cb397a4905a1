// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use indoc::indoc;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use tm1_domain::*;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

fn user_with_raw_type(raw: &str) -> User {
    User {
        name: "u".to_string(),
        user_type_raw: raw.to_string(),
        ..Default::default()
    }
}

#[test]
fn test_admin_type_is_normalized() {
    let user = user_with_raw_type(" admin ");

    assert_eq!(user.user_type(), Some(UserType::Admin));
    assert!(user.is_admin());
    assert!(user.is_security_admin());
    assert!(is_admin(Some(&user)));
    assert!(is_security_admin(Some(&user)));
}

#[test]
fn test_security_admin_is_not_admin() {
    let user = user_with_raw_type("SECURITYADMIN");

    assert!(!is_admin(Some(&user)));
    assert!(is_security_admin(Some(&user)));
}

#[test]
fn test_other_types_have_no_admin_rights() {
    for raw in ["User", "DataAdmin", "OperationsAdmin", "Superuser", ""] {
        let user = user_with_raw_type(raw);
        assert!(!user.is_admin(), "{raw}");
        assert!(!user.is_security_admin(), "{raw}");
    }
}

#[test]
fn test_absent_user_has_no_admin_rights() {
    assert!(!is_admin(None));
    assert!(!is_security_admin(None));
}

#[test]
fn test_user_type_parse() {
    assert_eq!("dataadmin".parse::<UserType>(), Ok(UserType::DataAdmin));
    assert_eq!(UserType::parse("  OPERATIONSADMIN\t"), Ok(UserType::OperationsAdmin));
    assert_eq!(
        UserType::parse(" root "),
        Err(UserTypeParseError {
            value: "root".to_string()
        })
    );
    assert!(" admin ".parse::<UserType>().is_err());
    assert_eq!(UserType::OperationsAdmin.to_string(), "OperationsAdmin");
    assert_eq!(UserType::SecurityAdmin.as_str(), "SecurityAdmin");
}

#[test]
fn test_groups() {
    let mut user = User::new("Alice", UserType::User);
    user.add_group("Finance");
    user.add_group("ADMIN");
    user.add_group("finance");

    assert_eq!(user.group_names(), ["Finance", "ADMIN"]);
    assert!(user.is_member_of("Admin"));

    user.remove_group("FINANCE");
    assert_eq!(user.group_names(), ["ADMIN"]);
}

#[test]
fn test_user_body() {
    let mut user = User::new("Alice", UserType::DataAdmin).with_password("s3cret");
    user.friendly_name = Some("Alice Smith".to_string());
    user.enabled = Some(true);
    user.add_group("Finance & Planning");

    assert_eq!(
        Value::Object(user.body_as_map().unwrap()),
        json!({
            "Name": "Alice",
            "FriendlyName": "Alice Smith",
            "Password": "s3cret",
            "Enabled": true,
            "Type": "DataAdmin",
            "Groups@odata.bind": ["Groups('Finance%20%26%20Planning')"],
        })
    );
}

#[test]
fn test_user_body_keeps_unrecognized_type() {
    let user = user_with_raw_type(" Auditor ");
    let body = user.body_as_map().unwrap();

    assert_eq!(body["Type"], json!("Auditor"));
    assert_eq!(body["Groups@odata.bind"], json!([]));
    assert!(!body.contains_key("Password"));
}

#[test]
fn test_user_body_rejects_bad_group() {
    let mut user = User::new("Bob", UserType::User);
    user.groups.push("O'Brien".to_string());

    assert!(matches!(
        user.body(),
        Err(BodyError::InvalidReference(_))
    ));
}

#[test]
fn test_user_decode() {
    let user = User::from_json(indoc!(
        r#"
        {
            "Name": "Alice",
            "FriendlyName": "Alice Smith",
            "Type": "admin",
            "Enabled": true,
            "Groups": [
                { "Name": "ADMIN" },
                { "Name": "Finance" }
            ]
        }
        "#
    ))
    .unwrap();

    assert_eq!(user.name, "Alice");
    assert_eq!(user.password, None);
    assert_eq!(user.user_type(), Some(UserType::Admin));
    assert_eq!(user.group_names(), ["ADMIN", "Finance"]);
    assert!(user.is_admin());
}
