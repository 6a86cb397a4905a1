// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use pretty_assertions::assert_eq;
use tm1_domain::*;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test]
fn test_server_version_parse() {
    assert_eq!(
        ServerVersion::parse("11.8.01300.1"),
        Ok(ServerVersion::new(11, 8))
    );
    assert_eq!(" 11.2 ".parse::<ServerVersion>(), Ok(ServerVersion::new(11, 2)));
    assert_eq!(ServerVersion::parse("12"), Ok(ServerVersion::new(12, 0)));
    assert_eq!(
        ServerVersion::parse("eleven"),
        Err(ServerVersionParseError {
            value: "eleven".to_string()
        })
    );
    assert!(ServerVersion::parse("11.x").is_err());
    assert!(ServerVersion::parse("").is_err());
}

#[test]
fn test_server_version_ordering() {
    assert!(ServerVersion::new(11, 2) < ServerVersion::PROCESS_PARAMETER_TYPES);
    assert!(ServerVersion::new(11, 10) > ServerVersion::new(11, 3));
    assert!(ServerVersion::new(12, 0) > ServerVersion::new(11, 8));
    assert_eq!(ServerVersion::new(11, 8).to_string(), "11.8");
}

#[test]
fn test_parameter_types_support() {
    assert!(CompatibilityConfig::default().supports_process_parameter_types());
    assert!(
        CompatibilityConfig::for_version(ServerVersion::new(11, 3))
            .supports_process_parameter_types()
    );
    assert!(
        !CompatibilityConfig::for_version(ServerVersion::new(11, 2))
            .supports_process_parameter_types()
    );
}

#[test]
fn test_config_serde() {
    let config: CompatibilityConfig =
        serde_json::from_str(r#"{"serverVersion": "11.1.00000.30"}"#).unwrap();
    assert_eq!(config, CompatibilityConfig::for_version(ServerVersion::new(11, 1)));
    assert_eq!(
        serde_json::to_string(&config).unwrap(),
        r#"{"serverVersion":"11.1"}"#
    );

    let config: CompatibilityConfig = serde_json::from_str("{}").unwrap();
    assert_eq!(config, CompatibilityConfig::default());

    assert!(serde_json::from_str::<CompatibilityConfig>(r#"{"serverVersion": "x"}"#).is_err());
    assert!(serde_json::from_str::<CompatibilityConfig>(r#"{"other": 1}"#).is_err());
}
