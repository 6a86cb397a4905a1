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

fn load_process() -> Process {
    let mut process = Process::new("load.sales");
    process.set_procedure(ProcedureType::Prolog, "nRows = 0;");
    process.set_procedure(ProcedureType::Data, "nRows = nRows + 1;");
    process.add_parameter("pYear", "Year to load", "2024");
    process.add_parameter("pScale", "Scale", 1000);
    process.add_variable("vRegion", ProcessVariableType::String);
    process.add_variable("vValue", ProcessVariableType::Numeric);
    process
}

#[test]
fn test_process_body() {
    let process = load_process();

    assert_eq!(
        Value::Object(process.body_as_map().unwrap()),
        json!({
            "Name": "load.sales",
            "HasSecurityAccess": false,
            "PrologProcedure": "nRows = 0;",
            "MetadataProcedure": "",
            "DataProcedure": "nRows = nRows + 1;",
            "EpilogProcedure": "",
            "Parameters": [
                { "Name": "pYear", "Prompt": "Year to load", "Value": "2024", "Type": "String" },
                { "Name": "pScale", "Prompt": "Scale", "Value": 1000.0, "Type": "Numeric" },
            ],
            "Variables": [
                { "Name": "vRegion", "Type": "String", "Position": 1, "StartByte": 0, "EndByte": 0 },
                { "Name": "vValue", "Type": "Numeric", "Position": 2, "StartByte": 0, "EndByte": 0 },
            ],
            "Attributes": {},
            "UIData": "",
            "VariablesUIData": [
                "VarType=32\u{c}ColType=827\u{c}",
                "VarType=33\u{c}ColType=827\u{c}",
            ],
        })
    );
}

#[test]
fn test_process_parameters() {
    let mut process = load_process();
    process.add_parameter("pYear", "Duplicate", "2025");

    let removed = process.remove_parameter("pYear").unwrap();
    assert_eq!(removed.prompt, "Year to load");
    assert_eq!(
        process
            .parameters
            .iter()
            .map(|p| p.prompt.as_str())
            .collect::<Vec<_>>(),
        ["Scale", "Duplicate"]
    );
    assert_eq!(process.remove_parameter("pMissing"), None);
}

#[test]
fn test_process_remove_variable_shifts_positions() {
    let mut process = load_process();
    process.add_variable("vMonth", ProcessVariableType::String);

    process.remove_variable("vRegion").unwrap();
    assert_eq!(
        process
            .variables
            .iter()
            .map(|v| (v.name.as_str(), v.position))
            .collect::<Vec<_>>(),
        [("vValue", 1), ("vMonth", 2)]
    );
    assert_eq!(process.variables_ui_data.len(), 2);
}

#[test]
fn test_drop_parameter_types() {
    let mut process = load_process();
    process.drop_parameter_types();

    let body = process.body_as_map().unwrap();
    for parameter in body["Parameters"].as_array().unwrap() {
        assert!(parameter.get("Type").is_none());
        assert!(parameter.get("Value").is_some());
    }
}

#[test_log::test]
fn test_process_body_with_config() {
    let process = load_process();

    let legacy = CompatibilityConfig::for_version(ServerVersion::new(11, 2));
    let body: Value = serde_json::from_str(&process.body_with_config(&legacy).unwrap()).unwrap();
    assert!(body["Parameters"][0].get("Type").is_none());

    let modern = CompatibilityConfig::for_version(ServerVersion::new(11, 8));
    let body: Value = serde_json::from_str(&process.body_with_config(&modern).unwrap()).unwrap();
    assert_eq!(body["Parameters"][0]["Type"], json!("String"));

    let unknown = CompatibilityConfig::default();
    let body: Value = serde_json::from_str(&process.body_with_config(&unknown).unwrap()).unwrap();
    assert_eq!(body["Parameters"][1]["Type"], json!("Numeric"));

    // Source process keeps its types
    assert!(process.parameters.iter().all(|p| p.parameter_type.is_some()));
}

#[test]
fn test_process_body_requires_name() {
    assert!(matches!(
        Process::default().body(),
        Err(BodyError::MissingBinding(MissingBindingError { entity: "process", .. }))
    ));
}

#[test]
fn test_process_decode() {
    let process = Process::from_json(indoc!(
        r##"
        {
            "@odata.etag": "W/\"7\"",
            "Name": "export.view",
            "HasSecurityAccess": true,
            "PrologProcedure": "#****Begin: Generated Statements***",
            "MetadataProcedure": "",
            "DataProcedure": "",
            "EpilogProcedure": "",
            "DataSource": {
                "Type": "TM1CubeView",
                "dataSourceNameForClient": "Sales",
                "dataSourceNameForServer": "Sales",
                "view": "Export"
            },
            "Parameters": [
                { "Name": "pCube", "Prompt": "", "Value": "Sales", "Type": "String" },
                { "Name": "pLimit", "Prompt": "", "Value": 10, "Type": "Numeric" }
            ],
            "Variables": [
                { "Name": "vRegion", "Type": "String", "Position": 1, "StartByte": 0, "EndByte": 0 }
            ],
            "Attributes": { "Caption": "Export view" },
            "UIData": "CubeAction=1511\fDataAction=1503\f",
            "VariablesUIData": ["VarType=32\fColType=827\f"]
        }
        "##
    ))
    .unwrap();

    assert!(process.has_security_access);
    assert_eq!(
        process.data_source,
        Some(ProcessDataSource::cube_view("Sales", "Export"))
    );
    assert_eq!(
        process.parameters[1].value,
        ProcessParameterValue::Numeric(10.0)
    );
    assert_eq!(
        process.parameters[0].parameter_type,
        Some(ProcessParameterType::String)
    );
    assert_eq!(process.attributes["Caption"], "Export view");
    assert_eq!(process.ui_data, "CubeAction=1511\u{c}DataAction=1503\u{c}");
    assert_eq!(process.reference().unwrap(), "Processes('export.view')");
}

#[test]
fn test_ascii_data_source_body() {
    let mut process = Process::new("import.csv");
    process.data_source = Some(ProcessDataSource::ascii("sales.csv", ","));

    let body = process.body_as_map().unwrap();
    assert_eq!(
        body["DataSource"],
        json!({
            "Type": "ASCII",
            "asciiDelimiterChar": ",",
            "asciiDelimiterType": "Character",
            "asciiHeaderRecords": 1,
            "asciiQuoteCharacter": "\"",
            "dataSourceNameForClient": "sales.csv",
            "dataSourceNameForServer": "sales.csv",
        })
    );
}
