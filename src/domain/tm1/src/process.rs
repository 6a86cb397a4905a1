// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::collections::BTreeMap;

use odata_binding::process_ref;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::codec::{require, to_json_map};
use crate::*;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
// Process
////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// TurboIntegrator process. Serializes directly to the TM1 `Process` schema.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Process {
    pub name: String,
    #[serde(default)]
    pub has_security_access: bool,
    #[serde(default)]
    pub prolog_procedure: String,
    #[serde(default)]
    pub metadata_procedure: String,
    #[serde(default)]
    pub data_procedure: String,
    #[serde(default)]
    pub epilog_procedure: String,
    #[serde(default)]
    pub data_source: Option<ProcessDataSource>,
    #[serde(default)]
    pub parameters: Vec<ProcessParameter>,
    #[serde(default)]
    pub variables: Vec<ProcessVariable>,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    #[serde(rename = "UIData", default)]
    pub ui_data: String,
    #[serde(rename = "VariablesUIData", default)]
    pub variables_ui_data: Vec<String>,
}

impl Process {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn procedure(&self, procedure: ProcedureType) -> &str {
        match procedure {
            ProcedureType::Prolog => &self.prolog_procedure,
            ProcedureType::Metadata => &self.metadata_procedure,
            ProcedureType::Data => &self.data_procedure,
            ProcedureType::Epilog => &self.epilog_procedure,
        }
    }

    pub fn set_procedure(&mut self, procedure: ProcedureType, code: impl Into<String>) {
        let code = code.into();
        match procedure {
            ProcedureType::Prolog => self.prolog_procedure = code,
            ProcedureType::Metadata => self.metadata_procedure = code,
            ProcedureType::Data => self.data_procedure = code,
            ProcedureType::Epilog => self.epilog_procedure = code,
        }
    }

    /// Appends a parameter typed after its default value
    pub fn add_parameter(
        &mut self,
        name: impl Into<String>,
        prompt: impl Into<String>,
        value: impl Into<ProcessParameterValue>,
    ) {
        let value = value.into();
        self.parameters.push(ProcessParameter {
            name: name.into(),
            prompt: prompt.into(),
            parameter_type: Some(value.parameter_type()),
            value,
        });
    }

    /// Removes the first parameter with the given name
    pub fn remove_parameter(&mut self, name: &str) -> Option<ProcessParameter> {
        let i = self.parameters.iter().position(|p| p.name == name)?;
        Some(self.parameters.remove(i))
    }

    /// Appends a data source variable at the next position, registering it in
    /// the variables UI data the way the TM1 editors do
    pub fn add_variable(&mut self, name: impl Into<String>, variable_type: ProcessVariableType) {
        self.variables.push(ProcessVariable {
            name: name.into(),
            variable_type,
            position: position_of(self.variables.len()),
            start_byte: 0,
            end_byte: 0,
        });
        self.variables_ui_data
            .push(variable_type.ui_data().to_string());
    }

    pub fn remove_variable(&mut self, name: &str) -> Option<ProcessVariable> {
        let i = self.variables.iter().position(|v| v.name == name)?;
        let removed = self.variables.remove(i);
        if i < self.variables_ui_data.len() {
            self.variables_ui_data.remove(i);
        }
        for (i, variable) in self.variables.iter_mut().enumerate().skip(i) {
            variable.position = position_of(i);
        }
        Some(removed)
    }

    /// Older servers reject the `Type` field of parameters
    pub fn drop_parameter_types(&mut self) {
        for parameter in &mut self.parameters {
            parameter.parameter_type = None;
        }
    }

    /// `Processes('<process>')`
    pub fn reference(&self) -> Result<String, BodyError> {
        Ok(process_ref(&self.name)?)
    }

    ////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

    pub fn body_as_map(&self) -> Result<JsonMap, BodyError> {
        require(&self.name, "process", &self.name, "name")?;
        Ok(to_json_map(self)?)
    }

    pub fn body(&self) -> Result<String, BodyError> {
        encode_body(self.body_as_map()?)
    }

    /// Payload adapted to the server described by the config
    pub fn body_with_config(&self, config: &CompatibilityConfig) -> Result<String, BodyError> {
        if config.supports_process_parameter_types() {
            return self.body();
        }

        tracing::debug!(
            process = %self.name,
            server_version = ?config.server_version,
            "Dropping parameter types for an older server"
        );
        let mut process = self.clone();
        process.drop_parameter_types();
        process.body()
    }

    pub fn from_json(json: &str) -> Result<Self, DecodeError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_value(value: &Value) -> Result<Self, DecodeError> {
        Ok(Self::deserialize(value)?)
    }
}

fn position_of(index: usize) -> i64 {
    i64::try_from(index + 1).unwrap_or(i64::MAX)
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProcedureType {
    Prolog,
    Metadata,
    Data,
    Epilog,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
// Parameters and variables
////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProcessParameter {
    pub name: String,
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub value: ProcessParameterValue,
    #[serde(rename = "Type", default)]
    pub parameter_type: Option<ProcessParameterType>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProcessParameterType {
    String,
    Numeric,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProcessParameterValue {
    Numeric(f64),
    String(String),
}

impl ProcessParameterValue {
    pub fn parameter_type(&self) -> ProcessParameterType {
        match self {
            ProcessParameterValue::Numeric(_) => ProcessParameterType::Numeric,
            ProcessParameterValue::String(_) => ProcessParameterType::String,
        }
    }
}

impl Default for ProcessParameterValue {
    fn default() -> Self {
        ProcessParameterValue::String(String::new())
    }
}

impl From<f64> for ProcessParameterValue {
    fn from(value: f64) -> Self {
        ProcessParameterValue::Numeric(value)
    }
}

impl From<i32> for ProcessParameterValue {
    fn from(value: i32) -> Self {
        ProcessParameterValue::Numeric(f64::from(value))
    }
}

impl From<&str> for ProcessParameterValue {
    fn from(value: &str) -> Self {
        ProcessParameterValue::String(value.to_string())
    }
}

impl From<String> for ProcessParameterValue {
    fn from(value: String) -> Self {
        ProcessParameterValue::String(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProcessVariable {
    pub name: String,
    #[serde(rename = "Type")]
    pub variable_type: ProcessVariableType,
    /// 1-based column of the variable in the data source
    pub position: i64,
    #[serde(default)]
    pub start_byte: i64,
    #[serde(default)]
    pub end_byte: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProcessVariableType {
    String,
    Numeric,
}

impl ProcessVariableType {
    fn ui_data(self) -> &'static str {
        match self {
            ProcessVariableType::String => "VarType=32\u{c}ColType=827\u{c}",
            ProcessVariableType::Numeric => "VarType=33\u{c}ColType=827\u{c}",
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
// Data source
////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessDataSource {
    #[serde(rename = "Type", default)]
    pub source_type: DataSourceType,
    pub ascii_decimal_separator: Option<String>,
    pub ascii_delimiter_char: Option<String>,
    pub ascii_delimiter_type: Option<String>,
    pub ascii_header_records: Option<i64>,
    pub ascii_quote_character: Option<String>,
    pub ascii_thousand_separator: Option<String>,
    pub data_source_name_for_client: Option<String>,
    pub data_source_name_for_server: Option<String>,
    pub user_name: Option<String>,
    pub password: Option<String>,
    pub query: Option<String>,
    pub uses_unicode: Option<bool>,
    pub view: Option<String>,
    pub subset: Option<String>,
}

impl ProcessDataSource {
    /// Delimited text file read by the server
    pub fn ascii(file_name: impl Into<String>, delimiter: impl Into<String>) -> Self {
        let file_name = file_name.into();
        Self {
            source_type: DataSourceType::Ascii,
            ascii_delimiter_char: Some(delimiter.into()),
            ascii_delimiter_type: Some("Character".to_string()),
            ascii_header_records: Some(1),
            ascii_quote_character: Some("\"".to_string()),
            data_source_name_for_client: Some(file_name.clone()),
            data_source_name_for_server: Some(file_name),
            ..Default::default()
        }
    }

    pub fn cube_view(cube_name: impl Into<String>, view_name: impl Into<String>) -> Self {
        let cube_name = cube_name.into();
        Self {
            source_type: DataSourceType::CubeView,
            data_source_name_for_client: Some(cube_name.clone()),
            data_source_name_for_server: Some(cube_name),
            view: Some(view_name.into()),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataSourceType {
    #[default]
    #[serde(rename = "None")]
    NoSource,
    #[serde(rename = "ASCII")]
    Ascii,
    #[serde(rename = "ODBC")]
    Odbc,
    #[serde(rename = "TM1CubeView")]
    CubeView,
    #[serde(rename = "TM1DimensionSubset")]
    DimensionSubset,
}
