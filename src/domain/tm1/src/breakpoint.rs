// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use odata_binding::odata_type;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::codec::to_json_map;
use crate::*;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub const DATA_BREAKPOINT_ODATA_TYPE: &str = "#ibm.tm1.api.v1.ProcessDebugContextDataBreakpoint";
pub const LINE_BREAKPOINT_ODATA_TYPE: &str = "#ibm.tm1.api.v1.ProcessDebugContextLineBreakpoint";

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Breakpoint of a process debug session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessDebugBreakpoint {
    pub id: i64,
    pub enabled: bool,
    pub hit_mode: HitMode,
    pub hit_count: i64,
    pub expression: String,
    pub target: BreakpointTarget,
}

/// What a breakpoint stops on, which also determines its `@odata.type`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BreakpointTarget {
    /// Watch on a variable
    Data { variable_name: String },
    /// Line of a procedure
    Line {
        procedure: ProcedureType,
        line_number: u32,
    },
}

impl BreakpointTarget {
    pub fn odata_type(&self) -> &'static str {
        match self {
            BreakpointTarget::Data { .. } => DATA_BREAKPOINT_ODATA_TYPE,
            BreakpointTarget::Line { .. } => LINE_BREAKPOINT_ODATA_TYPE,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum HitMode {
    #[default]
    BreakAlways,
    BreakEqual,
    BreakGreaterOrEqual,
}

impl ProcessDebugBreakpoint {
    pub fn watch(id: i64, variable_name: impl Into<String>) -> Self {
        Self::new(
            id,
            BreakpointTarget::Data {
                variable_name: variable_name.into(),
            },
        )
    }

    pub fn line(id: i64, procedure: ProcedureType, line_number: u32) -> Self {
        Self::new(
            id,
            BreakpointTarget::Line {
                procedure,
                line_number,
            },
        )
    }

    fn new(id: i64, target: BreakpointTarget) -> Self {
        Self {
            id,
            enabled: true,
            hit_mode: HitMode::default(),
            hit_count: 0,
            expression: String::new(),
            target,
        }
    }

    /// Payload for embedding into a batch request body
    pub fn body_as_map(&self) -> Result<JsonMap, BodyError> {
        Ok(to_json_map(&BreakpointWire::from(self))?)
    }

    /// Standalone payload, same content as [`Self::body_as_map`]
    pub fn body(&self) -> Result<String, BodyError> {
        encode_body(self.body_as_map()?)
    }

    pub fn from_json(json: &str) -> Result<Self, DecodeError> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(&value)
    }

    pub fn from_value(value: &Value) -> Result<Self, DecodeError> {
        let odata_type = odata_type(value);
        let is_data = match odata_type {
            Some(DATA_BREAKPOINT_ODATA_TYPE) => true,
            Some(LINE_BREAKPOINT_ODATA_TYPE) => false,
            other => {
                tracing::debug!(odata_type = ?other, "Rejecting breakpoint with unknown type");
                return Err(UnknownTypeError {
                    entity: "breakpoint",
                    odata_type: other.map(str::to_string),
                }
                .into());
            }
        };

        let wire = BreakpointWire::deserialize(value)?;
        let target = if is_data {
            BreakpointTarget::Data {
                variable_name: wire.variable_name.unwrap_or_default(),
            }
        } else {
            BreakpointTarget::Line {
                procedure: wire.procedure_type.unwrap_or(ProcedureType::Prolog),
                line_number: wire.line_number.unwrap_or_default(),
            }
        };

        Ok(Self {
            id: wire.id,
            enabled: wire.enabled,
            hit_mode: wire.hit_mode,
            hit_count: wire.hit_count,
            expression: wire.expression,
            target,
        })
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[serde_with::skip_serializing_none]
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct BreakpointWire {
    #[serde(rename = "@odata.type", default)]
    odata_type: String,
    #[serde(rename = "ID")]
    id: i64,
    #[serde(default)]
    enabled: bool,
    #[serde(default)]
    hit_mode: HitMode,
    #[serde(default)]
    hit_count: i64,
    #[serde(default)]
    expression: String,
    #[serde(default)]
    variable_name: Option<String>,
    #[serde(default)]
    procedure_type: Option<ProcedureType>,
    #[serde(default)]
    line_number: Option<u32>,
}

impl From<&ProcessDebugBreakpoint> for BreakpointWire {
    fn from(value: &ProcessDebugBreakpoint) -> Self {
        let (variable_name, procedure_type, line_number) = match &value.target {
            BreakpointTarget::Data { variable_name } => (Some(variable_name.clone()), None, None),
            BreakpointTarget::Line {
                procedure,
                line_number,
            } => (None, Some(*procedure), Some(*line_number)),
        };

        Self {
            odata_type: value.target.odata_type().to_string(),
            id: value.id,
            enabled: value.enabled,
            hit_mode: value.hit_mode,
            hit_count: value.hit_count,
            expression: value.expression.clone(),
            variable_name,
            procedure_type,
            line_number,
        }
    }
}
