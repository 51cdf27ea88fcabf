//! Mock call simulator behind the "try it" form.
//!
//! Nothing leaves the process: the payload is parsed, checked for three demo
//! fields, and echoed back as if a record had been created. The check is
//! illustrative and does not look at the active endpoint's field table.

use std::time::Duration;

use chrono::{SecondsFormat, Utc};
use rand::Rng;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use tracing::debug;

/// Artificial network latency applied before every result.
pub const SIMULATED_LATENCY: Duration = Duration::from_millis(1000);

/// Fields a payload must carry (and carry truthy values for) to succeed.
pub const REQUIRED_FIELDS: [&str; 3] = ["name", "email", "age"];

pub const SUCCESS_MESSAGE: &str = "User created successfully (simulation)";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    InvalidJson,
    MissingRequiredFields,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidJson => "INVALID_JSON",
            ErrorCode::MissingRequiredFields => "MISSING_REQUIRED_FIELDS",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationError {
    pub code: ErrorCode,
    pub message: String,
    /// Always empty when present; the offending fields are not reported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<String>>,
}

/// Outcome of one simulated call.
///
/// Serializes as `{ success: true, data, message }` or
/// `{ success: false, error: { code, message, fields? } }`.
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationResult {
    Success { data: Map<String, Value>, message: String },
    Failure(SimulationError),
}

impl SimulationResult {
    pub fn is_success(&self) -> bool {
        matches!(self, SimulationResult::Success { .. })
    }

    pub fn error_code(&self) -> Option<ErrorCode> {
        match self {
            SimulationResult::Failure(err) => Some(err.code),
            SimulationResult::Success { .. } => None,
        }
    }

    fn invalid_json() -> Self {
        SimulationResult::Failure(SimulationError {
            code: ErrorCode::InvalidJson,
            message: "Invalid JSON".to_string(),
            fields: None,
        })
    }

    fn missing_fields() -> Self {
        SimulationResult::Failure(SimulationError {
            code: ErrorCode::MissingRequiredFields,
            message: "Missing required fields".to_string(),
            fields: Some(Vec::new()),
        })
    }
}

impl Serialize for SimulationResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            SimulationResult::Success { data, message } => {
                let mut state = serializer.serialize_struct("SimulationResult", 3)?;
                state.serialize_field("success", &true)?;
                state.serialize_field("data", data)?;
                state.serialize_field("message", message)?;
                state.end()
            }
            SimulationResult::Failure(error) => {
                let mut state = serializer.serialize_struct("SimulationResult", 2)?;
                state.serialize_field("success", &false)?;
                state.serialize_field("error", error)?;
                state.end()
            }
        }
    }
}

/// Wait [`SIMULATED_LATENCY`], then [`evaluate`] `raw`.
pub async fn simulate(raw: &str) -> SimulationResult {
    tokio::time::sleep(SIMULATED_LATENCY).await;
    evaluate(raw)
}

/// The simulator's decision, without the delay.
pub fn evaluate(raw: &str) -> SimulationResult {
    let payload: Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(err) => {
            debug!(%err, "simulated payload is not valid JSON");
            return SimulationResult::invalid_json();
        }
    };

    // Field lookup on a `null` document fails outright rather than reading as missing.
    if payload.is_null() {
        return SimulationResult::invalid_json();
    }

    let complete = REQUIRED_FIELDS
        .iter()
        .all(|field| payload.get(field).is_some_and(is_truthy));
    let Value::Object(fields) = payload else {
        return SimulationResult::missing_fields();
    };
    if !complete {
        return SimulationResult::missing_fields();
    }

    let mut data = Map::new();
    data.insert("id".to_string(), Value::from(rand::thread_rng().gen_range(0..1000u32)));
    // Payload keys may replace `id`; `createdAt` is always the simulator's own.
    data.extend(fields);
    data.insert(
        "createdAt".to_string(),
        Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
    );

    SimulationResult::Success {
        data,
        message: SUCCESS_MESSAGE.to_string(),
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
