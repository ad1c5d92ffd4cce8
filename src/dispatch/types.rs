use crate::Error;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body posted to the receive endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiveRequest {
    pub data: String,
}

impl ReceiveRequest {
    pub fn new(data: impl Into<String>) -> Self {
        Self { data: data.into() }
    }
}

/// Result of one dispatched request.
#[derive(Debug)]
pub enum Outcome {
    /// The sink now shows `source`.
    Rendered { token: u64, source: String },
    /// A newer request had already rendered, so this response was dropped.
    Stale { token: u64 },
    /// The failure was recorded as a diagnostic and the sink was left alone.
    Failed { token: u64, error: Error },
}

impl Outcome {
    pub fn token(&self) -> u64 {
        match self {
            Self::Rendered { token, .. } | Self::Stale { token } | Self::Failed { token, .. } => {
                *token
            }
        }
    }

    pub fn is_rendered(&self) -> bool {
        matches!(self, Self::Rendered { .. })
    }

    pub fn source(&self) -> Option<&str> {
        match self {
            Self::Rendered { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Text the `image` field contributes when concatenated into the data URI.
///
/// The receiving service is not validated: a missing field becomes `undefined`,
/// `null` becomes `null`, and other JSON values are stringified the way a
/// browser would. Only a `null` document fails, since it has no fields to read.
pub fn image_field_text(body: &Value) -> Result<String, Error> {
    match body {
        Value::Null => Err(Error::invalid_response(
            "cannot read property 'image' of null",
        )),
        Value::Object(map) => Ok(map
            .get("image")
            .map(stringify)
            .unwrap_or_else(|| "undefined".to_string())),
        _ => Ok("undefined".to_string()),
    }
}

fn stringify(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.as_f64().map(js_number).unwrap_or_else(|| n.to_string()),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                // nested null elements render as empty strings
                Value::Null => String::new(),
                other => stringify(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

/// Formats a number the way JavaScript's `String(number)` does.
fn js_number(value: f64) -> String {
    if value == 0.0 {
        // covers -0 as well
        return "0".to_string();
    }
    let magnitude = value.abs();
    if magnitude >= 1e21 || magnitude < 1e-6 {
        let formatted = format!("{:e}", value);
        return match formatted.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{}e+{}", mantissa, exponent)
            }
            _ => formatted,
        };
    }
    value.to_string()
}
