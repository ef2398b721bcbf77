//! Turning raw completion text into an invoice record.

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::ExtractionError;
use crate::models::record::{ExtractionOutcome, InvoiceRecord};

/// Parse completion text into a record.
///
/// The text must be a single JSON object; anything else is malformed.
pub fn parse_record(raw_text: &str) -> Result<InvoiceRecord, ExtractionError> {
    let value: Value = serde_json::from_str(raw_text.trim())
        .map_err(|e| ExtractionError::Malformed(e.to_string()))?;

    match value {
        Value::Object(object) => Ok(InvoiceRecord::from_object(&object)),
        other => Err(ExtractionError::Malformed(format!(
            "expected a JSON object, got {}",
            json_kind(&other)
        ))),
    }
}

/// Interpret completion text, substituting the "N/A" record on any failure.
pub fn interpret(raw_text: &str) -> ExtractionOutcome {
    match parse_record(raw_text) {
        Ok(record) => {
            debug!("Model response parsed");
            ExtractionOutcome::success(record)
        }
        Err(e) => {
            warn!("Could not parse model response: {}", e);
            ExtractionOutcome::failure()
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
