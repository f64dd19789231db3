use super::label::RoomLabel;
use super::time::Sample;
use crate::source::VariableSource;
use serde_json::Value;
use tokio::time::Instant;
use tracing::{debug, error};

/// Reads the room-type variable once per cycle and turns it into at most one `Sample`.
pub struct Sampler {
    variable_name: String,
}

impl Sampler {
    pub fn new(variable_name: impl Into<String>) -> Self {
        Self {
            variable_name: variable_name.into(),
        }
    }

    pub fn variable_name(&self) -> &str {
        &self.variable_name
    }

    /// Silent on every failure path: read errors, unset values and
    /// unknown labels all yield `None`.
    pub fn sample<S: VariableSource + ?Sized>(&self, source: &S, now: Instant) -> Option<Sample> {
        let raw = match source.get(&self.variable_name) {
            Ok(Some(value)) => value,
            Ok(None) => return None,
            Err(e) => {
                error!("Failed to read '{}' from variable source: {}", self.variable_name, e);
                return None;
            }
        };

        let text = coerce_to_text(&raw)?;
        let label = normalize_label(&text);
        if label.is_none() {
            debug!(
                "Room type '{}' found in variable '{}', but not in allowed set; ignoring",
                text.trim().to_lowercase(),
                self.variable_name
            );
        }
        label.map(|label| Sample::new(now, label))
    }
}

/// Trim + lowercase, then check against the whitelist.
pub fn normalize_label(raw: &str) -> Option<RoomLabel> {
    raw.trim().to_lowercase().parse().ok()
}

/// "Empty" values (null, "", false, 0, [], {}) count as unset.
fn coerce_to_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::Array(items) if items.is_empty() => None,
        Value::Object(map) if map.is_empty() => None,
        other => Some(other.to_string()),
    }
}
