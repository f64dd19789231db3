use crate::error::SourceError;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::RwLock;

/// Read side of the shared runtime variable store.
/// The provider only ever reads; writers live elsewhere in the process.
pub trait VariableSource: Send + Sync {
    /// Current value of `name`, or `None` if unset.
    fn get(&self, name: &str) -> Result<Option<Value>, SourceError>;
}

/// In-memory implementation of the variable store.
/// Used by the binary (fed from stdin) and by tests.
#[derive(Debug, Default)]
pub struct InMemoryVariableSource {
    values: RwLock<HashMap<String, Value>>,
}

impl InMemoryVariableSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, name: &str, value: impl Into<Value>) {
        match self.values.write() {
            Ok(mut values) => {
                values.insert(name.to_string(), value.into());
            }
            Err(poisoned) => {
                poisoned.into_inner().insert(name.to_string(), value.into());
            }
        }
    }

    pub fn unset(&self, name: &str) {
        match self.values.write() {
            Ok(mut values) => {
                values.remove(name);
            }
            Err(poisoned) => {
                poisoned.into_inner().remove(name);
            }
        }
    }
}

impl VariableSource for InMemoryVariableSource {
    fn get(&self, name: &str) -> Result<Option<Value>, SourceError> {
        let values = self
            .values
            .read()
            .map_err(|_| SourceError::Unavailable("variable store lock poisoned".to_string()))?;
        Ok(values.get(name).cloned())
    }
}
