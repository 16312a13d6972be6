//! JSON file MessageSource implementation.

use async_trait::async_trait;
use msgfeed_core::error::{PipelineError, Result};
use msgfeed_core::import::MessageSource;
use serde_json::Value;
use std::path::{Path, PathBuf};

/// A source dataset stored as `<dir>/<name>.json`, holding a JSON array of objects.
pub struct JsonFileSource {
    name: String,
    path: PathBuf,
}

impl JsonFileSource {
    /// Resolves the dataset `name` inside `dir`.
    pub fn new(name: impl Into<String>, dir: &Path) -> Self {
        let name = name.into();
        let path = dir.join(format!("{}.json", name));
        Self { name, path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl MessageSource for JsonFileSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn load_entries(&self) -> Result<Vec<Value>> {
        let content = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            PipelineError::source_data(
                &self.name,
                format!("cannot read {}: {}", self.path.display(), e),
            )
        })?;

        let document: Value = serde_json::from_str(&content).map_err(|e| {
            PipelineError::source_data(&self.name, format!("invalid JSON: {}", e))
        })?;

        match document {
            Value::Array(entries) => Ok(entries),
            other => Err(PipelineError::source_data(
                &self.name,
                format!("expected an array of objects, found {}", json_kind(&other)),
            )),
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
