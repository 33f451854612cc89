//! Request types for the ask and dataset endpoints

use serde::{Deserialize, Serialize};

use crate::types::DatasetFormat;

/// Question request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskRequest {
    /// The question (or command) text
    pub query: String,

    /// Opaque session token; omitted means the shared default session
    #[serde(default = "default_session_id")]
    pub session_id: String,
}

fn default_session_id() -> String {
    "default".to_string()
}

impl AskRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            session_id: default_session_id(),
        }
    }

    pub fn with_session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = session_id.into();
        self
    }
}

/// Direct dataset ingestion request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestRequest {
    /// Dataset file path, absolute or relative to the data directory
    pub file_path: String,

    /// Explicit format; omitted means detect from the extension
    #[serde(default)]
    pub format: Option<DatasetFormat>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_defaults_when_absent() {
        let req: AskRequest = serde_json::from_str(r#"{"query": "what is diabetes"}"#).unwrap();
        assert_eq!(req.session_id, "default");
    }

    #[test]
    fn test_format_optional() {
        let req: IngestRequest = serde_json::from_str(r#"{"file_path": "flu.json"}"#).unwrap();
        assert!(req.format.is_none());

        let req: IngestRequest =
            serde_json::from_str(r#"{"file_path": "notes.csv", "format": "csv"}"#).unwrap();
        assert_eq!(req.format, Some(DatasetFormat::Csv));
    }
}
