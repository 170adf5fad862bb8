use super::message::{Message, OutboundMessage};
use crate::error::{OpenGptsError, Result};
use serde::{Deserialize, Serialize};

/// Body of `POST /runs/stream`.
#[derive(Serialize, Clone, Debug)]
pub struct RunRequest {
    pub input: Vec<OutboundMessage>,
    pub assistant_id: String,
    pub thread_id: String,
}

impl RunRequest {
    /// Rejects empty ids and empty input before anything is sent.
    pub fn new(assistant_id: &str, thread_id: &str, messages: &[Message]) -> Result<Self> {
        if assistant_id.trim().is_empty() {
            return Err(OpenGptsError::Validation(
                "assistant_id must not be empty".to_string(),
            ));
        }
        if thread_id.trim().is_empty() {
            return Err(OpenGptsError::Validation(
                "thread_id must not be empty".to_string(),
            ));
        }
        if messages.is_empty() {
            return Err(OpenGptsError::Validation(
                "at least one input message is required".to_string(),
            ));
        }

        Ok(Self {
            input: messages.iter().map(Message::to_request_params).collect(),
            assistant_id: assistant_id.to_string(),
            thread_id: thread_id.to_string(),
        })
    }
}

/// Payload of a `metadata` frame.
#[derive(Deserialize, Clone, Debug)]
pub struct RunMetadata {
    pub run_id: String,
}

#[derive(Deserialize, Clone, Debug)]
pub struct HealthStatus {
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_request_rejects_empty_ids() {
        let messages = vec![Message::human("hi")];
        assert!(matches!(
            RunRequest::new("", "t", &messages),
            Err(OpenGptsError::Validation(_))
        ));
        assert!(matches!(
            RunRequest::new("a", "  ", &messages),
            Err(OpenGptsError::Validation(_))
        ));
    }

    #[test]
    fn test_run_request_rejects_empty_input() {
        assert!(matches!(
            RunRequest::new("a", "t", &[]),
            Err(OpenGptsError::Validation(_))
        ));
    }

    #[test]
    fn test_run_request_body() {
        let request = RunRequest::new("a", "t", &[Message::human("hi")]).unwrap();
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["assistant_id"], "a");
        assert_eq!(body["thread_id"], "t");
        assert_eq!(body["input"][0]["type"], "human");
        assert_eq!(body["input"][0]["example"], false);
    }

    #[test]
    fn test_run_metadata_requires_run_id() {
        let metadata: RunMetadata = serde_json::from_str(r#"{"run_id":"abc"}"#).unwrap();
        assert_eq!(metadata.run_id, "abc");
        assert!(serde_json::from_str::<RunMetadata>("{}").is_err());
    }
}
