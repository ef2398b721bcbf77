//! Wire types for the file-extract and chat-completion endpoints.

use serde::{Deserialize, Serialize};

/// Handle to a document uploaded to the service.
///
/// Only `id` is needed to fetch content or delete the file; the rest is
/// what the service reports back and is kept for logging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileHandle {
    pub id: String,
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub bytes: u64,
    #[serde(default)]
    pub purpose: String,
}

impl FileHandle {
    /// Create a handle from a bare identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            filename: String::new(),
            bytes: 0,
            purpose: String::new(),
        }
    }
}

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A single chat message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Requested shape of the completion output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseFormat {
    #[serde(rename = "type")]
    pub kind: String,
}

impl ResponseFormat {
    /// Ask the model for a single JSON object.
    pub fn json_object() -> Self {
        Self {
            kind: "json_object".to_string(),
        }
    }
}

/// Chat completion request body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormat>,
}

/// Chat completion response body (only the parts we read).
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub index: u32,
    pub message: ChatMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

impl ChatResponse {
    /// Trimmed content of the first choice, if any.
    ///
    /// Empty text is still content; judging it is left to the caller.
    pub fn first_content(&self) -> Option<&str> {
        self.choices.first().map(|c| c.message.content.trim())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_chat_request_serialization() {
        let request = ChatRequest {
            model: "moonshot-v1-32k".to_string(),
            messages: vec![ChatMessage::system("sys"), ChatMessage::user("hi")],
            temperature: 0.0,
            response_format: Some(ResponseFormat::json_object()),
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "model": "moonshot-v1-32k",
                "messages": [
                    {"role": "system", "content": "sys"},
                    {"role": "user", "content": "hi"}
                ],
                "temperature": 0.0,
                "response_format": {"type": "json_object"}
            })
        );
    }

    #[test]
    fn test_response_first_content_trims() {
        let response: ChatResponse = serde_json::from_str(
            r#"{"choices":[{"index":0,"message":{"role":"assistant","content":"  {\"a\":1}\n"},"finish_reason":"stop"}]}"#,
        )
        .unwrap();
        assert_eq!(response.first_content(), Some(r#"{"a":1}"#));
    }

    #[test]
    fn test_blank_message_is_returned_as_empty() {
        let response: ChatResponse = serde_json::from_str(
            r#"{"choices":[{"index":0,"message":{"role":"assistant","content":"  \n"}}]}"#,
        )
        .unwrap();
        assert_eq!(response.first_content(), Some(""));
    }

    #[test]
    fn test_response_without_choices() {
        let response: ChatResponse = serde_json::from_str(r#"{"id":"x"}"#).unwrap();
        assert_eq!(response.first_content(), None);
    }

    #[test]
    fn test_file_handle_tolerates_extra_fields() {
        let handle: FileHandle = serde_json::from_str(
            r#"{"id":"cq3r","object":"file","bytes":1024,"created_at":1700000000,"filename":"a.pdf","purpose":"file-extract","status":"ok"}"#,
        )
        .unwrap();
        assert_eq!(handle.id, "cq3r");
        assert_eq!(handle.filename, "a.pdf");
        assert_eq!(handle.bytes, 1024);
    }
}
