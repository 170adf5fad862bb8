use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Who produced a message. Unknown values are kept verbatim.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
#[serde(from = "String", into = "String")]
pub enum MessageType {
    Human,
    Ai,
    Function,
    Tool,
    System,
    Other(String),
}

impl MessageType {
    pub fn as_str(&self) -> &str {
        match self {
            MessageType::Human => "human",
            MessageType::Ai => "ai",
            MessageType::Function => "function",
            MessageType::Tool => "tool",
            MessageType::System => "system",
            MessageType::Other(other) => other,
        }
    }

    /// Function and tool messages carry results rather than conversation text.
    pub fn is_tool_result(&self) -> bool {
        matches!(self, MessageType::Function | MessageType::Tool)
    }
}

impl From<String> for MessageType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "human" => MessageType::Human,
            "ai" => MessageType::Ai,
            "function" => MessageType::Function,
            "tool" => MessageType::Tool,
            "system" => MessageType::System,
            _ => MessageType::Other(value),
        }
    }
}

impl From<MessageType> for String {
    fn from(value: MessageType) -> Self {
        match value {
            MessageType::Other(other) => other,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A retrieved document fragment, as returned by retrieval tools.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PageContent {
    pub page_content: String,
    pub metadata: Map<String, Value>,
}

impl PageContent {
    /// `metadata.source` when present and non-empty, else the head of the text.
    pub fn source_label(&self) -> String {
        let source = self
            .metadata
            .get("source")
            .and_then(|s| s.as_str())
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string())
            .unwrap_or_else(|| self.page_content.chars().take(15).collect());
        source.replace('\n', " ")
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Documents(Vec<PageContent>),
    Mapping(Map<String, Value>),
}

impl MessageContent {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            MessageContent::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, MessageContent::Text(text) if text.is_empty())
    }
}

impl From<&str> for MessageContent {
    fn from(text: &str) -> Self {
        MessageContent::Text(text.to_string())
    }
}

impl From<String> for MessageContent {
    fn from(text: String) -> Self {
        MessageContent::Text(text)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct FunctionCall {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arguments: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct ToolCall {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function: Option<FunctionCall>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct AdditionalKwargs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_call: Option<FunctionCall>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCall>>,
}

impl AdditionalKwargs {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.function_call.is_none() && self.tool_calls.is_none()
    }
}

// `{}` and `null` both mean "no kwargs"; the server echoes the former for
// messages that were sent without any.
fn empty_kwargs_as_none<'de, D>(deserializer: D) -> Result<Option<AdditionalKwargs>, D::Error>
where
    D: Deserializer<'de>,
{
    let kwargs = Option::<AdditionalKwargs>::deserialize(deserializer)?;
    Ok(kwargs.filter(|k| !k.is_empty()))
}

/// One conversational turn.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Message {
    #[serde(rename = "type")]
    pub message_type: MessageType,
    pub content: MessageContent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub example: bool,
    #[serde(
        default,
        deserialize_with = "empty_kwargs_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub additional_kwargs: Option<AdditionalKwargs>,
}

/// The shape `/runs/stream` expects for each input message.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct OutboundMessage {
    #[serde(rename = "type")]
    pub message_type: MessageType,
    pub content: MessageContent,
    pub additional_kwargs: AdditionalKwargs,
    pub example: bool,
}

impl Message {
    pub fn new(message_type: MessageType, content: impl Into<MessageContent>) -> Self {
        Self {
            message_type,
            content: content.into(),
            id: None,
            name: None,
            example: false,
            additional_kwargs: None,
        }
    }

    pub fn human(text: impl Into<String>) -> Self {
        Self::new(MessageType::Human, text.into())
    }

    pub fn ai(text: impl Into<String>) -> Self {
        Self::new(MessageType::Ai, text.into())
    }

    pub fn to_request_params(&self) -> OutboundMessage {
        OutboundMessage {
            message_type: self.message_type.clone(),
            content: self.content.clone(),
            additional_kwargs: self.additional_kwargs.clone().unwrap_or_default(),
            example: self.example,
        }
    }

    pub fn has_displayable_content(&self) -> bool {
        !self.content.is_empty()
    }

    /// Label for tool and function results.
    pub fn display_name(&self) -> Option<&str> {
        self.name.as_deref().or_else(|| {
            self.additional_kwargs
                .as_ref()
                .and_then(|kwargs| kwargs.name.as_deref())
        })
    }
}
