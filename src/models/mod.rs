mod assistant;
mod ingest;
mod message;
mod run;
mod thread;
mod timestamp;

pub use assistant::{Assistant, NewAssistant};
pub use ingest::{IngestConfig, IngestConfigurable, IngestOptions, IngestResponse};
pub use message::{
    AdditionalKwargs, FunctionCall, Message, MessageContent, MessageType, OutboundMessage,
    PageContent, ToolCall,
};
pub use run::{HealthStatus, RunMetadata, RunRequest};
pub use thread::{threads_for_assistant, NewThread, Thread, ThreadHistory, ThreadMessages};
