pub mod output;
pub mod transcript;

pub use output::{write_assistants, write_json, write_threads, write_tool_result};
pub use transcript::{write_history, StreamRenderer, TranscriptCursor};
