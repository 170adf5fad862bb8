use serde::{Deserialize, Serialize};

pub const DEFAULT_CHUNK_SIZE: u32 = 1000;
pub const DEFAULT_CHUNK_OVERLAP: u32 = 200;

/// Chunking parameters for `POST /ingest`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct IngestOptions {
    pub chunk_size: u32,
    pub chunk_overlap: u32,
    pub separators: Option<Vec<String>>,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP,
            separators: None,
        }
    }
}

#[derive(Serialize, Clone, Debug)]
pub struct IngestConfigurable {
    pub assistant_id: String,
    pub chunk_size: u32,
    pub chunk_overlap: u32,
    pub separators: Option<Vec<String>>,
}

/// Serialized into the `config` text part of the multipart upload.
#[derive(Serialize, Clone, Debug)]
pub struct IngestConfig {
    pub configurable: IngestConfigurable,
}

impl IngestConfig {
    pub fn new(assistant_id: &str, options: &IngestOptions) -> Self {
        Self {
            configurable: IngestConfigurable {
                assistant_id: assistant_id.to_string(),
                chunk_size: options.chunk_size,
                chunk_overlap: options.chunk_overlap,
                separators: options.separators.clone(),
            },
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct IngestResponse {
    pub status: u16,
}
