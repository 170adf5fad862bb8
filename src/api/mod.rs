pub mod client;
pub mod response;
pub mod streaming;

pub use client::{ClientConfig, OpenGptsClient};
pub use streaming::{collect_last, FrameParser, RunStream};
