//! Client for the OpenGPTs agent server.
//!
//! [`OpenGptsClient`] covers the REST surface; [`OpenGptsClient::run_stream`]
//! decodes a run's event stream into successive message-list snapshots.

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod identity;
pub mod models;
pub mod orchestrator;
pub mod ui;

pub use api::{ClientConfig, OpenGptsClient, RunStream};
pub use error::{OpenGptsError, Result};
pub use models::{Message, MessageContent, MessageType};
