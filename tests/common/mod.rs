#![allow(dead_code)]

use opengpts_client::{ClientConfig, OpenGptsClient};
use serde_json::{json, Value};
use std::time::Duration;
use wiremock::MockServer;

pub const USER_ID: &str = "user-1";

pub fn client_for(server: &MockServer) -> OpenGptsClient {
    OpenGptsClient::new(ClientConfig {
        user_id: Some(USER_ID.to_string()),
        ..ClientConfig::new(server.uri())
    })
    .unwrap()
}

pub fn client_with_stream_timeout(server: &MockServer, timeout: Duration) -> OpenGptsClient {
    OpenGptsClient::new(ClientConfig {
        user_id: Some(USER_ID.to_string()),
        stream_timeout: timeout,
        ..ClientConfig::new(server.uri())
    })
    .unwrap()
}

pub fn assistant_json(id: &str, name: &str) -> Value {
    json!({
        "assistant_id": id,
        "user_id": USER_ID,
        "name": name,
        "config": {"configurable": {"type": "chatbot"}},
        "updated_at": "2024-03-01T12:00:00.000000+00:00",
        "public": false
    })
}

pub fn thread_json(id: &str, assistant_id: &str, name: &str, updated_at: &str) -> Value {
    json!({
        "thread_id": id,
        "user_id": USER_ID,
        "assistant_id": assistant_id,
        "name": name,
        "updated_at": updated_at
    })
}

/// Formats frames the way the server writes them.
pub fn sse(frames: &[(&str, Value)]) -> String {
    frames
        .iter()
        .map(|(event, data)| format!("event: {}\r\ndata: {}\r\n\r\n", event, data))
        .collect()
}
