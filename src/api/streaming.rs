use crate::error::{OpenGptsError, Result};
use crate::models::{Message, RunMetadata};
use bytes::{Bytes, BytesMut};
use futures::stream::BoxStream;
use futures::{Stream, StreamExt};
use serde_json::Value;
use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::time::{sleep, Sleep};

/// Event type announced by the most recent `event:` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    Metadata,
    Data,
    Error,
    Other(String),
}

impl EventKind {
    fn parse(value: &str) -> Self {
        match value {
            "metadata" => EventKind::Metadata,
            "data" => EventKind::Data,
            "error" => EventKind::Error,
            other => EventKind::Other(other.to_string()),
        }
    }
}

/// Line-level state for one run.
#[derive(Debug, Default)]
pub struct FrameParser {
    current_event: Option<EventKind>,
    run_id: Option<String>,
}

impl FrameParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_event(&self) -> Option<&EventKind> {
        self.current_event.as_ref()
    }

    pub fn run_id(&self) -> Option<&str> {
        self.run_id.as_deref()
    }

    /// Feeds one line. Returns a batch when the line completes a `data` frame.
    pub fn feed_line(&mut self, line: &str) -> Result<Option<Vec<Message>>> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let Some((field, value)) = line.split_once(':') else {
            tracing::trace!(line, "skipping line without a field separator");
            return Ok(None);
        };
        let field = field.trim();
        let value = value.trim();
        if value.is_empty() {
            return Ok(None);
        }

        match field {
            "event" => {
                self.current_event = Some(EventKind::parse(value));
                Ok(None)
            }
            "data" => self.handle_data(line, value),
            _ => {
                tracing::trace!(field, "ignoring stream field");
                Ok(None)
            }
        }
    }

    fn handle_data(&mut self, line: &str, payload: &str) -> Result<Option<Vec<Message>>> {
        match &self.current_event {
            Some(EventKind::Metadata) => {
                let metadata: RunMetadata = serde_json::from_str(payload)
                    .map_err(|e| OpenGptsError::malformed(line, e))?;
                tracing::debug!(run_id = %metadata.run_id, "run started");
                self.run_id = Some(metadata.run_id);
                Ok(None)
            }
            Some(EventKind::Data) => {
                let messages: Vec<Message> = serde_json::from_str(payload)
                    .map_err(|e| OpenGptsError::malformed(line, e))?;
                tracing::trace!(count = messages.len(), "decoded message batch");
                Ok(Some(messages))
            }
            Some(EventKind::Error) => Err(protocol_error(line, payload)),
            Some(EventKind::Other(event)) => {
                tracing::trace!(event = %event, "ignoring payload for unknown event");
                Ok(None)
            }
            None => {
                tracing::trace!("discarding payload received before any event line");
                Ok(None)
            }
        }
    }
}

fn protocol_error(line: &str, payload: &str) -> OpenGptsError {
    let payload: Value = match serde_json::from_str(payload) {
        Ok(payload) => payload,
        Err(e) => return OpenGptsError::malformed(line, e),
    };
    let message = match &payload {
        Value::String(text) => text.clone(),
        Value::Object(map) => map
            .get("message")
            .and_then(|m| m.as_str())
            .map(|m| m.to_string())
            .unwrap_or_else(|| payload.to_string()),
        other => other.to_string(),
    };
    OpenGptsError::Protocol { message, payload }
}

/// Splits an arbitrarily chunked body into lines. Bytes are only decoded once
/// a line is complete, so multi-byte characters may straddle chunks.
#[derive(Debug, Default)]
pub struct LineBuffer {
    pending: BytesMut,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, chunk: &[u8]) {
        self.pending.extend_from_slice(chunk);
    }

    pub fn next_line(&mut self) -> Option<String> {
        let newline = self.pending.iter().position(|b| *b == b'\n')?;
        let line = self.pending.split_to(newline + 1);
        Some(decode_line(&line[..newline]))
    }

    /// Whatever is left after the body ends without a trailing newline.
    pub fn take_remainder(&mut self) -> Option<String> {
        if self.pending.is_empty() {
            return None;
        }
        let rest = self.pending.split();
        Some(decode_line(&rest))
    }
}

fn decode_line(raw: &[u8]) -> String {
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    String::from_utf8_lossy(raw).into_owned()
}

/// Lazily decoded response of `POST /runs/stream`.
///
/// Each item is the full message list accumulated so far. The stream ends when
/// the body closes, and yields at most one error, after which it is fused. The
/// response body is dropped as soon as the stream finishes, fails or is
/// itself dropped, which closes the connection.
pub struct RunStream {
    body: Option<BoxStream<'static, reqwest::Result<Bytes>>>,
    lines: LineBuffer,
    parser: FrameParser,
    ready: VecDeque<Vec<Message>>,
    failure: Option<OpenGptsError>,
    deadline: Pin<Box<Sleep>>,
    finished: bool,
}

impl RunStream {
    pub fn new<S>(body: S, timeout: Duration) -> Self
    where
        S: Stream<Item = reqwest::Result<Bytes>> + Send + 'static,
    {
        Self {
            body: Some(body.boxed()),
            lines: LineBuffer::new(),
            parser: FrameParser::new(),
            ready: VecDeque::new(),
            failure: None,
            deadline: Box::pin(sleep(timeout)),
            finished: false,
        }
    }

    pub fn from_response(response: reqwest::Response, timeout: Duration) -> Self {
        Self::new(response.bytes_stream(), timeout)
    }

    /// Set once the `metadata` frame has been seen.
    pub fn run_id(&self) -> Option<&str> {
        self.parser.run_id()
    }

    fn close(&mut self) {
        self.body = None;
        self.finished = true;
    }

    fn consume_lines(&mut self) {
        while let Some(line) = self.lines.next_line() {
            if !self.consume_line(&line) {
                return;
            }
        }
    }

    fn consume_line(&mut self, line: &str) -> bool {
        match self.parser.feed_line(line) {
            Ok(Some(batch)) => {
                self.ready.push_back(batch);
                true
            }
            Ok(None) => true,
            Err(e) => {
                self.failure = Some(e);
                self.lines = LineBuffer::new();
                self.close();
                false
            }
        }
    }
}

impl Stream for RunStream {
    type Item = Result<Vec<Message>>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        loop {
            // Batches decoded before a failure are still delivered first.
            if let Some(batch) = this.ready.pop_front() {
                return Poll::Ready(Some(Ok(batch)));
            }
            if let Some(failure) = this.failure.take() {
                return Poll::Ready(Some(Err(failure)));
            }
            if this.finished {
                return Poll::Ready(None);
            }

            if this.deadline.as_mut().poll(cx).is_ready() {
                this.close();
                return Poll::Ready(Some(Err(OpenGptsError::Timeout)));
            }

            let Some(body) = this.body.as_mut() else {
                this.finished = true;
                continue;
            };

            match body.as_mut().poll_next(cx) {
                Poll::Ready(Some(Ok(chunk))) => {
                    this.lines.push(&chunk);
                    this.consume_lines();
                }
                Poll::Ready(Some(Err(e))) => {
                    this.close();
                    return Poll::Ready(Some(Err(e.into())));
                }
                Poll::Ready(None) => {
                    if let Some(rest) = this.lines.take_remainder() {
                        this.consume_line(&rest);
                    }
                    this.close();
                }
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}

/// Drains a run and returns its final message list.
pub async fn collect_last<S>(mut stream: S) -> Result<Vec<Message>>
where
    S: Stream<Item = Result<Vec<Message>>> + Unpin,
{
    let mut last = None;
    while let Some(batch) = stream.next().await {
        last = Some(batch?);
    }
    last.ok_or(OpenGptsError::EmptyStream)
}
