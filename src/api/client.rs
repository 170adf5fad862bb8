use crate::api::response::ensure_success;
use crate::api::streaming::{collect_last, RunStream};
use crate::error::{OpenGptsError, Result};
use crate::models::{
    Assistant, HealthStatus, IngestConfig, IngestOptions, IngestResponse, Message, NewAssistant,
    NewThread, RunRequest, Thread, ThreadHistory, ThreadMessages,
};
use reqwest::header::{HeaderValue, ACCEPT, COOKIE};
use reqwest::multipart::{Form, Part};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use uuid::Uuid;

pub const DEFAULT_URL: &str = "http://localhost:8100";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const CHAT_TIMEOUT_SECS: u64 = 30;
pub const INGEST_TIMEOUT_SECS: u64 = 60;

const USER_ID_COOKIE: &str = "opengpts_user_id";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    /// Generated when absent.
    pub user_id: Option<String>,
    pub request_timeout: Duration,
    /// Applies to a whole run, from sending the request to the last frame.
    pub stream_timeout: Duration,
    pub ingest_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_URL.to_string(),
            user_id: None,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            stream_timeout: Duration::from_secs(CHAT_TIMEOUT_SECS),
            ingest_timeout: Duration::from_secs(INGEST_TIMEOUT_SECS),
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }
}

/// Client for an OpenGPTs server.
#[derive(Clone)]
pub struct OpenGptsClient {
    http: reqwest::Client,
    base_url: String,
    user_id: String,
    cookie: HeaderValue,
    request_timeout: Duration,
    stream_timeout: Duration,
    ingest_timeout: Duration,
}

impl std::fmt::Debug for OpenGptsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OpenGptsClient({})", self.base_url)
    }
}

impl OpenGptsClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let user_id = config
            .user_id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let cookie = HeaderValue::from_str(&format!("{}={}", USER_ID_COOKIE, user_id))
            .map_err(|e| OpenGptsError::ConfigError(format!("Invalid user id: {}", e)))?;

        let http = reqwest::Client::builder().build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            user_id,
            cookie,
            request_timeout: config.request_timeout,
            stream_timeout: config.stream_timeout,
            ingest_timeout: config.ingest_timeout,
        })
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, route: &str) -> String {
        format!("{}{}", self.base_url, route)
    }

    /// Request carrying the user cookie.
    fn request(&self, method: Method, route: &str) -> RequestBuilder {
        self.http
            .request(method, self.url(route))
            .header(COOKIE, self.cookie.clone())
    }

    async fn send(
        &self,
        method: Method,
        request: RequestBuilder,
        route: &str,
    ) -> Result<reqwest::Response> {
        tracing::debug!("OpenGPTs Request[{}] {}", method, route);
        let response = request.send().await?;
        tracing::debug!(
            "OpenGPTs Response[{}] {} {}",
            method,
            response.status().as_str(),
            route
        );
        ensure_success(response).await
    }

    async fn get<T>(&self, route: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let request = self
            .request(Method::GET, route)
            .timeout(self.request_timeout);
        let response = self.send(Method::GET, request, route).await?;
        Ok(response.json::<T>().await?)
    }

    async fn post<S, T>(&self, route: &str, body: &S) -> Result<T>
    where
        S: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self
            .request(Method::POST, route)
            .json(body)
            .timeout(self.request_timeout);
        let response = self.send(Method::POST, request, route).await?;
        Ok(response.json::<T>().await?)
    }

    pub async fn health(&self) -> Result<HealthStatus> {
        let request = self
            .http
            .get(self.url("/health"))
            .timeout(self.request_timeout);
        let response = self.send(Method::GET, request, "/health").await?;
        Ok(response.json().await?)
    }

    /// Assistants owned by the current user.
    pub async fn list_assistants(&self) -> Result<Vec<Assistant>> {
        self.get("/assistants/").await
    }

    pub async fn list_public_assistants(&self, shared_id: &str) -> Result<Vec<Assistant>> {
        let route = "/assistants/public/";
        let request = self
            .request(Method::GET, route)
            .query(&[("shared_id", shared_id)])
            .timeout(self.request_timeout);
        let response = self.send(Method::GET, request, route).await?;
        Ok(response.json().await?)
    }

    pub async fn get_assistant(&self, assistant_id: &str) -> Result<Assistant> {
        self.get(&format!("/assistants/{}", assistant_id)).await
    }

    pub async fn create_assistant(
        &self,
        name: &str,
        config: Value,
        public: bool,
    ) -> Result<Assistant> {
        let body = NewAssistant {
            name: name.to_string(),
            config,
            public,
        };
        self.post("/assistants", &body).await
    }

    /// Threads owned by the current user.
    pub async fn list_threads(&self) -> Result<Vec<Thread>> {
        self.get("/threads/").await
    }

    pub async fn get_thread(&self, thread_id: &str) -> Result<Thread> {
        self.get(&format!("/threads/{}", thread_id)).await
    }

    pub async fn create_thread(&self, name: &str, assistant_id: &str) -> Result<Thread> {
        let body = NewThread {
            name: name.to_string(),
            assistant_id: assistant_id.to_string(),
        };
        self.post("/threads", &body).await
    }

    pub async fn get_messages(&self, thread_id: &str) -> Result<ThreadMessages> {
        self.get(&format!("/threads/{}/messages", thread_id)).await
    }

    /// All past states of a thread.
    pub async fn get_thread_history(&self, thread_id: &str) -> Result<Vec<ThreadHistory>> {
        self.get(&format!("/threads/{}/history", thread_id)).await
    }

    /// Uploads files to an assistant's retriever.
    pub async fn ingest_files(
        &self,
        files: &[PathBuf],
        assistant_id: &str,
        options: &IngestOptions,
    ) -> Result<IngestResponse> {
        if assistant_id.trim().is_empty() {
            return Err(OpenGptsError::Validation(
                "assistant_id must not be empty".to_string(),
            ));
        }
        if files.is_empty() {
            return Err(OpenGptsError::Validation(
                "at least one file is required".to_string(),
            ));
        }

        let config = serde_json::to_string(&IngestConfig::new(assistant_id, options))?;
        let mut form = Form::new().text("config", config);
        for path in files {
            let contents = tokio::fs::read(path).await?;
            let file_name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| "upload".to_string());
            let part = Part::bytes(contents)
                .file_name(file_name)
                .mime_str(guess_mime_type(path))?;
            form = form.part("files", part);
        }

        let route = "/ingest";
        let request = self
            .http
            .post(self.url(route))
            .header(ACCEPT, "application/json")
            .multipart(form)
            .timeout(self.ingest_timeout);
        let response = self.send(Method::POST, request, route).await?;

        Ok(IngestResponse {
            status: response.status().as_u16(),
        })
    }

    /// Starts a run without streaming and returns the raw response body.
    pub async fn run(
        &self,
        assistant_id: &str,
        thread_id: &str,
        messages: &[Message],
    ) -> Result<String> {
        let body = RunRequest::new(assistant_id, thread_id, messages)?;
        let route = "/runs";
        let request = self
            .request(Method::POST, route)
            .json(&body)
            .timeout(self.stream_timeout);
        let response = self.send(Method::POST, request, route).await?;
        Ok(response.text().await?)
    }

    /// Starts a run and returns its lazily decoded message snapshots.
    ///
    /// Input is validated before anything is sent. The configured stream
    /// timeout covers the request and the whole body.
    pub async fn run_stream(
        &self,
        assistant_id: &str,
        thread_id: &str,
        messages: &[Message],
    ) -> Result<RunStream> {
        let body = RunRequest::new(assistant_id, thread_id, messages)?;
        let route = "/runs/stream";
        let started = Instant::now();

        let request = self.request(Method::POST, route).json(&body);
        let response = tokio::time::timeout(
            self.stream_timeout,
            self.send(Method::POST, request, route),
        )
        .await
        .map_err(|_| OpenGptsError::Timeout)??;

        let remaining = self.stream_timeout.saturating_sub(started.elapsed());
        Ok(RunStream::from_response(response, remaining))
    }

    /// Runs to completion and returns the final message list.
    pub async fn run_and_collect(
        &self,
        assistant_id: &str,
        thread_id: &str,
        messages: &[Message],
    ) -> Result<Vec<Message>> {
        let stream = self.run_stream(assistant_id, thread_id, messages).await?;
        collect_last(stream).await
    }
}

fn guess_mime_type(path: &std::path::Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    match extension.as_deref() {
        Some("txt") | Some("text") | Some("log") => "text/plain",
        Some("md") | Some("markdown") => "text/markdown",
        Some("html") | Some("htm") => "text/html",
        Some("css") => "text/css",
        Some("csv") => "text/csv",
        Some("tsv") => "text/tab-separated-values",
        Some("xml") => "text/xml",
        Some("py") => "text/x-python",
        Some("rs") => "text/x-rust",
        Some("js") | Some("mjs") => "text/javascript",
        Some("json") => "application/json",
        Some("yaml") | Some("yml") => "application/yaml",
        Some("pdf") => "application/pdf",
        Some("rtf") => "application/rtf",
        Some("epub") => "application/epub+zip",
        Some("doc") => "application/msword",
        Some("docx") => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        Some("xls") => "application/vnd.ms-excel",
        Some("xlsx") => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        Some("ppt") => "application/vnd.ms-powerpoint",
        Some("pptx") => {
            "application/vnd.openxmlformats-officedocument.presentationml.presentation"
        }
        Some("odt") => "application/vnd.oasis.opendocument.text",
        Some("zip") => "application/zip",
        Some("gz") => "application/gzip",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_generates_user_id_when_missing() {
        let client = OpenGptsClient::new(ClientConfig::default()).unwrap();
        assert!(Uuid::parse_str(client.user_id()).is_ok());

        let blank = OpenGptsClient::new(ClientConfig {
            user_id: Some("  ".to_string()),
            ..ClientConfig::default()
        })
        .unwrap();
        assert!(Uuid::parse_str(blank.user_id()).is_ok());
    }

    #[test]
    fn test_keeps_configured_user_id_and_trims_url() {
        let client = OpenGptsClient::new(ClientConfig {
            user_id: Some("user-1".to_string()),
            ..ClientConfig::new("http://example.com:8100/")
        })
        .unwrap();
        assert_eq!(client.user_id(), "user-1");
        assert_eq!(client.base_url(), "http://example.com:8100");
        assert_eq!(client.url("/health"), "http://example.com:8100/health");
    }

    #[test]
    fn test_guess_mime_type() {
        assert_eq!(guess_mime_type(Path::new("notes.TXT")), "text/plain");
        assert_eq!(guess_mime_type(Path::new("paper.pdf")), "application/pdf");
        assert_eq!(guess_mime_type(Path::new("script.py")), "text/x-python");
        assert_eq!(
            guess_mime_type(Path::new("budget.XLSX")),
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
        );
        assert_eq!(guess_mime_type(Path::new("config.yml")), "application/yaml");
        assert_eq!(guess_mime_type(Path::new("blob")), "application/octet-stream");
    }
}
