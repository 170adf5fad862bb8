use crate::api::client::{
    CHAT_TIMEOUT_SECS, DEFAULT_TIMEOUT_SECS, DEFAULT_URL, INGEST_TIMEOUT_SECS,
};

pub fn default_url() -> String {
    DEFAULT_URL.to_string()
}

pub fn default_request_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

pub fn default_stream_timeout() -> u64 {
    CHAT_TIMEOUT_SECS
}

pub fn default_ingest_timeout() -> u64 {
    INGEST_TIMEOUT_SECS
}

pub fn default_log_filter(verbose: bool) -> &'static str {
    if verbose {
        "opengpts_client=debug,opengpts=debug"
    } else {
        "warn"
    }
}
