use super::message::Message;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Thread {
    pub thread_id: String,
    pub user_id: String,
    pub assistant_id: String,
    pub name: String,
    #[serde(with = "super::timestamp")]
    pub updated_at: DateTime<Utc>,
}

/// Body of `POST /threads`.
#[derive(Serialize, Clone, Debug)]
pub struct NewThread {
    pub name: String,
    pub assistant_id: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ThreadMessages {
    pub messages: Vec<Message>,
    pub resumeable: bool,
}

/// One past state of a thread.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ThreadHistory {
    pub values: Vec<Message>,
    pub resumeable: bool,
}

/// Threads belonging to `assistant_id`, most recently updated first.
pub fn threads_for_assistant(threads: Vec<Thread>, assistant_id: &str) -> Vec<Thread> {
    let mut threads: Vec<Thread> = threads
        .into_iter()
        .filter(|thread| thread.assistant_id == assistant_id)
        .collect();
    threads.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    threads
}
