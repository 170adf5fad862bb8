use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Assistant {
    pub assistant_id: String,
    pub user_id: String,
    pub name: String,
    pub config: Map<String, Value>,
    #[serde(with = "super::timestamp")]
    pub updated_at: DateTime<Utc>,
    pub public: bool,
}

/// Body of `POST /assistants`.
#[derive(Serialize, Clone, Debug)]
pub struct NewAssistant {
    pub name: String,
    pub config: Value,
    pub public: bool,
}
