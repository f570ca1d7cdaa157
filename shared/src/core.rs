use crate::error::ServiceError;
use async_trait::async_trait;
use cuid2::CuidConstructor;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt::Debug;

#[cfg(any(test, feature = "mocks"))]
use mockall::{automock, predicate::*};

/// Item metadata as stored in the document store, attribute name to plain JSON value.
pub type Item = Map<String, Value>;

/// Who or what a recommendation request is about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecommendationSubject {
    User(String),
    Item(String),
}

impl RecommendationSubject {
    pub fn id(&self) -> &str {
        match self {
            RecommendationSubject::User(id) | RecommendationSubject::Item(id) => id,
        }
    }
}

#[cfg_attr(any(test, feature = "mocks"), automock)]
#[async_trait]
pub trait ItemRepository: Debug {
    /// Point lookup by primary key. `Ok(None)` is a miss.
    async fn get_item(&self, item_id: &str) -> Result<Option<Item>, ServiceError>;
    /// Unordered scan returning at most `limit` items.
    async fn scan_items(&self, limit: i32) -> Result<Vec<Item>, ServiceError>;
}

#[cfg_attr(any(test, feature = "mocks"), automock)]
#[async_trait]
pub trait Recommender: Debug {
    async fn get_recommendations(
        &self,
        campaign_arn: &str,
        subject: RecommendationSubject,
    ) -> Result<Vec<String>, ServiceError>;
    async fn get_personalized_ranking(
        &self,
        campaign_arn: &str,
        input_list: Vec<String>,
        user_id: &str,
    ) -> Result<Vec<String>, ServiceError>;
}

#[cfg_attr(any(test, feature = "mocks"), automock)]
#[async_trait]
pub trait EventTracker: Debug {
    async fn put_event(&self, event: TrackedEvent) -> Result<(), ServiceError>;
}

#[cfg_attr(any(test, feature = "mocks"), automock)]
#[async_trait]
pub trait SearchIndex: Debug {
    async fn search(&self, query: &Value) -> Result<SearchResponse, ServiceError>;
    async fn upsert_document(&self, id: &str, document: &Value) -> Result<(), ServiceError>;
    /// Deleting a document that does not exist succeeds.
    async fn delete_document(&self, id: &str) -> Result<(), ServiceError>;
}

#[cfg_attr(any(test, feature = "mocks"), automock)]
pub trait IdGenerator {
    fn generate_id(&self) -> String;
}

pub struct CuidGenerator {
    gen: CuidConstructor,
}

impl CuidGenerator {
    pub fn new() -> Self {
        Self {
            gen: CuidConstructor::new().with_length(24),
        }
    }
}

impl Default for CuidGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator for CuidGenerator {
    fn generate_id(&self) -> String {
        self.gen.create_id()
    }
}

/// One click as produced by the web client onto the click stream.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ClickEvent {
    #[serde(rename = "userID")]
    pub user_id: Option<String>,
    #[serde(rename = "itemID")]
    pub item_id: Option<Value>,
    #[serde(rename = "sessionID")]
    pub session_id: Option<String>,
}

impl ClickEvent {
    /// Item ids arrive either as strings or as bare numbers.
    pub fn item_id_string(&self) -> Option<String> {
        match &self.item_id {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(other) => Some(other.to_string()),
        }
    }
}

/// An interaction forwarded to the recommendation service's event tracker.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackedEvent {
    pub user_id: String,
    pub session_id: String,
    pub event_type: String,
    /// JSON-encoded event properties, e.g. `{"itemId":"i42"}`.
    pub properties: String,
    /// Seconds since the Unix epoch.
    pub sent_at: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub id: String,
    pub source: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchResponse {
    pub status_code: u16,
    pub hits: Vec<SearchHit>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn click_event_reads_stream_field_names() {
        let event: ClickEvent = serde_json::from_value(json!({
            "userID": "u1",
            "itemID": "i42",
            "sessionID": null
        }))
        .unwrap();

        assert_eq!(event.user_id.as_deref(), Some("u1"));
        assert_eq!(event.item_id_string().as_deref(), Some("i42"));
        assert!(event.session_id.is_none());
    }

    #[test]
    fn numeric_item_id_is_stringified() {
        let event: ClickEvent = serde_json::from_value(json!({
            "userID": "u1",
            "itemID": 42
        }))
        .unwrap();

        assert_eq!(event.item_id_string().as_deref(), Some("42"));
    }

    #[test]
    fn cuid_generator_creates_distinct_ids() {
        let generator = CuidGenerator::new();

        let first = generator.generate_id();
        let second = generator.generate_id();

        assert!(!first.is_empty());
        assert_ne!(first, second);
    }
}
