use crate::{
    core::{EventTracker, Item, ItemRepository, RecommendationSubject, Recommender, TrackedEvent},
    error::ServiceError,
};
use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_personalizeevents::{primitives::DateTime, types::Event};
use aws_sdk_personalizeruntime::types::PredictedItem;
use std::collections::HashMap;

#[derive(Debug)]
pub struct DynamoDbItemRepository {
    table_name: String,
    key_attribute: String,
    dynamodb_client: aws_sdk_dynamodb::Client,
}

impl DynamoDbItemRepository {
    pub fn new(
        table_name: String,
        key_attribute: String,
        dynamodb_client: aws_sdk_dynamodb::Client,
    ) -> Self {
        Self {
            table_name,
            key_attribute,
            dynamodb_client,
        }
    }
}

#[async_trait]
impl ItemRepository for DynamoDbItemRepository {
    async fn get_item(&self, item_id: &str) -> Result<Option<Item>, ServiceError> {
        let result = self
            .dynamodb_client
            .get_item()
            .table_name(&self.table_name)
            .key(&self.key_attribute, AttributeValue::S(item_id.to_string()))
            .send()
            .await
            .map_err(|e| {
                ServiceError::downstream("dynamodb", format!("Error getting item: {:?}", e))
            })?;

        result.item.map(item_from_attributes).transpose()
    }

    async fn scan_items(&self, limit: i32) -> Result<Vec<Item>, ServiceError> {
        let result = self
            .dynamodb_client
            .scan()
            .table_name(&self.table_name)
            .limit(limit)
            .send()
            .await
            .map_err(|e| {
                ServiceError::downstream("dynamodb", format!("Error executing scan: {:?}", e))
            })?;

        result
            .items
            .unwrap_or_default()
            .into_iter()
            .map(item_from_attributes)
            .collect()
    }
}

fn item_from_attributes(attributes: HashMap<String, AttributeValue>) -> Result<Item, ServiceError> {
    serde_dynamo::from_item(attributes).map_err(|e| {
        ServiceError::downstream("dynamodb", format!("Cannot convert item: {}", e))
    })
}

#[derive(Debug)]
pub struct PersonalizeRecommender {
    personalize_client: aws_sdk_personalizeruntime::Client,
}

impl PersonalizeRecommender {
    pub fn new(personalize_client: aws_sdk_personalizeruntime::Client) -> Self {
        Self { personalize_client }
    }
}

fn item_ids(items: Option<Vec<PredictedItem>>) -> Vec<String> {
    items
        .unwrap_or_default()
        .into_iter()
        .filter_map(|item| item.item_id)
        .collect()
}

#[async_trait]
impl Recommender for PersonalizeRecommender {
    async fn get_recommendations(
        &self,
        campaign_arn: &str,
        subject: RecommendationSubject,
    ) -> Result<Vec<String>, ServiceError> {
        let request = self
            .personalize_client
            .get_recommendations()
            .campaign_arn(campaign_arn);
        let request = match subject {
            RecommendationSubject::User(user_id) => request.user_id(user_id),
            RecommendationSubject::Item(item_id) => request.item_id(item_id),
        };

        let output = request.send().await.map_err(|e| {
            ServiceError::downstream(
                "personalize",
                format!("Error getting recommendations: {:?}", e),
            )
        })?;

        Ok(item_ids(output.item_list))
    }

    async fn get_personalized_ranking(
        &self,
        campaign_arn: &str,
        input_list: Vec<String>,
        user_id: &str,
    ) -> Result<Vec<String>, ServiceError> {
        let output = self
            .personalize_client
            .get_personalized_ranking()
            .campaign_arn(campaign_arn)
            .set_input_list(Some(input_list))
            .user_id(user_id)
            .send()
            .await
            .map_err(|e| {
                ServiceError::downstream(
                    "personalize",
                    format!("Error getting personalized ranking: {:?}", e),
                )
            })?;

        Ok(item_ids(output.personalized_ranking))
    }
}

#[derive(Debug)]
pub struct PersonalizeEventTracker {
    tracking_id: String,
    events_client: aws_sdk_personalizeevents::Client,
}

impl PersonalizeEventTracker {
    pub fn new(tracking_id: String, events_client: aws_sdk_personalizeevents::Client) -> Self {
        Self {
            tracking_id,
            events_client,
        }
    }
}

#[async_trait]
impl EventTracker for PersonalizeEventTracker {
    async fn put_event(&self, event: TrackedEvent) -> Result<(), ServiceError> {
        let personalize_event = Event::builder()
            .event_type(event.event_type)
            .properties(event.properties)
            .sent_at(DateTime::from_secs(event.sent_at))
            .build()
            .map_err(|e| {
                ServiceError::InvalidRecord(format!("Cannot build tracker event: {}", e))
            })?;

        self.events_client
            .put_events()
            .tracking_id(&self.tracking_id)
            .user_id(event.user_id)
            .session_id(event.session_id)
            .event_list(personalize_event)
            .send()
            .await
            .map(|_| ())
            .map_err(|e| {
                ServiceError::downstream("personalize-events", format!("Error putting event: {:?}", e))
            })
    }
}
