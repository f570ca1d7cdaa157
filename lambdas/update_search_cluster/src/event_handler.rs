use aws_lambda_events::{
    event::dynamodb::{Event, EventRecord},
    streams::{DynamoDbBatchItemFailure, DynamoDbEventResponse},
};
use lambda_runtime::{tracing, Error, LambdaEvent};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use shared::core::SearchIndex;
use shared::error::ServiceError;

const REMOVE_EVENT: &str = "REMOVE";

pub(crate) struct HandlerDeps<S: SearchIndex> {
    pub search_index: S,
    /// Store key attribute, reused as the index document id.
    pub key_attribute: String,
}

/// Applies store changes to the search index in stream order.
///
/// Processing stops at the first failed record; it and every later record are reported so the
/// retry replays them in order.
#[tracing::instrument(skip(deps, event), fields(records = event.payload.records.len()))]
pub(crate) async fn function_handler<S: SearchIndex>(
    deps: &HandlerDeps<S>,
    event: LambdaEvent<Event>,
) -> Result<DynamoDbEventResponse, Error> {
    let mut response = DynamoDbEventResponse::default();
    let mut processed = 0;

    let mut records = event.payload.records.into_iter();
    while let Some(record) = records.next() {
        if let Err(e) = process_record(deps, &record).await {
            tracing::error!("Failed to sync record to search index: {:?}", e);
            for failed in std::iter::once(record).chain(records.by_ref()) {
                let mut failure = DynamoDbBatchItemFailure::default();
                failure.item_identifier = failed.change.sequence_number;
                response.batch_item_failures.push(failure);
            }
            break;
        }
        processed += 1;
    }

    tracing::info!("{} records processed.", processed);
    Ok(response)
}

#[tracing::instrument(name = "sync item_change", skip(deps, record), fields(
    messaging.message.id = record.change.sequence_number.as_deref().unwrap_or_default(),
    messaging.operation.name = "process",
    messaging.destination = "aws_dynamodb_stream",
    messaging.client.id = "update_search_cluster",
    event_name = %record.event_name,
))]
async fn process_record<S: SearchIndex>(
    deps: &HandlerDeps<S>,
    record: &EventRecord,
) -> Result<(), ServiceError> {
    let keys: Map<String, Value> = to_json(&record.change.keys)?;
    let id = match keys.get(&deps.key_attribute) {
        Some(Value::String(id)) => id.clone(),
        Some(Value::Number(id)) => id.to_string(),
        _ => {
            return Err(ServiceError::InvalidRecord(format!(
                "Record has no '{}' key",
                deps.key_attribute
            )))
        }
    };

    if record.event_name == REMOVE_EVENT {
        deps.search_index.delete_document(&id).await
    } else if record.change.new_image.is_empty() {
        Err(ServiceError::InvalidRecord(format!(
            "{} record for '{}' has no new image",
            record.event_name, id
        )))
    } else {
        let document: Value = to_json(&record.change.new_image)?;
        deps.search_index.upsert_document(&id, &document).await
    }
}

fn to_json<T: DeserializeOwned>(item: &serde_dynamo::Item) -> Result<T, ServiceError> {
    serde_dynamo::from_item(item.clone())
        .map_err(|e| ServiceError::InvalidRecord(format!("Cannot convert stream image: {}", e)))
}
