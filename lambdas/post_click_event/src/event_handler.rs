use aws_lambda_events::{
    event::kinesis::KinesisEvent,
    kinesis::KinesisEventRecord,
    streams::{KinesisBatchItemFailure, KinesisEventResponse},
};
use lambda_runtime::{tracing, Error, LambdaEvent};
use serde_json::json;
use shared::core::{ClickEvent, EventTracker, IdGenerator, TrackedEvent};
use shared::error::ServiceError;
use std::time::{SystemTime, UNIX_EPOCH};

pub(crate) struct HandlerDeps<T: EventTracker, G: IdGenerator> {
    pub event_tracker: T,
    pub id_generator: G,
    pub event_type: String,
}

#[derive(Debug, PartialEq)]
enum ClickOutcome {
    Forwarded,
    Anonymous,
}

#[tracing::instrument(skip(deps, event), fields(records = event.payload.records.len()))]
pub(crate) async fn function_handler<T: EventTracker, G: IdGenerator>(
    deps: &HandlerDeps<T, G>,
    event: LambdaEvent<KinesisEvent>,
) -> Result<KinesisEventResponse, Error> {
    let mut response = KinesisEventResponse::default();

    for record in event.payload.records {
        match process_record(deps, &record).await {
            Ok(ClickOutcome::Forwarded) => {
                tracing::info!("Posted click event to the tracker");
            }
            Ok(ClickOutcome::Anonymous) => {
                tracing::info!("No userID on click event, skipping anonymous click");
            }
            Err(ServiceError::InvalidRecord(reason)) => {
                tracing::error!("Dropping malformed click event: {}", reason);
            }
            Err(e) => {
                tracing::error!("Failed to post click event: {:?}", e);
                let mut failure = KinesisBatchItemFailure::default();
                failure.item_identifier = Some(record.kinesis.sequence_number);
                response.batch_item_failures.push(failure);
            }
        }
    }

    Ok(response)
}

#[tracing::instrument(name = "process click_event", skip(deps, record), fields(
    messaging.message.id = %record.kinesis.sequence_number,
    messaging.operation.name = "process",
    messaging.destination = "aws_kinesis",
    messaging.client.id = "post_click_event",
))]
async fn process_record<T: EventTracker, G: IdGenerator>(
    deps: &HandlerDeps<T, G>,
    record: &KinesisEventRecord,
) -> Result<ClickOutcome, ServiceError> {
    let click: ClickEvent = serde_json::from_slice(record.kinesis.data.as_slice())
        .map_err(|e| ServiceError::InvalidRecord(format!("Cannot parse click event: {}", e)))?;

    let Some(user_id) = click.user_id.clone().filter(|id| !id.is_empty()) else {
        return Ok(ClickOutcome::Anonymous);
    };
    let item_id = click
        .item_id_string()
        .ok_or_else(|| ServiceError::InvalidRecord("Click event has no itemID".to_string()))?;
    let session_id = click
        .session_id
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| deps.id_generator.generate_id());

    let event = TrackedEvent {
        user_id,
        session_id,
        event_type: deps.event_type.clone(),
        properties: json!({ "itemId": item_id }).to_string(),
        sent_at: now_in_seconds(),
    };
    deps.event_tracker.put_event(event).await?;

    Ok(ClickOutcome::Forwarded)
}

fn now_in_seconds() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::{function_handler, HandlerDeps};
    use aws_lambda_events::event::kinesis::{KinesisEvent, KinesisEventRecord};
    use lambda_runtime::{Context, LambdaEvent};
    use mockall::predicate::function;
    use serde_json::json;
    use shared::core::{MockEventTracker, MockIdGenerator, TrackedEvent};
    use shared::error::ServiceError;

    fn create_kinesis_record(data: &str, sequence_number: &str) -> KinesisEventRecord {
        use base64::{engine::general_purpose::STANDARD, Engine};
        let encoded_data = STANDARD.encode(data);

        let record_json = json!({
            "kinesis": {
                "data": encoded_data,
                "partitionKey": "clickstream",
                "sequenceNumber": sequence_number,
                "approximateArrivalTimestamp": 1234567890.123,
                "kinesisSchemaVersion": "1.0"
            },
            "eventSource": "aws:kinesis",
            "eventID": format!("shardId-000000000000:{}", sequence_number),
            "eventName": "aws:kinesis:record",
            "eventVersion": "1.0",
            "eventSourceARN": "arn:aws:kinesis:us-east-1:123456789:stream/clickstream",
            "awsRegion": "us-east-1"
        });

        serde_json::from_value(record_json).expect("Failed to create KinesisEventRecord")
    }

    fn create_lambda_event(records: Vec<KinesisEventRecord>) -> LambdaEvent<KinesisEvent> {
        let mut kinesis_event = KinesisEvent::default();
        kinesis_event.records = records;
        LambdaEvent::new(kinesis_event, Context::default())
    }

    fn deps_with(
        event_tracker: MockEventTracker,
    ) -> HandlerDeps<MockEventTracker, MockIdGenerator> {
        let mut id_generator = MockIdGenerator::default();
        id_generator
            .expect_generate_id()
            .returning(|| "generated-session".to_string());
        HandlerDeps {
            event_tracker,
            id_generator,
            event_type: "EVENT_TYPE".to_string(),
        }
    }

    #[tokio::test]
    async fn when_click_has_session_should_forward_it() {
        let mut event_tracker = MockEventTracker::default();
        event_tracker
            .expect_put_event()
            .times(1)
            .with(function(|event: &TrackedEvent| {
                event.user_id == "u1"
                    && event.session_id == "s1"
                    && event.event_type == "EVENT_TYPE"
                    && event.properties == r#"{"itemId":"i42"}"#
                    && event.sent_at > 0
            }))
            .returning(|_| Ok(()));
        let deps = deps_with(event_tracker);
        let data = json!({"userID": "u1", "itemID": "i42", "sessionID": "s1"}).to_string();

        let result = function_handler(&deps, create_lambda_event(vec![create_kinesis_record(&data, "1")])).await;

        assert!(result.is_ok());
        assert!(result.unwrap().batch_item_failures.is_empty());
    }

    #[tokio::test]
    async fn when_session_missing_should_generate_one() {
        let mut event_tracker = MockEventTracker::default();
        event_tracker
            .expect_put_event()
            .times(2)
            .with(function(|event: &TrackedEvent| {
                event.session_id == "generated-session"
            }))
            .returning(|_| Ok(()));
        let deps = deps_with(event_tracker);
        let without_session = json!({"userID": "u1", "itemID": 42}).to_string();
        let null_session = json!({"userID": "u1", "itemID": "i42", "sessionID": null}).to_string();

        let result = function_handler(
            &deps,
            create_lambda_event(vec![
                create_kinesis_record(&without_session, "1"),
                create_kinesis_record(&null_session, "2"),
            ]),
        )
        .await;

        assert!(result.unwrap().batch_item_failures.is_empty());
    }

    #[tokio::test]
    async fn when_user_missing_should_drop_without_failure() {
        let mut event_tracker = MockEventTracker::default();
        event_tracker.expect_put_event().times(0);
        let deps = deps_with(event_tracker);
        let data = json!({"itemID": "i42", "sessionID": "s1"}).to_string();

        let result = function_handler(&deps, create_lambda_event(vec![create_kinesis_record(&data, "1")])).await;

        assert!(result.unwrap().batch_item_failures.is_empty());
    }

    #[tokio::test]
    async fn when_record_malformed_should_drop_it_without_retry() {
        let mut event_tracker = MockEventTracker::default();
        event_tracker
            .expect_put_event()
            .times(1)
            .with(function(|event: &TrackedEvent| event.user_id == "u1"))
            .returning(|_| Ok(()));
        let deps = deps_with(event_tracker);
        let valid = json!({"userID": "u1", "itemID": "i42", "sessionID": "s1"}).to_string();
        let no_item = json!({"userID": "u2", "sessionID": "s2"}).to_string();

        let result = function_handler(
            &deps,
            create_lambda_event(vec![
                create_kinesis_record("not json", "1"),
                create_kinesis_record(&valid, "2"),
                create_kinesis_record(&no_item, "3"),
            ]),
        )
        .await;

        assert!(result.unwrap().batch_item_failures.is_empty());
    }

    #[tokio::test]
    async fn when_batch_mixes_malformed_and_throttled_should_report_only_throttled() {
        let mut event_tracker = MockEventTracker::default();
        event_tracker
            .expect_put_event()
            .times(1)
            .returning(|_| Err(ServiceError::downstream("personalize-events", "throttled")));
        let deps = deps_with(event_tracker);
        let throttled = json!({"userID": "u1", "itemID": "i1", "sessionID": "s1"}).to_string();

        let result = function_handler(
            &deps,
            create_lambda_event(vec![
                create_kinesis_record("{\"userID\": ", "20"),
                create_kinesis_record(&throttled, "21"),
            ]),
        )
        .await;

        let failures: Vec<Option<String>> = result
            .unwrap()
            .batch_item_failures
            .into_iter()
            .map(|f| f.item_identifier)
            .collect();
        assert_eq!(failures, vec![Some("21".to_string())]);
    }

    #[tokio::test]
    async fn when_tracker_fails_should_continue_with_next_record() {
        let mut event_tracker = MockEventTracker::default();
        event_tracker
            .expect_put_event()
            .times(1)
            .with(function(|event: &TrackedEvent| event.user_id == "u1"))
            .returning(|_| Err(ServiceError::downstream("personalize-events", "throttled")));
        event_tracker
            .expect_put_event()
            .times(1)
            .with(function(|event: &TrackedEvent| event.user_id == "u2"))
            .returning(|_| Ok(()));
        let deps = deps_with(event_tracker);
        let first = json!({"userID": "u1", "itemID": "i1", "sessionID": "s1"}).to_string();
        let second = json!({"userID": "u2", "itemID": "i2", "sessionID": "s2"}).to_string();

        let result = function_handler(
            &deps,
            create_lambda_event(vec![
                create_kinesis_record(&first, "10"),
                create_kinesis_record(&second, "11"),
            ]),
        )
        .await;

        let response = result.unwrap();
        assert_eq!(response.batch_item_failures.len(), 1);
        assert_eq!(
            response.batch_item_failures[0].item_identifier.as_deref(),
            Some("10")
        );
    }

    #[tokio::test]
    async fn when_empty_records_should_succeed() {
        let mut event_tracker = MockEventTracker::default();
        event_tracker.expect_put_event().times(0);
        let deps = deps_with(event_tracker);

        let result = function_handler(&deps, create_lambda_event(vec![])).await;

        assert!(result.unwrap().batch_item_failures.is_empty());
    }
}
