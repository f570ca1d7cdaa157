use crate::config::Config;
use crate::event_handler::{function_handler, HandlerDeps};
use lambda_runtime::{run, service_fn, tracing, Error};
use shared::adapters::PersonalizeEventTracker;
use shared::core::CuidGenerator;

mod config;
mod event_handler;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing::init_default_subscriber();
    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let events_client = aws_sdk_personalizeevents::Client::new(&aws_config);

    let config = Config::load()?;
    let handler_deps = HandlerDeps {
        event_tracker: PersonalizeEventTracker::new(config.tracking_id, events_client),
        id_generator: CuidGenerator::new(),
        event_type: config.event_type,
    };

    run(service_fn(|event| function_handler(&handler_deps, event))).await
}
