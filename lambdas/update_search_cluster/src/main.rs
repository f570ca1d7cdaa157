use crate::event_handler::{function_handler, HandlerDeps};
use lambda_runtime::{run, service_fn, tracing, Error};
use shared::configuration::SearchIndexConfig;
use shared::opensearch::{OpenSearchIndex, RequestSigner};

mod event_handler;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing::init_default_subscriber();
    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;

    let index_config = SearchIndexConfig::load()?;
    let region = index_config
        .region
        .clone()
        .or_else(|| aws_config.region().map(|r| r.to_string()));
    let signer = RequestSigner::from_parts(aws_config.credentials_provider(), region);
    let http_client = shared::Client::builder()
        .timeout(std::time::Duration::from_secs(5))
        .build()?;
    let handler_deps = HandlerDeps {
        search_index: OpenSearchIndex::new(http_client, &index_config, signer),
        key_attribute: index_config.key_attribute,
    };

    run(service_fn(|event| function_handler(&handler_deps, event))).await
}
