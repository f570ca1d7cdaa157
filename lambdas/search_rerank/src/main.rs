use crate::config::Config;
use crate::http_handler::{function_handler, HandlerDeps};
use lambda_http::{run, service_fn, tracing, Error};
use shared::adapters::{DynamoDbItemRepository, PersonalizeRecommender};
use shared::opensearch::{OpenSearchIndex, RequestSigner};

mod config;
mod http_handler;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing::init_default_subscriber();
    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let dynamodb_client = aws_sdk_dynamodb::Client::new(&aws_config);
    let personalize_client = aws_sdk_personalizeruntime::Client::new(&aws_config);

    let (env, index_config) = Config::load()?;
    let region = index_config
        .region
        .clone()
        .or_else(|| aws_config.region().map(|r| r.to_string()));
    let signer = RequestSigner::from_parts(aws_config.credentials_provider(), region);
    let http_client = shared::Client::builder()
        .timeout(std::time::Duration::from_secs(5))
        .build()?;
    let deps = HandlerDeps {
        campaign_arn: env.campaign_arn(),
        max_promoted_results: env.max_promoted_results,
        query_mode: index_config.search_mode,
        search_index: OpenSearchIndex::new(http_client, &index_config, signer),
        item_repo: DynamoDbItemRepository::new(
            env.ddb_table_name,
            env.key_attribute,
            dynamodb_client,
        ),
        recommender: PersonalizeRecommender::new(personalize_client),
    };

    run(service_fn(|event| function_handler(&deps, event))).await
}
