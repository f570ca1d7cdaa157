use crate::config::Config;
use crate::http_handler::{function_handler, HandlerDeps};
use lambda_http::{run, service_fn, tracing, Error};
use shared::adapters::{DynamoDbItemRepository, PersonalizeRecommender};

mod config;
mod http_handler;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing::init_default_subscriber();
    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let dynamodb_client = aws_sdk_dynamodb::Client::new(&aws_config);
    let personalize_client = aws_sdk_personalizeruntime::Client::new(&aws_config);

    let env = Config::load()?;
    let deps = HandlerDeps {
        campaign_arn: env.campaign_arn(),
        item_repo: DynamoDbItemRepository::new(
            env.ddb_table_name,
            env.key_attribute,
            dynamodb_client,
        ),
        recommender: PersonalizeRecommender::new(personalize_client),
    };

    run(service_fn(|event| function_handler(&deps, event))).await
}
