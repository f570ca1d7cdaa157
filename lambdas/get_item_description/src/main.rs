use crate::config::Config;
use crate::http_handler::{function_handler, HandlerDeps};
use lambda_http::{run, service_fn, tracing, Error};
use shared::item_description::HttpDescriptionSource;

mod config;
mod http_handler;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing::init_default_subscriber();
    let config = Config::load()?;
    let http_client = shared::Client::builder()
        .timeout(std::time::Duration::from_secs(5))
        .build()?;
    let deps = HandlerDeps {
        description_source: HttpDescriptionSource::new(http_client, config.description_base_url),
    };

    run(service_fn(|event| function_handler(&deps, event))).await
}
