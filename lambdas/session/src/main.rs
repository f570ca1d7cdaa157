use crate::config::Config;
use crate::http_handler::function_handler;
use lambda_http::{run, service_fn, tracing, Error};

mod config;
mod http_handler;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing::init_default_subscriber();
    let config = Config::load()?;

    run(service_fn(|event| function_handler(&config, event))).await
}
