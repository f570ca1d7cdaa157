use crate::config::Config;
use lambda_http::{http::StatusCode, tracing, Error, IntoResponse, Request};
use serde::Serialize;
use shared::utils::json_response;

#[derive(Debug, Serialize)]
struct SessionSettings<'a> {
    #[serde(rename = "AnonymousPoolId")]
    anonymous_pool_id: &'a str,
    #[serde(rename = "StreamName")]
    stream_name: &'a str,
}

#[tracing::instrument(skip(config, _event))]
pub(crate) async fn function_handler(
    config: &Config,
    _event: Request,
) -> Result<impl IntoResponse, Error> {
    json_response(
        &StatusCode::OK,
        &SessionSettings {
            anonymous_pool_id: &config.identity_pool_id,
            stream_name: &config.kinesis_stream_name,
        },
    )
}
