use crate::error::ServiceError;
use lambda_http::http::StatusCode;
use lambda_http::{Error, Response};
use serde::Serialize;
use serde_json::json;

/// Browser clients call the API from another origin.
fn cors_builder(status: &StatusCode) -> lambda_http::http::response::Builder {
    Response::builder()
        .status(status)
        .header("Access-Control-Allow-Origin", "*")
        .header("Access-Control-Allow-Credentials", "true")
}

pub fn empty_response(status: &StatusCode) -> Result<Response<String>, Error> {
    let response = cors_builder(status)
        .body("".to_string())
        .map_err(Box::new)?;

    Ok(response)
}

pub fn json_response(
    status: &StatusCode,
    body: &impl Serialize,
) -> Result<Response<String>, Error> {
    let response = cors_builder(status)
        .header("content-type", "application/json")
        .body(serde_json::to_string(&body)?)
        .map_err(Box::new)?;

    Ok(response)
}

pub fn error_response(error: &ServiceError) -> Result<Response<String>, Error> {
    let body = match error.downstream_status() {
        Some(status) => json!({"error": error.to_string(), "downstreamStatus": status}),
        None => json!({"error": error.to_string()}),
    };

    json_response(&error.status_code(), &body)
}
