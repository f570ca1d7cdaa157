use lambda_http::RequestExt;
use lambda_http::{http::StatusCode, tracing, Error, IntoResponse, Request};
use serde_json::json;
use shared::item_description::DescriptionSource;
use shared::utils::{empty_response, json_response};

pub(crate) struct HandlerDeps<D: DescriptionSource> {
    pub description_source: D,
}

#[tracing::instrument(skip(deps, event))]
pub(crate) async fn function_handler<D: DescriptionSource>(
    deps: &HandlerDeps<D>,
    event: Request,
) -> Result<impl IntoResponse, Error> {
    let query_params = event.query_string_parameters();
    let Some(asin) = query_params.first("asin").filter(|asin| !asin.is_empty()) else {
        return empty_response(&StatusCode::OK);
    };

    match deps.description_source.fetch_description(asin).await {
        Ok(description) => json_response(&StatusCode::OK, &description),
        Err(e) => {
            tracing::error!("Failed to fetch description for {}: {:?}", asin, e);
            json_response(
                &StatusCode::INTERNAL_SERVER_ERROR,
                &json!({"error": e.to_string()}),
            )
        }
    }
}
