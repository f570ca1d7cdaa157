use lambda_http::RequestExt;
use lambda_http::{http::StatusCode, tracing, Error, IntoResponse, Request};
use shared::core::SearchIndex;
use shared::error::ServiceError;
use shared::search::{search_items, QueryMode};
use shared::utils::{error_response, json_response};

pub(crate) struct HandlerDeps<S: SearchIndex> {
    pub search_index: S,
    pub query_mode: QueryMode,
    pub include_documents: bool,
}

#[tracing::instrument(skip(deps, event))]
pub(crate) async fn function_handler<S: SearchIndex>(
    deps: &HandlerDeps<S>,
    event: Request,
) -> Result<impl IntoResponse, Error> {
    let query_params = event.query_string_parameters();
    let Some(text) = query_params.first("q").filter(|q| !q.is_empty()) else {
        return error_response(&ServiceError::MissingParameter("q".to_string()));
    };

    match search_items(&deps.search_index, text, deps.query_mode).await {
        Ok(outcome) => {
            tracing::info!("Search for '{}' matched {} items", text, outcome.ids.len());
            let status =
                StatusCode::from_u16(outcome.status_code).unwrap_or(StatusCode::BAD_GATEWAY);
            json_response(&status, &outcome.results(deps.include_documents))
        }
        Err(e) => {
            tracing::error!("Search failed: {:?}", e);
            error_response(&e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{function_handler, HandlerDeps};
    use lambda_http::http::Request;
    use lambda_http::{Body, IntoResponse, RequestExt};
    use mockall::predicate::function;
    use serde_json::{json, Value};
    use shared::core::{MockSearchIndex, SearchHit, SearchResponse};
    use shared::error::ServiceError;
    use shared::search::QueryMode;
    use std::collections::HashMap;

    fn search_request(q: Option<&str>) -> Request<Body> {
        let mut query_string = HashMap::new();
        if let Some(q) = q {
            query_string.insert("q".to_string(), q.to_string());
        }
        Request::builder()
            .header("Content-Type", "application/json")
            .body(Body::Empty)
            .unwrap()
            .with_query_string_parameters(query_string)
    }

    fn dune_hits() -> SearchResponse {
        SearchResponse {
            status_code: 200,
            hits: vec![
                SearchHit {
                    id: "B3".to_string(),
                    source: json!({"asin": "B3", "title": "Dune"}),
                },
                SearchHit {
                    id: "B1".to_string(),
                    source: json!({"asin": "B1", "title": "Dune Messiah"}),
                },
            ],
        }
    }

    #[tokio::test]
    async fn when_query_given_should_return_ids_in_index_order() {
        let mut search_index = MockSearchIndex::default();
        search_index
            .expect_search()
            .times(1)
            .with(function(|query: &Value| {
                query["size"] == 25 && query["query"]["fuzzy"]["title"]["value"] == "dnue"
            }))
            .returning(|_| Ok(dune_hits()));
        let deps = HandlerDeps {
            search_index,
            query_mode: QueryMode::Fuzzy,
            include_documents: false,
        };

        let result = function_handler(&deps, search_request(Some("dnue"))).await;

        assert!(result.is_ok());
        let data = result.unwrap().into_response().await;
        assert_eq!(data.status(), 200);
        let body: Value = serde_json::from_slice(data.body()).unwrap();
        assert_eq!(body, json!({"result": ["B3", "B1"]}));
    }

    #[tokio::test]
    async fn when_documents_requested_should_include_sources() {
        let mut search_index = MockSearchIndex::default();
        search_index
            .expect_search()
            .times(1)
            .with(function(|query: &Value| {
                query["query"]["multi_match"]["query"] == "dune"
            }))
            .returning(|_| Ok(dune_hits()));
        let deps = HandlerDeps {
            search_index,
            query_mode: QueryMode::MultiMatch,
            include_documents: true,
        };

        let result = function_handler(&deps, search_request(Some("dune"))).await;

        let data = result.unwrap().into_response().await;
        let body: Value = serde_json::from_slice(data.body()).unwrap();
        assert_eq!(body["documents"][1]["title"], "Dune Messiah");
    }

    #[tokio::test]
    async fn when_query_missing_should_return_400() {
        let mut search_index = MockSearchIndex::default();
        search_index.expect_search().times(0);
        let deps = HandlerDeps {
            search_index,
            query_mode: QueryMode::Fuzzy,
            include_documents: false,
        };

        let result = function_handler(&deps, search_request(None)).await;

        let data = result.unwrap().into_response().await;
        assert_eq!(data.status(), 400);
        let body: Value = serde_json::from_slice(data.body()).unwrap();
        assert_eq!(body["error"], "missing required parameter 'q'");
    }

    #[tokio::test]
    async fn when_index_answers_error_status_should_propagate_it() {
        let mut search_index = MockSearchIndex::default();
        search_index.expect_search().returning(|_| {
            Ok(SearchResponse {
                status_code: 403,
                hits: vec![],
            })
        });
        let deps = HandlerDeps {
            search_index,
            query_mode: QueryMode::Fuzzy,
            include_documents: false,
        };

        let result = function_handler(&deps, search_request(Some("dune"))).await;

        let data = result.unwrap().into_response().await;
        assert_eq!(data.status(), 403);
        assert_eq!(data.headers()["Access-Control-Allow-Origin"], "*");
    }

    #[tokio::test]
    async fn when_index_unreachable_should_return_502() {
        let mut search_index = MockSearchIndex::default();
        search_index
            .expect_search()
            .returning(|_| Err(ServiceError::downstream("opensearch", "connection refused")));
        let deps = HandlerDeps {
            search_index,
            query_mode: QueryMode::Fuzzy,
            include_documents: false,
        };

        let result = function_handler(&deps, search_request(Some("dune"))).await;

        let data = result.unwrap().into_response().await;
        assert_eq!(data.status(), 502);
    }
}
