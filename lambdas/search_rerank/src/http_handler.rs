use lambda_http::RequestExt;
use lambda_http::{http::StatusCode, tracing, Error, IntoResponse, Request};
use shared::core::{ItemRepository, Recommender, SearchIndex};
use shared::error::ServiceError;
use shared::items::{resolve_items, ItemsResponse};
use shared::promotion::merge_promotions;
use shared::search::{search_items, QueryMode};
use shared::utils::{error_response, json_response};

const RERANK_DISABLED_WARNING: &str = "Personalized search re-ranking has not yet been enabled: First train a re-ranking model and deploy a campaign in Amazon Personalize, then set the CAMPAIGN_ARN environment variable on your SearchRerank Lambda function to use the model on the website!";

pub(crate) struct HandlerDeps<R: ItemRepository, P: Recommender, S: SearchIndex> {
    pub item_repo: R,
    pub recommender: P,
    pub search_index: S,
    pub query_mode: QueryMode,
    pub campaign_arn: Option<String>,
    pub max_promoted_results: Option<usize>,
}

#[tracing::instrument(skip(deps, event))]
pub(crate) async fn function_handler<R: ItemRepository, P: Recommender, S: SearchIndex>(
    deps: &HandlerDeps<R, P, S>,
    event: Request,
) -> Result<impl IntoResponse, Error> {
    let query_params = event.query_string_parameters();
    let Some(text) = query_params.first("q").filter(|q| !q.is_empty()) else {
        return error_response(&ServiceError::MissingParameter("q".to_string()));
    };
    let user_id = query_params.first("u").filter(|u| !u.is_empty());

    match rerank(deps, text, user_id).await {
        Ok(response) => json_response(&StatusCode::OK, &response),
        Err(e) => {
            tracing::error!("Search re-rank failed: {:?}", e);
            error_response(&e)
        }
    }
}

async fn rerank<R: ItemRepository, P: Recommender, S: SearchIndex>(
    deps: &HandlerDeps<R, P, S>,
    text: &str,
    user_id: Option<&str>,
) -> Result<ItemsResponse, ServiceError> {
    let outcome = search_items(&deps.search_index, text, deps.query_mode).await?;
    if !(200..300).contains(&outcome.status_code) {
        return Err(ServiceError::downstream_with_status(
            "opensearch",
            outcome.status_code,
            "search query was rejected",
        ));
    }
    let raw = outcome.ids;
    tracing::info!("Raw search results: {:?}", raw);

    let mut warnings = vec![];
    let reranked = match (&deps.campaign_arn, user_id) {
        (None, _) => {
            warnings.push(RERANK_DISABLED_WARNING.to_string());
            vec![]
        }
        (Some(campaign_arn), Some(user_id)) if !raw.is_empty() => {
            deps.recommender
                .get_personalized_ranking(campaign_arn, raw.clone(), user_id)
                .await?
        }
        _ => vec![],
    };
    tracing::info!("Re-ranked search results: {:?}", reranked);

    let ranked = merge_promotions(&raw, &reranked, deps.max_promoted_results);
    let resolved = resolve_items(&deps.item_repo, ranked).await?;

    let mut response = ItemsResponse::default();
    warnings.extend(resolved.missing_warning());
    for warning in warnings {
        response.add_warning(warning);
    }
    response.results = resolved.items;

    Ok(response)
}
