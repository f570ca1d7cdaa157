use lambda_http::RequestExt;
use lambda_http::{http::StatusCode, tracing, Error, IntoResponse, Request};
use shared::core::{ItemRepository, RecommendationSubject, Recommender};
use shared::recommendations::{lookup_recommendations, DisabledFallback, FALLBACK_SCAN_LIMIT};
use shared::utils::{error_response, json_response};

/// Passed on to the recommender when the request names no user.
const NO_USER_ID: &str = "NoUserID";

const DISABLED: DisabledFallback = DisabledFallback {
    warning: "Product recommendations have not yet been enabled: First train a model and deploy a campaign in Amazon Personalize, then set the CAMPAIGN_ARN environment variable on your GetRecommendations Lambda function to use the model on the website!",
    scan_limit: Some(FALLBACK_SCAN_LIMIT),
};

pub(crate) struct HandlerDeps<R: ItemRepository, P: Recommender> {
    pub item_repo: R,
    pub recommender: P,
    pub campaign_arn: Option<String>,
}

#[tracing::instrument(skip(deps, event))]
pub(crate) async fn function_handler<R: ItemRepository, P: Recommender>(
    deps: &HandlerDeps<R, P>,
    event: Request,
) -> Result<impl IntoResponse, Error> {
    let user_id = event
        .path_parameters()
        .first("userid")
        .filter(|id| !id.is_empty())
        .unwrap_or(NO_USER_ID)
        .to_string();
    tracing::info!("Fetching recommendations for user {}", user_id);

    let response = lookup_recommendations(
        &deps.item_repo,
        &deps.recommender,
        deps.campaign_arn.as_deref(),
        RecommendationSubject::User(user_id),
        &DISABLED,
    )
    .await;

    match response {
        Ok(response) => json_response(&StatusCode::OK, &response),
        Err(e) => {
            tracing::error!("Failed to get recommendations: {:?}", e);
            error_response(&e)
        }
    }
}
