use lambda_http::RequestExt;
use lambda_http::{http::StatusCode, tracing, Error, IntoResponse, Request};
use shared::core::{ItemRepository, RecommendationSubject, Recommender};
use shared::recommendations::{lookup_recommendations, DisabledFallback};
use shared::utils::{error_response, json_response};

const NO_ITEM_ID: &str = "NoItemId";

const DISABLED: DisabledFallback = DisabledFallback {
    warning: "Similar item recommendations have not yet been enabled: First train a model and deploy a campaign in Amazon Personalize, then set the CAMPAIGN_ARN environment variable on your GetRecommendationsByItem Lambda function to use the model on the website!",
    scan_limit: None,
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
    let item_id = event
        .path_parameters()
        .first("itemid")
        .filter(|id| !id.is_empty())
        .unwrap_or(NO_ITEM_ID)
        .to_string();

    let response = lookup_recommendations(
        &deps.item_repo,
        &deps.recommender,
        deps.campaign_arn.as_deref(),
        RecommendationSubject::Item(item_id),
        &DISABLED,
    )
    .await;

    match response {
        Ok(response) => json_response(&StatusCode::OK, &response),
        Err(e) => {
            tracing::error!("Failed to get similar items: {:?}", e);
            error_response(&e)
        }
    }
}
