use crate::core::{ItemRepository, RecommendationSubject, Recommender};
use crate::error::ServiceError;
use crate::items::{resolve_items, ItemsResponse};
use crate::promotion::RankedId;

/// Items shown when the campaign is not configured and a fallback scan is allowed.
pub const FALLBACK_SCAN_LIMIT: i32 = 30;

/// How a recommendation function behaves while its campaign is not configured.
#[derive(Debug, Clone)]
pub struct DisabledFallback {
    pub warning: &'static str,
    /// When set, an unordered sample of this many store items is returned.
    pub scan_limit: Option<i32>,
}

/// Fetches recommendations for `subject` and resolves them to item records.
///
/// Without a campaign the request degrades to `fallback` rather than failing.
#[tracing::instrument(skip(repo, recommender, fallback))]
pub async fn lookup_recommendations<R: ItemRepository, P: Recommender>(
    repo: &R,
    recommender: &P,
    campaign_arn: Option<&str>,
    subject: RecommendationSubject,
    fallback: &DisabledFallback,
) -> Result<ItemsResponse, ServiceError> {
    let Some(campaign_arn) = campaign_arn else {
        return Ok(disabled_response(repo, fallback).await);
    };

    let recommended = recommender
        .get_recommendations(campaign_arn, subject)
        .await?;
    tracing::info!("Received {} recommendations", recommended.len());

    let resolved = resolve_items(repo, recommended.into_iter().map(RankedId::plain).collect())
        .await?;

    Ok(ItemsResponse {
        warning: resolved.missing_warning(),
        results: resolved.items,
    })
}

async fn disabled_response<R: ItemRepository>(
    repo: &R,
    fallback: &DisabledFallback,
) -> ItemsResponse {
    let mut response = ItemsResponse {
        results: vec![],
        warning: Some(fallback.warning.to_string()),
    };

    if let Some(limit) = fallback.scan_limit {
        match repo.scan_items(limit).await {
            Ok(items) => {
                response.results = items;
                response.add_warning("Results shown here are a simple DynamoDB scan.".to_string());
            }
            Err(e) => tracing::warn!("Fallback scan failed: {}", e),
        }
    }

    response
}
