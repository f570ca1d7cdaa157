use crate::core::{Item, ItemRepository};
use crate::error::ServiceError;
use crate::promotion::RankedId;
use futures::stream::{self, StreamExt, TryStreamExt};
use serde::Serialize;
use serde_json::Value;

/// Point lookups kept in flight while resolving one list.
const MAX_CONCURRENT_LOOKUPS: usize = 10;

/// Attribute set on records that were moved forward by personalized re-ranking.
pub const PROMOTED_ATTRIBUTE: &str = "Promoted";

#[derive(Debug, Default)]
pub struct ResolvedItems {
    pub items: Vec<Item>,
    /// Identifiers the document store had no record for.
    pub missing: usize,
}

impl ResolvedItems {
    pub fn missing_warning(&self) -> Option<String> {
        (self.missing > 0).then(|| format!("{} item IDs missing from DynamoDB", self.missing))
    }
}

/// Body returned by the recommendation and re-rank functions.
#[derive(Debug, Default, Serialize)]
pub struct ItemsResponse {
    pub results: Vec<Item>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl ItemsResponse {
    pub fn add_warning(&mut self, warning: String) {
        self.warning = Some(match self.warning.take() {
            Some(existing) => format!("{}\n\n{}", existing, warning),
            None => warning,
        });
    }
}

/// Looks every id up in the document store, keeping the given order.
///
/// Misses are counted and dropped; a store failure aborts the whole resolution.
#[tracing::instrument(skip(repo, ranked), fields(requested = ranked.len()))]
pub async fn resolve_items<R: ItemRepository>(
    repo: &R,
    ranked: Vec<RankedId>,
) -> Result<ResolvedItems, ServiceError> {
    let lookups: Vec<(RankedId, Option<Item>)> = stream::iter(ranked)
        .map(|ranked_id| async move {
            let item = repo.get_item(&ranked_id.id).await?;
            Ok::<_, ServiceError>((ranked_id, item))
        })
        .buffered(MAX_CONCURRENT_LOOKUPS)
        .try_collect()
        .await?;

    let mut resolved = ResolvedItems::default();
    for (ranked_id, item) in lookups {
        match item {
            Some(mut item) => {
                if ranked_id.promoted {
                    item.insert(PROMOTED_ATTRIBUTE.to_string(), Value::Bool(true));
                }
                resolved.items.push(item);
            }
            None => {
                tracing::debug!("Item {} not found in document store", ranked_id.id);
                resolved.missing += 1;
            }
        }
    }

    if let Some(warning) = resolved.missing_warning() {
        tracing::warn!("{}", warning);
    }

    Ok(resolved)
}
