/// An identifier in the final re-ranked order, flagged when it was promoted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedId {
    pub id: String,
    pub promoted: bool,
}

impl RankedId {
    pub fn plain(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            promoted: false,
        }
    }
}

/// Puts up to `max_promoted` re-ranked ids first, then every raw id that was not
/// promoted, in raw order.
///
/// With `max_promoted` unset every re-ranked id is promoted. Raw duplicates are kept.
pub fn merge_promotions(
    raw: &[String],
    reranked: &[String],
    max_promoted: Option<usize>,
) -> Vec<RankedId> {
    let limit = max_promoted.unwrap_or(reranked.len()).min(reranked.len());
    let promotions = &reranked[..limit];

    promotions
        .iter()
        .map(|id| RankedId {
            id: id.clone(),
            promoted: true,
        })
        .chain(
            raw.iter()
                .filter(|id| !promotions.contains(id))
                .map(|id| RankedId::plain(id.clone())),
        )
        .collect()
}
