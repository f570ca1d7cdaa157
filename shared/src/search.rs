use crate::core::SearchIndex;
use crate::error::ServiceError;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Maximum number of hits returned for a single query.
pub const MAX_SEARCH_RESULTS: usize = 25;

/// How the free-text query is matched against the index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryMode {
    /// Fuzzy match on `title`, tolerant of typos and transpositions.
    #[default]
    Fuzzy,
    /// Exact/partial match across `asin` and `title`.
    MultiMatch,
}

pub fn build_query(text: &str, mode: QueryMode) -> Value {
    match mode {
        QueryMode::Fuzzy => json!({
            "size": MAX_SEARCH_RESULTS,
            "query": {
                "fuzzy": {
                    "title": {
                        "value": text,
                        "fuzziness": "AUTO",
                        "max_expansions": 50,
                        "prefix_length": 0,
                        "transpositions": true,
                        "rewrite": "constant_score"
                    }
                }
            }
        }),
        QueryMode::MultiMatch => json!({
            "size": MAX_SEARCH_RESULTS,
            "query": {
                "multi_match": {
                    "query": text,
                    "fields": ["asin", "title"]
                }
            }
        }),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    /// Status code the search index answered with.
    pub status_code: u16,
    /// Matching item identifiers in index order.
    pub ids: Vec<String>,
    pub documents: Vec<Value>,
}

#[derive(Debug, Serialize)]
pub struct SearchResults<'a> {
    pub result: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documents: Option<&'a [Value]>,
}

impl SearchOutcome {
    pub fn results(&self, include_documents: bool) -> SearchResults<'_> {
        SearchResults {
            result: &self.ids,
            documents: include_documents.then_some(self.documents.as_slice()),
        }
    }
}

#[tracing::instrument(skip(index))]
pub async fn search_items<S: SearchIndex>(
    index: &S,
    text: &str,
    mode: QueryMode,
) -> Result<SearchOutcome, ServiceError> {
    let query = build_query(text, mode);
    tracing::debug!("Search query: {}", query);

    let response = index.search(&query).await?;
    let (ids, documents) = response
        .hits
        .into_iter()
        .map(|hit| (hit.id, hit.source))
        .unzip();

    Ok(SearchOutcome {
        status_code: response.status_code,
        ids,
        documents,
    })
}
