use crate::search::QueryMode;
use figment::providers::Env;
use figment::Figment;
use serde::{Deserialize, Serialize};

/// Search-index settings shared by the search, re-rank and index sync functions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchIndexConfig {
    /// Domain host name, with or without the `https://` scheme.
    #[serde(rename = "esendpoint")]
    pub endpoint: String,
    /// Signing region; falls back to the region of the AWS SDK configuration.
    pub region: Option<String>,
    #[serde(default = "default_search_index")]
    pub search_index: String,
    #[serde(default = "default_document_type")]
    pub search_document_type: String,
    #[serde(default)]
    pub search_mode: QueryMode,
    #[serde(default = "default_key_attribute")]
    pub key_attribute: String,
}

fn default_search_index() -> String {
    "items_vanilla".to_string()
}

fn default_document_type() -> String {
    "_doc".to_string()
}

pub fn default_key_attribute() -> String {
    "asin".to_string()
}

impl SearchIndexConfig {
    pub fn load() -> Result<Self, figment::Error> {
        Self::figment().extract()
    }

    pub fn figment() -> Figment {
        Figment::new().merge(Env::raw().only(&[
            "ESENDPOINT",
            "REGION",
            "SEARCH_INDEX",
            "SEARCH_DOCUMENT_TYPE",
            "SEARCH_MODE",
            "KEY_ATTRIBUTE",
        ]))
    }

    pub fn base_url(&self) -> String {
        let endpoint = self.endpoint.trim_end_matches('/');
        if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            endpoint.to_string()
        } else {
            format!("https://{}", endpoint)
        }
    }
}
