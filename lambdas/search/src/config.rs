use figment::providers::Env;
use figment::Figment;
use serde::{Deserialize, Serialize};
use shared::configuration::SearchIndexConfig;

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct Config {
    /// Return the matching source documents next to their ids.
    #[serde(default)]
    pub include_documents: bool,
}

impl Config {
    pub fn load() -> Result<(Self, SearchIndexConfig), figment::Error> {
        let config = Figment::new()
            .merge(Env::raw().only(&["INCLUDE_DOCUMENTS"]))
            .extract()?;

        Ok((config, SearchIndexConfig::load()?))
    }
}
