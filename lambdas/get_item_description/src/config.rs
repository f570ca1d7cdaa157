use figment::providers::Env;
use figment::Figment;
use serde::{Deserialize, Serialize};
use shared::item_description::DEFAULT_DESCRIPTION_BASE_URL;

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct Config {
    /// Product page prefix the ASIN is appended to.
    #[serde(default = "default_base_url")]
    pub description_base_url: String,
}

fn default_base_url() -> String {
    DEFAULT_DESCRIPTION_BASE_URL.to_string()
}

impl Config {
    pub fn load() -> Result<Self, figment::Error> {
        Figment::new()
            .merge(Env::raw().only(&["DESCRIPTION_BASE_URL"]))
            .extract()
    }
}
