use figment::providers::Env;
use figment::Figment;
use serde::{Deserialize, Serialize};
use shared::configuration::{default_key_attribute, SearchIndexConfig};

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct Config {
    pub ddb_table_name: String,
    pub campaign_arn: Option<String>,
    /// Unset means every re-ranked item may be promoted.
    pub max_promoted_results: Option<usize>,
    #[serde(default = "default_key_attribute")]
    pub key_attribute: String,
}

impl Config {
    pub fn load() -> Result<(Self, SearchIndexConfig), figment::Error> {
        let config = Figment::new()
            .merge(Env::raw().only(&[
                "DDB_TABLE_NAME",
                "CAMPAIGN_ARN",
                "MAX_PROMOTED_RESULTS",
                "KEY_ATTRIBUTE",
            ]))
            .extract()?;

        Ok((config, SearchIndexConfig::load()?))
    }

    pub fn campaign_arn(&self) -> Option<String> {
        self.campaign_arn.clone().filter(|arn| !arn.trim().is_empty())
    }
}
