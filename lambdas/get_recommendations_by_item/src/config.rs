use figment::providers::Env;
use figment::Figment;
use serde::{Deserialize, Serialize};
use shared::configuration::default_key_attribute;

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct Config {
    pub ddb_table_name: String,
    pub campaign_arn: Option<String>,
    #[serde(default = "default_key_attribute")]
    pub key_attribute: String,
}

impl Config {
    pub fn load() -> Result<Self, figment::Error> {
        Figment::new()
            .merge(Env::raw().only(&["DDB_TABLE_NAME", "CAMPAIGN_ARN", "KEY_ATTRIBUTE"]))
            .extract()
    }

    pub fn campaign_arn(&self) -> Option<String> {
        self.campaign_arn.clone().filter(|arn| !arn.trim().is_empty())
    }
}
