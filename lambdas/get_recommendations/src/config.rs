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

    /// An empty ARN counts as not configured.
    pub fn campaign_arn(&self) -> Option<String> {
        self.campaign_arn.clone().filter(|arn| !arn.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::Config;

    #[test]
    fn when_campaign_unset_should_be_disabled() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("DDB_TABLE_NAME", "items");

            let config = Config::load().unwrap();

            assert_eq!(config.ddb_table_name, "items");
            assert_eq!(config.key_attribute, "asin");
            assert!(config.campaign_arn().is_none());

            Ok(())
        });
    }

    #[test]
    fn when_campaign_blank_should_be_disabled() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("DDB_TABLE_NAME", "items");
            jail.set_env("CAMPAIGN_ARN", " ");

            let config = Config::load().unwrap();

            assert!(config.campaign_arn().is_none());

            Ok(())
        });
    }

    #[test]
    fn when_campaign_set_should_load_it() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("DDB_TABLE_NAME", "items");
            jail.set_env(
                "CAMPAIGN_ARN",
                "arn:aws:personalize:eu-west-1:123456789012:campaign/user-personalization",
            );

            let config = Config::load().unwrap();

            assert_eq!(
                config.campaign_arn().as_deref(),
                Some("arn:aws:personalize:eu-west-1:123456789012:campaign/user-personalization")
            );

            Ok(())
        });
    }
}
