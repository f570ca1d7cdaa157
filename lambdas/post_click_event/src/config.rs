use figment::providers::Env;
use figment::Figment;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct Config {
    pub tracking_id: String,
    #[serde(default = "default_event_type")]
    pub event_type: String,
}

fn default_event_type() -> String {
    "EVENT_TYPE".to_string()
}

impl Config {
    pub fn load() -> Result<Self, figment::Error> {
        Figment::new()
            .merge(Env::raw().only(&["TRACKING_ID", "EVENT_TYPE"]))
            .extract()
    }
}

#[cfg(test)]
mod tests {
    use super::Config;

    #[test]
    fn when_event_type_unset_should_use_default_tag() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("TRACKING_ID", "0f6c2a1e-tracker");

            let config = Config::load().unwrap();

            assert_eq!(config.tracking_id, "0f6c2a1e-tracker");
            assert_eq!(config.event_type, "EVENT_TYPE");

            Ok(())
        });
    }

    #[test]
    fn when_tracking_id_missing_should_fail() {
        figment::Jail::expect_with(|_jail| {
            assert!(Config::load().is_err());

            Ok(())
        });
    }
}
