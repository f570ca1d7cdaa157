use figment::providers::Env;
use figment::Figment;
use serde::{Deserialize, Serialize};

/// Settings the web client needs to publish its click stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Config {
    pub identity_pool_id: String,
    pub kinesis_stream_name: String,
}

impl Config {
    pub fn load() -> Result<Self, figment::Error> {
        Figment::new()
            .merge(Env::raw().only(&["IDENTITY_POOL_ID", "KINESIS_STREAM_NAME"]))
            .extract()
    }
}
