use crate::error::ServiceError;
use async_trait::async_trait;
use reqwest::Client;
use scraper::{selector::Selector, Html};
use serde::Serialize;
use std::fmt::Debug;

#[cfg(any(test, feature = "mocks"))]
use mockall::automock;

pub const DEFAULT_DESCRIPTION_BASE_URL: &str = "https://www.amazon.com/dp/";

const FEATURE_BULLETS_SELECTOR: &str = "#feature-bullets li .a-list-item";

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ItemDescription {
    #[serde(rename = "ASIN")]
    pub asin: String,
    #[serde(rename = "Items")]
    pub items: Vec<String>,
}

#[cfg_attr(any(test, feature = "mocks"), automock)]
#[async_trait]
pub trait DescriptionSource: Debug {
    async fn fetch_description(&self, asin: &str) -> Result<ItemDescription, ServiceError>;
}

/// Reads the feature bullets from a product detail page.
#[derive(Debug)]
pub struct HttpDescriptionSource {
    http_client: Client,
    base_url: String,
}

impl HttpDescriptionSource {
    pub fn new(http_client: Client, base_url: String) -> Self {
        Self {
            http_client,
            base_url,
        }
    }
}

#[async_trait]
impl DescriptionSource for HttpDescriptionSource {
    async fn fetch_description(&self, asin: &str) -> Result<ItemDescription, ServiceError> {
        let url = format!("{}{}", self.base_url, asin);
        let html_body = self
            .http_client
            .get(&url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| {
                ServiceError::downstream_with_status(
                    "item-page",
                    e.status().map(|s| s.as_u16()).unwrap_or(500),
                    format!("Cannot scrape '{}': {}", url, e),
                )
            })?
            .text()
            .await
            .map_err(|e| {
                ServiceError::downstream("item-page", format!("Cannot read '{}': {}", url, e))
            })?;

        Ok(ItemDescription {
            asin: asin.to_string(),
            items: feature_bullets(&html_body),
        })
    }
}

pub fn feature_bullets(html_body: &str) -> Vec<String> {
    let document = Html::parse_document(html_body);
    let Ok(selector) = Selector::parse(FEATURE_BULLETS_SELECTOR) else {
        return vec![];
    };

    document
        .select(&selector)
        .map(|element| {
            element
                .text()
                .flat_map(str::split_whitespace)
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect()
}
