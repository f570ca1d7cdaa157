use crate::configuration::SearchIndexConfig;
use crate::core::{SearchHit, SearchIndex, SearchResponse};
use crate::error::ServiceError;
use async_trait::async_trait;
use aws_credential_types::provider::{ProvideCredentials, SharedCredentialsProvider};
use aws_sigv4::http_request::{sign, SignableBody, SignableRequest, SigningSettings};
use aws_sigv4::sign::v4;
use aws_smithy_runtime_api::client::identity::Identity;
use reqwest::{Client, Method, StatusCode, Url};
use serde::Deserialize;
use serde_json::Value;
use std::time::SystemTime;

const SIGNING_SERVICE: &str = "es";

/// Signs index requests with SigV4 for the managed search domain.
#[derive(Debug, Clone)]
pub struct RequestSigner {
    credentials_provider: SharedCredentialsProvider,
    region: String,
}

impl RequestSigner {
    pub fn new(credentials_provider: SharedCredentialsProvider, region: String) -> Self {
        Self {
            credentials_provider,
            region,
        }
    }

    /// Signing needs both credentials and a region; without either requests go out unsigned.
    pub fn from_parts(
        credentials_provider: Option<SharedCredentialsProvider>,
        region: Option<String>,
    ) -> Option<Self> {
        match (credentials_provider, region) {
            (Some(provider), Some(region)) => Some(Self::new(provider, region)),
            _ => {
                tracing::warn!("No credentials or region available, search requests are unsigned");
                None
            }
        }
    }

    async fn signed_headers(
        &self,
        method: &Method,
        url: &str,
        body: &[u8],
    ) -> Result<Vec<(String, String)>, ServiceError> {
        let identity: Identity = self
            .credentials_provider
            .provide_credentials()
            .await
            .map_err(|e| signing_error(format!("Cannot load credentials: {}", e)))?
            .into();

        let signing_params = v4::SigningParams::builder()
            .identity(&identity)
            .region(&self.region)
            .name(SIGNING_SERVICE)
            .time(SystemTime::now())
            .settings(SigningSettings::default())
            .build()
            .map_err(|e| signing_error(format!("Cannot build signing parameters: {}", e)))?
            .into();

        let signable_request = SignableRequest::new(
            method.as_str(),
            url,
            [("content-type", "application/json")].into_iter(),
            SignableBody::Bytes(body),
        )
        .map_err(|e| signing_error(format!("Cannot sign request: {}", e)))?;

        let (instructions, _signature) = sign(signable_request, &signing_params)
            .map_err(|e| signing_error(format!("Cannot sign request: {}", e)))?
            .into_parts();

        Ok(instructions
            .headers()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect())
    }
}

fn signing_error(message: String) -> ServiceError {
    ServiceError::downstream("opensearch", message)
}

#[derive(Debug, Deserialize)]
struct SearchBody {
    #[serde(default)]
    hits: HitsEnvelope,
}

#[derive(Debug, Default, Deserialize)]
struct HitsEnvelope {
    #[serde(default)]
    hits: Vec<RawHit>,
}

#[derive(Debug, Deserialize)]
struct RawHit {
    #[serde(rename = "_id")]
    id: String,
    #[serde(rename = "_source", default)]
    source: Value,
}

#[derive(Debug)]
pub struct OpenSearchIndex {
    http_client: Client,
    base_url: String,
    index: String,
    document_type: String,
    signer: Option<RequestSigner>,
}

impl OpenSearchIndex {
    pub fn new(
        http_client: Client,
        config: &SearchIndexConfig,
        signer: Option<RequestSigner>,
    ) -> Self {
        Self {
            http_client,
            base_url: config.base_url(),
            index: config.search_index.clone(),
            document_type: config.search_document_type.clone(),
            signer,
        }
    }

    /// Appends `segments` below the index path, percent-encoding each one.
    fn index_url(&self, segments: &[&str]) -> Result<Url, ServiceError> {
        let mut url = Url::parse(&self.base_url).map_err(|e| {
            ServiceError::downstream(
                "opensearch",
                format!("Invalid endpoint '{}': {}", self.base_url, e),
            )
        })?;
        url.path_segments_mut()
            .map_err(|_| {
                ServiceError::downstream(
                    "opensearch",
                    format!("Endpoint '{}' cannot carry a path", self.base_url),
                )
            })?
            .pop_if_empty()
            .push(&self.index)
            .extend(segments);

        Ok(url)
    }

    fn document_url(&self, id: &str) -> Result<Url, ServiceError> {
        self.index_url(&[&self.document_type, id])
    }

    async fn send(
        &self,
        method: Method,
        url: Url,
        body: Option<&Value>,
    ) -> Result<(StatusCode, String), ServiceError> {
        let payload = match body {
            Some(body) => serde_json::to_vec(body).map_err(|e| {
                ServiceError::InvalidRecord(format!("Cannot serialize document: {}", e))
            })?,
            None => vec![],
        };

        let mut request = self
            .http_client
            .request(method.clone(), url.clone())
            .header("content-type", "application/json");
        if let Some(signer) = &self.signer {
            for (name, value) in signer.signed_headers(&method, url.as_str(), &payload).await? {
                request = request.header(name, value);
            }
        }

        let response = request.body(payload).send().await.map_err(|e| {
            ServiceError::downstream("opensearch", format!("Error calling {} {}: {}", method, url, e))
        })?;
        let status = response.status();
        let text = response.text().await.map_err(|e| {
            ServiceError::downstream_with_status(
                "opensearch",
                status.as_u16(),
                format!("Cannot read response: {}", e),
            )
        })?;

        Ok((status, text))
    }
}

#[async_trait]
impl SearchIndex for OpenSearchIndex {
    async fn search(&self, query: &Value) -> Result<SearchResponse, ServiceError> {
        let url = self.index_url(&["_search"])?;
        let (status, text) = self.send(Method::POST, url, Some(query)).await?;

        if !status.is_success() {
            tracing::warn!("Search index answered {}: {}", status, text);
            return Ok(SearchResponse {
                status_code: status.as_u16(),
                hits: vec![],
            });
        }

        let body: SearchBody = serde_json::from_str(&text).map_err(|e| {
            ServiceError::downstream_with_status(
                "opensearch",
                status.as_u16(),
                format!("Cannot parse search response: {}", e),
            )
        })?;

        Ok(SearchResponse {
            status_code: status.as_u16(),
            hits: body
                .hits
                .hits
                .into_iter()
                .map(|hit| SearchHit {
                    id: hit.id,
                    source: hit.source,
                })
                .collect(),
        })
    }

    async fn upsert_document(&self, id: &str, document: &Value) -> Result<(), ServiceError> {
        let (status, text) = self
            .send(Method::PUT, self.document_url(id)?, Some(document))
            .await?;

        if status.is_success() {
            Ok(())
        } else {
            Err(ServiceError::downstream_with_status(
                "opensearch",
                status.as_u16(),
                format!("Cannot index document {}: {}", id, text),
            ))
        }
    }

    async fn delete_document(&self, id: &str) -> Result<(), ServiceError> {
        let (status, text) = self
            .send(Method::DELETE, self.document_url(id)?, None)
            .await?;

        match status {
            s if s.is_success() => Ok(()),
            StatusCode::NOT_FOUND => {
                tracing::debug!("Document {} was not indexed", id);
                Ok(())
            }
            s => Err(ServiceError::downstream_with_status(
                "opensearch",
                s.as_u16(),
                format!("Cannot delete document {}: {}", id, text),
            )),
        }
    }
}
