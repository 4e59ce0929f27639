use std::time::Duration;

use dashboard_core::{SkuQuery, SkuRecord, StatsMap, Workflow};
use dashboard_logging::{dash_debug, dash_info, dash_warn};
use futures_util::StreamExt;
use serde_json::Value;
use url::Url;

use crate::{ClientError, FailureKind};

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_bytes: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            max_bytes: 16 * 1024 * 1024,
        }
    }
}

/// Remote endpoints. A request against one that is unset fails with
/// `FailureKind::MissingEndpoint`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Endpoints {
    pub sku_url: Option<String>,
    pub stats_url: Option<String>,
    pub workflows_url: Option<String>,
}

impl Endpoints {
    pub fn new(sku_url: impl Into<String>) -> Self {
        Self {
            sku_url: Some(sku_url.into()),
            stats_url: None,
            workflows_url: None,
        }
    }
}

#[async_trait::async_trait]
pub trait DataSource: Send + Sync {
    async fn fetch_skus(&self, query: &SkuQuery) -> Result<Vec<SkuRecord>, ClientError>;
    async fn fetch_stats(&self) -> Result<StatsMap, ClientError>;
    async fn fetch_workflows(&self) -> Result<Vec<Workflow>, ClientError>;
}

/// Shape of a SKU list body, decided once per response.
#[derive(Debug, Clone, PartialEq)]
pub enum ListResponse {
    /// `[{ "data": [...] }]`: the records sit under the first element.
    Wrapped(Value),
    Direct(Value),
}

impl ListResponse {
    pub fn classify(body: Value) -> Self {
        let wrapped = matches!(
            body.as_array().and_then(|items| items.first()),
            Some(Value::Object(first)) if first.get("data").is_some_and(|data| !data.is_null())
        );
        if !wrapped {
            return ListResponse::Direct(body);
        }
        match body {
            Value::Array(mut items) => match items.swap_remove(0) {
                Value::Object(mut first) => {
                    ListResponse::Wrapped(first.remove("data").unwrap_or(Value::Null))
                }
                other => ListResponse::Direct(other),
            },
            other => ListResponse::Direct(other),
        }
    }

    pub fn is_wrapped(&self) -> bool {
        matches!(self, ListResponse::Wrapped(_))
    }

    pub fn into_records(self) -> Result<Vec<SkuRecord>, ClientError> {
        let (ListResponse::Wrapped(value) | ListResponse::Direct(value)) = self;
        serde_json::from_value(value)
            .map_err(|err| ClientError::new(FailureKind::Decode, err.to_string()))
    }
}

/// Appends `status` then `sku`, each only when set.
pub fn sku_list_url(base: &str, query: &SkuQuery) -> Result<Url, ClientError> {
    let mut url =
        Url::parse(base).map_err(|err| ClientError::new(FailureKind::InvalidUrl, err.to_string()))?;
    if query.status.is_some() || query.sku.is_some() {
        let mut pairs = url.query_pairs_mut();
        if let Some(status) = query.status {
            pairs.append_pair("status", status.as_str());
        }
        if let Some(sku) = query.sku.as_deref() {
            pairs.append_pair("sku", sku);
        }
    }
    Ok(url)
}

#[derive(Debug, Clone)]
pub struct ReqwestDataSource {
    endpoints: Endpoints,
    client: reqwest::Client,
    max_bytes: u64,
}

impl ReqwestDataSource {
    pub fn new(endpoints: Endpoints, settings: &ClientSettings) -> Result<Self, ClientError> {
        Ok(Self {
            endpoints,
            client: build_client(settings)?,
            max_bytes: settings.max_bytes,
        })
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    async fn get_json(&self, url: Url) -> Result<Value, ClientError> {
        dash_info!("GET {url}");
        let bytes = get_bytes(&self.client, url.clone(), self.max_bytes)
            .await
            .inspect_err(|err| dash_warn!("GET {url} failed: {err}"))?;
        serde_json::from_slice(&bytes).map_err(|err| {
            dash_warn!("GET {url} returned malformed JSON: {err}");
            ClientError::new(FailureKind::Decode, err.to_string())
        })
    }
}

fn configured<'a>(url: Option<&'a str>, name: &str) -> Result<&'a str, ClientError> {
    url.ok_or_else(|| {
        ClientError::new(FailureKind::MissingEndpoint, format!("no {name} url configured"))
    })
}

fn optional_endpoint(url: Option<&str>, name: &str) -> Result<Url, ClientError> {
    Url::parse(configured(url, name)?).map_err(|err| ClientError::new(FailureKind::InvalidUrl, err.to_string()))
}

#[async_trait::async_trait]
impl DataSource for ReqwestDataSource {
    async fn fetch_skus(&self, query: &SkuQuery) -> Result<Vec<SkuRecord>, ClientError> {
        let base = configured(self.endpoints.sku_url.as_deref(), "SKU")?;
        let url = sku_list_url(base, query)?;
        let body = self.get_json(url).await?;
        let response = ListResponse::classify(body);
        dash_debug!(
            "SKU list body is {}",
            if response.is_wrapped() { "wrapped" } else { "direct" }
        );
        response.into_records()
    }

    async fn fetch_stats(&self) -> Result<StatsMap, ClientError> {
        let url = optional_endpoint(self.endpoints.stats_url.as_deref(), "stats")?;
        let body = self.get_json(url).await?;
        serde_json::from_value(body)
            .map_err(|err| ClientError::new(FailureKind::Decode, err.to_string()))
    }

    async fn fetch_workflows(&self) -> Result<Vec<Workflow>, ClientError> {
        let url = optional_endpoint(self.endpoints.workflows_url.as_deref(), "workflows")?;
        let body = self.get_json(url).await?;
        serde_json::from_value(body)
            .map_err(|err| ClientError::new(FailureKind::Decode, err.to_string()))
    }
}

pub(crate) fn build_client(settings: &ClientSettings) -> Result<reqwest::Client, ClientError> {
    reqwest::Client::builder()
        .connect_timeout(settings.connect_timeout)
        .timeout(settings.request_timeout)
        .build()
        .map_err(|err| ClientError::new(FailureKind::Network, err.to_string()))
}

/// GETs `url` and collects the body, failing once it exceeds `max_bytes`.
pub(crate) async fn get_bytes(
    client: &reqwest::Client,
    url: Url,
    max_bytes: u64,
) -> Result<Vec<u8>, ClientError> {
    let response = client.get(url).send().await.map_err(map_reqwest_error)?;

    let status = response.status();
    if !status.is_success() {
        return Err(ClientError::new(
            FailureKind::HttpStatus(status.as_u16()),
            status.canonical_reason().unwrap_or("unexpected status"),
        ));
    }

    if let Some(content_len) = response.content_length() {
        if content_len > max_bytes {
            return Err(ClientError::new(
                FailureKind::TooLarge {
                    max_bytes,
                    actual: Some(content_len),
                },
                "response too large",
            ));
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk: bytes::Bytes = chunk.map_err(map_reqwest_error)?;
        let next_len = bytes.len() as u64 + chunk.len() as u64;
        if next_len > max_bytes {
            return Err(ClientError::new(
                FailureKind::TooLarge {
                    max_bytes,
                    actual: Some(next_len),
                },
                "response too large",
            ));
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(bytes)
}

fn map_reqwest_error(err: reqwest::Error) -> ClientError {
    if err.is_timeout() {
        return ClientError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_decode() {
        return ClientError::new(FailureKind::Decode, err.to_string());
    }
    ClientError::new(FailureKind::Network, err.to_string())
}
