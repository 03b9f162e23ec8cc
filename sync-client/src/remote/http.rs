//! HTTP remote using the JSON sync API.

use super::{RemoteError, RemoteSync};
use async_trait::async_trait;
use recsync_types::{
    Record, RecordId, SynchronizeRequest, SynchronizeResponse, UploadAck, UploadRecord,
    UploadRequest,
};
use reqwest::StatusCode;
use std::time::Duration;

/// Default per-request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for [`HttpRemote`].
#[derive(Debug, Clone)]
pub struct HttpRemoteConfig {
    /// API base URL, e.g. `https://api.example.com/v1`.
    pub base_url: String,
    /// Bearer token sent with every request.
    pub token: Option<String>,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl HttpRemoteConfig {
    /// Create a configuration for the given base URL.
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Set the bearer token.
    pub fn with_token(mut self, token: &str) -> Self {
        self.token = Some(token.to_string());
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Remote sync client over HTTP.
#[derive(Debug, Clone)]
pub struct HttpRemote {
    client: reqwest::Client,
    config: HttpRemoteConfig,
}

impl HttpRemote {
    /// Build a client.
    pub fn new(config: HttpRemoteConfig) -> Result<Self, RemoteError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| RemoteError::Request(e.to_string()))?;
        Ok(Self { client, config })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url, path)
    }

    async fn post<B: serde::Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<reqwest::Response, RemoteError> {
        let mut request = self.client.post(self.endpoint(path)).json(body);
        if let Some(token) = &self.config.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| RemoteError::Request(e.to_string()))?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(RemoteError::Unauthorized),
            status if !status.is_success() => Err(RemoteError::Status(status.as_u16())),
            _ => Ok(response),
        }
    }
}

#[async_trait]
impl RemoteSync for HttpRemote {
    async fn upload(&self, records: &[UploadRecord]) -> Result<(), RemoteError> {
        let body = UploadRequest {
            records: records.to_vec(),
        };
        let ack: UploadAck = self
            .post("records/upload", &body)
            .await?
            .json()
            .await
            .map_err(|e| RemoteError::Decode(e.to_string()))?;

        if ack.ok {
            Ok(())
        } else {
            Err(RemoteError::Rejected)
        }
    }

    async fn synchronize(&self, ids: &[RecordId]) -> Result<Vec<Record>, RemoteError> {
        let body = SynchronizeRequest { ids: ids.to_vec() };
        let bytes = self
            .post("records/synchronize", &body)
            .await?
            .bytes()
            .await
            .map_err(|e| RemoteError::Request(e.to_string()))?;

        let response =
            SynchronizeResponse::from_json(&bytes).map_err(|e| RemoteError::Decode(e.to_string()))?;
        Ok(response.records)
    }
}
