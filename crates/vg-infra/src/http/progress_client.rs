use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use tracing::{debug, info_span, Instrument};
use vg_core::config::ApiConfig;
use vg_core::ports::{ProgressClientError, ProgressRemotePort};
use vg_core::{Identity, ProgressRecord};

use super::dto::{ProgressResponse, RestartProgressRequest, UpdateProgressRequest};

/// reqwest-backed client for the progress service.
///
/// Every call carries the participant's bearer credential. Outcomes are
/// folded into [`ProgressClientError`]; nothing else leaves this adapter.
#[derive(Clone)]
pub struct HttpProgressClient {
    client: Client,
    base_url: Url,
}

impl HttpProgressClient {
    /// # Errors
    ///
    /// Fails when `base_url` is not an absolute http(s) URL or the HTTP client
    /// cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let base_url = Url::parse(base_url)
            .with_context(|| format!("Invalid progress service URL {base_url:?}"))?;
        if base_url.cannot_be_a_base() {
            anyhow::bail!("Progress service URL {base_url} cannot carry a path");
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { client, base_url })
    }

    pub fn from_config(config: &ApiConfig) -> anyhow::Result<Self> {
        Self::new(&config.base_url, Duration::from_millis(config.timeout_ms))
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn send(
        &self,
        identity: &Identity,
        request: RequestBuilder,
    ) -> Result<reqwest::Response, ProgressClientError> {
        if identity.credential().expose().trim().is_empty() {
            return Err(ProgressClientError::Unauthenticated);
        }

        let response = request
            .bearer_auth(identity.credential().expose())
            .send()
            .await
            .map_err(|e| ProgressClientError::Network(e.to_string()))?;

        check_status(response.status())?;
        Ok(response)
    }
}

fn check_status(status: StatusCode) -> Result<(), ProgressClientError> {
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(ProgressClientError::Unauthenticated);
    }
    if !status.is_success() {
        return Err(ProgressClientError::Server {
            status: status.as_u16(),
        });
    }
    Ok(())
}

#[async_trait]
impl ProgressRemotePort for HttpProgressClient {
    async fn fetch(&self, identity: &Identity) -> Result<ProgressRecord, ProgressClientError> {
        let url = self.endpoint(&["progress", identity.participant().as_str()]);
        let span = info_span!("infra.http.progress.fetch", url = %url);

        async {
            let response = self.send(identity, self.client.get(url.clone())).await?;
            let body = response
                .text()
                .await
                .map_err(|e| ProgressClientError::Network(e.to_string()))?;

            let record = serde_json::from_str::<ProgressResponse>(&body)
                .map(ProgressResponse::into_record)
                .map_err(|e| ProgressClientError::MalformedResponse(e.to_string()))?;

            debug!(
                position = record.position,
                completed = record.completed,
                "Fetched progress"
            );
            Ok(record)
        }
        .instrument(span)
        .await
    }

    async fn save(
        &self,
        identity: &Identity,
        record: ProgressRecord,
    ) -> Result<(), ProgressClientError> {
        let url = self.endpoint(&["progress", "update"]);
        let body = UpdateProgressRequest::new(identity.participant().as_str(), record);
        let span = info_span!("infra.http.progress.save", position = record.position);

        async {
            self.send(identity, self.client.post(url).json(&body)).await?;
            Ok(())
        }
        .instrument(span)
        .await
    }

    async fn clear(&self, identity: &Identity) -> Result<(), ProgressClientError> {
        let url = self.endpoint(&["progress", "restart"]);
        let body = RestartProgressRequest {
            email: identity.participant().as_str(),
        };

        async {
            self.send(identity, self.client.post(url).json(&body)).await?;
            Ok(())
        }
        .instrument(info_span!("infra.http.progress.clear"))
        .await
    }
}
