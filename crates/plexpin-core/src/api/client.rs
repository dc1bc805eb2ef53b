//! HTTP transport for the plex.tv PIN endpoints.
//!
//! The client only moves bytes: it returns the status and body of each
//! response and leaves their interpretation to the authenticator.

use reqwest::header::HeaderMap;
use reqwest::{Client, StatusCode};
use tracing::debug;

use crate::config::Config;
use crate::models::PinId;

use super::error::Result;

/// Status and body of a PIN endpoint response.
#[derive(Debug, Clone)]
pub struct PinResponse {
    pub status: StatusCode,
    pub body: String,
}

/// Transport for plex.tv.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Debug, Clone)]
pub struct PinClient {
    client: Client,
    config: Config,
}

impl PinClient {
    pub fn new(config: Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// `POST /pins.xml`
    pub async fn post_pin(&self, headers: HeaderMap) -> Result<PinResponse> {
        let url = self.config.pins_url();
        debug!(url = %url, "Requesting new PIN");

        let response = self.client.post(&url).headers(headers).send().await?;
        Self::read(response).await
    }

    /// `GET /pins/<id>.xml`
    pub async fn get_pin(&self, id: &PinId, headers: HeaderMap) -> Result<PinResponse> {
        let url = self.config.pin_url(id.as_str());
        debug!(url = %url, "Checking PIN");

        let response = self.client.get(&url).headers(headers).send().await?;
        Self::read(response).await
    }

    async fn read(response: reqwest::Response) -> Result<PinResponse> {
        let status = response.status();
        let body = response.text().await?;
        debug!(status = status.as_u16(), bytes = body.len(), "PIN response received");
        Ok(PinResponse { status, body })
    }
}
