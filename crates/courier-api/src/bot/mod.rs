//! Telegram Bot API client.
//!
//! Every call goes through [`HttpTransport`] and the envelope decoder.
//! Docs: <https://core.telegram.org/bots/api>

mod methods;
mod params;


pub use params::*;

use crate::envelope;
use crate::transport::{FilePart, HttpTransport};
use async_trait::async_trait;
use courier_core::{
    config::BotConfig,
    error::CourierError,
    traits::{FetchRequest, UpdateSource},
    types::Update,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::time::Duration;
use tracing::debug;

/// Telegram bot bound to one token and API server.
pub struct Bot {
    token: String,
    api_server: String,
    transport: HttpTransport,
}

impl Bot {
    /// Create a bot with a fresh HTTP client.
    pub fn new(config: BotConfig) -> Self {
        Self::with_client(config, reqwest::Client::new())
    }

    /// Create a bot sharing an existing HTTP client.
    pub fn with_client(config: BotConfig, client: reqwest::Client) -> Self {
        let timeout = Duration::from_secs(config.request_timeout_secs);
        Self {
            token: config.token,
            api_server: config.api_server.trim_end_matches('/').to_string(),
            transport: HttpTransport::new(client, timeout),
        }
    }

    /// URL of an API method.
    pub fn build_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_server, self.token, method)
    }

    /// Absolute download URL for a `file_path` returned by `getFile`.
    pub fn download_file_url(&self, file_path: &str) -> String {
        format!("{}/file/bot{}/{}", self.api_server, self.token, file_path)
    }

    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        method: &str,
        query: &[(&str, String)],
        timeout: Option<Duration>,
    ) -> Result<T, CourierError> {
        debug!(method, "GET");
        let body = self
            .transport
            .get(&self.build_url(method), query, timeout)
            .await?;
        envelope::decode(&body)
    }

    pub(crate) async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: &str,
        body: Option<&B>,
    ) -> Result<T, CourierError> {
        let body = self.post_raw(method, body).await?;
        envelope::decode(&body)
    }

    /// POST and check the envelope without decoding `result`.
    pub(crate) async fn post_ok<B: Serialize + ?Sized>(
        &self,
        method: &str,
        body: Option<&B>,
    ) -> Result<(), CourierError> {
        let body = self.post_raw(method, body).await?;
        envelope::decode_ok(&body)
    }

    pub(crate) async fn post_raw<B: Serialize + ?Sized>(
        &self,
        method: &str,
        body: Option<&B>,
    ) -> Result<Vec<u8>, CourierError> {
        debug!(method, "POST");
        self.transport
            .post_json(&self.build_url(method), body)
            .await
    }

    pub(crate) async fn post_multipart_ok(
        &self,
        method: &str,
        fields: Vec<(String, String)>,
        file: Option<FilePart>,
    ) -> Result<(), CourierError> {
        debug!(method, "POST multipart");
        let body = self
            .transport
            .post_multipart(&self.build_url(method), fields, file)
            .await?;
        envelope::decode_ok(&body)
    }
}

impl fmt::Debug for Bot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bot")
            .field("token", &"<redacted>")
            .field("api_server", &self.api_server)
            .finish()
    }
}

#[async_trait]
impl UpdateSource for Bot {
    async fn fetch_updates(&self, request: &FetchRequest) -> Result<Vec<Update>, CourierError> {
        self.get_updates(request).await
    }
}
