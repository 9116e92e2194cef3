// Upstream client implementation

use reqwest::{header, Client, Response};
use serde_json::Value;
use tokio::time::Duration;

pub struct UpstreamClient {
    http_client: Client,
    url: String,
}

impl UpstreamClient {
    pub fn new(url: impl Into<String>) -> Self {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(600))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http_client,
            url: url.into(),
        }
    }

    /// POST a chat-completion payload upstream.
    ///
    /// Exactly one attempt per call, no retry. The raw response is returned
    /// even for non-2xx statuses; the caller owns status handling.
    pub async fn chat_completions(
        &self,
        api_key: &str,
        body: &Value,
    ) -> Result<Response, reqwest::Error> {
        self.http_client
            .post(&self.url)
            .header(header::CONTENT_TYPE, "application/json")
            .bearer_auth(api_key)
            .json(body)
            .send()
            .await
    }
}
