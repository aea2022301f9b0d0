use async_trait::async_trait;
use std::time::Duration;

use crate::error::{FetchError, Result};
use crate::models::MessagePage;

pub const DEFAULT_BASE_URL: &str = "https://november7-730026606190.europe-west1.run.app";

/// Anything that can hand out one page of messages for a cursor position
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch_page(&self, skip: usize, limit: usize) -> Result<MessagePage>;
}

/// `GET {base_url}/messages/?skip=&limit=` over reqwest
pub struct HttpPageSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpPageSource {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl PageSource for HttpPageSource {
    async fn fetch_page(&self, skip: usize, limit: usize) -> Result<MessagePage> {
        let response = self
            .client
            .get(format!("{}/messages/", self.base_url))
            .query(&[("skip", skip), ("limit", limit)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        // Read the body first so a bad payload is classified as malformed,
        // not as a transport failure.
        let body = response.text().await?;
        let page = serde_json::from_str(&body)?;
        Ok(page)
    }
}
