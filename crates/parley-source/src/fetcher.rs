use std::sync::Arc;
use std::time::Duration;

use crate::error::Result;
use crate::models::{MemberMessage, MessagePage};
use crate::source::PageSource;

/// Knobs for one pagination run
#[derive(Debug, Clone, PartialEq)]
pub struct FetchPolicy {
    pub page_size: usize,
    /// Attempts per page, the first one included
    pub max_retries: u32,
    /// Back-to-back page failures that end the run early
    pub max_consecutive_failures: u32,
    /// Delay before retry `n` is `retry_backoff * n`
    pub retry_backoff: Duration,
}

impl Default for FetchPolicy {
    fn default() -> Self {
        Self {
            page_size: 100,
            max_retries: 3,
            max_consecutive_failures: 5,
            retry_backoff: Duration::from_millis(500),
        }
    }
}

impl FetchPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries.max(1);
        self
    }

    pub fn max_consecutive_failures(mut self, max: u32) -> Self {
        self.max_consecutive_failures = max.max(1);
        self
    }

    pub fn retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff = backoff;
        self
    }
}

/// What a pagination run produced, including the pages it had to give up on
#[derive(Debug, Clone, Default)]
pub struct FetchSummary {
    pub messages: Vec<MemberMessage>,
    pub pages_fetched: usize,
    /// `skip` offsets whose data was dropped after failing
    pub skipped_offsets: Vec<usize>,
    /// True when the consecutive-failure ceiling stopped the run
    pub aborted: bool,
}

/// Walks the remote collection page by page.
///
/// Never fails: transient errors are retried per page, pages that keep failing
/// are skipped, and whatever was collected is returned.
pub struct Fetcher {
    source: Arc<dyn PageSource>,
    policy: FetchPolicy,
}

impl Fetcher {
    pub fn new(source: Arc<dyn PageSource>) -> Self {
        Self {
            source,
            policy: FetchPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: FetchPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub async fn fetch_all(&self) -> Vec<MemberMessage> {
        self.fetch_all_with_summary().await.messages
    }

    pub async fn fetch_all_with_summary(&self) -> FetchSummary {
        let limit = self.policy.page_size;
        let mut summary = FetchSummary::default();
        let mut skip = 0usize;
        let mut consecutive_failures = 0u32;
        let mut last_total: Option<usize> = None;

        loop {
            match self.fetch_page_with_retry(skip, limit).await {
                Ok(page) => {
                    if page.items.is_empty() {
                        tracing::debug!("No messages at skip={}, pagination complete", skip);
                        break;
                    }

                    if let Some(previous) = last_total.filter(|previous| *previous != page.total) {
                        tracing::warn!(
                            "Message API total changed from {} to {} at skip={}",
                            previous,
                            page.total,
                            skip
                        );
                    }
                    last_total = Some(page.total);

                    summary.messages.extend(page.items);
                    summary.pages_fetched += 1;
                    consecutive_failures = 0;

                    tracing::debug!(
                        "Fetched page at skip={} ({}/{} messages)",
                        skip,
                        summary.messages.len(),
                        page.total
                    );

                    if summary.messages.len() >= page.total {
                        break;
                    }
                }
                Err(_) => {
                    consecutive_failures += 1;
                    summary.skipped_offsets.push(skip);

                    if consecutive_failures >= self.policy.max_consecutive_failures {
                        tracing::warn!(
                            "Stopping pagination after {} consecutive failures. Fetched {} messages.",
                            consecutive_failures,
                            summary.messages.len()
                        );
                        summary.aborted = true;
                        break;
                    }
                }
            }

            skip += limit;
        }

        tracing::info!(
            "Fetched {} messages ({} pages, {} skipped)",
            summary.messages.len(),
            summary.pages_fetched,
            summary.skipped_offsets.len()
        );

        summary
    }

    /// Fetch one page, retrying transient failures with a linear backoff
    async fn fetch_page_with_retry(&self, skip: usize, limit: usize) -> Result<MessagePage> {
        let max_retries = self.policy.max_retries;
        let mut attempt = 1u32;

        loop {
            match self.source.fetch_page(skip, limit).await {
                Ok(page) => return Ok(page),
                Err(err) if !err.is_transient() => {
                    tracing::warn!("Unexpected error at skip={}: {}", skip, err);
                    return Err(err);
                }
                Err(err) if attempt < max_retries => {
                    tracing::warn!(
                        "Retrying... Error at skip={} (attempt {}/{}): {}",
                        skip,
                        attempt,
                        max_retries,
                        err
                    );
                    tokio::time::sleep(self.policy.retry_backoff * attempt).await;
                    attempt += 1;
                }
                Err(err) => {
                    tracing::warn!(
                        "Skipping batch at skip={} after {} attempts: {}",
                        skip,
                        max_retries,
                        err
                    );
                    return Err(err);
                }
            }
        }
    }
}
