use async_trait::async_trait;
use reqwest::Client;
use screener_core::{ScreenerError, StatementKind, StatementProvider, StatementTable};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

mod parse;
pub use parse::parse_statement;

const BASE_URL: &str = "https://money.finance.sina.com.cn";

/// Sliding-window rate limiter: at most `max_requests` per `window` duration.
#[derive(Clone)]
struct RateLimiter {
    timestamps: Arc<Mutex<VecDeque<Instant>>>,
    max_requests: usize,
    window: Duration,
}

impl RateLimiter {
    fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            timestamps: Arc::new(Mutex::new(VecDeque::new())),
            max_requests,
            window,
        }
    }

    async fn acquire(&self) {
        loop {
            let mut ts = self.timestamps.lock().await;
            let now = Instant::now();

            // Remove timestamps outside the window
            while let Some(&front) = ts.front() {
                if now.duration_since(front) >= self.window {
                    ts.pop_front();
                } else {
                    break;
                }
            }

            if ts.len() < self.max_requests {
                ts.push_back(now);
                return;
            }

            // Wait until the oldest request falls out of the window
            let wait_until = match ts.front().and_then(|f| f.checked_add(self.window)) {
                Some(t) => t,
                None => return,
            };
            let sleep_dur = wait_until.duration_since(now) + Duration::from_millis(50);
            drop(ts);
            tracing::debug!(
                "Rate limiter: waiting {:.1}s for Sina request slot",
                sleep_dur.as_secs_f64()
            );
            tokio::time::sleep(sleep_dur).await;
        }
    }
}

/// Client for Sina Finance statement downloads.
///
/// Fetches the tab-separated statement export (GBK encoded) for an A-share
/// code and parses it into a `StatementTable`.
#[derive(Clone)]
pub struct SinaClient {
    client: Client,
    rate_limiter: RateLimiter,
}

impl SinaClient {
    pub fn new() -> Self {
        // Sina throttles aggressive scrapers; 60 req/min is comfortable for
        // interactive use. Override with SINA_RATE_LIMIT if needed.
        let rate_limit: usize = std::env::var("SINA_RATE_LIMIT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(60);

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7)")
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            rate_limiter: RateLimiter::new(rate_limit, Duration::from_secs(60)),
        }
    }

    fn statement_url(symbol: &str, kind: StatementKind) -> String {
        let report = match kind {
            StatementKind::Income => "ProfitStatement",
            StatementKind::Balance => "BalanceSheet",
            StatementKind::CashFlow => "CashFlow",
        };
        format!(
            "{}/corp/go.php/vDOWN_{}/displaytype/4/stockid/{}/ctrl/all.phtml",
            BASE_URL, report, symbol
        )
    }

    /// Send a request with rate limiting and automatic 429 retry.
    async fn send_request(&self, url: &str) -> Result<reqwest::Response, ScreenerError> {
        for attempt in 0..3u32 {
            self.rate_limiter.acquire().await;
            let response = self
                .client
                .get(url)
                .send()
                .await
                .map_err(|e| ScreenerError::FetchFailed(e.to_string()))?;

            if response.status().as_u16() != 429 {
                return Ok(response);
            }

            let wait_secs = 15u64;
            tracing::warn!(
                "Sina 429 rate limited, waiting {}s before retry {}/3",
                wait_secs,
                attempt + 1
            );
            tokio::time::sleep(Duration::from_secs(wait_secs)).await;
        }

        Err(ScreenerError::FetchFailed(
            "rate limited by Sina after 3 retries".to_string(),
        ))
    }
}

impl Default for SinaClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StatementProvider for SinaClient {
    async fn fetch(
        &self,
        symbol: &str,
        kind: StatementKind,
    ) -> Result<StatementTable, ScreenerError> {
        let url = Self::statement_url(symbol, kind);
        tracing::debug!("Fetching {} for {} from Sina", kind.name(), symbol);

        let response = self.send_request(&url).await?;

        if !response.status().is_success() {
            return Err(ScreenerError::FetchFailed(format!(
                "HTTP {} fetching {} for {}",
                response.status(),
                kind.name(),
                symbol
            )));
        }

        // Sina serves the export as GBK; fall back to that charset when the
        // response headers do not declare one.
        let body = response
            .text_with_charset("GBK")
            .await
            .map_err(|e| ScreenerError::FetchFailed(e.to_string()))?;

        parse_statement(&body)
    }
}
