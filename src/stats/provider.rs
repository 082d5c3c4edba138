// src/stats/provider.rs
use crate::config::Config;
use crate::daemon::DaemonRpc;
use crate::types::{MarketSnapshot, RawMetrics};
use crate::utils::error::TerminalError;
use crate::utils::format::with_thousands;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// Target block interval of the chain, in seconds
pub const BLOCK_INTERVAL_SECS: f64 = 60.0;

/// Correction applied to the difficulty-based hashrate estimate
pub const INVERSION_FACTOR: f64 = 2.5;

/// Estimates network hashrate (H/s) implied by a difficulty
///
/// `difficulty * 2^32 / (BLOCK_INTERVAL_SECS * INVERSION_FACTOR)`
pub fn estimate_hashrate(difficulty: f64) -> f64 {
    difficulty * 2f64.powi(32) / (BLOCK_INTERVAL_SECS * INVERSION_FACTOR)
}

/// Fetches individual network and market figures
///
/// Every fetch is fault tolerant on its own: failures, timeouts and
/// unparseable answers are logged and turned into `None` (numbers) or
/// `"N/A"` (preformatted strings). Nothing here returns an error.
#[derive(Clone)]
pub struct StatsProvider {
    /// Daemon used for difficulty, hashrate and local peer queries
    daemon: Arc<dyn DaemonRpc>,
    /// HTTP client with the per-request timeout baked in
    http: Client,
    /// Bound on each daemon query
    daemon_timeout: Duration,
    connection_count_url: String,
    money_supply_url: String,
    ticker_url: String,
    quote_unit: String,
    exchange: String,
}

impl StatsProvider {
    /// Creates a provider from the terminal configuration
    ///
    /// # Returns
    /// * `Err(TerminalError::HttpError)` - If the HTTP client can't be built
    pub fn new(config: &Config, daemon: Arc<dyn DaemonRpc>) -> Result<Self, TerminalError> {
        let mut builder = Client::builder().timeout(config.http_timeout());
        if !config.use_system_proxy {
            builder = builder.no_proxy();
        }
        let http = builder.build()?;

        Ok(StatsProvider {
            daemon,
            http,
            daemon_timeout: config.daemon_timeout(),
            connection_count_url: config.explorer.connection_count_url.clone(),
            money_supply_url: config.explorer.money_supply_url.clone(),
            ticker_url: config.market.pair_url(),
            quote_unit: config.market.quote_unit.clone(),
            exchange: config.market.exchange.clone(),
        })
    }

    /// Gathers difficulty, peer counts and hashrate for one block
    ///
    /// The three independent sources are queried concurrently; the
    /// hashrate query waits only for difficulty since it may need it
    /// for the fallback estimate.
    pub async fn fetch_all(&self) -> RawMetrics {
        let difficulty_and_hashrate = async {
            let difficulty = self.difficulty().await;
            let hashrate = self.network_hashrate(difficulty).await;
            (difficulty, hashrate)
        };

        let ((difficulty, hashrate), network_peers, connected_peers) = tokio::join!(
            difficulty_and_hashrate,
            self.network_peer_count(),
            self.connected_peer_count()
        );

        RawMetrics {
            difficulty,
            network_peers,
            connected_peers,
            hashrate,
        }
    }

    /// Fetches price, bid and ask with a single ticker request
    pub async fn fetch_market(&self) -> MarketSnapshot {
        match self.ticker().await {
            Some(body) => MarketSnapshot {
                unit: self.quote_unit.clone(),
                exchange: self.exchange.clone(),
                price: self.quote(&body, "price"),
                bid: self.quote(&body, "bid"),
                ask: self.quote(&body, "ask"),
            },
            None => MarketSnapshot::unavailable(&self.quote_unit, &self.exchange),
        }
    }

    /// Current network difficulty from the daemon
    pub async fn difficulty(&self) -> Option<f64> {
        let out = self.query(&["getdifficulty"]).await?;
        parse_finite(&out).or_else(|| {
            log::debug!("getdifficulty returned unparseable output: {:?}", out.trim());
            None
        })
    }

    /// Network hashrate from the daemon, with an estimate as fallback
    ///
    /// # Arguments
    /// * `difficulty` - Current difficulty, if known, used when the daemon
    ///   fails or reports a non-positive hashrate
    pub async fn network_hashrate(&self, difficulty: Option<f64>) -> Option<f64> {
        let reported = self
            .query(&["getnetworkhashps"])
            .await
            .and_then(|out| parse_finite(&out));

        match reported {
            Some(rate) if rate > 0.0 => Some(rate),
            _ => {
                log::debug!(
                    "Daemon hashrate unusable ({:?}), estimating from difficulty",
                    reported
                );
                difficulty.map(estimate_hashrate)
            }
        }
    }

    /// Network-wide peer count from the block explorer
    pub async fn network_peer_count(&self) -> Option<u64> {
        let body = self.get_text(&self.connection_count_url).await?;
        body.trim().parse().ok().or_else(|| {
            log::debug!("Explorer peer count unparseable: {:?}", body.trim());
            None
        })
    }

    /// Number of peers connected to the local daemon
    pub async fn connected_peer_count(&self) -> Option<u64> {
        let out = self.query(&["getpeerinfo"]).await?;
        match serde_json::from_str::<Vec<Value>>(&out) {
            Ok(peers) => Some(peers.len() as u64),
            Err(e) => {
                log::debug!("getpeerinfo output is not a JSON array: {}", e);
                None
            }
        }
    }

    /// Money supply formatted with thousands separators, or `"N/A"`
    pub async fn money_supply(&self) -> String {
        self.get_text(&self.money_supply_url)
            .await
            .and_then(|body| parse_finite(&body))
            .map(|supply| with_thousands(supply, 0))
            .unwrap_or_else(|| MarketSnapshot::NOT_AVAILABLE.to_string())
    }

    /// One ticker field formatted to 8 decimals with the quote unit,
    /// or `"N/A"` if the request or the field is unusable
    pub async fn market_ticker(&self, field: &str) -> String {
        match self.ticker().await {
            Some(body) => self.quote(&body, field),
            None => MarketSnapshot::NOT_AVAILABLE.to_string(),
        }
    }

    fn quote(&self, body: &Value, field: &str) -> String {
        match ticker_field(body, field) {
            Some(value) => format!("{:.8} {}", value, self.quote_unit),
            None => MarketSnapshot::NOT_AVAILABLE.to_string(),
        }
    }

    async fn ticker(&self) -> Option<Value> {
        let body = self.get_text(&self.ticker_url).await?;
        match serde_json::from_str(&body) {
            Ok(value) => Some(value),
            Err(e) => {
                log::debug!("Ticker response is not JSON: {}", e);
                None
            }
        }
    }

    /// Runs a daemon stats query bounded by the daemon timeout
    async fn query(&self, args: &[&str]) -> Option<String> {
        let result = tokio::time::timeout(self.daemon_timeout, self.daemon.call(args))
            .await
            .unwrap_or_else(|_| Err(TerminalError::Timeout(self.daemon_timeout)));

        match result {
            Ok(out) => Some(out),
            Err(e) => {
                log::debug!("Daemon query {:?} failed: {}", args, e);
                None
            }
        }
    }

    /// GETs a URL and returns the body of a 200 response
    async fn get_text(&self, url: &str) -> Option<String> {
        match self.try_get_text(url).await {
            Ok(body) => Some(body),
            Err(e) => {
                log::debug!("GET {} failed: {}", url, e);
                None
            }
        }
    }

    async fn try_get_text(&self, url: &str) -> Result<String, TerminalError> {
        let response = self.http.get(url).send().await?;
        if response.status() != StatusCode::OK {
            return Err(TerminalError::UnexpectedStatus(response.status()));
        }
        Ok(response.text().await?)
    }
}

fn parse_finite(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Reads a numeric ticker field that may be encoded as a JSON number
/// or as a decimal string
fn ticker_field(body: &Value, field: &str) -> Option<f64> {
    match body.get(field)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_finite(s),
        _ => None,
    }
}
