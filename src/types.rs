// src/types.rs
use crate::utils::error::TerminalError;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Usage line shown for any malformed `mine` command
pub const MINE_USAGE: &str = "Usage: mine [-r] <number_of_blocks>";

/// A validated request to start mining
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MiningRequest {
    /// Number of blocks per pass (always positive)
    pub block_count: u32,
    /// Keep running passes until cancelled
    pub repeat: bool,
}

impl MiningRequest {
    /// Builds a request from the arguments following `mine`
    ///
    /// Accepts `<n>` or `-r <n>`.
    ///
    /// # Returns
    /// * `Ok(MiningRequest)` - The validated request
    /// * `Err(TerminalError::InvalidRequest)` - Count is missing, non-numeric or zero
    pub fn from_args<S: AsRef<str>>(args: &[S]) -> Result<Self, TerminalError> {
        let invalid = || TerminalError::InvalidRequest(MINE_USAGE.to_string());

        let repeat_at = args.iter().position(|a| a.as_ref() == "-r");
        let count_arg = match repeat_at {
            Some(idx) => args.get(idx + 1),
            None => args.first(),
        };

        let block_count = match count_arg {
            Some(raw) => raw.as_ref().parse::<u32>().map_err(|_| invalid())?,
            None => return Err(invalid()),
        };
        if block_count == 0 {
            return Err(invalid());
        }

        Ok(MiningRequest {
            block_count,
            repeat: repeat_at.is_some(),
        })
    }
}

/// Raw network figures gathered for one block
///
/// Each field is fetched independently; `None` means that source
/// failed, timed out or returned something unusable.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RawMetrics {
    /// Current proof-of-work difficulty
    pub difficulty: Option<f64>,
    /// Network-wide peer count reported by the explorer
    pub network_peers: Option<u64>,
    /// Peers connected to the local daemon
    pub connected_peers: Option<u64>,
    /// Network hashrate in H/s (possibly estimated from difficulty)
    pub hashrate: Option<f64>,
}

/// Indicators derived from [`RawMetrics`]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DerivedMetrics {
    /// Relative mining strength
    pub rms: Option<f64>,
    /// Expected mining contribution
    pub emc: Option<f64>,
}

/// Exchange quote for the configured trading pair, already formatted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketSnapshot {
    /// Quote currency the values are in, e.g. `BTC`
    pub unit: String,
    /// Exchange the quote came from, e.g. `TradeOgre`
    pub exchange: String,
    /// Last traded price
    pub price: String,
    /// Best bid
    pub bid: String,
    /// Best ask
    pub ask: String,
}

impl MarketSnapshot {
    /// Placeholder for any field that could not be fetched
    pub const NOT_AVAILABLE: &'static str = "N/A";

    /// A snapshot with every field marked unavailable
    pub fn unavailable(unit: &str, exchange: &str) -> Self {
        MarketSnapshot {
            unit: unit.to_string(),
            exchange: exchange.to_string(),
            price: Self::NOT_AVAILABLE.to_string(),
            bid: Self::NOT_AVAILABLE.to_string(),
            ask: Self::NOT_AVAILABLE.to_string(),
        }
    }
}

/// How much is fetched and printed per mined block
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportMode {
    /// Mining, network, supply and market figures
    #[default]
    Full,
    /// Mining and network figures only
    Basic,
}

impl fmt::Display for ReportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportMode::Full => write!(f, "full"),
            ReportMode::Basic => write!(f, "basic"),
        }
    }
}
