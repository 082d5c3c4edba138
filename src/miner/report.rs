// src/miner/report.rs
//! Report lines and the channel they travel on
//!
//! The mining worker never prints; it sends tagged [`Report`]s through a
//! [`ReportSink`] and whatever front-end owns the receiver renders them.

use crate::stats::StatsAggregator;
use crate::stats::aggregator::UNAVAILABLE;
use crate::types::{DerivedMetrics, MarketSnapshot, RawMetrics};
use crate::utils::format::with_thousands;
use crossbeam_channel::{Receiver, Sender};
use std::fmt;

/// Tag attached to every report line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    /// Plain output
    Output,
    /// Something started or completed
    Success,
    /// Non-fatal condition the user should notice
    Warning,
    /// A failure
    Error,
}

/// One tagged message for the front-end
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    /// Message category
    pub kind: ReportKind,
    /// Text without trailing newline (may span several lines)
    pub text: String,
}

impl Report {
    /// Plain output line
    pub fn output(text: impl Into<String>) -> Self {
        Report {
            kind: ReportKind::Output,
            text: text.into(),
        }
    }

    /// Success line
    pub fn success(text: impl Into<String>) -> Self {
        Report {
            kind: ReportKind::Success,
            text: text.into(),
        }
    }

    /// Warning line
    pub fn warning(text: impl Into<String>) -> Self {
        Report {
            kind: ReportKind::Warning,
            text: text.into(),
        }
    }

    /// Error line
    pub fn error(text: impl Into<String>) -> Self {
        Report {
            kind: ReportKind::Error,
            text: text.into(),
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ReportKind::Output | ReportKind::Success => write!(f, "{}", self.text),
            ReportKind::Warning => write!(f, "warning: {}", self.text),
            ReportKind::Error => write!(f, "error: {}", self.text),
        }
    }
}

/// Sending half of the report channel
#[derive(Debug, Clone)]
pub struct ReportSink {
    tx: Sender<Report>,
}

impl ReportSink {
    /// Creates an unbounded report channel
    pub fn channel() -> (ReportSink, Receiver<Report>) {
        let (tx, rx) = crossbeam_channel::unbounded();
        (ReportSink { tx }, rx)
    }

    /// Sends a report; a vanished receiver only gets logged
    pub fn emit(&self, report: Report) {
        if let Err(e) = self.tx.send(report) {
            log::debug!("Report dropped, receiver gone: {:?}", e.into_inner());
        }
    }
}

const RULE: &str = "────────────────────────────────────────";

/// Everything printed for one mined block
///
/// `money_supply` and `market` are `None` in basic report mode.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockReport {
    /// Position of the block within the current pass, starting at 1
    pub block: u32,
    /// Raw network figures
    pub raw: RawMetrics,
    /// RMS/EMC computed from `raw`
    pub derived: DerivedMetrics,
    /// Formatted money supply
    pub money_supply: Option<String>,
    /// Exchange quote
    pub market: Option<MarketSnapshot>,
}

fn or_unavailable<T>(value: Option<T>, render: impl FnOnce(T) -> String) -> String {
    value.map(render).unwrap_or_else(|| UNAVAILABLE.to_string())
}

impl fmt::Display for BlockReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Mined Block {}", self.block)?;
        writeln!(f, "├─ RMS: {}", StatsAggregator::display_rms(&self.derived))?;
        writeln!(f, "├─ EMC: {}", StatsAggregator::display_emc(&self.derived))?;
        writeln!(
            f,
            "├─ Connected Peers: {}",
            or_unavailable(self.raw.connected_peers, |p| p.to_string())
        )?;
        writeln!(f, "├{}", RULE)?;
        writeln!(
            f,
            "├─ Network Difficulty: {}",
            or_unavailable(self.raw.difficulty, |d| format!("{:.6}", d))
        )?;
        writeln!(
            f,
            "├─ Network Peers: {}",
            or_unavailable(self.raw.network_peers, |p| p.to_string())
        )?;
        write!(
            f,
            "├─ Network Hashrate: {}",
            or_unavailable(self.raw.hashrate, |h| format!(
                "{} KH/s",
                with_thousands(h / 1000.0, 2)
            ))
        )?;

        if let Some(supply) = &self.money_supply {
            write!(f, "\n├─ Network Money Supply: {}", supply)?;
        }
        if let Some(market) = &self.market {
            write!(f, "\n├{}", RULE)?;
            let (unit, exchange) = (&market.unit, &market.exchange);
            write!(f, "\n├─ {} Price ({}): {}", unit, exchange, market.price)?;
            write!(f, "\n├─ {} Sell ({}): {}", unit, exchange, market.bid)?;
            write!(f, "\n├─ {} Buy ({}): {}", unit, exchange, market.ask)?;
        }
        write!(f, "\n└{}", RULE)
    }
}
