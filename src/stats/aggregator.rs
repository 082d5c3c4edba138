// src/stats/aggregator.rs
//! Derivation of the RMS/EMC indicators
//!
//! Pure functions over [`RawMetrics`]; a missing input or a zero
//! denominator makes the affected indicator unavailable instead of
//! producing an error.

use crate::types::{DerivedMetrics, RawMetrics};
use crate::utils::format::banded;

/// Text used for any indicator that could not be computed
pub const UNAVAILABLE: &str = "unavailable";

/// Combines raw metrics into derived indicators
pub struct StatsAggregator;

impl StatsAggregator {
    /// Computes RMS and EMC
    ///
    /// Both require a known positive difficulty and a known positive
    /// network peer count. RMS then divides by the *connected* peer count
    /// (so it is also unavailable when that is unknown or zero); EMC
    /// additionally requires a known hashrate and divides by the
    /// *network* peer count.
    pub fn derive(raw: &RawMetrics) -> DerivedMetrics {
        let (difficulty, network_peers) = match (raw.difficulty, raw.network_peers) {
            (Some(d), Some(n)) if d > 0.0 && n > 0 => (d, n as f64),
            _ => return DerivedMetrics::default(),
        };

        let rms = match raw.connected_peers {
            Some(c) if c > 0 => 1.0 / (difficulty * c as f64),
            _ => return DerivedMetrics::default(),
        };

        DerivedMetrics {
            rms: Some(rms),
            emc: raw
                .hashrate
                .map(|hashrate| hashrate / (difficulty * network_peers)),
        }
    }

    /// `sqrt(EMC / RMS)`, defined only when RMS is positive and EMC known
    pub fn emc_ratio(derived: &DerivedMetrics) -> Option<f64> {
        match (derived.rms, derived.emc) {
            (Some(rms), Some(emc)) if rms > 0.0 => Some((emc / rms).sqrt()),
            _ => None,
        }
    }

    /// RMS with four decimals
    pub fn display_rms(derived: &DerivedMetrics) -> String {
        match derived.rms {
            Some(rms) => format!("{:.4}", rms),
            None => UNAVAILABLE.to_string(),
        }
    }

    /// EMC shown as the banded `sqrt(EMC / RMS)` ratio
    ///
    /// Without a positive RMS the ratio is shown as `0.0000`.
    pub fn display_emc(derived: &DerivedMetrics) -> String {
        match derived.rms {
            Some(rms) if rms > 0.0 => match Self::emc_ratio(derived) {
                Some(ratio) => banded(ratio),
                None => UNAVAILABLE.to_string(),
            },
            _ => "0.0000".to_string(),
        }
    }
}
