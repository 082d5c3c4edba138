//! Network statistics
//!
//! [`StatsProvider`] fetches raw figures from the daemon, the block
//! explorer and the exchange ticker; [`StatsAggregator`] turns them into
//! the RMS/EMC indicators printed with every mined block.

/// Independent, individually fault-tolerant fetches
pub mod provider;

/// Pure derivation and display of RMS/EMC
pub mod aggregator;

// Re-export main components
pub use aggregator::StatsAggregator;
pub use provider::StatsProvider;
