pub mod aggregator;
pub mod snapshot;
