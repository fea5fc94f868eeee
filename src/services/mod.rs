//! Services for order aggregation and reporting

pub mod aggregator;
pub mod report;

pub use aggregator::{Accumulator, OrderAggregator, Tally};
