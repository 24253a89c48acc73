pub mod aggregator;
pub mod cycle;

pub use aggregator::DomainAggregator;
pub use cycle::CycleResult;
