//! Lane commands

mod get;
mod rebalance;

pub use get::GetLane;
pub use rebalance::RebalanceLane;
