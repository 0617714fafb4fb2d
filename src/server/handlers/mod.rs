pub mod bids;
pub mod dashboard;
pub mod loads;
pub mod sessions;
