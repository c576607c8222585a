pub mod aggregation;
pub mod format;
pub mod profile;
