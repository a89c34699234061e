pub mod report;
pub mod tracker;
