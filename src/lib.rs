pub mod cli;
pub mod config;
pub mod logging;
pub mod mock;
pub mod model;
pub mod tracker;
pub mod verify;
