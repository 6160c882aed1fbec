pub mod cache;
pub mod config;
pub mod constant;
pub mod portfolio;
pub mod server;
pub mod ticker;
pub mod types;
pub mod utils;
