pub mod config;
pub mod logging;

pub mod dataset;
pub mod fetcher;
pub mod retry;
