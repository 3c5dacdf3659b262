pub mod analysis;
pub mod browser;
pub mod config;
pub mod error;
pub mod intent;
pub mod logging;
pub mod output;
pub mod provider;
pub mod scoring;
