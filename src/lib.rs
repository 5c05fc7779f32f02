//! Snapshot management for ZFS storage appliances over their REST API.

pub mod cli;
pub mod client;
pub mod config;
pub mod engine;
pub mod error;
pub mod exit_codes;
pub mod export;
pub mod logging;
pub mod model;
pub mod reporter;
pub mod resolve;
