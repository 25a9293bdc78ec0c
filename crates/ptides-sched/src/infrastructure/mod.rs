//! Infrastructure Layer
//!
//! File-backed configuration and scenario loading (serde / serde_json).

pub mod config;
pub mod scenario;

pub use config::PlatformConfig;
pub use scenario::{load_network, parse_network, Scenario, ScenarioSpec};
