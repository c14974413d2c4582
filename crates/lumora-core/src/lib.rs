//! Lumora Core
//!
//! Logging, configuration, profiling and frame timing shared by the other
//! Lumora crates.

pub mod config;
pub mod logging;
pub mod profiling;
pub mod time;

pub use config::Config;
pub use time::Time;
