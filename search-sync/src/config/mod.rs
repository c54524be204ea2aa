//! Configuration and dependency initialization for the admin tool.

mod admin_config;
mod dependencies;

pub use admin_config::{AdminConfig, ConnectionMode};
pub use dependencies::Dependencies;
