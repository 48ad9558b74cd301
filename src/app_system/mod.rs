//! Configuration, tracing setup, and system startup/shutdown.

pub mod config;
pub mod admin_system;
pub mod tracing;

pub use config::*;
pub use admin_system::*;
pub use self::tracing::*;
