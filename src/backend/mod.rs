//! In-process stand-in for the REST backend, used by the demo and tests.

pub mod memory;

pub use memory::*;
