//! Form state and the field widgets bound to it.

pub mod state;
pub mod field;

pub use state::*;
pub use field::*;
