//! Routes, the navigation history, and the per-view discard guard.

pub mod route;
pub mod navigator;
pub mod guard;

pub use route::*;
pub use navigator::*;
pub use guard::*;
