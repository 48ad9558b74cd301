//! Typed clients, one per backend collection, plus authentication.

#[macro_use]
mod macros;

pub mod user_client;
pub mod order_client;
pub mod order_line_client;
pub mod brand_client;
pub mod auth_client;

pub use user_client::*;
pub use order_client::*;
pub use order_line_client::*;
pub use brand_client::*;
pub use auth_client::*;
