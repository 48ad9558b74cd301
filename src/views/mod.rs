//! Screen state for the CRUD workflow: list, create/edit, delete.

pub mod table;
pub mod flash;
pub mod list;
pub mod edit;
pub mod order_edit;
pub mod delete;

pub use table::*;
pub use flash::*;
pub use list::*;
pub use edit::*;
pub use order_edit::*;
pub use delete::*;
