//! Value Objects - immutable domain concepts

pub mod email;
pub mod item_name;
pub mod list_context;

pub use email::Email;
pub use item_name::{is_blank, normalize_name};
pub use list_context::ListContext;
