//! Domain Entities - core business objects with identity

pub mod ids;
pub mod list_item;
pub mod shopping_list;
pub mod suggestions;
pub mod user_account;

pub use ids::{ItemId, ListId, UserId};
pub use list_item::ListItem;
pub use shopping_list::{MembershipChange, ShoppingList};
pub use suggestions::{AnalysisRequest, AnalysisResult, SuggestionBatch, SuggestionRequest};
pub use user_account::UserAccount;
