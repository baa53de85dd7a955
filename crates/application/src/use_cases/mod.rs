//! Use cases - one struct per area, each holding its repositories as trait objects

pub mod assistant;
pub mod auth;
pub mod items;
pub mod lists;
pub mod shopping_list;

pub use assistant::AssistantUseCase;
pub use auth::AuthUseCase;
pub use items::ItemUseCase;
pub use lists::ListUseCase;
pub use shopping_list::{
    AddedSuggestions, ShoppingListUseCase, SuggestionOutcome, MAX_ANALYSIS_TIPS,
};
