//! Domain repository implementations over the store, identity and
//! completion adapters

pub mod assistant;
pub mod auth;
pub mod documents;
pub mod errors;
pub mod items;
pub mod lists;

pub use assistant::CompletionAssistantRepository;
pub use auth::IdentityAuthRepository;
pub use errors::{map_identity_error, map_llm_error, map_store_error};
pub use items::StoreItemRepository;
pub use lists::StoreListRepository;
