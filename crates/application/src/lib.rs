//! # Application Layer
//!
//! Workflows on top of the domain:
//! - Use Cases for accounts, lists, items and assistant requests
//! - Shopping list orchestration (uniqueness, ordering, suggestion filtering)
//! - List Session, the realtime view model of one active list
//!
//! ## Dependency Direction
//!
//! ```text
//! Application Layer → Domain Layer (entities, services, repository traits)
//! Infrastructure → Domain Layer (implements repository traits)
//! ```

pub mod container;
pub mod errors;
pub mod session;
pub mod use_cases;

pub use container::AppServices;
pub use errors::{ApplicationError, ApplicationResult};
pub use session::{ListSession, SessionState, SuggestionHistory};
pub use use_cases::{
    AddedSuggestions, AssistantUseCase, AuthUseCase, ItemUseCase, ListUseCase,
    ShoppingListUseCase, SuggestionOutcome,
};
