//! Repository Abstractions - Ports for Infrastructure Layer
//!
//! Contracts between the domain and the collaborators behind it
//! (document store, identity service, completion API).

mod assistant_repository;
mod auth_repository;
mod item_repository;
mod list_repository;

pub use assistant_repository::AssistantRepository;
pub use auth_repository::AuthRepository;
pub use item_repository::{ItemRepository, ItemStream};
pub use list_repository::{ListRepository, ListStream};
