//! Domain Layer - ListAI business logic
//!
//! Contains ONLY pure business logic without dependencies on:
//! - Infrastructure (document stores, identity services, networks)
//! - Frameworks and UI
//! - External systems (completion APIs)
//!
//! Layout:
//! - Entities: lists, items, accounts, assistant exchanges
//! - Value Objects: email, list context, name normalization
//! - Services: duplicate detection, ordering, suggestion cleaning
//! - Repository Abstractions: interfaces implemented by infrastructure

pub mod config;
pub mod entities;
pub mod errors;
pub mod repositories;
pub mod services;
pub mod value_objects;

// Re-export core domain types
pub use entities::{
    AnalysisRequest, AnalysisResult, ItemId, ListId, ListItem, MembershipChange, ShoppingList,
    SuggestionBatch, SuggestionRequest, UserAccount, UserId,
};
pub use errors::{DomainError, DomainResult, ErrorCategory};
pub use repositories::{
    AssistantRepository, AuthRepository, ItemRepository, ItemStream, ListRepository, ListStream,
};
pub use value_objects::{Email, ListContext};

/// Password length required by the identity service
pub const MIN_PASSWORD_LENGTH: usize = 6;
