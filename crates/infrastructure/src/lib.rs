//! Infrastructure Layer
//!
//! Adapters behind the domain repository traits:
//! - `store`: document store abstraction and the in-memory implementation
//! - `identity`: identity service abstraction and the in-memory implementation
//! - `repositories`: entity/document translation and error mapping
//! - `assistant`: prompt templates and answer parsing
//! - `config`: configuration loading and validation
//! - `bootstrap`: process wiring

pub mod assistant;
pub mod bootstrap;
pub mod config;
pub mod identity;
pub mod repositories;
pub mod store;

pub use bootstrap::{completion_provider, init_logging, load_config, InMemoryBackend, Repositories};
pub use config::{ConfigLoader, ConfigSource, ConfigValidator};
pub use identity::{IdentityError, IdentityProvider, IdentityUser, InMemoryIdentityProvider};
pub use store::{DocumentStore, InMemoryDocumentStore, StoreError};
