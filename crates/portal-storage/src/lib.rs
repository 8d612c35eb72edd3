//! Repository backends for the Portal URL shortener.

pub mod memory;
pub mod postgres;

pub use memory::InMemoryRepository;
pub use portal_core::repository::{ReadRepository, Repository, Result, UrlRecord};
pub use portal_core::StorageError;
pub use postgres::PostgresRepository;
