//! Persistence layer — document store for user profiles.

pub mod libsql_backend;
pub mod memory;
pub mod migrations;
pub mod traits;

pub use libsql_backend::LibSqlProfileStore;
pub use memory::MemoryProfileStore;
pub use traits::{DocumentSnapshot, ProfileStore, merge_document};
