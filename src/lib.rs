//! SQLite-backed store for user records.
//!
//! # Intention
//!
//! - Provide a small, typed API over a single `rusqlite` connection:
//!   open, ensure schema, insert/read/update, delete-by-criteria.
//! - Keep domain logic free of presentation: every operation returns a
//!   value or a typed [`Error`]; rendering status lines is the binary's job.
//!
//! # Architectural Boundaries
//!
//! - Only SQLite/database code belongs here.
//! - Fully synchronous; one connection, used sequentially. No pooling,
//!   transactions, or retry logic.

pub mod criteria;
pub mod error;
pub mod schema;
pub mod store;
pub mod value;

pub use criteria::Criteria;
pub use error::Error;
pub use schema::{Schema, TableDefinition};
pub use store::{DeleteOutcome, NewUser, Store, StoreConfig, User};
pub use value::Value;
