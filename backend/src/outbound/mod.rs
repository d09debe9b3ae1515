//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL repositories using Diesel
//! - **memory**: in-process repositories used without a database and in tests
//! - **mail**: SMTP delivery via lettre plus the notice renderer
//! - **export**: CSV and XLSX table encoders
//! - **crypto**: Argon2 password hashing
//!
//! Adapters translate between domain types and infrastructure
//! representations. They contain no business logic.

pub mod crypto;
pub mod export;
pub mod mail;
pub mod memory;
pub mod persistence;
mod repositories;

pub use repositories::{Repositories, StoreSetupError};
