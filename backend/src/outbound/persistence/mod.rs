//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repository implementations only translate between Diesel row structs and
//! domain types. Row structs (`models.rs`) and table definitions
//! (`schema.rs`) stay private to this module. Uniqueness, foreign keys and
//! `ON DELETE SET NULL` are enforced by the schema in `backend/migrations`;
//! violations surface as [`crate::domain::ports::StoreError`] values with
//! the same messages the in-memory store uses.
//!
//! # Example
//!
//! ```ignore
//! use itam::outbound::persistence::{DbPool, DieselAssetRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/itam")).await?;
//! let assets = DieselAssetRepository::new(pool);
//! ```

mod diesel_asset_repository;
mod diesel_employee_repository;
mod diesel_helpers;
mod diesel_license_repository;
mod diesel_maintenance_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_asset_repository::DieselAssetRepository;
pub use diesel_employee_repository::DieselEmployeeRepository;
pub use diesel_license_repository::DieselLicenseRepository;
pub use diesel_maintenance_repository::DieselMaintenanceRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
