//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the domain persistence port backed by
//! PostgreSQL via Diesel with async support through `diesel-async` and `bb8`
//! connection pooling.
//!
//! # Architecture
//!
//! - **Thin adapters**: repository implementations only translate between
//!   Diesel rows and domain types. No business logic resides here.
//! - **Internal models**: row structs (`models.rs`) and schema definitions
//!   (`schema.rs`) are implementation details, never exposed to the domain.
//! - **Strongly typed errors**: all database errors map to the domain
//!   persistence error type.

pub(crate) mod diesel_helpers;
mod diesel_activity_repository;
mod models;
mod pool;
mod schema;

pub use diesel_activity_repository::DieselActivityRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
