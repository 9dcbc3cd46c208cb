//! PostgreSQL contact store using Diesel ORM.
//!
//! Implements the `ContactStore` port over a single `contacts` table via
//! `diesel-async` and a `bb8` pool. Row structs (`models.rs`) and the table
//! definition (`schema.rs`) stay internal; only the store and pool types are
//! exported.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use mockable::DefaultClock;
//! use contact_registry::outbound::persistence::{DbPool, DieselContactStore, PoolConfig};
//!
//! let pool = DbPool::lazy(&PoolConfig::new("postgres://localhost/contacts"));
//! let store = DieselContactStore::new(pool, Arc::new(DefaultClock));
//! ```

mod diesel_contact_store;
mod models;
mod pool;
mod schema;

pub use diesel_contact_store::DieselContactStore;
pub use pool::{DbPool, PoolConfig, PoolError};
