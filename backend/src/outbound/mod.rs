//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL contact table using Diesel
//! - **sheets**: Google Sheets contact store and its credential plumbing
//! - **memory**: in-process contact store for tests and local runs
//! - **users**: JSON-file user directory
//! - **tokens**: signed bearer tokens
//!
//! Adapters translate between domain types and infrastructure
//! representations. They contain no business logic.

pub mod cap_fs;
pub mod memory;
pub mod persistence;
pub mod sheets;
pub mod tokens;
pub mod users;
