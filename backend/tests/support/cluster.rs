//! Embedded PostgreSQL for the table-store suites.
//!
//! Setup failures panic unless `SKIP_TEST_CLUSTER` is truthy, in which case
//! the calling test prints a skip marker and returns early.

use pg_embedded_setup_unpriv::TemporaryDatabase;

/// Whether `SKIP_TEST_CLUSTER` asks for cluster-backed tests to be skipped.
pub fn should_skip_test_cluster() -> bool {
    std::env::var("SKIP_TEST_CLUSTER")
        .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

/// Report a setup failure: `None` when skipping is allowed, a panic otherwise.
pub fn handle_cluster_setup_failure<T>(reason: impl std::fmt::Display) -> Option<T> {
    if should_skip_test_cluster() {
        eprintln!("SKIP-TEST-CLUSTER: {reason}");
        None
    } else {
        panic!("Test cluster setup failed: {reason}. Set SKIP_TEST_CLUSTER=1 to skip.");
    }
}

/// A fresh, empty database on the shared embedded cluster.
pub fn temporary_database() -> Result<TemporaryDatabase, String> {
    let cluster = pg_embedded_setup_unpriv::test_support::shared_cluster_handle()
        .map_err(|err| format!("start cluster: {err}"))?;
    cluster
        .temporary_database(format!("test_{}", uuid::Uuid::new_v4()).as_str())
        .map_err(|err| format!("create database: {err}"))
}
