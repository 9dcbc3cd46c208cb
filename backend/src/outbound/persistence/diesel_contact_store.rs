//! PostgreSQL-backed `ContactStore` implementation using Diesel ORM.
//!
//! The table is created on first use. A partial unique index on `phone`
//! backs the service's duplicate check at the storage level; its violation
//! surfaces as [`ContactStoreError::PhoneTaken`].

use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use mockable::Clock;
use tokio::sync::OnceCell;
use tracing::{debug, warn};

use crate::domain::ports::{ContactStore, ContactStoreError};
use crate::domain::{ContactDate, ContactRecord, NewContact, RowAddressing, RowSet};

use super::models::{ContactRow, NewContactRow};
use super::pool::{DbPool, PoolError};
use super::schema::contacts;

const CREATE_CONTACTS_TABLE: &str = "CREATE TABLE IF NOT EXISTS contacts (
    id BIGSERIAL PRIMARY KEY,
    name TEXT NOT NULL,
    phone TEXT NOT NULL DEFAULT '',
    course TEXT NOT NULL DEFAULT '',
    consultant TEXT NOT NULL DEFAULT '',
    date TEXT NOT NULL DEFAULT '',
    username TEXT NOT NULL DEFAULT '',
    password TEXT NOT NULL DEFAULT '',
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
)";

const CREATE_PHONE_INDEX: &str = "CREATE UNIQUE INDEX IF NOT EXISTS contacts_phone_unique \
    ON contacts (phone) WHERE phone <> ''";

/// Diesel-backed implementation of the `ContactStore` port.
#[derive(Clone)]
pub struct DieselContactStore {
    pool: DbPool,
    clock: Arc<dyn Clock>,
    schema: Arc<OnceCell<()>>,
}

impl DieselContactStore {
    /// Create a store over `pool`, stamping rows with dates from `clock`.
    pub fn new(pool: DbPool, clock: Arc<dyn Clock>) -> Self {
        Self {
            pool,
            clock,
            schema: Arc::new(OnceCell::new()),
        }
    }

    /// Create the table and index once per process.
    async fn ensure_schema(&self) -> Result<(), ContactStoreError> {
        self.schema
            .get_or_try_init(|| self.create_schema())
            .await
            .map(|_| ())
    }

    async fn create_schema(&self) -> Result<(), ContactStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::sql_query(CREATE_CONTACTS_TABLE)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        // Pre-existing duplicate phones block the index; the service lock
        // still serialises new writes.
        if let Err(error) = diesel::sql_query(CREATE_PHONE_INDEX)
            .execute(&mut conn)
            .await
        {
            warn!(%error, "contacts phone index not created");
        }
        Ok(())
    }
}

#[async_trait]
impl ContactStore for DieselContactStore {
    async fn read_all(&self) -> Result<RowSet, ContactStoreError> {
        self.ensure_schema().await?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<ContactRow> = contacts::table
            .select(ContactRow::as_select())
            .order(contacts::id.asc())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(RowSet::new(
            rows.into_iter().map(ContactRow::into_cells).collect(),
            RowAddressing::Unaddressed,
        ))
    }

    async fn find_by_phone(&self, phone: &str) -> Result<Option<ContactRecord>, ContactStoreError> {
        if phone.is_empty() {
            return Ok(None);
        }
        self.ensure_schema().await?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<ContactRow> = contacts::table
            .filter(contacts::phone.eq(phone))
            .select(ContactRow::as_select())
            .order(contacts::id.asc())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(ContactRow::into_record))
    }

    async fn append(&self, contact: NewContact) -> Result<(), ContactStoreError> {
        self.ensure_schema().await?;
        let phone = contact.phone.clone();
        let row = NewContactRow::stamped(contact, &ContactDate::today(self.clock.as_ref()));
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(contacts::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(|error| map_insert_error(error, phone))?;
        Ok(())
    }

    async fn ensure_layout(&self) -> Result<(), ContactStoreError> {
        self.ensure_schema().await
    }
}

fn map_pool_error(error: PoolError) -> ContactStoreError {
    ContactStoreError::unavailable(error.into_message())
}

fn map_insert_error(error: diesel::result::Error, phone: String) -> ContactStoreError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            ContactStoreError::phone_taken(phone)
        }
        other => map_diesel_error(other),
    }
}

/// Map Diesel errors to the store-unavailable kind.
fn map_diesel_error(error: diesel::result::Error) -> ContactStoreError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            ContactStoreError::unavailable("database connection error")
        }
        DieselError::DatabaseError(_, info) => {
            ContactStoreError::unavailable(format!("database error: {}", info.message()))
        }
        DieselError::QueryBuilderError(_) => ContactStoreError::unavailable("database query error"),
        other => ContactStoreError::unavailable(other.to_string()),
    }
}
