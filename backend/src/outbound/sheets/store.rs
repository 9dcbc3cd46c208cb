//! [`ContactStore`] over one tab of a Google spreadsheet.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{debug, info};

use crate::domain::ports::{ContactStore, ContactStoreError};
use crate::domain::{ContactDate, ContactRecord, NewContact, RowAddressing, RowSet, SheetLayout};

use super::SheetsError;
use super::access::AccessTokenSource;
use super::client::{SheetsClient, a1_range};

const DATA_COLUMNS: &str = "A:G";
const HEADER_CELLS: &str = "A1:G1";

/// Spreadsheet-backed contact store.
///
/// Rows are addressed by sheet row. The spreadsheet id is checked on every
/// call so the service can start before it is configured.
pub struct SheetsContactStore {
    client: SheetsClient,
    tokens: Arc<AccessTokenSource>,
    spreadsheet_id: Option<String>,
    sheet_title: String,
    clock: Arc<dyn Clock>,
}

impl SheetsContactStore {
    /// Store over the tab `sheet_title` of `spreadsheet_id`.
    pub fn new(
        client: SheetsClient,
        tokens: Arc<AccessTokenSource>,
        spreadsheet_id: Option<String>,
        sheet_title: impl Into<String>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            client,
            tokens,
            spreadsheet_id,
            sheet_title: sheet_title.into(),
            clock,
        }
    }

    fn spreadsheet_id(&self) -> Result<&str, SheetsError> {
        self.spreadsheet_id
            .as_deref()
            .ok_or(SheetsError::MissingSpreadsheetId)
    }

    async fn fetch(&self, columns: &str) -> Result<Vec<Vec<String>>, SheetsError> {
        let spreadsheet_id = self.spreadsheet_id()?;
        let token = self.tokens.access_token().await?;
        let range = a1_range(&self.sheet_title, columns);
        self.client.get_values(&token, spreadsheet_id, &range).await
    }

    async fn snapshot(&self) -> Result<RowSet, SheetsError> {
        let rows = self.fetch(DATA_COLUMNS).await?;
        debug!(rows = rows.len(), sheet = %self.sheet_title, "sheet read");
        Ok(RowSet::new(rows, RowAddressing::SheetRows))
    }
}

#[async_trait]
impl ContactStore for SheetsContactStore {
    async fn read_all(&self) -> Result<RowSet, ContactStoreError> {
        Ok(self.snapshot().await?)
    }

    async fn find_by_phone(&self, phone: &str) -> Result<Option<ContactRecord>, ContactStoreError> {
        Ok(self.snapshot().await?.find_by_phone(phone))
    }

    async fn append(&self, contact: NewContact) -> Result<(), ContactStoreError> {
        let spreadsheet_id = self.spreadsheet_id()?;
        let token = self.tokens.access_token().await?;
        let cells = contact.into_cells(&ContactDate::today(self.clock.as_ref()));
        self.client
            .append_row(
                &token,
                spreadsheet_id,
                &a1_range(&self.sheet_title, DATA_COLUMNS),
                cells,
            )
            .await?;
        Ok(())
    }

    async fn ensure_layout(&self) -> Result<(), ContactStoreError> {
        let first = self.fetch(HEADER_CELLS).await?;
        let blank = first
            .first()
            .is_none_or(|row| row.iter().all(|cell| cell.trim().is_empty()));
        if !blank {
            return Ok(());
        }
        let spreadsheet_id = self.spreadsheet_id()?;
        let token = self.tokens.access_token().await?;
        self.client
            .update_values(
                &token,
                spreadsheet_id,
                &a1_range(&self.sheet_title, HEADER_CELLS),
                &[SheetLayout::CURRENT.header_row()],
            )
            .await?;
        info!(sheet = %self.sheet_title, "header row written");
        Ok(())
    }
}
