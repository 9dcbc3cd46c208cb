//! Reqwest-backed client for the Sheets v4 values API.
//!
//! Owns transport details only: URL building, bearer authentication, value
//! options and response decoding. Credentials are resolved by the caller.

use std::time::Duration;

use reqwest::{Client, Url};

use super::SheetsError;
use super::dto::{ValueRangeBody, ValueRangeDto};
use super::transport::{decode, send};

/// Production Sheets API root.
pub const SHEETS_API_BASE: &str = "https://sheets.googleapis.com/";

/// Cells are stored exactly as sent; phone digits must not become numbers.
const VALUE_INPUT_OPTION: &str = "RAW";

/// Thin client over `spreadsheets.values`.
#[derive(Debug, Clone)]
pub struct SheetsClient {
    http: Client,
    base: Url,
}

impl SheetsClient {
    /// Client for the production API with a request timeout.
    ///
    /// # Errors
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(timeout: Duration) -> Result<Self, SheetsError> {
        let base =
            Url::parse(SHEETS_API_BASE).map_err(|err| SheetsError::endpoint(err.to_string()))?;
        Self::with_base_url(base, timeout)
    }

    /// Client for an alternative API root, such as a local test server.
    ///
    /// # Errors
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn with_base_url(base: Url, timeout: Duration) -> Result<Self, SheetsError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| SheetsError::transport(err.to_string()))?;
        Ok(Self { http, base })
    }

    /// Rows in `range`; an empty range yields no rows.
    ///
    /// # Errors
    /// Transport, status and decode failures.
    pub async fn get_values(
        &self,
        access_token: &str,
        spreadsheet_id: &str,
        range: &str,
    ) -> Result<Vec<Vec<String>>, SheetsError> {
        let url = self.values_url(spreadsheet_id, range)?;
        let body = send(self.http.get(url).bearer_auth(access_token)).await?;
        let dto: ValueRangeDto = decode(&body, "value range")?;
        Ok(dto.into_rows())
    }

    /// Append `row` after the last row of the table found in `range`.
    ///
    /// # Errors
    /// Transport and status failures.
    pub async fn append_row(
        &self,
        access_token: &str,
        spreadsheet_id: &str,
        range: &str,
        row: Vec<String>,
    ) -> Result<(), SheetsError> {
        let url = self.values_url(spreadsheet_id, &format!("{range}:append"))?;
        let rows = [row];
        send(
            self.http
                .post(url)
                .bearer_auth(access_token)
                .query(&[
                    ("valueInputOption", VALUE_INPUT_OPTION),
                    ("insertDataOption", "INSERT_ROWS"),
                ])
                .json(&ValueRangeBody::rows(&rows)),
        )
        .await?;
        Ok(())
    }

    /// Overwrite the cells in `range` with `rows`.
    ///
    /// # Errors
    /// Transport and status failures.
    pub async fn update_values(
        &self,
        access_token: &str,
        spreadsheet_id: &str,
        range: &str,
        rows: &[Vec<String>],
    ) -> Result<(), SheetsError> {
        let url = self.values_url(spreadsheet_id, range)?;
        send(
            self.http
                .put(url)
                .bearer_auth(access_token)
                .query(&[("valueInputOption", VALUE_INPUT_OPTION)])
                .json(&ValueRangeBody::rows(rows)),
        )
        .await?;
        Ok(())
    }

    fn values_url(&self, spreadsheet_id: &str, range: &str) -> Result<Url, SheetsError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| SheetsError::endpoint(format!("{} cannot carry a path", self.base)))?
            .pop_if_empty()
            .extend(["v4", "spreadsheets", spreadsheet_id, "values", range]);
        Ok(url)
    }
}

/// A1 notation for `columns` on sheet `title`, quoting titles that need it.
///
/// # Examples
/// ```
/// use contact_registry::outbound::sheets::a1_range;
///
/// assert_eq!(a1_range("Contacts", "A:G"), "Contacts!A:G");
/// assert_eq!(a1_range("Lead's list", "A1:G1"), "'Lead''s list'!A1:G1");
/// ```
#[must_use]
pub fn a1_range(title: &str, columns: &str) -> String {
    if !title.is_empty() && title.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        format!("{title}!{columns}")
    } else {
        format!("'{}'!{columns}", title.replace('\'', "''"))
    }
}
