//! Contact records and their positional row shape.
//!
//! Both store variants speak the same seven-column row: name, phone, course,
//! consultant, date, username, password. Spreadsheets have no native schema,
//! so the first row may be a label row; [`SheetLayout`] owns that definition
//! and [`RowSet`] turns raw rows into records.

use chrono::{DateTime, Local};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::normalize_phone;

/// Number of positional columns in a contact row.
pub const CONTACT_COLUMNS: usize = 7;

/// Label-row layouts understood by the spreadsheet store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum SheetLayout {
    /// `NOME, TELEFONE, CURSO, CONSULTOR, DATA, USUARIO, SENHA`.
    V1,
}

const V1_LABELS: [&str; CONTACT_COLUMNS] = [
    "NOME",
    "TELEFONE",
    "CURSO",
    "CONSULTOR",
    "DATA",
    "USUARIO",
    "SENHA",
];

/// Cells that must match before a row counts as a label row.
const MIN_LABEL_MATCH: usize = 2;

impl SheetLayout {
    /// Layout written when a sheet has no label row yet.
    pub const CURRENT: Self = Self::V1;

    /// Column labels in positional order.
    #[must_use]
    pub const fn labels(self) -> [&'static str; CONTACT_COLUMNS] {
        match self {
            Self::V1 => V1_LABELS,
        }
    }

    /// Label row ready to be written to a sheet.
    #[must_use]
    pub fn header_row(self) -> Vec<String> {
        self.labels()
            .iter()
            .map(|label| (*label).to_owned())
            .collect()
    }

    /// Recognise a label row.
    ///
    /// A row is a label row when it carries at least the name and phone
    /// labels and every present cell matches its label. A record named
    /// `NOME` still has digits in its phone cell, so it is never mistaken
    /// for a label row.
    #[must_use]
    pub fn detect(row: &[String]) -> Option<Self> {
        let labels = Self::V1.labels();
        let matches = row.len() >= MIN_LABEL_MATCH
            && row.len() <= CONTACT_COLUMNS
            && row
                .iter()
                .zip(labels.iter())
                .all(|(cell, label)| cell.trim() == *label);
        matches.then_some(Self::V1)
    }
}

/// Registration date stamped on every appended row, formatted `DD/MM/YYYY`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactDate(String);

impl ContactDate {
    /// Today's date in the server's local time zone.
    #[must_use]
    pub fn today(clock: &dyn Clock) -> Self {
        Self::from_local(clock.local())
    }

    /// Format an explicit local timestamp.
    #[must_use]
    pub fn from_local(at: DateTime<Local>) -> Self {
        Self(at.format("%d/%m/%Y").to_string())
    }

    /// Formatted date text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// A stored contact.
///
/// `row_index` is the 1-based sheet row for spreadsheet-backed stores. Table
/// stores have no meaningful row position and always report `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContactRecord {
    /// 1-based sheet row, `null` for table-backed stores.
    #[schema(example = 2)]
    pub row_index: Option<u32>,
    /// Display name.
    #[schema(example = "Alice")]
    pub name: String,
    /// Phone as stored; digits only for rows written by this service.
    #[schema(example = "11999990000")]
    pub phone: String,
    /// Course of interest.
    pub course: String,
    /// Who registered the contact.
    pub consultant: String,
    /// Registration date, `DD/MM/YYYY`.
    #[schema(example = "07/03/2025")]
    pub date: String,
    /// Login of the registering actor, or `public`.
    pub username: String,
    /// Only populated on user-credential rows.
    pub password: String,
}

impl ContactRecord {
    /// Map a positional row into a record; missing trailing cells are empty.
    #[must_use]
    pub fn from_cells(row_index: Option<u32>, cells: &[String]) -> Self {
        let cell = |index: usize| cells.get(index).cloned().unwrap_or_default();
        Self {
            row_index,
            name: cell(0),
            phone: cell(1),
            course: cell(2),
            consultant: cell(3),
            date: cell(4),
            username: cell(5),
            password: cell(6),
        }
    }

    /// Positional cells in column order.
    #[must_use]
    pub fn to_cells(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.phone.clone(),
            self.course.clone(),
            self.consultant.clone(),
            self.date.clone(),
            self.username.clone(),
            self.password.clone(),
        ]
    }
}

/// A row to append; the store stamps the date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewContact {
    /// Display name.
    pub name: String,
    /// Normalized phone; empty on user-credential rows.
    pub phone: String,
    /// Course of interest.
    pub course: String,
    /// Resolved consultant attribution.
    pub consultant: String,
    /// Resolved actor login.
    pub username: String,
    /// Only set on user-credential rows.
    pub password: String,
}

impl NewContact {
    /// Complete the record with its registration date.
    #[must_use]
    pub fn into_record(self, date: &ContactDate, row_index: Option<u32>) -> ContactRecord {
        ContactRecord {
            row_index,
            name: self.name,
            phone: self.phone,
            course: self.course,
            consultant: self.consultant,
            date: date.as_str().to_owned(),
            username: self.username,
            password: self.password,
        }
    }

    /// Positional cells including the registration date.
    #[must_use]
    pub fn into_cells(self, date: &ContactDate) -> Vec<String> {
        self.into_record(date, None).to_cells()
    }
}

/// How positions in a [`RowSet`] translate to row indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAddressing {
    /// Position `i` is sheet row `i + 1`.
    SheetRows,
    /// The store has no row positions; records report `None`.
    Unaddressed,
}

/// Raw rows as returned by a contact store, in store order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowSet {
    rows: Vec<Vec<String>>,
    addressing: RowAddressing,
}

impl RowSet {
    /// Wrap rows read from a store.
    #[must_use]
    pub fn new(rows: Vec<Vec<String>>, addressing: RowAddressing) -> Self {
        Self { rows, addressing }
    }

    /// Raw rows including any label row.
    #[must_use]
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Layout of the leading label row, if present.
    #[must_use]
    pub fn layout(&self) -> Option<SheetLayout> {
        self.rows.first().and_then(|row| SheetLayout::detect(row))
    }

    /// Data rows mapped positionally into records, label row skipped.
    #[must_use]
    pub fn records(&self) -> Vec<ContactRecord> {
        self.data_rows()
            .map(|(position, row)| ContactRecord::from_cells(self.row_index(position), row))
            .collect()
    }

    /// First data row whose normalized phone equals `digits`.
    ///
    /// Rows with an empty phone never match.
    #[must_use]
    pub fn find_by_phone(&self, digits: &str) -> Option<ContactRecord> {
        if digits.is_empty() {
            return None;
        }
        self.data_rows()
            .find(|(_, row)| {
                row.get(1)
                    .is_some_and(|phone| normalize_phone(phone) == digits)
            })
            .map(|(position, row)| ContactRecord::from_cells(self.row_index(position), row))
    }

    fn data_rows(&self) -> impl Iterator<Item = (usize, &Vec<String>)> {
        let skip = usize::from(self.layout().is_some());
        self.rows.iter().enumerate().skip(skip)
    }

    fn row_index(&self, position: usize) -> Option<u32> {
        match self.addressing {
            RowAddressing::SheetRows => u32::try_from(position + 1).ok(),
            RowAddressing::Unaddressed => None,
        }
    }
}
