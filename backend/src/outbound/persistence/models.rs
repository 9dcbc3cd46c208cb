//! Internal Diesel row structs for the contacts table.
//!
//! These never leave the persistence layer.

use diesel::prelude::*;

use crate::domain::{ContactDate, ContactRecord, NewContact};

use super::schema::contacts;

/// Row read from the contacts table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = contacts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ContactRow {
    pub name: String,
    pub phone: String,
    pub course: String,
    pub consultant: String,
    pub date: String,
    pub username: String,
    pub password: String,
}

impl ContactRow {
    /// Positional cells in column order.
    pub fn into_cells(self) -> Vec<String> {
        vec![
            self.name,
            self.phone,
            self.course,
            self.consultant,
            self.date,
            self.username,
            self.password,
        ]
    }

    /// Table rows have no sheet position.
    pub fn into_record(self) -> ContactRecord {
        ContactRecord::from_cells(None, &self.into_cells())
    }
}

/// Insertable contact row.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = contacts)]
pub(crate) struct NewContactRow {
    pub name: String,
    pub phone: String,
    pub course: String,
    pub consultant: String,
    pub date: String,
    pub username: String,
    pub password: String,
}

impl NewContactRow {
    pub fn stamped(contact: NewContact, date: &ContactDate) -> Self {
        let NewContact {
            name,
            phone,
            course,
            consultant,
            username,
            password,
        } = contact;
        Self {
            name,
            phone,
            course,
            consultant,
            date: date.as_str().to_owned(),
            username,
            password,
        }
    }
}
