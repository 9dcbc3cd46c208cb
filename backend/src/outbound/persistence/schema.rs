//! Diesel table definitions for the contact database.
//!
//! Must match the DDL in `diesel_contact_store.rs`, which creates the table on
//! first use.

diesel::table! {
    /// Contact rows in insertion order.
    ///
    /// Mirrors the seven spreadsheet columns. `phone` holds normalized digits
    /// and is unique among non-empty values.
    contacts (id) {
        /// Serial primary key; defines store order.
        id -> Int8,
        name -> Text,
        phone -> Text,
        course -> Text,
        consultant -> Text,
        /// Registration date as `DD/MM/YYYY`.
        date -> Text,
        username -> Text,
        password -> Text,
        /// Insertion timestamp.
        created_at -> Timestamptz,
    }
}
