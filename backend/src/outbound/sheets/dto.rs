//! Wire shapes for the Sheets values API and the OAuth token endpoint.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Default, Deserialize)]
pub(super) struct ValueRangeDto {
    #[serde(default)]
    pub(super) values: Vec<Vec<Value>>,
}

impl ValueRangeDto {
    /// Rows as text; non-string cells are rendered, nulls become empty.
    pub(super) fn into_rows(self) -> Vec<Vec<String>> {
        self.values
            .into_iter()
            .map(|row| row.into_iter().map(cell_text).collect())
            .collect()
    }
}

fn cell_text(cell: Value) -> String {
    match cell {
        Value::String(text) => text,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ValueRangeBody<'a> {
    pub(super) major_dimension: &'static str,
    pub(super) values: &'a [Vec<String>],
}

impl<'a> ValueRangeBody<'a> {
    pub(super) fn rows(values: &'a [Vec<String>]) -> Self {
        Self {
            major_dimension: "ROWS",
            values,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct TokenResponseDto {
    pub(super) access_token: String,
    #[serde(default)]
    pub(super) expires_in: Option<i64>,
    #[serde(default)]
    pub(super) refresh_token: Option<String>,
    #[serde(default)]
    pub(super) scope: Option<String>,
    #[serde(default)]
    pub(super) token_type: Option<String>,
}
