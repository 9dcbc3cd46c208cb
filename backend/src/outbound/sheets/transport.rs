//! Request execution and HTTP error mapping shared by the Google adapters.

use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;

use super::SheetsError;

/// Send `request` and return the body of a successful response.
pub(super) async fn send(request: RequestBuilder) -> Result<Vec<u8>, SheetsError> {
    let response = request.send().await.map_err(map_transport_error)?;
    let status = response.status();
    let body = response.bytes().await.map_err(map_transport_error)?;
    if !status.is_success() {
        return Err(map_status_error(status, body.as_ref()));
    }
    Ok(body.to_vec())
}

/// Decode a JSON body, naming `what` in the error.
pub(super) fn decode<T: DeserializeOwned>(body: &[u8], what: &str) -> Result<T, SheetsError> {
    serde_json::from_slice(body)
        .map_err(|error| SheetsError::decode(format!("invalid {what} payload: {error}")))
}

pub(super) fn map_transport_error(error: reqwest::Error) -> SheetsError {
    if error.is_timeout() {
        SheetsError::Timeout {
            message: error.to_string(),
        }
    } else {
        SheetsError::transport(error.to_string())
    }
}

pub(super) fn map_status_error(status: StatusCode, body: &[u8]) -> SheetsError {
    let preview = body_preview(body);
    let message = if preview.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("no response body")
            .to_owned()
    } else {
        preview
    };
    SheetsError::Status {
        status: status.as_u16(),
        message,
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for non-network helpers.
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn status_errors_carry_compacted_preview() {
        let error = map_status_error(
            StatusCode::FORBIDDEN,
            b"{\n  \"error\": {\n    \"message\": \"The caller does not have permission\"\n  }\n}",
        );
        assert_eq!(
            error,
            SheetsError::Status {
                status: 403,
                message: r#"{ "error": { "message": "The caller does not have permission" } }"#
                    .to_owned(),
            }
        );
    }

    #[rstest]
    fn empty_bodies_fall_back_to_reason() {
        let error = map_status_error(StatusCode::NOT_FOUND, b"");
        assert_eq!(error.to_string(), "Google API error 404: Not Found");
    }

    #[rstest]
    fn long_bodies_are_truncated() {
        let body = "x".repeat(400);
        let preview = body_preview(body.as_bytes());
        assert_eq!(preview.chars().count(), 163);
        assert!(preview.ends_with("..."));
    }

    #[rstest]
    fn decode_names_payload() {
        let err = decode::<serde_json::Value>(b"not json", "token").expect_err("invalid");
        assert!(err.to_string().starts_with("undecodable response: invalid token payload"));
    }
}
