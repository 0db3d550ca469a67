//! Sheets adapter: Implementation of CaseLog against the spreadsheet
//! append API.
//!
//! Appends one row per opted-in case to a fixed worksheet. Writes are
//! best-effort: failures are reported to the caller and logged, never
//! retried, and never allowed to block the risk display.
//!
//! # Credentials
//!
//! The access token is supplied externally and read per append, so the
//! adapter never holds credentials between requests.
//!
//! Precedence (highest first):
//! - `RENALERT_SHEETS_TOKEN_FILE` (read from a file path)
//! - `/run/secrets/renalert_sheets_token` (Docker/Compose secret default)
//!
//! In release builds, reading the token from an environment variable is
//! refused.

use std::path::Path;
use std::time::Duration;

use zeroize::Zeroizing;

use crate::domain::CaseLogRecord;
use crate::ports::CaseLog;

const SPREADSHEET_ID_ENV: &str = "RENALERT_SPREADSHEET_ID";
const WORKSHEET_ENV: &str = "RENALERT_WORKSHEET";
const TOKEN_FILE_ENV: &str = "RENALERT_SHEETS_TOKEN_FILE";
const TOKEN_DOCKER_SECRET_PATH: &str = "/run/secrets/renalert_sheets_token";

// Dev-only escape hatch for local runs and tests.
#[cfg(debug_assertions)]
const TOKEN_ENV_DEV: &str = "RENALERT_SHEETS_TOKEN";

/// Default worksheet appended to when none is configured.
const DEFAULT_WORKSHEET: &str = "Sheet1";

/// Error type for remote case log operations.
#[derive(Debug, thiserror::Error)]
pub enum CaseLogError {
    #[error("Missing spreadsheet id: set {SPREADSHEET_ID_ENV}")]
    MissingSpreadsheet,

    #[error(
        "Missing access token: provide {TOKEN_FILE_ENV} (or mount {TOKEN_DOCKER_SECRET_PATH})"
    )]
    MissingCredentials,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Remote store rejected append (status {status}): {body}")]
    Rejected { status: u16, body: String },
}

/// Remote case log backed by a spreadsheet table.
pub struct SheetsCaseLog {
    client: reqwest::blocking::Client,
    spreadsheet_id: String,
    worksheet: String,
}

impl SheetsCaseLog {
    /// Create a case log for the given spreadsheet and worksheet.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be constructed.
    pub fn new(
        spreadsheet_id: impl Into<String>,
        worksheet: impl Into<String>,
    ) -> Result<Self, CaseLogError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()?;

        Ok(Self {
            client,
            spreadsheet_id: spreadsheet_id.into(),
            worksheet: worksheet.into(),
        })
    }

    /// Create a case log from `RENALERT_SPREADSHEET_ID` / `RENALERT_WORKSHEET`.
    ///
    /// # Errors
    /// Returns `CaseLogError::MissingSpreadsheet` if no spreadsheet id is
    /// configured.
    pub fn from_env() -> Result<Self, CaseLogError> {
        let spreadsheet_id = std::env::var(SPREADSHEET_ID_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or(CaseLogError::MissingSpreadsheet)?;
        let worksheet = std::env::var(WORKSHEET_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_WORKSHEET.to_string());

        Self::new(spreadsheet_id, worksheet)
    }

    /// Create an unconfigured case log.
    ///
    /// Every append fails with `MissingSpreadsheet`; used so a missing
    /// configuration degrades at save time instead of blocking startup.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            spreadsheet_id: String::new(),
            worksheet: DEFAULT_WORKSHEET.to_string(),
        }
    }

    /// Read the access token from a secure source.
    fn access_token() -> Result<Zeroizing<String>, CaseLogError> {
        if let Ok(path) = std::env::var(TOKEN_FILE_ENV) {
            let token = std::fs::read_to_string(path.trim())
                .map_err(|_| CaseLogError::MissingCredentials)?;
            return Ok(Zeroizing::new(token.trim().to_string()));
        }

        if Path::new(TOKEN_DOCKER_SECRET_PATH).exists() {
            let token = std::fs::read_to_string(TOKEN_DOCKER_SECRET_PATH)
                .map_err(|_| CaseLogError::MissingCredentials)?;
            return Ok(Zeroizing::new(token.trim().to_string()));
        }

        #[cfg(debug_assertions)]
        if let Ok(token) = std::env::var(TOKEN_ENV_DEV) {
            tracing::warn!(
                "Using access token from {TOKEN_ENV_DEV}. \
                 This is only allowed in debug builds."
            );
            return Ok(Zeroizing::new(token.trim().to_string()));
        }

        Err(CaseLogError::MissingCredentials)
    }

    fn append_url(&self) -> String {
        format!(
            "https://sheets.googleapis.com/v4/spreadsheets/{}/values/{}:append",
            self.spreadsheet_id, self.worksheet
        )
    }
}

impl CaseLog for SheetsCaseLog {
    type Error = CaseLogError;

    fn append(&self, record: &CaseLogRecord) -> Result<(), CaseLogError> {
        if self.spreadsheet_id.is_empty() {
            return Err(CaseLogError::MissingSpreadsheet);
        }

        let token = Self::access_token()?;

        let payload = serde_json::json!({ "values": [record.to_row()] });

        let response = self
            .client
            .post(self.append_url())
            .bearer_auth(token.as_str())
            .query(&[
                ("valueInputOption", "RAW"),
                ("insertDataOption", "INSERT_ROWS"),
            ])
            .json(&payload)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(CaseLogError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        tracing::info!("Appended case row to research log");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_append_url() {
        let log = SheetsCaseLog::new("abc123", "Sheet1").expect("client");
        assert_eq!(
            log.append_url(),
            "https://sheets.googleapis.com/v4/spreadsheets/abc123/values/Sheet1:append"
        );
    }

    #[test]
    fn test_from_env_requires_spreadsheet_id() {
        std::env::remove_var(SPREADSHEET_ID_ENV);
        assert!(matches!(
            SheetsCaseLog::from_env(),
            Err(CaseLogError::MissingSpreadsheet)
        ));
    }

    #[test]
    fn test_access_token_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        writeln!(file, "test-token-value").expect("write");
        std::env::set_var(TOKEN_FILE_ENV, file.path());

        let token = SheetsCaseLog::access_token().expect("token");
        assert_eq!(token.as_str(), "test-token-value");

        std::env::remove_var(TOKEN_FILE_ENV);
    }
}
