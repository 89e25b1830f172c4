//! Google Sheets access for the curriculum spreadsheet.
//!
//! The curriculum lives in one spreadsheet with an index tab per CEFR level.
//! [`SheetsClient`] authenticates as a service account and reads the data
//! range of each tab; [`SheetRowSource`] is the seam the import pipeline
//! consumes, so tests and misconfigured deployments can substitute other
//! sources.

mod credentials;

pub use credentials::*;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::errors::AppError;
use crate::models::{Level, LevelTab};

/// Cell window read from every tab: six columns, header row skipped.
pub const DATA_RANGE: &str = "A2:F";

const GRANT_TYPE_JWT_BEARER: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const TOKEN_REFRESH_MARGIN_SECS: i64 = 60;

/// The index tabs of the curriculum spreadsheet, one per level.
pub fn level_tabs() -> [LevelTab; 4] {
    [
        LevelTab {
            level: Level::A1,
            sheet_name: "ÍNDICE A1",
            gid: "0",
        },
        LevelTab {
            level: Level::A2,
            sheet_name: "ÍNDICE A2",
            gid: "1579741048",
        },
        LevelTab {
            level: Level::B1,
            sheet_name: "ÍNDICE B1",
            gid: "847210493",
        },
        LevelTab {
            level: Level::B2,
            sheet_name: "ÍNDICE B2",
            gid: "1294867035",
        },
    ]
}

/// Source of raw spreadsheet rows for the import pipeline.
#[async_trait]
pub trait SheetRowSource: Send + Sync {
    /// Verify that credentials work before any destructive step runs.
    async fn ensure_credentials(&self) -> Result<(), AppError>;

    /// Fetch the data rows of one tab, header excluded, possibly empty.
    async fn fetch_rows(&self, tab: &LevelTab) -> Result<Vec<Vec<String>>, AppError>;
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

#[derive(Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

struct CachedToken {
    value: String,
    expires_at: DateTime<Utc>,
}

/// Service-account client for the Google Sheets values API.
pub struct SheetsClient {
    http: reqwest::Client,
    key: ServiceAccountKey,
    sheet_id: String,
    token_url: String,
    api_base: String,
    token: Mutex<Option<CachedToken>>,
}

impl SheetsClient {
    pub fn new(key: ServiceAccountKey, sheet_id: String, token_url: String, api_base: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            key,
            sheet_id,
            token_url,
            api_base,
            token: Mutex::new(None),
        }
    }

    /// Current bearer token, minting a fresh one when the cached token is
    /// absent or within a minute of expiry.
    async fn bearer_token(&self) -> Result<String, AppError> {
        let mut cache = self.token.lock().await;
        if let Some(cached) = cache.as_ref() {
            if cached.expires_at - Duration::seconds(TOKEN_REFRESH_MARGIN_SECS) > Utc::now() {
                return Ok(cached.value.clone());
            }
        }

        let assertion = self.key.sign_assertion(&self.token_url)?;
        let response = self
            .http
            .post(&self.token_url)
            .form(&[
                ("grant_type", GRANT_TYPE_JWT_BEARER),
                ("assertion", assertion.as_str()),
            ])
            .send()
            .await
            .map_err(|err| {
                AppError::SheetsAuth(format!("Token exchange request failed: {}", err))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::SheetsAuth(format!(
                "Token exchange rejected ({}): {}",
                status, body
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|err| AppError::SheetsAuth(format!("Malformed token response: {}", err)))?;

        let value = token.access_token.clone();
        *cache = Some(CachedToken {
            value: token.access_token,
            expires_at: Utc::now() + Duration::seconds(token.expires_in),
        });

        tracing::debug!(
            "Obtained Sheets access token for {}",
            self.key.client_email()
        );
        Ok(value)
    }

    fn values_url(&self, range: &str) -> Result<reqwest::Url, AppError> {
        let mut url = reqwest::Url::parse(&self.api_base)
            .map_err(|err| AppError::Internal(format!("Invalid Sheets API base URL: {}", err)))?;
        url.path_segments_mut()
            .map_err(|_| AppError::Internal("Sheets API base URL cannot hold paths".to_string()))?
            .pop_if_empty()
            .extend(["v4", "spreadsheets", self.sheet_id.as_str(), "values", range]);
        Ok(url)
    }
}

#[async_trait]
impl SheetRowSource for SheetsClient {
    async fn ensure_credentials(&self) -> Result<(), AppError> {
        self.bearer_token().await.map(|_| ())
    }

    async fn fetch_rows(&self, tab: &LevelTab) -> Result<Vec<Vec<String>>, AppError> {
        let token = self.bearer_token().await?;
        let range = format!("'{}'!{}", tab.sheet_name, DATA_RANGE);
        let url = self.values_url(&range)?;

        tracing::debug!("Fetching {} (tab gid {})", range, tab.gid);
        let response = self
            .http
            .get(url)
            .bearer_auth(&token)
            .send()
            .await
            .map_err(|err| {
                AppError::RemoteRead(format!(
                    "Failed to reach Sheets API for tab '{}': {}",
                    tab.sheet_name, err
                ))
            })?;

        if !response.status().is_success() {
            return Err(AppError::RemoteRead(format!(
                "Sheets API returned {} for tab '{}'",
                response.status(),
                tab.sheet_name
            )));
        }

        let body: ValueRange = response.json().await.map_err(|err| {
            AppError::RemoteRead(format!(
                "Malformed values response for tab '{}': {}",
                tab.sheet_name, err
            ))
        })?;
        Ok(body.values)
    }
}

/// Null source installed when the environment carries no Google credentials.
///
/// The server still boots; import jobs fail at the credential check, before
/// anything destructive happens.
pub struct UnconfiguredSheets;

#[async_trait]
impl SheetRowSource for UnconfiguredSheets {
    async fn ensure_credentials(&self) -> Result<(), AppError> {
        Err(AppError::SheetsAuth(
            "Google Sheets credentials are not configured".to_string(),
        ))
    }

    async fn fetch_rows(&self, _tab: &LevelTab) -> Result<Vec<Vec<String>>, AppError> {
        Err(AppError::SheetsAuth(
            "Google Sheets credentials are not configured".to_string(),
        ))
    }
}
