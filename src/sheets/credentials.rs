//! Service-account key material and JWT assertions.

use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::Serialize;

use crate::config::GoogleServiceAccount;
use crate::errors::AppError;

/// OAuth scope for read-only spreadsheet access.
pub const SPREADSHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets.readonly";

const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// Parsed signing identity of a Google service account.
pub struct ServiceAccountKey {
    client_email: String,
    key: EncodingKey,
}

#[derive(Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

impl ServiceAccountKey {
    /// Parse the PEM private key of a configured service account.
    ///
    /// The config layer has already repaired `\n` escapes, so the key is
    /// expected to be a well-formed RSA PEM here.
    pub fn from_account(account: &GoogleServiceAccount) -> Result<Self, AppError> {
        let key = EncodingKey::from_rsa_pem(account.private_key.as_bytes()).map_err(|err| {
            AppError::SheetsAuth(format!("Invalid service-account private key: {}", err))
        })?;
        Ok(Self {
            client_email: account.client_email.clone(),
            key,
        })
    }

    pub fn client_email(&self) -> &str {
        &self.client_email
    }

    /// Sign the one-hour JWT assertion exchanged for an access token.
    pub fn sign_assertion(&self, token_url: &str) -> Result<String, AppError> {
        let iat = Utc::now().timestamp();
        let claims = AssertionClaims {
            iss: &self.client_email,
            scope: SPREADSHEETS_SCOPE,
            aud: token_url,
            iat,
            exp: iat + ASSERTION_LIFETIME_SECS,
        };

        encode(&Header::new(Algorithm::RS256), &claims, &self.key)
            .map_err(|err| AppError::SheetsAuth(format!("Failed to sign JWT assertion: {}", err)))
    }
}
