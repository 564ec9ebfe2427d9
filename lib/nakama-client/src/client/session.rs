use std::collections::HashMap;

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{NakamaError, SecureString};

/// A session returned by the authenticate and refresh operations.
///
/// The token is a JWT signed by the server; this crate only reads its claims,
/// it never verifies the signature.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Whether the account was created by this authentication.
    #[serde(default)]
    pub created: bool,
    /// The session token, sent with every authenticated request.
    #[serde(default)]
    pub token: SecureString,
    /// The refresh token, used to obtain a new session.
    #[serde(default)]
    pub refresh_token: SecureString,
}

/// Claims carried by a session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionClaims {
    /// The token identifier.
    pub token_id: Option<String>,
    /// The account user identifier.
    pub user_id: String,
    /// The account username.
    pub username: String,
    /// Session variables set at authentication.
    pub vars: HashMap<String, String>,
    /// When the token expires.
    pub expires_at: Option<DateTime<Utc>>,
    /// When the token was issued.
    pub issued_at: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
struct RawClaims {
    #[serde(default)]
    tid: Option<String>,
    #[serde(default)]
    uid: String,
    #[serde(default)]
    usn: String,
    #[serde(default)]
    vrs: Option<HashMap<String, String>>,
    #[serde(default)]
    exp: Option<i64>,
    #[serde(default)]
    iat: Option<i64>,
}

impl Session {
    /// Creates a session from raw tokens.
    pub fn new(token: impl Into<SecureString>, refresh_token: impl Into<SecureString>) -> Self {
        Self {
            created: false,
            token: token.into(),
            refresh_token: refresh_token.into(),
        }
    }

    /// Decodes the claims of the session token.
    ///
    /// # Errors
    ///
    /// Returns [`NakamaError::InvalidSessionToken`] if the token is not a JWT
    /// with a base64url JSON payload.
    pub fn claims(&self) -> Result<SessionClaims, NakamaError> {
        decode_claims(self.token.as_str())
    }

    /// Whether the session token is expired at `now`.
    ///
    /// A token without a readable expiry is considered expired.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.claims()
            .ok()
            .and_then(|claims| claims.expires_at)
            .is_none_or(|expires_at| expires_at <= now)
    }

    /// Whether the refresh token is expired at `now`.
    pub fn is_refresh_expired(&self, now: DateTime<Utc>) -> bool {
        decode_claims(self.refresh_token.as_str())
            .ok()
            .and_then(|claims| claims.expires_at)
            .is_none_or(|expires_at| expires_at <= now)
    }
}

fn decode_claims(token: &str) -> Result<SessionClaims, NakamaError> {
    let invalid = |message: String| NakamaError::InvalidSessionToken { message };

    let mut parts = token.split('.');
    let (Some(_header), Some(payload), Some(_signature), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(invalid("expected three dot-separated segments".to_string()));
    };

    let payload = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|err| invalid(format!("payload is not base64url: {err}")))?;
    let raw = serde_json::from_slice::<RawClaims>(&payload)
        .map_err(|err| invalid(format!("payload is not valid JSON claims: {err}")))?;

    Ok(SessionClaims {
        token_id: raw.tid,
        user_id: raw.uid,
        username: raw.usn,
        vars: raw.vrs.unwrap_or_default(),
        expires_at: raw.exp.and_then(|secs| DateTime::from_timestamp(secs, 0)),
        issued_at: raw.iat.and_then(|secs| DateTime::from_timestamp(secs, 0)),
    })
}
