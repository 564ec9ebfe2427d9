use std::collections::HashMap;

use serde::Serialize;

use crate::{ApiRequest, ApiResponse, Auth, CallBody, Endpoint, NakamaError, SecureString, Session};

/// Exchanges a refresh token for a new session.
///
/// Uses the server key; the current session may already be expired.
///
/// `POST /v2/account/session/refresh`
#[derive(Debug, Clone, Serialize)]
pub struct SessionRefresh {
    token: SecureString,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    vars: HashMap<String, String>,
}

impl SessionRefresh {
    /// Refreshes with the given refresh token.
    pub fn new(refresh_token: impl Into<SecureString>) -> Self {
        Self {
            token: refresh_token.into(),
            vars: HashMap::new(),
        }
    }

    /// Refreshes the given session with its refresh token.
    pub fn for_session(session: &Session) -> Self {
        Self::new(session.refresh_token.clone())
    }

    /// Replaces a session variable in the new token.
    pub fn with_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }
}

impl Endpoint for SessionRefresh {
    type Output = Session;

    fn to_request(&self) -> Result<ApiRequest, NakamaError> {
        let body = CallBody::json(self)?;
        Ok(ApiRequest::post("/v2/account/session/refresh", Auth::ServerKey).with_body(body))
    }

    fn decode(&self, response: ApiResponse) -> Result<Self::Output, NakamaError> {
        response.json()
    }
}

/// Invalidates a session token and its refresh token.
///
/// `POST /v2/session/logout`
#[derive(Debug, Clone, Serialize)]
pub struct SessionLogout {
    token: SecureString,
    refresh_token: SecureString,
}

impl SessionLogout {
    /// Logs out the given session.
    pub fn new(session: &Session) -> Self {
        Self {
            token: session.token.clone(),
            refresh_token: session.refresh_token.clone(),
        }
    }
}

impl Endpoint for SessionLogout {
    type Output = ();

    fn to_request(&self) -> Result<ApiRequest, NakamaError> {
        let body = CallBody::json(self)?;
        Ok(ApiRequest::post("/v2/session/logout", Auth::Session).with_body(body))
    }

    fn decode(&self, response: ApiResponse) -> Result<Self::Output, NakamaError> {
        response.discard();
        Ok(())
    }
}
