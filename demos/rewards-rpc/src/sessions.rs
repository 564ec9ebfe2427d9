use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::sync::RwLock;

use crate::errors::ApiError;
use crate::rpc::RpcContext;

/// A user account known to the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// The user ID.
    pub id: String,
    /// The unique username.
    pub username: String,
    /// The device the account was created with.
    pub device_id: String,
}

/// Tokens handed back by authentication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuedSession {
    /// True when the account was created by this call.
    pub created: bool,
    /// The session token.
    pub token: String,
    /// The refresh token.
    pub refresh_token: String,
}

#[derive(Debug, Clone)]
struct LiveToken {
    caller: RpcContext,
    expires_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct Data {
    accounts: HashMap<String, Account>,
    tokens: HashMap<String, LiveToken>,
    issued: u64,
}

/// Accounts by device and live session tokens.
#[derive(Debug, Clone)]
pub(crate) struct SessionStore {
    token_expiry: Duration,
    data: Arc<RwLock<Data>>,
}

impl SessionStore {
    pub(crate) fn new(token_expiry: Duration) -> Self {
        Self {
            token_expiry,
            data: Arc::default(),
        }
    }

    /// Finds or creates the account of a device and opens a session.
    pub(crate) async fn authenticate_device(
        &self,
        device_id: &str,
        create: bool,
        username: Option<String>,
        vars: HashMap<String, String>,
    ) -> Result<IssuedSession, ApiError> {
        let mut data = self.data.write().await;
        data.issued += 1;
        let serial = data.issued;

        let (account, created) = match data.accounts.get(device_id).cloned() {
            Some(account) => (account, false),
            None if !create => return Err(ApiError::not_found("User account not found.")),
            None => {
                let username = username.unwrap_or_else(|| format!("player-{serial}"));
                if data.accounts.values().any(|it| it.username == username) {
                    return Err(ApiError::already_exists("Username is already in use."));
                }
                let account = Account {
                    id: format!("00000000-0000-4000-8000-{serial:012}"),
                    username,
                    device_id: device_id.to_string(),
                };
                data.accounts.insert(device_id.to_string(), account.clone());
                (account, true)
            }
        };

        let issued_at = Utc::now();
        let expires_at = issued_at
            + chrono::Duration::from_std(self.token_expiry)
                .map_err(|error| ApiError::internal(error.to_string()))?;
        let token = issue_token(serial, &account, &vars, issued_at, expires_at)?;
        let refresh_token = issue_token(serial, &account, &HashMap::new(), issued_at, expires_at)?;
        let caller = RpcContext {
            user_id: Some(account.id.clone()),
            username: Some(account.username.clone()),
            vars: vars.into_iter().collect(),
        };
        data.tokens.insert(token.clone(), LiveToken { caller, expires_at });

        Ok(IssuedSession {
            created,
            token,
            refresh_token,
        })
    }

    /// The caller behind a live session token.
    pub(crate) async fn resolve(&self, token: &str) -> Option<RpcContext> {
        self.resolve_at(token, Utc::now()).await
    }

    /// The caller behind a session token still valid at `now`; expired tokens are dropped.
    async fn resolve_at(&self, token: &str, now: DateTime<Utc>) -> Option<RpcContext> {
        let mut data = self.data.write().await;
        data.tokens.retain(|_, live| live.expires_at > now);
        data.tokens.get(token).map(|live| live.caller.clone())
    }

    /// The account of a user.
    pub(crate) async fn account(&self, user_id: &str) -> Option<Account> {
        let data = self.data.read().await;
        data.accounts.values().find(|it| it.id == user_id).cloned()
    }
}

// Unsigned JWT shaped like Nakama's, enough for clients to read the claims
fn issue_token(
    serial: u64,
    account: &Account,
    vars: &HashMap<String, String>,
    issued_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
) -> Result<String, ApiError> {
    let claims = json!({
        "tid": format!("{serial:08x}"),
        "uid": account.id,
        "usn": account.username,
        "vrs": vars,
        "exp": expires_at.timestamp(),
        "iat": issued_at.timestamp(),
    });
    let claims =
        serde_json::to_vec(&claims).map_err(|error| ApiError::internal(error.to_string()))?;

    Ok(format!(
        "{}.{}.{}",
        URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#),
        URL_SAFE_NO_PAD.encode(claims),
        URL_SAFE_NO_PAD.encode(format!("unsigned-{serial}")),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn should_create_then_reuse_device_account() {
        let store = SessionStore::new(Duration::from_secs(60));

        let first = store
            .authenticate_device("device-0001", true, Some("alice".to_string()), HashMap::new())
            .await
            .expect("created");
        let second = store
            .authenticate_device("device-0001", false, None, HashMap::new())
            .await
            .expect("found");

        assert!(first.created);
        assert!(!second.created);
        assert_ne!(first.token, second.token);

        let caller = store.resolve(&second.token).await.expect("live token");
        assert_eq!(caller.username.as_deref(), Some("alice"));
        let user_id = caller.user_id.expect("a user");
        let account = store.account(&user_id).await.expect("an account");
        assert_eq!(account.device_id, "device-0001");
    }

    #[tokio::test]
    async fn should_not_create_without_create_flag() {
        let store = SessionStore::new(Duration::from_secs(60));

        let error = store
            .authenticate_device("device-0001", false, None, HashMap::new())
            .await
            .expect_err("unknown device");

        insta::assert_snapshot!(error, @"User account not found. (5)");
    }

    #[tokio::test]
    async fn should_reject_taken_username() {
        let store = SessionStore::new(Duration::from_secs(60));
        store
            .authenticate_device("device-0001", true, Some("alice".to_string()), HashMap::new())
            .await
            .expect("created");

        let error = store
            .authenticate_device("device-0002", true, Some("alice".to_string()), HashMap::new())
            .await
            .expect_err("username taken");

        insta::assert_snapshot!(error, @"Username is already in use. (6)");
    }

    #[tokio::test]
    async fn should_drop_expired_tokens() {
        let store = SessionStore::new(Duration::from_secs(60));
        let session = store
            .authenticate_device("device-0001", true, None, HashMap::new())
            .await
            .expect("created");

        let now = Utc::now();
        assert!(store.resolve_at(&session.token, now).await.is_some());

        let later = now + chrono::Duration::minutes(2);
        assert_eq!(store.resolve_at(&session.token, later).await, None);
        assert!(store.data.read().await.tokens.is_empty());
        assert_eq!(store.resolve_at(&session.token, now).await, None);
    }

    #[tokio::test]
    async fn should_ignore_unknown_token() {
        let store = SessionStore::new(Duration::from_secs(60));

        assert_eq!(store.resolve("not-a-token").await, None);
    }
}
