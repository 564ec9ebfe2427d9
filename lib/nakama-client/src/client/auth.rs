use std::fmt;

use headers::{Authorization, HeaderMapExt};
use http::header::AUTHORIZATION;
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::NakamaError;

/// Query parameter carrying the runtime HTTP key.
pub(in crate::client) const HTTP_KEY_PARAM: &str = "http_key";

/// Secure wrapper for sensitive string data that automatically zeroes memory on drop.
///
/// Used for the server key, the runtime HTTP key and session tokens.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SecureString(String);

impl SecureString {
    /// Creates a new secure string from the provided value.
    pub fn new(value: String) -> Self {
        Self(value)
    }

    /// Returns a reference to the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the secret is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Masks sensitive data for display/logging purposes.
    fn mask_sensitive(value: &str) -> String {
        if value.len() <= 8 {
            return "***".to_string();
        }
        match (value.get(..4), value.get(value.len() - 4..)) {
            (Some(head), Some(tail)) => format!("{head}...{tail}"),
            _ => "***".to_string(),
        }
    }
}

impl fmt::Debug for SecureString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecureString")
            .field("value", &"[REDACTED]")
            .finish()
    }
}

impl fmt::Display for SecureString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Self::mask_sensitive(&self.0))
    }
}

impl From<String> for SecureString {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for SecureString {
    fn from(value: &str) -> Self {
        Self::new(value.to_string())
    }
}

impl Serialize for SecureString {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SecureString {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        String::deserialize(deserializer).map(Self::new)
    }
}

/// Credential an endpoint requires.
///
/// Each endpoint declares its requirement; the client resolves it against
/// the credentials it was configured with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, derive_more::Display)]
pub enum Auth {
    /// No credential, e.g. the health check.
    #[default]
    None,
    /// HTTP Basic authentication with the server key, used to obtain sessions.
    ServerKey,
    /// The session bearer token.
    Session,
    /// The session bearer token, or the runtime HTTP key when no session is bound.
    SessionOrHttpKey,
}

/// Where the session token is placed on outgoing requests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenPlacement {
    /// `Authorization: Bearer <token>` header.
    #[default]
    Header,
    /// A query parameter with the given name, e.g. `?token=<token>`.
    Query(String),
}

impl TokenPlacement {
    /// Places the token in the `token` query parameter.
    pub fn query() -> Self {
        Self::Query("token".to_string())
    }
}

/// Credentials configured on a client.
#[derive(Clone, Default)]
pub(in crate::client) struct Credentials {
    pub(in crate::client) server_key: SecureString,
    pub(in crate::client) http_key: Option<SecureString>,
    pub(in crate::client) session: Option<SecureString>,
    pub(in crate::client) token_placement: TokenPlacement,
}

impl Default for SecureString {
    fn default() -> Self {
        Self(String::new())
    }
}

/// A credential resolved for one request.
pub(in crate::client) enum AppliedCredential {
    Basic(Authorization<headers::authorization::Basic>),
    Bearer(Authorization<headers::authorization::Bearer>),
    Query { name: String, value: String },
}

impl fmt::Debug for AppliedCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Basic(_) => f.debug_tuple("Basic").field(&"[REDACTED]").finish(),
            Self::Bearer(_) => f.debug_tuple("Bearer").field(&"[REDACTED]").finish(),
            Self::Query { name, .. } => f
                .debug_struct("Query")
                .field("name", name)
                .field("value", &"[REDACTED]")
                .finish(),
        }
    }
}

impl AppliedCredential {
    /// Adds the credential to an outgoing request.
    pub(in crate::client) fn apply(self, request: &mut reqwest::Request) {
        match self {
            Self::Basic(header) => request.headers_mut().typed_insert(header),
            Self::Bearer(header) => request.headers_mut().typed_insert(header),
            Self::Query { name, value } => {
                request.url_mut().query_pairs_mut().append_pair(&name, &value);
            }
        }
        if let Some(value) = request.headers_mut().get_mut(AUTHORIZATION) {
            value.set_sensitive(true);
        }
    }
}

impl Credentials {
    /// Resolves the endpoint requirement, failing fast when the credential is missing.
    pub(in crate::client) fn resolve(
        &self,
        auth: Auth,
        path: &str,
    ) -> Result<Option<AppliedCredential>, NakamaError> {
        let missing = |reason| NakamaError::AuthenticationRequired {
            path: path.to_string(),
            reason,
        };

        // An empty secret counts as no secret at all
        let session = self.session.as_ref().filter(|token| !token.is_empty());
        let http_key = self.http_key.as_ref().filter(|key| !key.is_empty());

        match auth {
            Auth::None => Ok(None),
            Auth::ServerKey => {
                if self.server_key.is_empty() {
                    return Err(missing("no server key configured"));
                }
                let header = Authorization::basic(self.server_key.as_str(), "");
                Ok(Some(AppliedCredential::Basic(header)))
            }
            Auth::Session => {
                let Some(token) = session else {
                    return Err(missing("no session bound to the client"));
                };
                self.session_credential(token).map(Some)
            }
            Auth::SessionOrHttpKey => match (session, http_key) {
                (Some(token), _) => self.session_credential(token).map(Some),
                (None, Some(http_key)) => Ok(Some(AppliedCredential::Query {
                    name: HTTP_KEY_PARAM.to_string(),
                    value: http_key.as_str().to_string(),
                })),
                (None, None) => Err(missing("no session bound and no http key configured")),
            },
        }
    }

    fn session_credential(&self, token: &SecureString) -> Result<AppliedCredential, NakamaError> {
        match &self.token_placement {
            TokenPlacement::Header => Authorization::bearer(token.as_str())
                .map(AppliedCredential::Bearer)
                .map_err(|err| NakamaError::InvalidBearerToken {
                    message: err.to_string(),
                }),
            TokenPlacement::Query(name) => Ok(AppliedCredential::Query {
                name: name.clone(),
                value: token.as_str().to_string(),
            }),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("server_key", &self.server_key)
            .field("http_key", &self.http_key.as_ref().map(|_| "[REDACTED]"))
            .field("session", &self.session.as_ref().map(|_| "[REDACTED]"))
            .field("token_placement", &self.token_placement)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use headers::authorization::Credentials as _;

    use super::*;

    fn credentials() -> Credentials {
        Credentials {
            server_key: "defaultkey".into(),
            ..Credentials::default()
        }
    }

    #[test]
    fn test_server_key_uses_basic_authentication() {
        let applied = credentials()
            .resolve(Auth::ServerKey, "/v2/account/authenticate/device")
            .expect("resolved")
            .expect("a credential");

        let AppliedCredential::Basic(header) = applied else {
            panic!("Expected a basic authorization header, got {applied:?}");
        };
        assert_eq!(header.username(), "defaultkey");
        assert_eq!(header.password(), "");
        // "defaultkey:" base64 encoded
        assert_eq!(header.0.encode(), "Basic ZGVmYXVsdGtleTo=");
    }

    #[test]
    fn test_session_is_required() {
        let error = credentials()
            .resolve(Auth::Session, "/v2/account")
            .expect_err("no session");

        insta::assert_snapshot!(error, @"Authentication required for '/v2/account': no session bound to the client");
    }

    #[test]
    fn test_session_in_header() {
        let credentials = Credentials {
            session: Some("a.session.token".into()),
            ..credentials()
        };

        let applied = credentials
            .resolve(Auth::Session, "/v2/account")
            .expect("resolved");

        let Some(AppliedCredential::Bearer(header)) = applied else {
            panic!("Expected a bearer header, got {applied:?}");
        };
        assert_eq!(header.token(), "a.session.token");
    }

    #[test]
    fn test_session_in_query() {
        let credentials = Credentials {
            session: Some("a.session.token".into()),
            token_placement: TokenPlacement::query(),
            ..credentials()
        };

        let applied = credentials
            .resolve(Auth::Session, "/v2/account")
            .expect("resolved");

        let Some(AppliedCredential::Query { name, value }) = applied else {
            panic!("Expected a query credential, got {applied:?}");
        };
        assert_eq!(name, "token");
        assert_eq!(value, "a.session.token");
    }

    #[test]
    fn test_http_key_fallback() {
        let credentials = Credentials {
            http_key: Some("defaulthttpkey".into()),
            ..credentials()
        };

        let applied = credentials
            .resolve(Auth::SessionOrHttpKey, "/v2/rpc/rewards")
            .expect("resolved");

        let Some(AppliedCredential::Query { name, value }) = applied else {
            panic!("Expected a query credential, got {applied:?}");
        };
        assert_eq!(name, "http_key");
        assert_eq!(value, "defaulthttpkey");
    }

    #[test]
    fn test_session_takes_precedence_over_http_key() {
        let credentials = Credentials {
            http_key: Some("defaulthttpkey".into()),
            session: Some("token".into()),
            ..credentials()
        };

        let applied = credentials
            .resolve(Auth::SessionOrHttpKey, "/v2/rpc/rewards")
            .expect("resolved");

        assert!(matches!(applied, Some(AppliedCredential::Bearer(_))));
    }

    #[test]
    fn test_missing_http_key_and_session() {
        let result = credentials().resolve(Auth::SessionOrHttpKey, "/v2/rpc/rewards");

        assert!(matches!(
            result,
            Err(NakamaError::AuthenticationRequired { .. })
        ));
    }

    #[test]
    fn test_empty_server_key_is_rejected() {
        let result = Credentials::default().resolve(Auth::ServerKey, "/v2/account/authenticate/custom");

        assert!(matches!(
            result,
            Err(NakamaError::AuthenticationRequired { .. })
        ));
    }

    #[test]
    fn test_empty_session_is_missing() {
        let credentials = Credentials {
            session: Some(SecureString::default()),
            ..credentials()
        };

        let error = credentials
            .resolve(Auth::Session, "/v2/account")
            .expect_err("empty session");

        insta::assert_snapshot!(error, @"Authentication required for '/v2/account': no session bound to the client");
    }

    #[test]
    fn test_empty_session_falls_back_on_http_key() {
        let credentials = Credentials {
            session: Some(SecureString::default()),
            http_key: Some("defaulthttpkey".into()),
            ..credentials()
        };

        let applied = credentials
            .resolve(Auth::SessionOrHttpKey, "/v2/rpc/rewards")
            .expect("resolved");

        let Some(AppliedCredential::Query { name, value }) = applied else {
            panic!("Expected a query credential, got {applied:?}");
        };
        assert_eq!(name, "http_key");
        assert_eq!(value, "defaulthttpkey");
    }

    #[test]
    fn test_empty_http_key_is_missing() {
        let credentials = Credentials {
            http_key: Some(SecureString::default()),
            ..credentials()
        };

        let result = credentials.resolve(Auth::SessionOrHttpKey, "/v2/rpc/rewards");

        assert!(matches!(
            result,
            Err(NakamaError::AuthenticationRequired { .. })
        ));
    }

    #[test]
    fn test_invalid_bearer_token() {
        let credentials = Credentials {
            session: Some("invalid\ntoken".into()),
            ..credentials()
        };

        let result = credentials.resolve(Auth::Session, "/v2/account");

        assert!(matches!(result, Err(NakamaError::InvalidBearerToken { .. })));
    }

    #[test]
    fn test_apply_query_credential() {
        let url = "http://127.0.0.1:7350/v2/rpc/rewards?unwrap=true"
            .parse()
            .expect("valid url");
        let mut request = reqwest::Request::new(http::Method::POST, url);

        AppliedCredential::Query {
            name: "http_key".to_string(),
            value: "key with space".to_string(),
        }
        .apply(&mut request);

        assert_eq!(
            request.url().query(),
            Some("unwrap=true&http_key=key+with+space")
        );
        assert!(request.headers().get(AUTHORIZATION).is_none());
    }

    #[test]
    fn test_apply_bearer_is_sensitive() {
        let url = "http://127.0.0.1:7350/v2/account".parse().expect("valid url");
        let mut request = reqwest::Request::new(http::Method::GET, url);
        let header = Authorization::bearer("a.session.token").expect("valid token");

        AppliedCredential::Bearer(header).apply(&mut request);

        let value = request.headers().get(AUTHORIZATION).expect("authorization");
        assert_eq!(value, "Bearer a.session.token");
        assert!(value.is_sensitive());
    }

    #[test]
    fn test_no_auth() {
        let applied = Credentials::default()
            .resolve(Auth::None, "/healthcheck")
            .expect("resolved");
        assert!(applied.is_none());
    }

    #[test]
    fn test_secure_string_debug() {
        let secure = SecureString::new("secret-password".to_string());
        let debug_str = format!("{secure:?}");
        assert_eq!(debug_str, "SecureString { value: \"[REDACTED]\" }");
        assert!(!debug_str.contains("secret-password"));
    }

    #[test]
    fn test_secure_string_display() {
        let secure = SecureString::new("secret-password-12345".to_string());
        assert_eq!(secure.to_string(), "secr...2345");

        let short_secure = SecureString::new("short".to_string());
        assert_eq!(short_secure.to_string(), "***");
    }

    #[test]
    fn test_credentials_debug_redacts_secrets() {
        let credentials = Credentials {
            http_key: Some("super-secret-http-key".into()),
            session: Some("super-secret-session".into()),
            ..credentials()
        };

        let debug_str = format!("{credentials:?}");
        assert!(!debug_str.contains("super-secret"));
    }
}
