use std::collections::HashMap;
use std::fmt::Debug;

use serde::{Deserialize, Serialize};

use super::codec;
use crate::{ApiRequest, ApiResponse, Auth, CallBody, CallPath, CallQuery, Endpoint, NakamaError, Session};

/// An identity an account can authenticate with, link, or unlink.
///
/// `KIND` is the path segment of the matching routes, e.g.
/// `/v2/account/authenticate/device`.
pub trait AccountCredential: Serialize + Debug {
    /// The path segment naming this identity provider.
    const KIND: &'static str;

    /// Query and body sent to link this credential.
    ///
    /// # Errors
    ///
    /// Fails when the credential cannot be serialized.
    #[doc(hidden)]
    fn link_parts(&self, sync: Option<bool>) -> Result<(CallQuery, CallBody), NakamaError> {
        let query = CallQuery::new().add_optional("sync", sync);
        Ok((query, CallBody::json(self)?))
    }
}

/// Identity providers able to import the social graph of the account.
pub trait SyncsFriends: AccountCredential {}

macro_rules! account_credential {
    ($name:ident, $kind:literal) => {
        impl AccountCredential for $name {
            const KIND: &'static str = $kind;
        }

        impl $name {
            /// Adds a session variable, readable from the session token claims.
            pub fn with_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
                self.vars.insert(key.into(), value.into());
                self
            }
        }
    };
}

/// Sign in with Apple identity token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountApple {
    /// The ID token received from Apple to validate.
    pub token: String,
    /// Extra information stored in the session token.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub vars: HashMap<String, String>,
}

impl AccountApple {
    /// Creates the credential from an Apple identity token.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            vars: HashMap::new(),
        }
    }
}

account_credential!(AccountApple, "apple");

/// A custom identifier, usually from an external authentication service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountCustom {
    /// A custom identifier.
    pub id: String,
    /// Extra information stored in the session token.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub vars: HashMap<String, String>,
}

impl AccountCustom {
    /// Creates the credential from a custom identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            vars: HashMap::new(),
        }
    }
}

account_credential!(AccountCustom, "custom");

/// A device identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountDevice {
    /// A device identifier. Should be obtained by a platform-specific device API.
    pub id: String,
    /// Extra information stored in the session token.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub vars: HashMap<String, String>,
}

impl AccountDevice {
    /// Creates the credential from a device identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            vars: HashMap::new(),
        }
    }
}

account_credential!(AccountDevice, "device");

/// An email address and password.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize, derive_more::Debug)]
pub struct AccountEmail {
    /// A valid RFC-5322 email address.
    pub email: String,
    /// A password for the user account.
    #[debug("[REDACTED]")]
    pub password: String,
    /// Extra information stored in the session token.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub vars: HashMap<String, String>,
}

impl AccountEmail {
    /// Creates the credential from an email and a password.
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            vars: HashMap::new(),
        }
    }
}

account_credential!(AccountEmail, "email");

/// A Facebook access token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountFacebook {
    /// The OAuth token received from Facebook to access their profile API.
    pub token: String,
    /// Extra information stored in the session token.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub vars: HashMap<String, String>,
}

impl AccountFacebook {
    /// Creates the credential from a Facebook access token.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            vars: HashMap::new(),
        }
    }
}

account_credential!(AccountFacebook, "facebook");
impl SyncsFriends for AccountFacebook {}

/// A Facebook Instant Game signed player info.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountFacebookInstantGame {
    /// The signed player info from the Facebook Instant Game SDK.
    pub signed_player_info: String,
    /// Extra information stored in the session token.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub vars: HashMap<String, String>,
}

impl AccountFacebookInstantGame {
    /// Creates the credential from a signed player info.
    pub fn new(signed_player_info: impl Into<String>) -> Self {
        Self {
            signed_player_info: signed_player_info.into(),
            vars: HashMap::new(),
        }
    }
}

account_credential!(AccountFacebookInstantGame, "facebookinstantgame");

/// Apple Game Center identity verification.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountGameCenter {
    /// Player ID (generated by Game Center).
    pub player_id: String,
    /// Bundle ID (generated by Game Center).
    pub bundle_id: String,
    /// Time since UNIX epoch when the signature was created.
    #[serde(with = "codec::int64")]
    pub timestamp_seconds: i64,
    /// A random string returned by Game Center authentication on client.
    pub salt: String,
    /// A signature returned by Game Center authentication on client.
    pub signature: String,
    /// A URL to the public key returned by Game Center authentication on client.
    pub public_key_url: String,
    /// Extra information stored in the session token.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub vars: HashMap<String, String>,
}

account_credential!(AccountGameCenter, "gamecenter");

/// A Google ID token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountGoogle {
    /// The OAuth token received from Google to access their profile API.
    pub token: String,
    /// Extra information stored in the session token.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub vars: HashMap<String, String>,
}

impl AccountGoogle {
    /// Creates the credential from a Google ID token.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            vars: HashMap::new(),
        }
    }
}

account_credential!(AccountGoogle, "google");

/// A Steam session ticket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSteam {
    /// The account token received from Steam to access their profile API.
    pub token: String,
    /// Extra information stored in the session token.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub vars: HashMap<String, String>,
}

impl AccountSteam {
    /// Creates the credential from a Steam session ticket.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            vars: HashMap::new(),
        }
    }
}

impl AccountCredential for AccountSteam {
    const KIND: &'static str = "steam";

    // Steam carries `sync` in the body: `{"account": {...}, "sync": true}`.
    fn link_parts(&self, sync: Option<bool>) -> Result<(CallQuery, CallBody), NakamaError> {
        #[derive(Serialize)]
        struct LinkSteamRequest<'a> {
            account: &'a AccountSteam,
            #[serde(skip_serializing_if = "Option::is_none")]
            sync: Option<bool>,
        }

        let body = CallBody::json(&LinkSteamRequest {
            account: self,
            sync,
        })?;
        Ok((CallQuery::new(), body))
    }
}

impl AccountSteam {
    /// Adds a session variable, readable from the session token claims.
    pub fn with_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }
}

impl SyncsFriends for AccountSteam {}

/// Authenticates a user and returns a session.
///
/// Uses the server key; no session is needed.
///
/// `POST /v2/account/authenticate/{kind}`
///
/// ```rust
/// use nakama_client::Endpoint;
/// use nakama_client::api::{AccountDevice, Authenticate};
///
/// let request = Authenticate::new(AccountDevice::new("device-1"))
///     .with_create(true)
///     .with_username("player-one")
///     .to_request()?;
///
/// assert_eq!(request.path(), "/v2/account/authenticate/device");
/// assert_eq!(request.query().to_query_string()?, "create=true&username=player-one");
/// # Ok::<(), nakama_client::NakamaError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Authenticate<C> {
    account: C,
    create: Option<bool>,
    username: Option<String>,
    sync: Option<bool>,
}

impl<C: AccountCredential> Authenticate<C> {
    /// Authenticates with the given credential.
    pub fn new(account: C) -> Self {
        Self {
            account,
            create: None,
            username: None,
            sync: None,
        }
    }

    /// Registers the account if it does not exist.
    pub fn with_create(mut self, create: bool) -> Self {
        self.create = Some(create);
        self
    }

    /// Sets the username on account creation.
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }
}

impl<C: SyncsFriends> Authenticate<C> {
    /// Imports the friends of the provider account.
    pub fn with_sync(mut self, sync: bool) -> Self {
        self.sync = Some(sync);
        self
    }
}

impl<C: AccountCredential> Endpoint for Authenticate<C> {
    type Output = Session;

    fn to_request(&self) -> Result<ApiRequest, NakamaError> {
        let path = CallPath::from("/v2/account/authenticate/{kind}")
            .add_param("kind", C::KIND)
            .resolve()?;
        let query = CallQuery::new()
            .add_optional("create", self.create)
            .add_optional("username", self.username.as_deref())
            .add_optional("sync", self.sync);
        let body = CallBody::json(&self.account)?;

        Ok(ApiRequest::post(path, Auth::ServerKey)
            .with_query(query)
            .with_body(body))
    }

    fn decode(&self, response: ApiResponse) -> Result<Self::Output, NakamaError> {
        response.json()
    }
}

/// Adds an identity to the current user's account.
///
/// `POST /v2/account/link/{kind}`
#[derive(Debug, Clone)]
pub struct Link<C> {
    account: C,
    sync: Option<bool>,
}

impl<C: AccountCredential> Link<C> {
    /// Links the given credential.
    pub fn new(account: C) -> Self {
        Self {
            account,
            sync: None,
        }
    }
}

impl<C: SyncsFriends> Link<C> {
    /// Imports the friends of the provider account.
    pub fn with_sync(mut self, sync: bool) -> Self {
        self.sync = Some(sync);
        self
    }
}

impl<C: AccountCredential> Endpoint for Link<C> {
    type Output = ();

    fn to_request(&self) -> Result<ApiRequest, NakamaError> {
        let path = CallPath::from("/v2/account/link/{kind}")
            .add_param("kind", C::KIND)
            .resolve()?;
        let (query, body) = self.account.link_parts(self.sync)?;

        Ok(ApiRequest::post(path, Auth::Session)
            .with_query(query)
            .with_body(body))
    }

    fn decode(&self, response: ApiResponse) -> Result<Self::Output, NakamaError> {
        response.discard();
        Ok(())
    }
}

/// Removes an identity from the current user's account.
///
/// `POST /v2/account/unlink/{kind}`
#[derive(Debug, Clone)]
pub struct Unlink<C> {
    account: C,
}

impl<C: AccountCredential> Unlink<C> {
    /// Unlinks the given credential.
    pub fn new(account: C) -> Self {
        Self { account }
    }
}

impl<C: AccountCredential> Endpoint for Unlink<C> {
    type Output = ();

    fn to_request(&self) -> Result<ApiRequest, NakamaError> {
        let path = CallPath::from("/v2/account/unlink/{kind}")
            .add_param("kind", C::KIND)
            .resolve()?;
        let body = CallBody::json(&self.account)?;

        Ok(ApiRequest::post(path, Auth::Session).with_body(body))
    }

    fn decode(&self, response: ApiResponse) -> Result<Self::Output, NakamaError> {
        response.discard();
        Ok(())
    }
}
