use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{ApiRequest, ApiResponse, Auth, CallBody, Endpoint, NakamaError};

const ACCOUNT_PATH: &str = "/v2/account";

/// A user in the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    /// The id of the user's account.
    pub id: String,
    /// The username of the user's account.
    pub username: String,
    /// The display name of the user.
    pub display_name: String,
    /// A URL for an avatar image.
    pub avatar_url: String,
    /// The language expected to be a tag which follows the BCP-47 standard.
    pub lang_tag: String,
    /// The location set by the user.
    pub location: String,
    /// The timezone set by the user.
    pub timezone: String,
    /// Additional information stored as a JSON object.
    pub metadata: String,
    /// The Facebook id in the user's account.
    pub facebook_id: String,
    /// The Facebook Instant Game id in the user's account.
    pub facebook_instant_game_id: String,
    /// The Google id in the user's account.
    pub google_id: String,
    /// The Apple Game Center in of the user's account.
    pub gamecenter_id: String,
    /// The Steam id in the user's account.
    pub steam_id: String,
    /// The Apple Sign In id in the user's account.
    pub apple_id: String,
    /// Whether the user is currently connected to the realtime socket.
    pub online: bool,
    /// Number of related edges to this user.
    pub edge_count: i32,
    /// When the user was created.
    pub create_time: Option<DateTime<Utc>>,
    /// When the user was last updated.
    pub update_time: Option<DateTime<Utc>>,
}

/// A device linked to an account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkedDevice {
    /// The device identifier.
    pub id: String,
    /// Variables attached to the device.
    pub vars: HashMap<String, String>,
}

/// A user with additional account details. Always the current user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Account {
    /// The user object.
    pub user: User,
    /// The user's wallet data, as a JSON object.
    pub wallet: String,
    /// The email address of the user.
    pub email: String,
    /// The devices which belong to the user's account.
    pub devices: Vec<LinkedDevice>,
    /// The custom id in the user's account.
    pub custom_id: String,
    /// When the user's email was verified.
    pub verify_time: Option<DateTime<Utc>>,
    /// When the user's account was disabled or banned.
    pub disable_time: Option<DateTime<Utc>>,
}

/// Fetches the account of the current user.
///
/// `GET /v2/account`
#[derive(Debug, Clone, Default)]
pub struct GetAccount;

impl GetAccount {
    /// Creates the request.
    pub fn new() -> Self {
        Self
    }
}

impl Endpoint for GetAccount {
    type Output = Account;

    fn to_request(&self) -> Result<ApiRequest, NakamaError> {
        Ok(ApiRequest::get(ACCOUNT_PATH, Auth::Session))
    }

    fn decode(&self, response: ApiResponse) -> Result<Self::Output, NakamaError> {
        response.json()
    }
}

/// Updates fields of the current user's account.
///
/// Only the fields set through a `with_*` setter are sent; an empty string
/// is sent as such and clears the field.
///
/// `PUT /v2/account`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UpdateAccount {
    #[serde(skip_serializing_if = "Option::is_none")]
    username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    avatar_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    lang_tag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    timezone: Option<String>,
}

impl UpdateAccount {
    /// Creates an update that changes nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the username.
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Sets the display name.
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    /// Sets the avatar URL.
    pub fn with_avatar_url(mut self, avatar_url: impl Into<String>) -> Self {
        self.avatar_url = Some(avatar_url.into());
        self
    }

    /// Sets the language tag.
    pub fn with_lang_tag(mut self, lang_tag: impl Into<String>) -> Self {
        self.lang_tag = Some(lang_tag.into());
        self
    }

    /// Sets the location.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Sets the timezone.
    pub fn with_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone = Some(timezone.into());
        self
    }
}

impl Endpoint for UpdateAccount {
    type Output = ();

    fn to_request(&self) -> Result<ApiRequest, NakamaError> {
        let body = CallBody::json(self)?;
        Ok(ApiRequest::put(ACCOUNT_PATH, Auth::Session).with_body(body))
    }

    fn decode(&self, response: ApiResponse) -> Result<Self::Output, NakamaError> {
        response.discard();
        Ok(())
    }
}

/// Deletes the current user's account.
///
/// `DELETE /v2/account`
#[derive(Debug, Clone, Default)]
pub struct DeleteAccount;

impl DeleteAccount {
    /// Creates the request.
    pub fn new() -> Self {
        Self
    }
}

impl Endpoint for DeleteAccount {
    type Output = ();

    fn to_request(&self) -> Result<ApiRequest, NakamaError> {
        Ok(ApiRequest::delete(ACCOUNT_PATH, Auth::Session))
    }

    fn decode(&self, response: ApiResponse) -> Result<Self::Output, NakamaError> {
        response.discard();
        Ok(())
    }
}
