use serde::{Deserialize, Serialize};

use super::User;
use crate::{ApiRequest, ApiResponse, Auth, CallQuery, Endpoint, NakamaError};

/// A collection of users.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Users {
    /// The users.
    pub users: Vec<User>,
}

/// Fetches users by id, username, or Facebook id.
///
/// `GET /v2/user`
#[derive(Debug, Clone, Default)]
pub struct GetUsers {
    ids: Vec<String>,
    usernames: Vec<String>,
    facebook_ids: Vec<String>,
}

impl GetUsers {
    /// Fetches nobody yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds users by account id.
    pub fn with_ids<I>(mut self, ids: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.ids.extend(ids.into_iter().map(Into::into));
        self
    }

    /// Adds users by username.
    pub fn with_usernames<I>(mut self, usernames: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.usernames.extend(usernames.into_iter().map(Into::into));
        self
    }

    /// Adds users by Facebook id.
    pub fn with_facebook_ids<I>(mut self, facebook_ids: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.facebook_ids
            .extend(facebook_ids.into_iter().map(Into::into));
        self
    }
}

impl Endpoint for GetUsers {
    type Output = Users;

    fn to_request(&self) -> Result<ApiRequest, NakamaError> {
        let query = CallQuery::new()
            .add_all("ids", &self.ids)
            .add_all("usernames", &self.usernames)
            .add_all("facebook_ids", &self.facebook_ids);
        Ok(ApiRequest::get("/v2/user", Auth::Session).with_query(query))
    }

    fn decode(&self, response: ApiResponse) -> Result<Self::Output, NakamaError> {
        response.json()
    }
}
