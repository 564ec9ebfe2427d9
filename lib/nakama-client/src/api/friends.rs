use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{AccountFacebook, AccountSteam, User};
use crate::{ApiRequest, ApiResponse, Auth, CallBody, CallQuery, Endpoint, NakamaError};

/// The friendship status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub enum FriendState {
    /// The user is a friend of the current user.
    #[default]
    Friend,
    /// The current user has sent an invite to the user.
    InviteSent,
    /// The current user has received an invite from this user.
    InviteReceived,
    /// The current user has blocked this user.
    Blocked,
    /// A state unknown to this client.
    Unrecognized(i32),
}

impl From<i32> for FriendState {
    fn from(value: i32) -> Self {
        match value {
            0 => Self::Friend,
            1 => Self::InviteSent,
            2 => Self::InviteReceived,
            3 => Self::Blocked,
            other => Self::Unrecognized(other),
        }
    }
}

impl From<FriendState> for i32 {
    fn from(value: FriendState) -> Self {
        match value {
            FriendState::Friend => 0,
            FriendState::InviteSent => 1,
            FriendState::InviteReceived => 2,
            FriendState::Blocked => 3,
            FriendState::Unrecognized(other) => other,
        }
    }
}

impl fmt::Display for FriendState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", i32::from(*self))
    }
}

/// A friend of a user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Friend {
    /// The user object.
    pub user: User,
    /// The friend status.
    pub state: FriendState,
    /// Time of the latest relationship update.
    pub update_time: Option<DateTime<Utc>>,
    /// Metadata attached to the relationship.
    pub metadata: String,
}

/// A page of friends.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FriendList {
    /// The friends of the current user.
    pub friends: Vec<Friend>,
    /// Cursor for the next page, empty on the last one.
    pub cursor: String,
}

/// Lists the friends of the current user.
///
/// `GET /v2/friend`
#[derive(Debug, Clone, Default)]
pub struct ListFriends {
    limit: Option<i32>,
    state: Option<FriendState>,
    cursor: Option<String>,
}

impl ListFriends {
    /// Lists with the server defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Max number of records to return. Between 1 and 1000.
    pub fn with_limit(mut self, limit: i32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Only returns friends in this state.
    pub fn with_state(mut self, state: FriendState) -> Self {
        self.state = Some(state);
        self
    }

    /// Cursor returned by the previous page.
    pub fn with_cursor(mut self, cursor: impl Into<String>) -> Self {
        self.cursor = Some(cursor.into());
        self
    }
}

impl Endpoint for ListFriends {
    type Output = FriendList;

    fn to_request(&self) -> Result<ApiRequest, NakamaError> {
        let query = CallQuery::new()
            .add_optional("limit", self.limit)
            .add_optional("state", self.state)
            .add_optional("cursor", self.cursor.as_deref());
        Ok(ApiRequest::get("/v2/friend", Auth::Session).with_query(query))
    }

    fn decode(&self, response: ApiResponse) -> Result<Self::Output, NakamaError> {
        response.json()
    }
}

/// Users targeted by a friend operation, by id or by username.
#[derive(Debug, Clone, Default)]
struct FriendTargets {
    ids: Vec<String>,
    usernames: Vec<String>,
}

impl FriendTargets {
    fn to_query(&self) -> CallQuery {
        CallQuery::new()
            .add_all("ids", &self.ids)
            .add_all("usernames", &self.usernames)
    }
}

macro_rules! friend_targets_operation {
    ($(#[$meta:meta])* $name:ident, $method:ident, $path:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default)]
        pub struct $name {
            targets: FriendTargets,
        }

        impl $name {
            /// Targets nobody yet.
            pub fn new() -> Self {
                Self::default()
            }

            /// Adds a user by id.
            pub fn with_id(mut self, id: impl Into<String>) -> Self {
                self.targets.ids.push(id.into());
                self
            }

            /// Adds users by id.
            pub fn with_ids<I>(mut self, ids: I) -> Self
            where
                I: IntoIterator,
                I::Item: Into<String>,
            {
                self.targets.ids.extend(ids.into_iter().map(Into::into));
                self
            }

            /// Adds a user by username.
            pub fn with_username(mut self, username: impl Into<String>) -> Self {
                self.targets.usernames.push(username.into());
                self
            }

            /// Adds users by username.
            pub fn with_usernames<I>(mut self, usernames: I) -> Self
            where
                I: IntoIterator,
                I::Item: Into<String>,
            {
                self.targets
                    .usernames
                    .extend(usernames.into_iter().map(Into::into));
                self
            }
        }

        impl Endpoint for $name {
            type Output = ();

            fn to_request(&self) -> Result<ApiRequest, NakamaError> {
                Ok(ApiRequest::$method($path, Auth::Session).with_query(self.targets.to_query()))
            }

            fn decode(&self, response: ApiResponse) -> Result<Self::Output, NakamaError> {
                response.discard();
                Ok(())
            }
        }
    };
}

friend_targets_operation!(
    /// Adds friends by id or username, or accepts their invites.
    ///
    /// `POST /v2/friend`
    AddFriends,
    post,
    "/v2/friend"
);

friend_targets_operation!(
    /// Removes friends, rejects invites or unblocks users.
    ///
    /// `DELETE /v2/friend`
    DeleteFriends,
    delete,
    "/v2/friend"
);

friend_targets_operation!(
    /// Blocks users.
    ///
    /// `POST /v2/friend/block`
    BlockFriends,
    post,
    "/v2/friend/block"
);

/// Imports the Facebook friends of the account and adds them as friends.
///
/// `POST /v2/friend/facebook`
#[derive(Debug, Clone)]
pub struct ImportFacebookFriends {
    account: AccountFacebook,
    reset: Option<bool>,
}

impl ImportFacebookFriends {
    /// Imports with the given Facebook credential.
    pub fn new(account: AccountFacebook) -> Self {
        Self {
            account,
            reset: None,
        }
    }

    /// Resets the current user's friends list before importing.
    pub fn with_reset(mut self, reset: bool) -> Self {
        self.reset = Some(reset);
        self
    }
}

impl Endpoint for ImportFacebookFriends {
    type Output = ();

    fn to_request(&self) -> Result<ApiRequest, NakamaError> {
        let query = CallQuery::new().add_optional("reset", self.reset);
        let body = CallBody::json(&self.account)?;
        Ok(ApiRequest::post("/v2/friend/facebook", Auth::Session)
            .with_query(query)
            .with_body(body))
    }

    fn decode(&self, response: ApiResponse) -> Result<Self::Output, NakamaError> {
        response.discard();
        Ok(())
    }
}

/// Imports the Steam friends of the account and adds them as friends.
///
/// `POST /v2/friend/steam`
#[derive(Debug, Clone)]
pub struct ImportSteamFriends {
    account: AccountSteam,
    reset: Option<bool>,
}

impl ImportSteamFriends {
    /// Imports with the given Steam credential.
    pub fn new(account: AccountSteam) -> Self {
        Self {
            account,
            reset: None,
        }
    }

    /// Resets the current user's friends list before importing.
    pub fn with_reset(mut self, reset: bool) -> Self {
        self.reset = Some(reset);
        self
    }
}

impl Endpoint for ImportSteamFriends {
    type Output = ();

    fn to_request(&self) -> Result<ApiRequest, NakamaError> {
        let query = CallQuery::new().add_optional("reset", self.reset);
        let body = CallBody::json(&self.account)?;
        Ok(ApiRequest::post("/v2/friend/steam", Auth::Session)
            .with_query(query)
            .with_body(body))
    }

    fn decode(&self, response: ApiResponse) -> Result<Self::Output, NakamaError> {
        response.discard();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::api::tests::describe;

    #[test]
    fn test_list_friends_without_options() {
        let request = ListFriends::new().to_request().expect("request");

        insta::assert_snapshot!(describe(&request), @"GET /v2/friend [Session]");
    }

    #[test]
    fn test_list_friends_with_zero_values() {
        let request = ListFriends::new()
            .with_limit(0)
            .with_state(FriendState::Friend)
            .with_cursor("")
            .to_request()
            .expect("request");

        insta::assert_snapshot!(describe(&request), @"GET /v2/friend?limit=0&state=0&cursor= [Session]");
    }

    #[test]
    fn test_add_friends() {
        let request = AddFriends::new()
            .with_ids(["user-1", "user-2"])
            .with_username("player two")
            .to_request()
            .expect("request");

        insta::assert_snapshot!(describe(&request), @"POST /v2/friend?ids=user-1&ids=user-2&usernames=player+two [Session]");
    }

    #[test]
    fn test_delete_and_block_friends() {
        let delete = DeleteFriends::new().with_id("user-1").to_request().expect("request");
        let block = BlockFriends::new().with_id("user-1").to_request().expect("request");

        insta::assert_snapshot!(describe(&delete), @"DELETE /v2/friend?ids=user-1 [Session]");
        insta::assert_snapshot!(describe(&block), @"POST /v2/friend/block?ids=user-1 [Session]");
    }

    #[test]
    fn test_import_facebook_friends() {
        let request = ImportFacebookFriends::new(AccountFacebook::new("fb-token"))
            .with_reset(false)
            .to_request()
            .expect("request");

        insta::assert_snapshot!(describe(&request), @r#"
        POST /v2/friend/facebook?reset=false [Session]
        {"token":"fb-token"}
        "#);
    }

    #[test]
    fn test_import_steam_friends() {
        let request = ImportSteamFriends::new(AccountSteam::new("steam-ticket"))
            .to_request()
            .expect("request");

        insta::assert_snapshot!(describe(&request), @r#"
        POST /v2/friend/steam [Session]
        {"token":"steam-ticket"}
        "#);
    }

    #[rstest]
    #[case(0, FriendState::Friend)]
    #[case(1, FriendState::InviteSent)]
    #[case(2, FriendState::InviteReceived)]
    #[case(3, FriendState::Blocked)]
    #[case(9, FriendState::Unrecognized(9))]
    fn test_friend_state_codes(#[case] code: i32, #[case] state: FriendState) {
        assert_eq!(FriendState::from(code), state);
        assert_eq!(i32::from(state), code);
    }

    #[test]
    fn test_decode_friend_list() {
        let json = r#"{
            "friends": [
                { "user": { "id": "user-1", "username": "one" }, "state": 3 },
                { "user": { "id": "user-2", "username": "two" } }
            ],
            "cursor": "next"
        }"#;

        let list: FriendList = serde_json::from_str(json).expect("friends");

        assert_eq!(list.friends.len(), 2);
        assert_eq!(list.friends[0].state, FriendState::Blocked);
        // an unset enum is its zero value
        assert_eq!(list.friends[1].state, FriendState::Friend);
        assert_eq!(list.cursor, "next");
    }
}
