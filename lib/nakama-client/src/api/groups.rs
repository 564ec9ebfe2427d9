use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::User;
use crate::{ApiRequest, ApiResponse, Auth, CallBody, CallPath, CallQuery, Endpoint, NakamaError};

/// A group in the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Group {
    /// The id of a group.
    pub id: String,
    /// The id of the user who created the group.
    pub creator_id: String,
    /// The unique name of the group.
    pub name: String,
    /// A description for the group.
    pub description: String,
    /// The language expected to be a tag which follows the BCP-47 standard.
    pub lang_tag: String,
    /// Additional information stored as a JSON object.
    pub metadata: String,
    /// A URL for an avatar image.
    pub avatar_url: String,
    /// Anyone can join open groups, otherwise only admins can accept members.
    pub open: bool,
    /// The current count of all members in the group.
    pub edge_count: i32,
    /// The maximum number of members allowed.
    pub max_count: i32,
    /// When the group was created.
    pub create_time: Option<DateTime<Utc>>,
    /// When the group was last updated.
    pub update_time: Option<DateTime<Utc>>,
}

/// A page of groups.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupList {
    /// The groups.
    pub groups: Vec<Group>,
    /// Cursor for the next page, empty on the last one.
    pub cursor: String,
}

/// The role of a user in a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub enum GroupUserState {
    /// The user is a superadmin with full control of the group.
    #[default]
    Superadmin,
    /// The user is an admin with additional privileges.
    Admin,
    /// The user is a regular member.
    Member,
    /// The user has requested to join the group.
    JoinRequest,
    /// A state unknown to this client.
    Unrecognized(i32),
}

impl From<i32> for GroupUserState {
    fn from(value: i32) -> Self {
        match value {
            0 => Self::Superadmin,
            1 => Self::Admin,
            2 => Self::Member,
            3 => Self::JoinRequest,
            other => Self::Unrecognized(other),
        }
    }
}

impl From<GroupUserState> for i32 {
    fn from(value: GroupUserState) -> Self {
        match value {
            GroupUserState::Superadmin => 0,
            GroupUserState::Admin => 1,
            GroupUserState::Member => 2,
            GroupUserState::JoinRequest => 3,
            GroupUserState::Unrecognized(other) => other,
        }
    }
}

impl fmt::Display for GroupUserState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", i32::from(*self))
    }
}

/// A member of a group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupUser {
    /// The user.
    pub user: User,
    /// The role of the user in the group.
    pub state: GroupUserState,
}

/// A page of group members.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupUserList {
    /// The group members.
    pub group_users: Vec<GroupUser>,
    /// Cursor for the next page, empty on the last one.
    pub cursor: String,
}

/// A group the user belongs to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserGroup {
    /// The group.
    pub group: Group,
    /// The role of the user in the group.
    pub state: GroupUserState,
}

/// A page of the groups of a user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserGroupList {
    /// The groups.
    pub user_groups: Vec<UserGroup>,
    /// Cursor for the next page, empty on the last one.
    pub cursor: String,
}

fn group_path(template: &str, group_id: &str) -> Result<String, NakamaError> {
    CallPath::from(template)
        .add_param("group_id", group_id)
        .resolve()
}

/// Lists groups, optionally filtered.
///
/// `GET /v2/group`
#[derive(Debug, Clone, Default)]
pub struct ListGroups {
    name: Option<String>,
    cursor: Option<String>,
    limit: Option<i32>,
    lang_tag: Option<String>,
    members: Option<i32>,
    open: Option<bool>,
}

impl ListGroups {
    /// Lists with the server defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Filters by name; a trailing `%` matches any suffix.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Cursor returned by the previous page.
    pub fn with_cursor(mut self, cursor: impl Into<String>) -> Self {
        self.cursor = Some(cursor.into());
        self
    }

    /// Max number of groups to return.
    pub fn with_limit(mut self, limit: i32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Filters by language tag.
    pub fn with_lang_tag(mut self, lang_tag: impl Into<String>) -> Self {
        self.lang_tag = Some(lang_tag.into());
        self
    }

    /// Filters by number of members, at most this count.
    pub fn with_members(mut self, members: i32) -> Self {
        self.members = Some(members);
        self
    }

    /// Filters by open or closed groups.
    pub fn with_open(mut self, open: bool) -> Self {
        self.open = Some(open);
        self
    }
}

impl Endpoint for ListGroups {
    type Output = GroupList;

    fn to_request(&self) -> Result<ApiRequest, NakamaError> {
        let query = CallQuery::new()
            .add_optional("name", self.name.as_deref())
            .add_optional("cursor", self.cursor.as_deref())
            .add_optional("limit", self.limit)
            .add_optional("lang_tag", self.lang_tag.as_deref())
            .add_optional("members", self.members)
            .add_optional("open", self.open);
        Ok(ApiRequest::get("/v2/group", Auth::Session).with_query(query))
    }

    fn decode(&self, response: ApiResponse) -> Result<Self::Output, NakamaError> {
        response.json()
    }
}

/// Creates a group; the current user becomes its superadmin.
///
/// `POST /v2/group`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CreateGroup {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    lang_tag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    avatar_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    open: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_count: Option<i32>,
}

impl CreateGroup {
    /// Creates a group with a unique name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the language tag.
    pub fn with_lang_tag(mut self, lang_tag: impl Into<String>) -> Self {
        self.lang_tag = Some(lang_tag.into());
        self
    }

    /// Sets the avatar URL.
    pub fn with_avatar_url(mut self, avatar_url: impl Into<String>) -> Self {
        self.avatar_url = Some(avatar_url.into());
        self
    }

    /// Whether anyone can join without approval.
    pub fn with_open(mut self, open: bool) -> Self {
        self.open = Some(open);
        self
    }

    /// The maximum number of members.
    pub fn with_max_count(mut self, max_count: i32) -> Self {
        self.max_count = Some(max_count);
        self
    }
}

impl Endpoint for CreateGroup {
    type Output = Group;

    fn to_request(&self) -> Result<ApiRequest, NakamaError> {
        let body = CallBody::json(self)?;
        Ok(ApiRequest::post("/v2/group", Auth::Session).with_body(body))
    }

    fn decode(&self, response: ApiResponse) -> Result<Self::Output, NakamaError> {
        response.json()
    }
}

/// Updates fields of a group. Only admins may update a group.
///
/// `PUT /v2/group/{group_id}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UpdateGroup {
    #[serde(skip)]
    group_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    lang_tag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    avatar_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    open: Option<bool>,
}

impl UpdateGroup {
    /// Updates the given group.
    pub fn new(group_id: impl Into<String>) -> Self {
        Self {
            group_id: group_id.into(),
            ..Self::default()
        }
    }

    /// Sets the name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the language tag.
    pub fn with_lang_tag(mut self, lang_tag: impl Into<String>) -> Self {
        self.lang_tag = Some(lang_tag.into());
        self
    }

    /// Sets the avatar URL.
    pub fn with_avatar_url(mut self, avatar_url: impl Into<String>) -> Self {
        self.avatar_url = Some(avatar_url.into());
        self
    }

    /// Opens or closes the group.
    pub fn with_open(mut self, open: bool) -> Self {
        self.open = Some(open);
        self
    }
}

impl Endpoint for UpdateGroup {
    type Output = ();

    fn to_request(&self) -> Result<ApiRequest, NakamaError> {
        let path = group_path("/v2/group/{group_id}", &self.group_id)?;
        let body = CallBody::json(self)?;
        Ok(ApiRequest::put(path, Auth::Session).with_body(body))
    }

    fn decode(&self, response: ApiResponse) -> Result<Self::Output, NakamaError> {
        response.discard();
        Ok(())
    }
}

/// Deletes a group. Only the superadmin may delete a group.
///
/// `DELETE /v2/group/{group_id}`
#[derive(Debug, Clone)]
pub struct DeleteGroup {
    group_id: String,
}

impl DeleteGroup {
    /// Deletes the given group.
    pub fn new(group_id: impl Into<String>) -> Self {
        Self {
            group_id: group_id.into(),
        }
    }
}

impl Endpoint for DeleteGroup {
    type Output = ();

    fn to_request(&self) -> Result<ApiRequest, NakamaError> {
        let path = group_path("/v2/group/{group_id}", &self.group_id)?;
        Ok(ApiRequest::delete(path, Auth::Session))
    }

    fn decode(&self, response: ApiResponse) -> Result<Self::Output, NakamaError> {
        response.discard();
        Ok(())
    }
}

/// An admin operation on group members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum GroupUsersAction {
    /// Adds users to the group, or accepts their join requests.
    #[display("add")]
    Add,
    /// Kicks users and prevents them from joining again.
    #[display("ban")]
    Ban,
    /// Demotes users one role down.
    #[display("demote")]
    Demote,
    /// Kicks users, or rejects their join requests.
    #[display("kick")]
    Kick,
    /// Promotes users one role up.
    #[display("promote")]
    Promote,
}

/// Applies an admin operation to members of a group.
///
/// `POST /v2/group/{group_id}/{add|ban|demote|kick|promote}`
///
/// ```rust
/// use nakama_client::Endpoint;
/// use nakama_client::api::GroupUsers;
///
/// let request = GroupUsers::kick("group-1")
///     .with_user_id("user-1")
///     .to_request()?;
///
/// assert_eq!(request.path(), "/v2/group/group-1/kick");
/// assert_eq!(request.query().to_query_string()?, "user_ids=user-1");
/// # Ok::<(), nakama_client::NakamaError>(())
/// ```
#[derive(Debug, Clone)]
pub struct GroupUsers {
    group_id: String,
    action: GroupUsersAction,
    user_ids: Vec<String>,
}

impl GroupUsers {
    /// Applies `action` in the given group.
    pub fn new(group_id: impl Into<String>, action: GroupUsersAction) -> Self {
        Self {
            group_id: group_id.into(),
            action,
            user_ids: Vec::new(),
        }
    }

    /// Adds users to the group.
    pub fn add(group_id: impl Into<String>) -> Self {
        Self::new(group_id, GroupUsersAction::Add)
    }

    /// Bans users from the group.
    pub fn ban(group_id: impl Into<String>) -> Self {
        Self::new(group_id, GroupUsersAction::Ban)
    }

    /// Demotes users of the group.
    pub fn demote(group_id: impl Into<String>) -> Self {
        Self::new(group_id, GroupUsersAction::Demote)
    }

    /// Kicks users from the group.
    pub fn kick(group_id: impl Into<String>) -> Self {
        Self::new(group_id, GroupUsersAction::Kick)
    }

    /// Promotes users of the group.
    pub fn promote(group_id: impl Into<String>) -> Self {
        Self::new(group_id, GroupUsersAction::Promote)
    }

    /// Targets a user.
    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_ids.push(user_id.into());
        self
    }

    /// Targets users.
    pub fn with_user_ids<I>(mut self, user_ids: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.user_ids.extend(user_ids.into_iter().map(Into::into));
        self
    }
}

impl Endpoint for GroupUsers {
    type Output = ();

    fn to_request(&self) -> Result<ApiRequest, NakamaError> {
        let path = CallPath::from("/v2/group/{group_id}/{action}")
            .add_param("group_id", &self.group_id)
            .add_param("action", self.action)
            .resolve()?;
        let query = CallQuery::new().add_all("user_ids", &self.user_ids);
        Ok(ApiRequest::post(path, Auth::Session).with_query(query))
    }

    fn decode(&self, response: ApiResponse) -> Result<Self::Output, NakamaError> {
        response.discard();
        Ok(())
    }
}

/// Joins an open group, or requests to join a closed one.
///
/// `POST /v2/group/{group_id}/join`
#[derive(Debug, Clone)]
pub struct JoinGroup {
    group_id: String,
}

impl JoinGroup {
    /// Joins the given group.
    pub fn new(group_id: impl Into<String>) -> Self {
        Self {
            group_id: group_id.into(),
        }
    }
}

impl Endpoint for JoinGroup {
    type Output = ();

    fn to_request(&self) -> Result<ApiRequest, NakamaError> {
        let path = group_path("/v2/group/{group_id}/join", &self.group_id)?;
        Ok(ApiRequest::post(path, Auth::Session))
    }

    fn decode(&self, response: ApiResponse) -> Result<Self::Output, NakamaError> {
        response.discard();
        Ok(())
    }
}

/// Leaves a group.
///
/// `POST /v2/group/{group_id}/leave`
#[derive(Debug, Clone)]
pub struct LeaveGroup {
    group_id: String,
}

impl LeaveGroup {
    /// Leaves the given group.
    pub fn new(group_id: impl Into<String>) -> Self {
        Self {
            group_id: group_id.into(),
        }
    }
}

impl Endpoint for LeaveGroup {
    type Output = ();

    fn to_request(&self) -> Result<ApiRequest, NakamaError> {
        let path = group_path("/v2/group/{group_id}/leave", &self.group_id)?;
        Ok(ApiRequest::post(path, Auth::Session))
    }

    fn decode(&self, response: ApiResponse) -> Result<Self::Output, NakamaError> {
        response.discard();
        Ok(())
    }
}

/// Lists the members of a group.
///
/// `GET /v2/group/{group_id}/user`
#[derive(Debug, Clone)]
pub struct ListGroupUsers {
    group_id: String,
    limit: Option<i32>,
    state: Option<GroupUserState>,
    cursor: Option<String>,
}

impl ListGroupUsers {
    /// Lists the members of the given group.
    pub fn new(group_id: impl Into<String>) -> Self {
        Self {
            group_id: group_id.into(),
            limit: None,
            state: None,
            cursor: None,
        }
    }

    /// Max number of members to return.
    pub fn with_limit(mut self, limit: i32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Only returns members with this role.
    pub fn with_state(mut self, state: GroupUserState) -> Self {
        self.state = Some(state);
        self
    }

    /// Cursor returned by the previous page.
    pub fn with_cursor(mut self, cursor: impl Into<String>) -> Self {
        self.cursor = Some(cursor.into());
        self
    }
}

impl Endpoint for ListGroupUsers {
    type Output = GroupUserList;

    fn to_request(&self) -> Result<ApiRequest, NakamaError> {
        let path = group_path("/v2/group/{group_id}/user", &self.group_id)?;
        let query = CallQuery::new()
            .add_optional("limit", self.limit)
            .add_optional("state", self.state)
            .add_optional("cursor", self.cursor.as_deref());
        Ok(ApiRequest::get(path, Auth::Session).with_query(query))
    }

    fn decode(&self, response: ApiResponse) -> Result<Self::Output, NakamaError> {
        response.json()
    }
}

/// Lists the groups of a user.
///
/// `GET /v2/user/{user_id}/group`
#[derive(Debug, Clone)]
pub struct ListUserGroups {
    user_id: String,
    limit: Option<i32>,
    state: Option<GroupUserState>,
    cursor: Option<String>,
}

impl ListUserGroups {
    /// Lists the groups of the given user.
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            limit: None,
            state: None,
            cursor: None,
        }
    }

    /// Max number of groups to return.
    pub fn with_limit(mut self, limit: i32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Only returns groups where the user has this role.
    pub fn with_state(mut self, state: GroupUserState) -> Self {
        self.state = Some(state);
        self
    }

    /// Cursor returned by the previous page.
    pub fn with_cursor(mut self, cursor: impl Into<String>) -> Self {
        self.cursor = Some(cursor.into());
        self
    }
}

impl Endpoint for ListUserGroups {
    type Output = UserGroupList;

    fn to_request(&self) -> Result<ApiRequest, NakamaError> {
        let path = CallPath::from("/v2/user/{user_id}/group")
            .add_param("user_id", &self.user_id)
            .resolve()?;
        let query = CallQuery::new()
            .add_optional("limit", self.limit)
            .add_optional("state", self.state)
            .add_optional("cursor", self.cursor.as_deref());
        Ok(ApiRequest::get(path, Auth::Session).with_query(query))
    }

    fn decode(&self, response: ApiResponse) -> Result<Self::Output, NakamaError> {
        response.json()
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::api::tests::describe;

    #[test]
    fn test_list_groups() {
        let request = ListGroups::new()
            .with_name("heroes%")
            .with_limit(10)
            .with_open(false)
            .to_request()
            .expect("request");

        insta::assert_snapshot!(describe(&request), @"GET /v2/group?name=heroes%25&limit=10&open=false [Session]");
    }

    #[test]
    fn test_create_group() {
        let request = CreateGroup::new("Heroes")
            .with_open(true)
            .with_max_count(50)
            .to_request()
            .expect("request");

        insta::assert_snapshot!(describe(&request), @r#"
        POST /v2/group [Session]
        {"name":"Heroes","open":true,"max_count":50}
        "#);
    }

    #[test]
    fn test_update_group_escapes_identifier() {
        let request = UpdateGroup::new("group/1")
            .with_description("")
            .to_request()
            .expect("request");

        insta::assert_snapshot!(describe(&request), @r#"
        PUT /v2/group/group%2F1 [Session]
        {"description":""}
        "#);
    }

    #[test]
    fn test_delete_group() {
        let request = DeleteGroup::new("group-1").to_request().expect("request");

        insta::assert_snapshot!(describe(&request), @"DELETE /v2/group/group-1 [Session]");
    }

    #[rstest]
    #[case::add(GroupUsers::add("g"), "/v2/group/g/add")]
    #[case::ban(GroupUsers::ban("g"), "/v2/group/g/ban")]
    #[case::demote(GroupUsers::demote("g"), "/v2/group/g/demote")]
    #[case::kick(GroupUsers::kick("g"), "/v2/group/g/kick")]
    #[case::promote(GroupUsers::promote("g"), "/v2/group/g/promote")]
    fn test_group_users_paths(#[case] endpoint: GroupUsers, #[case] expected: &str) {
        let request = endpoint
            .with_user_ids(["u1", "u2"])
            .to_request()
            .expect("request");

        assert_eq!(request.path(), expected);
        assert_eq!(
            request.query().get("user_ids"),
            Some(["u1".to_string(), "u2".to_string()].as_slice())
        );
    }

    #[test]
    fn test_join_and_leave_group() {
        let join = JoinGroup::new("group-1").to_request().expect("request");
        let leave = LeaveGroup::new("group-1").to_request().expect("request");

        insta::assert_snapshot!(describe(&join), @"POST /v2/group/group-1/join [Session]");
        insta::assert_snapshot!(describe(&leave), @"POST /v2/group/group-1/leave [Session]");
    }

    #[test]
    fn test_list_group_users() {
        let request = ListGroupUsers::new("group-1")
            .with_state(GroupUserState::Superadmin)
            .to_request()
            .expect("request");

        insta::assert_snapshot!(describe(&request), @"GET /v2/group/group-1/user?state=0 [Session]");
    }

    #[test]
    fn test_list_user_groups() {
        let request = ListUserGroups::new("user 1")
            .with_limit(100)
            .with_cursor("abc")
            .to_request()
            .expect("request");

        insta::assert_snapshot!(describe(&request), @"GET /v2/user/user%201/group?limit=100&cursor=abc [Session]");
    }

    #[test]
    fn test_decode_user_group_list() {
        let json = r#"{
            "user_groups": [
                { "group": { "id": "g1", "name": "Heroes", "open": true, "edge_count": 3 }, "state": 2 }
            ]
        }"#;

        let list: UserGroupList = serde_json::from_str(json).expect("groups");

        let first = list.user_groups.first().expect("a group");
        assert_eq!(first.group.name, "Heroes");
        assert_eq!(first.state, GroupUserState::Member);
        assert!(list.cursor.is_empty());
    }
}
