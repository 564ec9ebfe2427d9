//! Endpoint adapters for the Nakama REST API.
//!
//! Every operation is a struct implementing [`Endpoint`](crate::Endpoint):
//! identifiers go in the constructor, optional fields in `with_*` setters.
//! Send it with [`NakamaClient::send`](crate::NakamaClient::send).
//!
//! | Module | Operations |
//! |---|---|
//! | healthcheck | [`Healthcheck`] |
//! | account | [`GetAccount`], [`UpdateAccount`], [`DeleteAccount`] |
//! | authenticate | [`Authenticate`], [`Link`], [`Unlink`] |
//! | session | [`SessionRefresh`], [`SessionLogout`] |
//! | friends | [`ListFriends`], [`AddFriends`], [`DeleteFriends`], [`BlockFriends`], [`ImportFacebookFriends`], [`ImportSteamFriends`] |
//! | groups | [`ListGroups`], [`CreateGroup`], [`UpdateGroup`], [`DeleteGroup`], [`GroupUsers`], [`JoinGroup`], [`LeaveGroup`], [`ListGroupUsers`], [`ListUserGroups`] |
//! | leaderboards | [`ListLeaderboardRecords`], [`WriteLeaderboardRecord`], [`DeleteLeaderboardRecord`], [`ListLeaderboardRecordsAroundOwner`] |
//! | tournaments | [`ListTournaments`], [`ListTournamentRecords`], [`WriteTournamentRecord`], [`JoinTournament`], [`ListTournamentRecordsAroundOwner`] |
//! | storage | [`ReadStorageObjects`], [`WriteStorageObjects`], [`DeleteStorageObjects`], [`ListStorageObjects`] |
//! | notifications | [`ListNotifications`], [`DeleteNotifications`] |
//! | users | [`GetUsers`] |
//! | channel | [`ListChannelMessages`] |
//! | matches | [`ListMatches`] |
//! | events | [`SendEvent`] |
//! | rpc | [`Rpc`] |

pub(crate) mod codec;

mod account;
pub use self::account::{Account, DeleteAccount, GetAccount, LinkedDevice, UpdateAccount, User};

mod authenticate;
pub use self::authenticate::{
    AccountApple, AccountCredential, AccountCustom, AccountDevice, AccountEmail, AccountFacebook,
    AccountFacebookInstantGame, AccountGameCenter, AccountGoogle, AccountSteam, Authenticate, Link,
    SyncsFriends, Unlink,
};

mod channel;
pub use self::channel::{ChannelMessage, ChannelMessageList, ListChannelMessages};

mod events;
pub use self::events::SendEvent;

mod friends;
pub use self::friends::{
    AddFriends, BlockFriends, DeleteFriends, Friend, FriendList, FriendState,
    ImportFacebookFriends, ImportSteamFriends, ListFriends,
};

mod groups;
pub use self::groups::{
    CreateGroup, DeleteGroup, Group, GroupList, GroupUser, GroupUserList, GroupUserState,
    GroupUsers, GroupUsersAction, JoinGroup, LeaveGroup, ListGroupUsers, ListGroups,
    ListUserGroups, UpdateGroup, UserGroup, UserGroupList,
};

mod healthcheck;
pub use self::healthcheck::Healthcheck;

mod leaderboards;
pub use self::leaderboards::{
    DeleteLeaderboardRecord, LeaderboardRecord, LeaderboardRecordList,
    ListLeaderboardRecords, ListLeaderboardRecordsAroundOwner, Operator, WriteLeaderboardRecord,
};

mod matches;
pub use self::matches::{ListMatches, Match, MatchList};

mod notifications;
pub use self::notifications::{
    DeleteNotifications, ListNotifications, Notification, NotificationList,
};

mod rpc;
pub use self::rpc::{Rpc, RpcResponse};

mod session;
pub use self::session::{SessionLogout, SessionRefresh};

mod storage;
pub use self::storage::{
    DeleteStorageObjectId, DeleteStorageObjects, ListStorageObjects, ReadStorageObjectId,
    ReadStorageObjects, StorageObject, StorageObjectAck, StorageObjectAcks, StorageObjectList,
    StorageObjects, StoragePermissionRead, StoragePermissionWrite, WriteStorageObject,
    WriteStorageObjects,
};

mod tournaments;
pub use self::tournaments::{
    JoinTournament, ListTournamentRecords, ListTournamentRecordsAroundOwner, ListTournaments,
    Tournament, TournamentList, TournamentRecordList, WriteTournamentRecord,
};

mod users;
pub use self::users::{GetUsers, Users};

#[cfg(test)]
pub(crate) mod tests {
    use std::fmt::Write as _;

    use crate::ApiRequest;

    /// One-line summary of a request followed by its body, for snapshots.
    pub(crate) fn describe(request: &ApiRequest) -> String {
        let mut result = format!("{} {}", request.method(), request.path());
        let query = request.query().to_query_string().expect("query string");
        if !query.is_empty() {
            let _ = write!(result, "?{query}");
        }
        let _ = write!(result, " [{}]", request.auth());
        if let Some(body) = request.body() {
            let _ = write!(result, "\n{}", String::from_utf8_lossy(body.data()));
        }
        result
    }
}
