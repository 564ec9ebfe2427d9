use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::codec;
use crate::{ApiRequest, ApiResponse, Auth, CallBody, CallPath, CallQuery, Endpoint, NakamaError};

/// How a submitted score is combined with the existing record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub enum Operator {
    /// Use the operator configured on the leaderboard.
    #[default]
    NoOverride,
    /// Keep the best score.
    Best,
    /// Replace the score.
    Set,
    /// Add to the score.
    Increment,
    /// Subtract from the score.
    Decrement,
    /// An operator unknown to this client.
    Unrecognized(i32),
}

impl From<i32> for Operator {
    fn from(value: i32) -> Self {
        match value {
            0 => Self::NoOverride,
            1 => Self::Best,
            2 => Self::Set,
            3 => Self::Increment,
            4 => Self::Decrement,
            other => Self::Unrecognized(other),
        }
    }
}

impl From<Operator> for i32 {
    fn from(value: Operator) -> Self {
        match value {
            Operator::NoOverride => 0,
            Operator::Best => 1,
            Operator::Set => 2,
            Operator::Increment => 3,
            Operator::Decrement => 4,
            Operator::Unrecognized(other) => other,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", i32::from(*self))
    }
}

/// A record of a leaderboard or a tournament.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeaderboardRecord {
    /// The id of the leaderboard this record belongs to.
    pub leaderboard_id: String,
    /// The id of the owner of the record.
    pub owner_id: String,
    /// The username of the owner, if the owner is a user.
    pub username: Option<String>,
    /// The score value.
    #[serde(with = "codec::int64")]
    pub score: i64,
    /// A secondary score value.
    #[serde(with = "codec::int64")]
    pub subscore: i64,
    /// The number of submissions to this score record.
    pub num_score: i32,
    /// Metadata, as a JSON object.
    pub metadata: String,
    /// When the record was created.
    pub create_time: Option<DateTime<Utc>>,
    /// When the record was last updated.
    pub update_time: Option<DateTime<Utc>>,
    /// When the record expires.
    pub expiry_time: Option<DateTime<Utc>>,
    /// The rank of this record.
    #[serde(with = "codec::int64")]
    pub rank: i64,
    /// The maximum number of score updates allowed by the owner.
    pub max_num_score: u32,
}

/// A page of leaderboard records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeaderboardRecordList {
    /// A list of records.
    pub records: Vec<LeaderboardRecord>,
    /// The records of the requested owners, wherever they rank.
    pub owner_records: Vec<LeaderboardRecord>,
    /// Cursor for the next page.
    pub next_cursor: String,
    /// Cursor for the previous page.
    pub prev_cursor: String,
    /// The total number of ranks available.
    #[serde(with = "codec::int64")]
    pub rank_count: i64,
}

/// Score submission shared by leaderboards and tournaments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub(super) struct RecordWrite {
    #[serde(with = "codec::int64")]
    pub(super) score: i64,
    #[serde(
        skip_serializing_if = "Option::is_none",
        with = "codec::option_int64"
    )]
    pub(super) subscore: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) metadata: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) operator: Option<Operator>,
}

/// Query of the record listing operations.
#[derive(Debug, Clone, Default)]
pub(super) struct RecordsQuery {
    pub(super) owner_ids: Vec<String>,
    pub(super) limit: Option<i32>,
    pub(super) cursor: Option<String>,
    pub(super) expiry: Option<i64>,
}

impl RecordsQuery {
    pub(super) fn to_query(&self) -> CallQuery {
        CallQuery::new()
            .add_all("owner_ids", &self.owner_ids)
            .add_optional("limit", self.limit)
            .add_optional("cursor", self.cursor.as_deref())
            .add_optional("expiry", self.expiry)
    }
}

/// Lists the records of a leaderboard.
///
/// `GET /v2/leaderboard/{leaderboard_id}`
#[derive(Debug, Clone)]
pub struct ListLeaderboardRecords {
    leaderboard_id: String,
    query: RecordsQuery,
}

impl ListLeaderboardRecords {
    /// Lists the records of the given leaderboard.
    pub fn new(leaderboard_id: impl Into<String>) -> Self {
        Self {
            leaderboard_id: leaderboard_id.into(),
            query: RecordsQuery::default(),
        }
    }

    /// Also returns the records of these owners.
    pub fn with_owner_ids<I>(mut self, owner_ids: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.query
            .owner_ids
            .extend(owner_ids.into_iter().map(Into::into));
        self
    }

    /// Max number of records to return. Between 1 and 100.
    pub fn with_limit(mut self, limit: i32) -> Self {
        self.query.limit = Some(limit);
        self
    }

    /// Cursor returned by the previous page.
    pub fn with_cursor(mut self, cursor: impl Into<String>) -> Self {
        self.query.cursor = Some(cursor.into());
        self
    }

    /// Expiry in seconds since epoch, to list records of a previous reset.
    pub fn with_expiry(mut self, expiry: i64) -> Self {
        self.query.expiry = Some(expiry);
        self
    }
}

impl Endpoint for ListLeaderboardRecords {
    type Output = LeaderboardRecordList;

    fn to_request(&self) -> Result<ApiRequest, NakamaError> {
        let path = CallPath::from("/v2/leaderboard/{leaderboard_id}")
            .add_param("leaderboard_id", &self.leaderboard_id)
            .resolve()?;
        Ok(ApiRequest::get(path, Auth::Session).with_query(self.query.to_query()))
    }

    fn decode(&self, response: ApiResponse) -> Result<Self::Output, NakamaError> {
        response.json()
    }
}

/// Submits a score to a leaderboard.
///
/// `POST /v2/leaderboard/{leaderboard_id}`
#[derive(Debug, Clone)]
pub struct WriteLeaderboardRecord {
    leaderboard_id: String,
    record: RecordWrite,
}

impl WriteLeaderboardRecord {
    /// Submits `score` to the given leaderboard.
    pub fn new(leaderboard_id: impl Into<String>, score: i64) -> Self {
        Self {
            leaderboard_id: leaderboard_id.into(),
            record: RecordWrite {
                score,
                ..RecordWrite::default()
            },
        }
    }

    /// Sets the secondary score.
    pub fn with_subscore(mut self, subscore: i64) -> Self {
        self.record.subscore = Some(subscore);
        self
    }

    /// Sets the record metadata, a JSON object.
    pub fn with_metadata(mut self, metadata: impl Into<String>) -> Self {
        self.record.metadata = Some(metadata.into());
        self
    }

    /// Overrides the leaderboard operator for this submission.
    pub fn with_operator(mut self, operator: Operator) -> Self {
        self.record.operator = Some(operator);
        self
    }
}

impl Endpoint for WriteLeaderboardRecord {
    type Output = LeaderboardRecord;

    fn to_request(&self) -> Result<ApiRequest, NakamaError> {
        let path = CallPath::from("/v2/leaderboard/{leaderboard_id}")
            .add_param("leaderboard_id", &self.leaderboard_id)
            .resolve()?;
        let body = CallBody::json(&self.record)?;
        Ok(ApiRequest::post(path, Auth::Session).with_body(body))
    }

    fn decode(&self, response: ApiResponse) -> Result<Self::Output, NakamaError> {
        response.json()
    }
}

/// Deletes the current user's record in a leaderboard.
///
/// `DELETE /v2/leaderboard/{leaderboard_id}`
#[derive(Debug, Clone)]
pub struct DeleteLeaderboardRecord {
    leaderboard_id: String,
}

impl DeleteLeaderboardRecord {
    /// Deletes the record in the given leaderboard.
    pub fn new(leaderboard_id: impl Into<String>) -> Self {
        Self {
            leaderboard_id: leaderboard_id.into(),
        }
    }
}

impl Endpoint for DeleteLeaderboardRecord {
    type Output = ();

    fn to_request(&self) -> Result<ApiRequest, NakamaError> {
        let path = CallPath::from("/v2/leaderboard/{leaderboard_id}")
            .add_param("leaderboard_id", &self.leaderboard_id)
            .resolve()?;
        Ok(ApiRequest::delete(path, Auth::Session))
    }

    fn decode(&self, response: ApiResponse) -> Result<Self::Output, NakamaError> {
        response.discard();
        Ok(())
    }
}

/// Lists the records around the record of an owner.
///
/// `GET /v2/leaderboard/{leaderboard_id}/owner/{owner_id}`
#[derive(Debug, Clone)]
pub struct ListLeaderboardRecordsAroundOwner {
    leaderboard_id: String,
    owner_id: String,
    limit: Option<u32>,
    expiry: Option<i64>,
    cursor: Option<String>,
}

impl ListLeaderboardRecordsAroundOwner {
    /// Lists around `owner_id` in the given leaderboard.
    pub fn new(leaderboard_id: impl Into<String>, owner_id: impl Into<String>) -> Self {
        Self {
            leaderboard_id: leaderboard_id.into(),
            owner_id: owner_id.into(),
            limit: None,
            expiry: None,
            cursor: None,
        }
    }

    /// Max number of records to return. Between 1 and 100.
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Expiry in seconds since epoch, to list records of a previous reset.
    pub fn with_expiry(mut self, expiry: i64) -> Self {
        self.expiry = Some(expiry);
        self
    }

    /// Cursor returned by the previous page.
    pub fn with_cursor(mut self, cursor: impl Into<String>) -> Self {
        self.cursor = Some(cursor.into());
        self
    }
}

impl Endpoint for ListLeaderboardRecordsAroundOwner {
    type Output = LeaderboardRecordList;

    fn to_request(&self) -> Result<ApiRequest, NakamaError> {
        let path = CallPath::from("/v2/leaderboard/{leaderboard_id}/owner/{owner_id}")
            .add_param("leaderboard_id", &self.leaderboard_id)
            .add_param("owner_id", &self.owner_id)
            .resolve()?;
        let query = CallQuery::new()
            .add_optional("limit", self.limit)
            .add_optional("expiry", self.expiry)
            .add_optional("cursor", self.cursor.as_deref());
        Ok(ApiRequest::get(path, Auth::Session).with_query(query))
    }

    fn decode(&self, response: ApiResponse) -> Result<Self::Output, NakamaError> {
        response.json()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::tests::describe;

    #[test]
    fn test_list_records() {
        let request = ListLeaderboardRecords::new("weekly")
            .with_owner_ids(["user-1", "user-2"])
            .with_limit(20)
            .with_expiry(0)
            .to_request()
            .expect("request");

        insta::assert_snapshot!(describe(&request), @"GET /v2/leaderboard/weekly?owner_ids=user-1&owner_ids=user-2&limit=20&expiry=0 [Session]");
    }

    #[test]
    fn test_write_record() {
        let request = WriteLeaderboardRecord::new("weekly", 1200)
            .with_subscore(0)
            .with_operator(Operator::Best)
            .to_request()
            .expect("request");

        insta::assert_snapshot!(describe(&request), @r#"
        POST /v2/leaderboard/weekly [Session]
        {"score":"1200","subscore":"0","operator":1}
        "#);
    }

    #[test]
    fn test_delete_record() {
        let request = DeleteLeaderboardRecord::new("weekly")
            .to_request()
            .expect("request");

        insta::assert_snapshot!(describe(&request), @"DELETE /v2/leaderboard/weekly [Session]");
    }

    #[test]
    fn test_around_owner() {
        let request = ListLeaderboardRecordsAroundOwner::new("weekly", "user-1")
            .with_limit(5)
            .to_request()
            .expect("request");

        insta::assert_snapshot!(describe(&request), @"GET /v2/leaderboard/weekly/owner/user-1?limit=5 [Session]");
    }

    #[test]
    fn test_decode_record_list() {
        let json = r#"{
            "records": [{
                "leaderboard_id": "weekly",
                "owner_id": "user-1",
                "username": "one",
                "score": "1200",
                "subscore": "0",
                "num_score": 2,
                "rank": "1",
                "max_num_score": 1000000,
                "create_time": "2024-05-01T10:00:00Z"
            }],
            "rank_count": "42"
        }"#;

        let list: LeaderboardRecordList = serde_json::from_str(json).expect("records");

        let record = list.records.first().expect("a record");
        assert_eq!(record.score, 1200);
        assert_eq!(record.rank, 1);
        assert_eq!(record.username.as_deref(), Some("one"));
        assert_eq!(list.rank_count, 42);
        assert!(list.owner_records.is_empty());
    }
}
