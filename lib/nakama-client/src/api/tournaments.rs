use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::codec;
use super::leaderboards::{RecordWrite, RecordsQuery};
use super::{LeaderboardRecord, Operator};
use crate::{ApiRequest, ApiResponse, Auth, CallBody, CallPath, CallQuery, Endpoint, NakamaError};

/// A tournament on the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tournament {
    /// The id of the tournament.
    pub id: String,
    /// The title for the tournament.
    pub title: String,
    /// The description of the tournament.
    pub description: String,
    /// The category of the tournament, from 0 to 127.
    pub category: u32,
    /// ASC (0) or DESC (1) sort mode of scores.
    pub sort_order: u32,
    /// The current number of players in the tournament.
    pub size: u32,
    /// The maximum number of players for the tournament.
    pub max_size: u32,
    /// The maximum score updates allowed per player for the current tournament.
    pub max_num_score: u32,
    /// True if the tournament is active and can enter.
    pub can_enter: bool,
    /// The UNIX time when the tournament stops being active until the next reset.
    pub end_active: u32,
    /// The UNIX time when the tournament is next playable.
    pub next_reset: u32,
    /// Additional information stored as a JSON object.
    pub metadata: String,
    /// When the tournament was created.
    pub create_time: Option<DateTime<Utc>>,
    /// When the tournament will start.
    pub start_time: Option<DateTime<Utc>>,
    /// When the tournament will be stopped.
    pub end_time: Option<DateTime<Utc>>,
    /// Duration of the tournament in seconds.
    pub duration: u32,
    /// The UNIX time when the tournament start being active.
    pub start_active: u32,
    /// The UNIX time when the tournament was last reset.
    pub prev_reset: u32,
    /// Operator of the tournament.
    pub operator: Operator,
    /// Whether the tournament only accepts records from the server.
    pub authoritative: bool,
}

/// A page of tournaments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TournamentList {
    /// The tournaments.
    pub tournaments: Vec<Tournament>,
    /// Cursor for the next page, empty on the last one.
    pub cursor: String,
}

/// A page of tournament records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TournamentRecordList {
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

fn tournament_path(template: &str, tournament_id: &str) -> Result<String, NakamaError> {
    CallPath::from(template)
        .add_param("tournament_id", tournament_id)
        .resolve()
}

/// Lists the current and upcoming tournaments.
///
/// `GET /v2/tournament`
#[derive(Debug, Clone, Default)]
pub struct ListTournaments {
    category_start: Option<u32>,
    category_end: Option<u32>,
    start_time: Option<u32>,
    end_time: Option<u32>,
    limit: Option<i32>,
    cursor: Option<String>,
}

impl ListTournaments {
    /// Lists with the server defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Lower bound of the category range.
    pub fn with_category_start(mut self, category_start: u32) -> Self {
        self.category_start = Some(category_start);
        self
    }

    /// Upper bound of the category range.
    pub fn with_category_end(mut self, category_end: u32) -> Self {
        self.category_end = Some(category_end);
        self
    }

    /// Only tournaments starting after this UNIX time.
    pub fn with_start_time(mut self, start_time: u32) -> Self {
        self.start_time = Some(start_time);
        self
    }

    /// Only tournaments ending before this UNIX time.
    pub fn with_end_time(mut self, end_time: u32) -> Self {
        self.end_time = Some(end_time);
        self
    }

    /// Max number of tournaments to return.
    pub fn with_limit(mut self, limit: i32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Cursor returned by the previous page.
    pub fn with_cursor(mut self, cursor: impl Into<String>) -> Self {
        self.cursor = Some(cursor.into());
        self
    }
}

impl Endpoint for ListTournaments {
    type Output = TournamentList;

    fn to_request(&self) -> Result<ApiRequest, NakamaError> {
        let query = CallQuery::new()
            .add_optional("category_start", self.category_start)
            .add_optional("category_end", self.category_end)
            .add_optional("start_time", self.start_time)
            .add_optional("end_time", self.end_time)
            .add_optional("limit", self.limit)
            .add_optional("cursor", self.cursor.as_deref());
        Ok(ApiRequest::get("/v2/tournament", Auth::Session).with_query(query))
    }

    fn decode(&self, response: ApiResponse) -> Result<Self::Output, NakamaError> {
        response.json()
    }
}

/// Lists the records of a tournament.
///
/// `GET /v2/tournament/{tournament_id}`
#[derive(Debug, Clone)]
pub struct ListTournamentRecords {
    tournament_id: String,
    query: RecordsQuery,
}

impl ListTournamentRecords {
    /// Lists the records of the given tournament.
    pub fn new(tournament_id: impl Into<String>) -> Self {
        Self {
            tournament_id: tournament_id.into(),
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

impl Endpoint for ListTournamentRecords {
    type Output = TournamentRecordList;

    fn to_request(&self) -> Result<ApiRequest, NakamaError> {
        let path = tournament_path("/v2/tournament/{tournament_id}", &self.tournament_id)?;
        Ok(ApiRequest::get(path, Auth::Session).with_query(self.query.to_query()))
    }

    fn decode(&self, response: ApiResponse) -> Result<Self::Output, NakamaError> {
        response.json()
    }
}

/// Submits a score to a tournament the user has joined.
///
/// `PUT /v2/tournament/{tournament_id}`
#[derive(Debug, Clone)]
pub struct WriteTournamentRecord {
    tournament_id: String,
    record: RecordWrite,
}

impl WriteTournamentRecord {
    /// Submits `score` to the given tournament.
    pub fn new(tournament_id: impl Into<String>, score: i64) -> Self {
        Self {
            tournament_id: tournament_id.into(),
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

    /// Overrides the tournament operator for this submission.
    pub fn with_operator(mut self, operator: Operator) -> Self {
        self.record.operator = Some(operator);
        self
    }
}

impl Endpoint for WriteTournamentRecord {
    type Output = LeaderboardRecord;

    fn to_request(&self) -> Result<ApiRequest, NakamaError> {
        let path = tournament_path("/v2/tournament/{tournament_id}", &self.tournament_id)?;
        let body = CallBody::json(&self.record)?;
        Ok(ApiRequest::put(path, Auth::Session).with_body(body))
    }

    fn decode(&self, response: ApiResponse) -> Result<Self::Output, NakamaError> {
        response.json()
    }
}

/// Joins a tournament that requires joining before submitting scores.
///
/// `POST /v2/tournament/{tournament_id}/join`
#[derive(Debug, Clone)]
pub struct JoinTournament {
    tournament_id: String,
}

impl JoinTournament {
    /// Joins the given tournament.
    pub fn new(tournament_id: impl Into<String>) -> Self {
        Self {
            tournament_id: tournament_id.into(),
        }
    }
}

impl Endpoint for JoinTournament {
    type Output = ();

    fn to_request(&self) -> Result<ApiRequest, NakamaError> {
        let path = tournament_path("/v2/tournament/{tournament_id}/join", &self.tournament_id)?;
        Ok(ApiRequest::post(path, Auth::Session))
    }

    fn decode(&self, response: ApiResponse) -> Result<Self::Output, NakamaError> {
        response.discard();
        Ok(())
    }
}

/// Lists the tournament records around the record of an owner.
///
/// `GET /v2/tournament/{tournament_id}/owner/{owner_id}`
#[derive(Debug, Clone)]
pub struct ListTournamentRecordsAroundOwner {
    tournament_id: String,
    owner_id: String,
    limit: Option<u32>,
    expiry: Option<i64>,
    cursor: Option<String>,
}

impl ListTournamentRecordsAroundOwner {
    /// Lists around `owner_id` in the given tournament.
    pub fn new(tournament_id: impl Into<String>, owner_id: impl Into<String>) -> Self {
        Self {
            tournament_id: tournament_id.into(),
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

impl Endpoint for ListTournamentRecordsAroundOwner {
    type Output = TournamentRecordList;

    fn to_request(&self) -> Result<ApiRequest, NakamaError> {
        let path = CallPath::from("/v2/tournament/{tournament_id}/owner/{owner_id}")
            .add_param("tournament_id", &self.tournament_id)
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
