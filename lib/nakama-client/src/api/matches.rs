use serde::{Deserialize, Serialize};

use crate::{ApiRequest, ApiResponse, Auth, CallQuery, Endpoint, NakamaError};

/// A realtime match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Match {
    /// The ID of the match, can be used to join.
    pub match_id: String,
    /// True if it's an server-managed authoritative match, false otherwise.
    pub authoritative: bool,
    /// Match label, if any.
    pub label: Option<String>,
    /// Current number of users in the match.
    pub size: i32,
    /// Tick rate of the match, for authoritative matches.
    pub tick_rate: i32,
    /// Handler name, for authoritative matches.
    pub handler_name: String,
}

/// A list of realtime matches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchList {
    /// The matches.
    pub matches: Vec<Match>,
}

/// Lists running matches, optionally filtered.
///
/// `GET /v2/match`
#[derive(Debug, Clone, Default)]
pub struct ListMatches {
    limit: Option<i32>,
    authoritative: Option<bool>,
    label: Option<String>,
    min_size: Option<i32>,
    max_size: Option<i32>,
    query: Option<String>,
}

impl ListMatches {
    /// Lists with the server defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Max number of matches to return.
    pub fn with_limit(mut self, limit: i32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Only authoritative, or only relayed, matches.
    pub fn with_authoritative(mut self, authoritative: bool) -> Self {
        self.authoritative = Some(authoritative);
        self
    }

    /// Only matches with this exact label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Only matches with at least this many users.
    pub fn with_min_size(mut self, min_size: i32) -> Self {
        self.min_size = Some(min_size);
        self
    }

    /// Only matches with at most this many users.
    pub fn with_max_size(mut self, max_size: i32) -> Self {
        self.max_size = Some(max_size);
        self
    }

    /// A search query against the match labels.
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }
}

impl Endpoint for ListMatches {
    type Output = MatchList;

    fn to_request(&self) -> Result<ApiRequest, NakamaError> {
        let query = CallQuery::new()
            .add_optional("limit", self.limit)
            .add_optional("authoritative", self.authoritative)
            .add_optional("label", self.label.as_deref())
            .add_optional("min_size", self.min_size)
            .add_optional("max_size", self.max_size)
            .add_optional("query", self.query.as_deref());
        Ok(ApiRequest::get("/v2/match", Auth::Session).with_query(query))
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
    fn test_list_matches() {
        let request = ListMatches::new()
            .with_limit(10)
            .with_authoritative(true)
            .with_min_size(0)
            .with_max_size(4)
            .with_query("+label.mode:ranked")
            .to_request()
            .expect("request");

        insta::assert_snapshot!(describe(&request), @"GET /v2/match?limit=10&authoritative=true&min_size=0&max_size=4&query=%2Blabel.mode%3Aranked [Session]");
    }

    #[test]
    fn test_decode_match_list() {
        let json = r#"{ "matches": [{ "match_id": "m1.nakama", "size": 2, "label": "{\"mode\":\"ranked\"}" }] }"#;

        let list: MatchList = serde_json::from_str(json).expect("matches");

        let first = list.matches.first().expect("a match");
        assert_eq!(first.size, 2);
        assert!(!first.authoritative);
        assert_eq!(first.label.as_deref(), Some(r#"{"mode":"ranked"}"#));
    }
}
