use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{ApiRequest, ApiResponse, Auth, CallPath, CallQuery, Endpoint, NakamaError};

/// A message sent on a channel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelMessage {
    /// The channel this message belongs to.
    pub channel_id: String,
    /// The unique ID of this message.
    pub message_id: String,
    /// The code representing a message type or category.
    pub code: i32,
    /// Message sender, usually a user ID.
    pub sender_id: String,
    /// The username of the message sender, if any.
    pub username: String,
    /// The content payload, a JSON object.
    pub content: String,
    /// When the message was created.
    pub create_time: Option<DateTime<Utc>>,
    /// When the message was last updated.
    pub update_time: Option<DateTime<Utc>>,
    /// True if the message was persisted to the channel's history.
    pub persistent: bool,
    /// The name of the chat room, or an empty string.
    pub room_name: String,
    /// The ID of the group, or an empty string.
    pub group_id: String,
    /// The ID of the first DM user, or an empty string.
    pub user_id_one: String,
    /// The ID of the second DM user, or an empty string.
    pub user_id_two: String,
}

/// A page of channel messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelMessageList {
    /// The messages.
    pub messages: Vec<ChannelMessage>,
    /// The cursor to send when retrieving the next page.
    pub next_cursor: String,
    /// The cursor to send when retrieving the previous page.
    pub prev_cursor: String,
    /// Cursor to resume listing from, once new messages arrive.
    pub cacheable_cursor: String,
}

/// Lists the message history of a channel.
///
/// `GET /v2/channel/{channel_id}`
#[derive(Debug, Clone)]
pub struct ListChannelMessages {
    channel_id: String,
    limit: Option<i32>,
    forward: Option<bool>,
    cursor: Option<String>,
}

impl ListChannelMessages {
    /// Lists the messages of the given channel.
    pub fn new(channel_id: impl Into<String>) -> Self {
        Self {
            channel_id: channel_id.into(),
            limit: None,
            forward: None,
            cursor: None,
        }
    }

    /// Max number of messages to return. Between 1 and 100.
    pub fn with_limit(mut self, limit: i32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// True to list from oldest to newest.
    pub fn with_forward(mut self, forward: bool) -> Self {
        self.forward = Some(forward);
        self
    }

    /// Cursor returned by the previous page.
    pub fn with_cursor(mut self, cursor: impl Into<String>) -> Self {
        self.cursor = Some(cursor.into());
        self
    }
}

impl Endpoint for ListChannelMessages {
    type Output = ChannelMessageList;

    fn to_request(&self) -> Result<ApiRequest, NakamaError> {
        let path = CallPath::from("/v2/channel/{channel_id}")
            .add_param("channel_id", &self.channel_id)
            .resolve()?;
        let query = CallQuery::new()
            .add_optional("limit", self.limit)
            .add_optional("forward", self.forward)
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
    fn test_channel_id_is_escaped() {
        let request = ListChannelMessages::new("2...general")
            .to_request()
            .expect("request");

        insta::assert_snapshot!(describe(&request), @"GET /v2/channel/2...general [Session]");
    }

    #[test]
    fn test_forward_false_is_sent() {
        let request = ListChannelMessages::new("3.group/1")
            .with_limit(10)
            .with_forward(false)
            .to_request()
            .expect("request");

        insta::assert_snapshot!(describe(&request), @"GET /v2/channel/3.group%2F1?limit=10&forward=false [Session]");
    }

    #[test]
    fn test_decode_messages() {
        let json = r#"{
            "messages": [{
                "channel_id": "2...general",
                "message_id": "m1",
                "code": 0,
                "sender_id": "user-1",
                "content": "{\"text\":\"hello\"}",
                "persistent": true,
                "room_name": "general"
            }],
            "next_cursor": "n"
        }"#;

        let list: ChannelMessageList = serde_json::from_str(json).expect("messages");

        let message = list.messages.first().expect("a message");
        assert_eq!(message.room_name, "general");
        assert!(message.persistent);
        assert_eq!(list.next_cursor, "n");
        assert!(list.prev_cursor.is_empty());
    }
}
