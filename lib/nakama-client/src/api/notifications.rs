use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{ApiRequest, ApiResponse, Auth, CallQuery, Endpoint, NakamaError};

/// A notification in the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Notification {
    /// ID of the notification.
    pub id: String,
    /// Subject of the notification.
    pub subject: String,
    /// Content of the notification, a JSON object.
    pub content: String,
    /// Category code for this notification.
    pub code: i32,
    /// ID of the sender, if a user. Otherwise empty.
    pub sender_id: String,
    /// When the notification was created.
    pub create_time: Option<DateTime<Utc>>,
    /// True if this notification was persisted to the database.
    pub persistent: bool,
}

/// A page of notifications.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationList {
    /// The notifications.
    pub notifications: Vec<Notification>,
    /// Cursor to resume listing from, once new notifications arrive.
    pub cacheable_cursor: String,
}

/// Lists the notifications of the current user.
///
/// `GET /v2/notification`
#[derive(Debug, Clone, Default)]
pub struct ListNotifications {
    limit: Option<i32>,
    cacheable_cursor: Option<String>,
}

impl ListNotifications {
    /// Lists with the server defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Max number of notifications to return. Between 1 and 100.
    pub fn with_limit(mut self, limit: i32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Cursor returned by a previous listing.
    pub fn with_cacheable_cursor(mut self, cacheable_cursor: impl Into<String>) -> Self {
        self.cacheable_cursor = Some(cacheable_cursor.into());
        self
    }
}

impl Endpoint for ListNotifications {
    type Output = NotificationList;

    fn to_request(&self) -> Result<ApiRequest, NakamaError> {
        let query = CallQuery::new()
            .add_optional("limit", self.limit)
            .add_optional("cacheable_cursor", self.cacheable_cursor.as_deref());
        Ok(ApiRequest::get("/v2/notification", Auth::Session).with_query(query))
    }

    fn decode(&self, response: ApiResponse) -> Result<Self::Output, NakamaError> {
        response.json()
    }
}

/// Deletes notifications of the current user.
///
/// `DELETE /v2/notification`
#[derive(Debug, Clone, Default)]
pub struct DeleteNotifications {
    ids: Vec<String>,
}

impl DeleteNotifications {
    /// Deletes nothing yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a notification to delete.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.ids.push(id.into());
        self
    }

    /// Adds notifications to delete.
    pub fn with_ids<I>(mut self, ids: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.ids.extend(ids.into_iter().map(Into::into));
        self
    }
}

impl Endpoint for DeleteNotifications {
    type Output = ();

    fn to_request(&self) -> Result<ApiRequest, NakamaError> {
        let query = CallQuery::new().add_all("ids", &self.ids);
        Ok(ApiRequest::delete("/v2/notification", Auth::Session).with_query(query))
    }

    fn decode(&self, response: ApiResponse) -> Result<Self::Output, NakamaError> {
        response.discard();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::tests::describe;

    #[test]
    fn test_list_notifications() {
        let request = ListNotifications::new()
            .with_limit(50)
            .with_cacheable_cursor("cursor")
            .to_request()
            .expect("request");

        insta::assert_snapshot!(describe(&request), @"GET /v2/notification?limit=50&cacheable_cursor=cursor [Session]");
    }

    #[test]
    fn test_delete_notifications() {
        let request = DeleteNotifications::new()
            .with_ids(["n1", "n2"])
            .to_request()
            .expect("request");

        insta::assert_snapshot!(describe(&request), @"DELETE /v2/notification?ids=n1&ids=n2 [Session]");
    }

    #[test]
    fn test_delete_without_ids_has_no_query() {
        let request = DeleteNotifications::new().to_request().expect("request");

        assert!(request.query().is_empty());
    }
}
