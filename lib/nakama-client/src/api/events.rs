use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{ApiRequest, ApiResponse, Auth, CallBody, Endpoint, NakamaError};

/// Sends an analytics event to the server event pipeline.
///
/// `POST /v2/event`
///
/// ```rust
/// use nakama_client::Endpoint;
/// use nakama_client::api::SendEvent;
///
/// let request = SendEvent::new("level_completed")
///     .with_property("level", "3")
///     .to_request()?;
///
/// assert_eq!(request.path(), "/v2/event");
/// # Ok::<(), nakama_client::NakamaError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SendEvent {
    name: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    properties: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    timestamp: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    external: Option<bool>,
}

impl SendEvent {
    /// Creates an event with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: BTreeMap::new(),
            timestamp: None,
            external: None,
        }
    }

    /// Adds a property.
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Sets when the event happened; the server time is used otherwise.
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Marks the event as coming from outside the server.
    pub fn with_external(mut self, external: bool) -> Self {
        self.external = Some(external);
        self
    }
}

impl Endpoint for SendEvent {
    type Output = ();

    fn to_request(&self) -> Result<ApiRequest, NakamaError> {
        let body = CallBody::json(self)?;
        Ok(ApiRequest::post("/v2/event", Auth::Session).with_body(body))
    }

    fn decode(&self, response: ApiResponse) -> Result<Self::Output, NakamaError> {
        response.discard();
        Ok(())
    }
}
