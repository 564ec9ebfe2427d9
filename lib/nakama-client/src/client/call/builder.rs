use std::time::Duration;

use http::Method;
use tokio_util::sync::CancellationToken;

use super::ApiRequest;
use crate::client::{Auth, CallBody, CallQuery};

impl ApiRequest {
    /// Creates a request without query parameters nor body.
    pub fn new(method: Method, path: impl Into<String>, auth: Auth) -> Self {
        Self {
            method,
            path: path.into(),
            auth,
            query: CallQuery::default(),
            body: None,
            timeout: None,
            cancellation: None,
        }
    }

    /// Creates a `GET` request.
    pub fn get(path: impl Into<String>, auth: Auth) -> Self {
        Self::new(Method::GET, path, auth)
    }

    /// Creates a `POST` request.
    pub fn post(path: impl Into<String>, auth: Auth) -> Self {
        Self::new(Method::POST, path, auth)
    }

    /// Creates a `PUT` request.
    pub fn put(path: impl Into<String>, auth: Auth) -> Self {
        Self::new(Method::PUT, path, auth)
    }

    /// Creates a `DELETE` request.
    pub fn delete(path: impl Into<String>, auth: Auth) -> Self {
        Self::new(Method::DELETE, path, auth)
    }

    // =============================================================================
    // Request Configuration Methods
    // =============================================================================

    /// Replaces the query parameters.
    pub fn with_query(mut self, query: CallQuery) -> Self {
        self.query = query;
        self
    }

    /// Sets the request body.
    pub fn with_body(mut self, body: CallBody) -> Self {
        self.body = Some(body);
        self
    }

    /// Sets the request body if present.
    pub fn with_body_option(mut self, body: Option<CallBody>) -> Self {
        self.body = body;
        self
    }

    /// Overrides the client timeout for this request.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Aborts the request as soon as the token is cancelled.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    // =============================================================================
    // Accessors
    // =============================================================================

    /// The HTTP method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The server-relative path, identifiers already escaped.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The credential the endpoint requires.
    pub fn auth(&self) -> Auth {
        self.auth
    }

    /// The query parameters.
    pub fn query(&self) -> &CallQuery {
        &self.query
    }

    /// The request body, if any.
    pub fn body(&self) -> Option<&CallBody> {
        self.body.as_ref()
    }
}
