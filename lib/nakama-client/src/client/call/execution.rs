use std::time::Duration;

use headers::{ContentType, HeaderMapExt};
use http::Method;
use reqwest::{Body, Request};
use tracing::{debug, trace, warn};
use url::Url;

use super::ApiRequest;
use crate::client::auth::AppliedCredential;
use crate::client::{ApiErrorBody, ApiResponse, CallBody, CallQuery, NakamaClient, NakamaError};

impl NakamaClient {
    /// Performs exactly one HTTP request/response cycle.
    ///
    /// This is the single entry point every endpoint goes through:
    ///
    /// 1. the endpoint credential is resolved; a missing one fails with
    ///    [`NakamaError::AuthenticationRequired`] before any network I/O,
    /// 2. the URL is built from the base URL, the path and the query,
    /// 3. the request is sent once, never retried,
    /// 4. a status outside of 2xx yields [`NakamaError::Api`] with the decoded
    ///    error payload; a network failure yields [`NakamaError::Transport`].
    ///
    /// Dropping the returned future aborts the in-flight request. A request
    /// carrying a cancellation token returns [`NakamaError::Cancelled`] as soon
    /// as the token is cancelled.
    ///
    /// # Errors
    ///
    /// See above.
    pub async fn dispatch(&self, request: ApiRequest) -> Result<ApiResponse, NakamaError> {
        let ApiRequest {
            method,
            path,
            auth,
            query,
            body,
            timeout,
            cancellation,
        } = request;

        let credential = self.credentials.resolve(auth, &path)?;
        if cancellation
            .as_ref()
            .is_some_and(tokio_util::sync::CancellationToken::is_cancelled)
        {
            return Err(NakamaError::Cancelled { path });
        }

        let url = Self::build_url(&self.base_url, &path, &query)?;
        let request = Self::build_request(method, url, credential, body, timeout.or(self.timeout));

        let exchange = self.exchange(request, &path);
        match cancellation {
            None => exchange.await,
            Some(token) => {
                tokio::select! {
                    biased;
                    () = token.cancelled() => {
                        debug!(%path, "request cancelled");
                        Err(NakamaError::Cancelled { path: path.clone() })
                    }
                    result = exchange => result,
                }
            }
        }
    }

    async fn exchange(&self, request: Request, path: &str) -> Result<ApiResponse, NakamaError> {
        debug!(method = %request.method(), %path, "sending...");
        let response = self.client.execute(request).await?;
        let status = response.status();
        debug!(%status, %path, "...receiving");

        let content_type = response.headers().typed_get::<ContentType>();
        let body = response.bytes().await?;

        if !status.is_success() {
            let body = ApiErrorBody::from_bytes(&body);
            warn!(%status, %path, error = %body, "request failed");
            return Err(NakamaError::Api {
                status_code: status.as_u16(),
                body,
            });
        }

        Ok(ApiResponse::new(path.to_string(), status, content_type, body))
    }

    pub(super) fn build_url(
        base_url: &Url,
        path: &str,
        query: &CallQuery,
    ) -> Result<Url, NakamaError> {
        let url = format!(
            "{}/{}",
            base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        let mut url = url.parse::<Url>()?;

        if !query.is_empty() {
            let query_string = query.to_query_string()?;
            let names: Vec<_> = query.pairs().map(|(name, _)| name).collect();
            trace!(%path, ?names, "query parameters");
            url.set_query(Some(&query_string));
        }

        Ok(url)
    }

    pub(super) fn build_request(
        method: Method,
        url: Url,
        credential: Option<AppliedCredential>,
        body: Option<CallBody>,
        timeout: Option<Duration>,
    ) -> Request {
        let mut request = Request::new(method, url);

        if let Some(credential) = credential {
            credential.apply(&mut request);
        }

        if let Some(body) = body {
            let CallBody { content_type, data } = body;
            request.headers_mut().typed_insert(content_type);
            *request.body_mut() = Some(Body::from(data));
        }

        if let Some(timeout) = timeout {
            *request.timeout_mut() = Some(timeout);
        }

        request
    }
}
