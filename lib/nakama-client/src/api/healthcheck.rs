use crate::{ApiRequest, ApiResponse, Auth, Endpoint, NakamaError};

/// Checks that the server is up.
///
/// `GET /healthcheck`
#[derive(Debug, Clone, Default)]
pub struct Healthcheck;

impl Healthcheck {
    /// Creates the request.
    pub fn new() -> Self {
        Self
    }
}

impl Endpoint for Healthcheck {
    type Output = ();

    fn to_request(&self) -> Result<ApiRequest, NakamaError> {
        Ok(ApiRequest::get("/healthcheck", Auth::None))
    }

    fn decode(&self, response: ApiResponse) -> Result<Self::Output, NakamaError> {
        response.discard();
        Ok(())
    }
}
