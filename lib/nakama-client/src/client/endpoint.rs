use std::future::Future;

use super::{ApiRequest, ApiResponse, NakamaClient, NakamaError};

/// A Nakama REST operation.
///
/// An endpoint is a plain data struct: its constructor takes the identifiers
/// that end up in the path, and `with_*` setters record the optional fields.
/// [`to_request`](Self::to_request) maps it to an [`ApiRequest`] without side
/// effects; [`decode`](Self::decode) turns the successful response into the
/// operation output.
///
/// Implementations never wrap dispatcher errors: whatever the dispatcher
/// returns reaches the caller unchanged.
///
/// # Example
///
/// ```rust
/// use nakama_client::{ApiRequest, ApiResponse, Auth, CallPath, Endpoint, NakamaError};
///
/// struct GetWallet {
///     user_id: String,
/// }
///
/// impl Endpoint for GetWallet {
///     type Output = serde_json::Value;
///
///     fn to_request(&self) -> Result<ApiRequest, NakamaError> {
///         let path = CallPath::from("/v2/wallet/{user_id}")
///             .add_param("user_id", &self.user_id)
///             .resolve()?;
///         Ok(ApiRequest::get(path, Auth::Session))
///     }
///
///     fn decode(&self, response: ApiResponse) -> Result<Self::Output, NakamaError> {
///         response.json()
///     }
/// }
/// ```
pub trait Endpoint {
    /// The decoded result of a successful call.
    type Output;

    /// Maps the endpoint fields to a request descriptor.
    ///
    /// # Errors
    ///
    /// Fails when the path cannot be resolved or the body cannot be serialized.
    fn to_request(&self) -> Result<ApiRequest, NakamaError>;

    /// Decodes a successful response.
    ///
    /// # Errors
    ///
    /// Returns [`NakamaError::Decode`] when the body does not match the output type.
    fn decode(&self, response: ApiResponse) -> Result<Self::Output, NakamaError>;

    /// Sends this endpoint through the client.
    ///
    /// Shorthand for [`NakamaClient::send`].
    fn send(self, client: &NakamaClient) -> impl Future<Output = Result<Self::Output, NakamaError>>
    where
        Self: Sized,
    {
        client.send(self)
    }
}
