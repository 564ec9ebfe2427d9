use headers::ContentType;
use http::Method;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::{
    ApiRequest, ApiResponse, Auth, CallBody, CallPath, CallQuery, Endpoint, NakamaError,
    SecureString,
};

/// The result of a server function.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RpcResponse {
    /// The identifier of the function.
    pub id: String,
    /// The payload returned by the function, usually a JSON object.
    pub payload: String,
}

impl RpcResponse {
    /// Decodes the payload as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`NakamaError::Decode`] when the payload does not match `T`.
    pub fn decode_payload<T>(&self) -> Result<T, NakamaError>
    where
        T: DeserializeOwned,
    {
        let deserializer = &mut serde_json::Deserializer::from_str(&self.payload);
        serde_path_to_error::deserialize(deserializer).map_err(|error| {
            NakamaError::decode(&format!("rpc:{}", self.id), error, self.payload.as_bytes())
        })
    }
}

/// Executes a function registered in the server runtime.
///
/// The payload is an opaque string, usually a JSON object, handed to the
/// function as-is. By default it travels as a JSON string in the body, and the
/// response is an [`RpcResponse`] envelope. With [`with_unwrap`](Self::with_unwrap)
/// both travel raw.
///
/// Called with the session when one is bound to the client, with the
/// client's HTTP key otherwise.
///
/// `POST /v2/rpc/{id}` or `GET /v2/rpc/{id}`
///
/// ```rust
/// use nakama_client::Endpoint;
/// use nakama_client::api::Rpc;
///
/// let request = Rpc::new("rewards")
///     .with_payload(r#"{"rewards":5}"#)
///     .to_request()?;
///
/// let body = request.body().map(|body| body.data().to_vec());
/// assert_eq!(body.as_deref(), Some(br#""{\"rewards\":5}""#.as_slice()));
/// # Ok::<(), nakama_client::NakamaError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Rpc {
    id: String,
    method: Method,
    payload: Option<String>,
    unwrap: Option<bool>,
    http_key: Option<SecureString>,
}

impl Rpc {
    /// Calls the function with a `POST`.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            method: Method::POST,
            payload: None,
            unwrap: None,
            http_key: None,
        }
    }

    /// Calls the function with a `GET`; the payload goes in the query.
    pub fn get(id: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            ..Self::new(id)
        }
    }

    /// Sets the payload.
    pub fn with_payload(mut self, payload: impl Into<String>) -> Self {
        self.payload = Some(payload.into());
        self
    }

    /// Sets the payload from a serializable value.
    ///
    /// # Errors
    ///
    /// Returns [`NakamaError::Serialization`] if the value cannot be serialized.
    pub fn with_json_payload<T>(self, payload: &T) -> Result<Self, NakamaError>
    where
        T: Serialize + ?Sized,
    {
        let payload = serde_json::to_string(payload)?;
        Ok(self.with_payload(payload))
    }

    /// Sends the payload and reads the response without the JSON string envelope.
    pub fn with_unwrap(mut self, unwrap: bool) -> Self {
        self.unwrap = Some(unwrap);
        self
    }

    /// Authenticates with this HTTP key instead of the client credentials.
    pub fn with_http_key(mut self, http_key: impl Into<SecureString>) -> Self {
        self.http_key = Some(http_key.into());
        self
    }

    fn is_unwrapped(&self) -> bool {
        self.unwrap.unwrap_or(false)
    }
}

impl Endpoint for Rpc {
    type Output = RpcResponse;

    fn to_request(&self) -> Result<ApiRequest, NakamaError> {
        let path = CallPath::from("/v2/rpc/{id}")
            .add_param("id", &self.id)
            .resolve()?;

        let mut query = CallQuery::new().add_optional("unwrap", self.unwrap);
        let auth = match &self.http_key {
            Some(http_key) => {
                query = query.add_param("http_key", http_key.as_str());
                Auth::None
            }
            None => Auth::SessionOrHttpKey,
        };

        let request = if self.method == Method::GET {
            let query = query.add_optional("payload", self.payload.as_deref());
            ApiRequest::get(path, auth).with_query(query)
        } else {
            let body = match &self.payload {
                Some(payload) if self.is_unwrapped() => {
                    Some(CallBody::raw(payload.clone(), ContentType::json()))
                }
                Some(payload) => Some(CallBody::json(payload)?),
                None => None,
            };
            ApiRequest::post(path, auth)
                .with_query(query)
                .with_body_option(body)
        };

        Ok(request)
    }

    fn decode(&self, response: ApiResponse) -> Result<Self::Output, NakamaError> {
        if self.is_unwrapped() {
            return Ok(RpcResponse {
                id: self.id.clone(),
                payload: response.text().into_owned(),
            });
        }
        response.json()
    }
}
