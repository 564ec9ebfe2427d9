use bytes::Bytes;
use headers::ContentType;
use serde::Serialize;

use crate::client::NakamaError;

/// The body of an HTTP request with its content type.
#[derive(Clone, derive_more::Debug)]
pub struct CallBody {
    pub(in crate::client) content_type: ContentType,
    #[debug(ignore)]
    pub(in crate::client) data: Bytes,
}

impl CallBody {
    /// Creates a JSON body from a serializable type.
    ///
    /// Nakama reads protobuf-JSON: model types of this crate already encode
    /// 64-bit integers as strings and skip unset optional fields.
    ///
    /// # Errors
    ///
    /// Returns [`NakamaError::Serialization`] if the value cannot be serialized.
    pub fn json<T>(value: &T) -> Result<Self, NakamaError>
    where
        T: Serialize + ?Sized,
    {
        let data = serde_json::to_vec(value)?;
        Ok(Self {
            content_type: ContentType::json(),
            data: Bytes::from(data),
        })
    }

    /// Creates a raw body with a custom content type.
    pub fn raw(data: impl Into<Bytes>, content_type: ContentType) -> Self {
        Self {
            content_type,
            data: data.into(),
        }
    }

    /// The content type sent with the body.
    pub fn content_type(&self) -> &ContentType {
        &self.content_type
    }

    /// The encoded body.
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}
