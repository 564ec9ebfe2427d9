use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{ApiRequest, ApiResponse, Auth, CallBody, CallPath, CallQuery, Endpoint, NakamaError};

/// Who can read a storage object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub enum StoragePermissionRead {
    /// Only the server can read the object.
    #[default]
    NoRead,
    /// Only the owner can read the object.
    OwnerRead,
    /// Anyone can read the object.
    PublicRead,
    /// A permission unknown to this client.
    Unrecognized(i32),
}

impl From<i32> for StoragePermissionRead {
    fn from(value: i32) -> Self {
        match value {
            0 => Self::NoRead,
            1 => Self::OwnerRead,
            2 => Self::PublicRead,
            other => Self::Unrecognized(other),
        }
    }
}

impl From<StoragePermissionRead> for i32 {
    fn from(value: StoragePermissionRead) -> Self {
        match value {
            StoragePermissionRead::NoRead => 0,
            StoragePermissionRead::OwnerRead => 1,
            StoragePermissionRead::PublicRead => 2,
            StoragePermissionRead::Unrecognized(other) => other,
        }
    }
}

/// Who can write a storage object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub enum StoragePermissionWrite {
    /// Only the server can write the object.
    #[default]
    NoWrite,
    /// Only the owner can write the object.
    OwnerWrite,
    /// A permission unknown to this client.
    Unrecognized(i32),
}

impl From<i32> for StoragePermissionWrite {
    fn from(value: i32) -> Self {
        match value {
            0 => Self::NoWrite,
            1 => Self::OwnerWrite,
            other => Self::Unrecognized(other),
        }
    }
}

impl From<StoragePermissionWrite> for i32 {
    fn from(value: StoragePermissionWrite) -> Self {
        match value {
            StoragePermissionWrite::NoWrite => 0,
            StoragePermissionWrite::OwnerWrite => 1,
            StoragePermissionWrite::Unrecognized(other) => other,
        }
    }
}

/// An object in the storage engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageObject {
    /// The collection which stores the object.
    pub collection: String,
    /// The key of the object within the collection.
    pub key: String,
    /// The user owner of the object.
    pub user_id: String,
    /// The value of the object, a JSON object.
    pub value: String,
    /// The version hash of the object.
    pub version: String,
    /// The read access permissions for the object.
    pub permission_read: StoragePermissionRead,
    /// The write access permissions for the object.
    pub permission_write: StoragePermissionWrite,
    /// When the object was created.
    pub create_time: Option<DateTime<Utc>>,
    /// When the object was last updated.
    pub update_time: Option<DateTime<Utc>>,
}

/// Storage objects.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageObjects {
    /// The storage objects.
    pub objects: Vec<StorageObject>,
}

/// A page of storage objects.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageObjectList {
    /// The storage objects.
    pub objects: Vec<StorageObject>,
    /// Cursor for the next page, empty on the last one.
    pub cursor: String,
}

/// The acknowledgement of a written object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageObjectAck {
    /// The collection which stores the object.
    pub collection: String,
    /// The key of the object within the collection.
    pub key: String,
    /// The version hash of the object.
    pub version: String,
    /// The owner of the object.
    pub user_id: String,
    /// When the object was created.
    pub create_time: Option<DateTime<Utc>>,
    /// When the object was last updated.
    pub update_time: Option<DateTime<Utc>>,
}

/// Acknowledgements of written objects.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageObjectAcks {
    /// One acknowledgement per written object.
    pub acks: Vec<StorageObjectAck>,
}

/// The identity of an object to read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReadStorageObjectId {
    collection: String,
    key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    user_id: Option<String>,
}

impl ReadStorageObjectId {
    /// Targets an object of the current user.
    pub fn new(collection: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            key: key.into(),
            user_id: None,
        }
    }

    /// Targets an object owned by another user.
    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }
}

/// Reads storage objects by identity.
///
/// `POST /v2/storage`
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReadStorageObjects {
    object_ids: Vec<ReadStorageObjectId>,
}

impl ReadStorageObjects {
    /// Reads nothing yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an object to read.
    pub fn with_object(mut self, object_id: ReadStorageObjectId) -> Self {
        self.object_ids.push(object_id);
        self
    }
}

impl Endpoint for ReadStorageObjects {
    type Output = StorageObjects;

    fn to_request(&self) -> Result<ApiRequest, NakamaError> {
        let body = CallBody::json(self)?;
        Ok(ApiRequest::post("/v2/storage", Auth::Session).with_body(body))
    }

    fn decode(&self, response: ApiResponse) -> Result<Self::Output, NakamaError> {
        response.json()
    }
}

/// An object to write.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WriteStorageObject {
    collection: String,
    key: String,
    value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    permission_read: Option<StoragePermissionRead>,
    #[serde(skip_serializing_if = "Option::is_none")]
    permission_write: Option<StoragePermissionWrite>,
}

impl WriteStorageObject {
    /// Writes `value`, a JSON object, at `collection`/`key`.
    pub fn new(
        collection: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            collection: collection.into(),
            key: key.into(),
            value: value.into(),
            ..Self::default()
        }
    }

    /// Writes a serializable value.
    ///
    /// # Errors
    ///
    /// Returns [`NakamaError::Serialization`] if the value cannot be serialized.
    pub fn json<T>(
        collection: impl Into<String>,
        key: impl Into<String>,
        value: &T,
    ) -> Result<Self, NakamaError>
    where
        T: Serialize + ?Sized,
    {
        let value = serde_json::to_string(value)?;
        Ok(Self::new(collection, key, value))
    }

    /// Only writes if the stored version matches; `*` only writes if absent.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Sets the read permission.
    pub fn with_permission_read(mut self, permission: StoragePermissionRead) -> Self {
        self.permission_read = Some(permission);
        self
    }

    /// Sets the write permission.
    pub fn with_permission_write(mut self, permission: StoragePermissionWrite) -> Self {
        self.permission_write = Some(permission);
        self
    }
}

/// Writes storage objects.
///
/// `PUT /v2/storage`
#[derive(Debug, Clone, Default, Serialize)]
pub struct WriteStorageObjects {
    objects: Vec<WriteStorageObject>,
}

impl WriteStorageObjects {
    /// Writes nothing yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an object to write.
    pub fn with_object(mut self, object: WriteStorageObject) -> Self {
        self.objects.push(object);
        self
    }
}

impl Endpoint for WriteStorageObjects {
    type Output = StorageObjectAcks;

    fn to_request(&self) -> Result<ApiRequest, NakamaError> {
        let body = CallBody::json(self)?;
        Ok(ApiRequest::put("/v2/storage", Auth::Session).with_body(body))
    }

    fn decode(&self, response: ApiResponse) -> Result<Self::Output, NakamaError> {
        response.json()
    }
}

/// The identity of an object to delete.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeleteStorageObjectId {
    collection: String,
    key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<String>,
}

impl DeleteStorageObjectId {
    /// Targets an object of the current user.
    pub fn new(collection: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            key: key.into(),
            version: None,
        }
    }

    /// Only deletes if the stored version matches.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }
}

/// Deletes storage objects of the current user.
///
/// `PUT /v2/storage/delete`
#[derive(Debug, Clone, Default, Serialize)]
pub struct DeleteStorageObjects {
    object_ids: Vec<DeleteStorageObjectId>,
}

impl DeleteStorageObjects {
    /// Deletes nothing yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an object to delete.
    pub fn with_object(mut self, object_id: DeleteStorageObjectId) -> Self {
        self.object_ids.push(object_id);
        self
    }
}

impl Endpoint for DeleteStorageObjects {
    type Output = ();

    fn to_request(&self) -> Result<ApiRequest, NakamaError> {
        let body = CallBody::json(self)?;
        Ok(ApiRequest::put("/v2/storage/delete", Auth::Session).with_body(body))
    }

    fn decode(&self, response: ApiResponse) -> Result<Self::Output, NakamaError> {
        response.discard();
        Ok(())
    }
}

/// Lists the readable objects of a collection.
///
/// `GET /v2/storage/{collection}` or `GET /v2/storage/{collection}/{user_id}`
#[derive(Debug, Clone)]
pub struct ListStorageObjects {
    collection: String,
    user_id: Option<String>,
    limit: Option<i32>,
    cursor: Option<String>,
}

impl ListStorageObjects {
    /// Lists the public objects of a collection.
    pub fn new(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            user_id: None,
            limit: None,
            cursor: None,
        }
    }

    /// Lists the objects of a collection owned by a user.
    pub fn for_user(collection: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            ..Self::new(collection)
        }
    }

    /// Max number of objects to return.
    pub fn with_limit(mut self, limit: i32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Cursor returned by the previous page.
    pub fn with_cursor(mut self, cursor: impl Into<String>) -> Self {
        self.cursor = Some(cursor.into());
        self
    }
}

impl Endpoint for ListStorageObjects {
    type Output = StorageObjectList;

    fn to_request(&self) -> Result<ApiRequest, NakamaError> {
        let path = match &self.user_id {
            Some(user_id) => CallPath::from("/v2/storage/{collection}/{user_id}")
                .add_param("collection", &self.collection)
                .add_param("user_id", user_id),
            None => {
                CallPath::from("/v2/storage/{collection}").add_param("collection", &self.collection)
            }
        };
        let query = CallQuery::new()
            .add_optional("limit", self.limit)
            .add_optional("cursor", self.cursor.as_deref());
        Ok(ApiRequest::get(path.resolve()?, Auth::Session).with_query(query))
    }

    fn decode(&self, response: ApiResponse) -> Result<Self::Output, NakamaError> {
        response.json()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::api::tests::describe;

    #[test]
    fn test_read_objects() {
        let request = ReadStorageObjects::new()
            .with_object(ReadStorageObjectId::new("saves", "slot-1"))
            .with_object(ReadStorageObjectId::new("profiles", "public").with_user_id("user-2"))
            .to_request()
            .expect("request");

        insta::assert_snapshot!(describe(&request), @r#"
        POST /v2/storage [Session]
        {"object_ids":[{"collection":"saves","key":"slot-1"},{"collection":"profiles","key":"public","user_id":"user-2"}]}
        "#);
    }

    #[test]
    fn test_write_objects() {
        let object = WriteStorageObject::json("saves", "slot-1", &json!({ "level": 3 }))
            .expect("serialized")
            .with_version("*")
            .with_permission_read(StoragePermissionRead::NoRead)
            .with_permission_write(StoragePermissionWrite::OwnerWrite);

        let request = WriteStorageObjects::new()
            .with_object(object)
            .to_request()
            .expect("request");

        insta::assert_snapshot!(describe(&request), @r#"
        PUT /v2/storage [Session]
        {"objects":[{"collection":"saves","key":"slot-1","value":"{\"level\":3}","version":"*","permission_read":0,"permission_write":1}]}
        "#);
    }

    #[test]
    fn test_delete_objects() {
        let request = DeleteStorageObjects::new()
            .with_object(DeleteStorageObjectId::new("saves", "slot-1").with_version("abc"))
            .to_request()
            .expect("request");

        insta::assert_snapshot!(describe(&request), @r#"
        PUT /v2/storage/delete [Session]
        {"object_ids":[{"collection":"saves","key":"slot-1","version":"abc"}]}
        "#);
    }

    #[test]
    fn test_list_objects() {
        let request = ListStorageObjects::new("leader board")
            .with_limit(0)
            .to_request()
            .expect("request");

        insta::assert_snapshot!(describe(&request), @"GET /v2/storage/leader%20board?limit=0 [Session]");
    }

    #[test]
    fn test_list_objects_for_user() {
        let request = ListStorageObjects::for_user("saves", "user-1")
            .with_cursor("next")
            .to_request()
            .expect("request");

        insta::assert_snapshot!(describe(&request), @"GET /v2/storage/saves/user-1?cursor=next [Session]");
    }

    #[test]
    fn test_decode_objects() {
        let json = r#"{
            "objects": [{
                "collection": "saves",
                "key": "slot-1",
                "user_id": "user-1",
                "value": "{\"level\":3}",
                "version": "abc",
                "permission_read": 2,
                "update_time": "2024-05-01T10:00:00Z"
            }]
        }"#;

        let objects: StorageObjects = serde_json::from_str(json).expect("objects");

        let object = objects.objects.first().expect("an object");
        assert_eq!(object.permission_read, StoragePermissionRead::PublicRead);
        // protobuf-JSON omits zero values
        assert_eq!(object.permission_write, StoragePermissionWrite::NoWrite);
    }
}
