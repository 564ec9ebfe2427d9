//! Serde helpers for the protobuf-JSON mapping used by Nakama.
//!
//! 64-bit integers are written as JSON strings and read from either a
//! string or a number.

use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserializer, Serializer};

struct Int64Visitor;

impl Visitor<'_> for Int64Visitor {
    type Value = i64;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a 64-bit integer, as a number or a string")
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<i64, E> {
        Ok(value)
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<i64, E> {
        i64::try_from(value).map_err(|_| E::invalid_value(de::Unexpected::Unsigned(value), &self))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<i64, E> {
        value
            .parse()
            .map_err(|_| E::invalid_value(de::Unexpected::Str(value), &self))
    }
}

/// `#[serde(with = "codec::int64")]` for `i64` fields.
pub(crate) mod int64 {
    use super::{Deserializer, Int64Visitor, Serializer};

    #[allow(clippy::trivially_copy_pass_by_ref)]
    pub(crate) fn serialize<S: Serializer>(value: &i64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub(crate) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        deserializer.deserialize_any(Int64Visitor)
    }
}

/// `#[serde(with = "codec::option_int64")]` for `Option<i64>` fields.
///
/// Pair with `default` and `skip_serializing_if = "Option::is_none"`.
pub(crate) mod option_int64 {
    use serde::Deserialize;

    use super::{Deserializer, Int64Visitor, Serializer};

    #[allow(clippy::ref_option)]
    pub(crate) fn serialize<S: Serializer>(
        value: &Option<i64>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(value) => serializer.collect_str(value),
            None => serializer.serialize_none(),
        }
    }

    pub(crate) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<i64>, D::Error> {
        #[derive(Deserialize)]
        struct Wrapped(#[serde(deserialize_with = "deserialize_int64")] i64);

        fn deserialize_int64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
            deserializer.deserialize_any(Int64Visitor)
        }

        let value = Option::<Wrapped>::deserialize(deserializer)?;
        Ok(value.map(|Wrapped(value)| value))
    }
}
