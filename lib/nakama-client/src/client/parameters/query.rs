use std::fmt::Display;

use indexmap::IndexMap;

use crate::client::NakamaError;

/// Query parameters of a call.
///
/// Values are stored as strings, in insertion order. A key can carry several
/// values, emitted as repeated keys (`ids=a&ids=b`), which is how Nakama reads
/// repeated fields.
///
/// Optional fields go through [`add_optional`](Self::add_optional): the key is
/// present if and only if the value is `Some`, whatever the value. This lets
/// `Some(0)` or `Some(false)` reach the server instead of its default.
///
/// ```rust
/// use nakama_client::CallQuery;
///
/// let query = CallQuery::new()
///     .add_optional("limit", Some(0))
///     .add_optional("cursor", None::<&str>)
///     .add_all("ids", ["a", "b"]);
///
/// assert_eq!(query.to_query_string()?, "limit=0&ids=a&ids=b");
/// # Ok::<(), nakama_client::NakamaError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallQuery {
    params: IndexMap<String, Vec<String>>,
}

impl CallQuery {
    /// Creates an empty query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a value for the given key.
    pub fn add_param(mut self, name: impl Into<String>, value: impl Display) -> Self {
        self.params
            .entry(name.into())
            .or_default()
            .push(value.to_string());
        self
    }

    /// Appends the value if it is present, leaves the key out otherwise.
    pub fn add_optional<T: Display>(self, name: impl Into<String>, value: Option<T>) -> Self {
        match value {
            Some(value) => self.add_param(name, value),
            None => self,
        }
    }

    /// Appends every value of the iterator under the same key.
    ///
    /// An empty iterator leaves the key out.
    pub fn add_all<I>(self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator,
        I::Item: Display,
    {
        let name = name.into();
        values
            .into_iter()
            .fold(self, |query, value| query.add_param(name.clone(), value))
    }

    /// Whether the query has no parameter.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Whether the key is present.
    pub fn contains_key(&self, name: &str) -> bool {
        self.params.contains_key(name)
    }

    /// Values of a key, in insertion order.
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.params.get(name).map(Vec::as_slice)
    }

    /// Iterates over every `(key, value)` pair.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.params.iter().flat_map(|(name, values)| {
            values
                .iter()
                .map(move |value| (name.as_str(), value.as_str()))
        })
    }

    /// Serializes the query as an `application/x-www-form-urlencoded` string.
    ///
    /// # Errors
    ///
    /// Returns [`NakamaError::QuerySerialization`] if the encoder rejects a pair.
    pub fn to_query_string(&self) -> Result<String, NakamaError> {
        let pairs: Vec<_> = self.pairs().collect();
        let result = serde_urlencoded::to_string(pairs)?;
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_query() {
        let query = CallQuery::new();

        assert!(query.is_empty());
        assert_eq!(query.to_query_string().expect("serialized"), "");
    }

    #[test]
    fn test_optional_absent_is_omitted() {
        let query = CallQuery::new()
            .add_optional("limit", None::<i32>)
            .add_optional("open", None::<bool>)
            .add_optional("cursor", None::<&str>);

        assert!(query.is_empty());
        assert!(!query.contains_key("limit"));
    }

    #[test]
    fn test_optional_zero_values_are_kept() {
        let query = CallQuery::new()
            .add_optional("limit", Some(0))
            .add_optional("open", Some(false))
            .add_optional("name", Some(""));

        insta::assert_snapshot!(query.to_query_string().expect("serialized"), @"limit=0&open=false&name=");
    }

    #[test]
    fn test_repeated_values() {
        let query = CallQuery::new()
            .add_all("ids", ["a", "b"])
            .add_all("usernames", Vec::<String>::new())
            .add_param("ids", "c");

        assert_eq!(
            query.get("ids"),
            Some(&["a".to_string(), "b".to_string(), "c".to_string()][..])
        );
        assert!(!query.contains_key("usernames"));
        insta::assert_snapshot!(query.to_query_string().expect("serialized"), @"ids=a&ids=b&ids=c");
    }

    #[test]
    fn test_values_are_form_encoded() {
        let query = CallQuery::new()
            .add_param("label", "team & co")
            .add_param("query", "+label.mode:ranked");

        insta::assert_snapshot!(query.to_query_string().expect("serialized"), @"label=team+%26+co&query=%2Blabel.mode%3Aranked");
    }
}
