use std::collections::HashSet;
use std::fmt::Display;
use std::sync::LazyLock;

use indexmap::IndexMap;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use regex::Regex;
use tracing::warn;

use crate::client::NakamaError;

/// Regular expression for matching path parameters in the format `{param_name}`.
static RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{(?<name>\w+)}").expect("a valid regex"));

/// Characters escaped in a path segment: everything but RFC 3986 unreserved characters.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

fn replace_path_param(path: &str, param_name: &str, value: &str) -> String {
    let pattern = ["{", param_name, "}"].concat();
    path.replace(&pattern, value)
}

fn encode_path_param_value(value: &str) -> String {
    utf8_percent_encode(value, PATH_SEGMENT).to_string()
}

/// A server-relative path template with named identifiers.
///
/// Identifiers are percent-encoded as a single path segment when the path is
/// resolved, so a `/` inside an identifier never changes the route.
///
/// ```rust
/// use nakama_client::CallPath;
///
/// let path = CallPath::from("/v2/group/{group_id}/join")
///     .add_param("group_id", "my group");
///
/// assert_eq!(path.resolve()?, "/v2/group/my%20group/join");
/// # Ok::<(), nakama_client::NakamaError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, derive_more::Display)]
#[display("{path}")]
pub struct CallPath {
    path: String,
    args: IndexMap<String, String>,
}

impl CallPath {
    /// Adds a path parameter with the given name and value.
    ///
    /// Adding the same name twice keeps the last value.
    pub fn add_param(mut self, name: impl Into<String>, value: impl Display) -> Self {
        self.args.insert(name.into(), value.to_string());
        self
    }

    /// The path template.
    pub fn template(&self) -> &str {
        &self.path
    }

    /// Substitutes every `{name}` placeholder with its encoded value.
    ///
    /// # Errors
    ///
    /// Returns [`NakamaError::PathUnresolved`] when a placeholder has no value,
    /// and [`NakamaError::InvalidPathSegment`] when a value is `.` or `..`.
    pub fn resolve(&self) -> Result<String, NakamaError> {
        let mut path = self.path.clone();
        let mut names: HashSet<String> = RE
            .captures_iter(&self.path)
            .filter_map(|caps| caps.name("name"))
            .map(|found| found.as_str().to_string())
            .collect();

        for (name, value) in &self.args {
            if !names.remove(name) {
                warn!(?name, template = %self.path, "argument name not found");
                continue;
            }
            if matches!(value.as_str(), "." | "..") {
                return Err(NakamaError::InvalidPathSegment {
                    path: self.path.clone(),
                    name: name.clone(),
                    value: value.clone(),
                });
            }
            path = replace_path_param(&path, name, &encode_path_param_value(value));
        }

        if names.is_empty() {
            return Ok(path);
        }

        let mut missings: Vec<_> = names.into_iter().collect();
        missings.sort();
        Err(NakamaError::PathUnresolved {
            path: self.path.clone(),
            missings,
        })
    }
}

impl From<&str> for CallPath {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<String> for CallPath {
    fn from(path: String) -> Self {
        Self {
            path,
            args: IndexMap::new(),
        }
    }
}
