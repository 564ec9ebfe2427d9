//! Request parameter types for building API calls.
//!
//! - [`CallPath`] - Path templates with escaped identifiers (e.g., `/v2/group/{group_id}`)
//! - [`CallQuery`] - Query string parameters with presence semantics
//! - [`CallBody`] - Request body content

mod path;
pub use self::path::CallPath;

mod query;
pub use self::query::CallQuery;

mod body;
pub use self::body::CallBody;
