//! Request extractors
//!
//! Typed path and validated query extraction for the stats API.

mod path;
mod query;

pub use path::ChatIdPath;
pub use query::ValidatedQuery;
