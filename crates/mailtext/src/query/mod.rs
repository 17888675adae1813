//! Search query API
//!
//! Turns user-facing search criteria into the query string consumed by
//! the mail search collaborator.

mod builder;

pub use builder::build_query;
