//! Search execution.
//!
//! Queries are compiled into a backend search body, dispatched (or handed to an
//! escalation callback), and the response is read back into an ordered
//! `SearchResultSet`.

mod executor;
mod query;
mod request;
mod response;

pub use executor::{execute_search, SearchOutcome};
pub use query::{EscalationCallback, ResultTransform, SearchQuery};
pub use request::compile_search_body;
pub use response::{parse_search_response, total_count};
