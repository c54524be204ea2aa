//! This module defines the core data structures used across the search sync layer.
//! It groups record, query and result types.

pub mod record;
pub mod search_query;
pub mod search_result;
