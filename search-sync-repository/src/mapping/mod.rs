//! Mapping search hits back to records.
//!
//! Two paths exist. Eager mapping turns hits into an in-memory list of records
//! or identity placeholders. Lazy mapping hydrates full records from the record
//! store as a stream, in the same relevance order as the hits.

mod eager;
mod lazy;

pub use eager::{map_hits, HitRef, MappedRecord};
pub use lazy::{map_hits_lazy, RecordStream};
