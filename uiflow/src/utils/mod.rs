//! Small shared utilities.

mod timestamps;

pub use timestamps::{artifact_timestamp, iso_timestamp, Timestamp};
