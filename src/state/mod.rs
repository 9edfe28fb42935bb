//! Record persistence and filename stage encoding.
//!
//! The JSON document is the source of truth; the filename is an advisory
//! side channel so a directory listing alone communicates workflow
//! progress.

pub mod filename;
pub mod store;

pub use filename::{RecordName, Stage};
pub use store::RecordStore;
