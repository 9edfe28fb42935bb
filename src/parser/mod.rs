//! Extraction grammars for collaborator output.
//!
//! Each collaborator gets its own narrow parser so a future
//! structured-output tool can be substituted without touching the workflow
//! commands. All extractors are pure functions of the captured text.

pub mod abi;
pub mod forge;
pub mod signer;
