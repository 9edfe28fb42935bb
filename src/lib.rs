// Cosigner - offline coordination for Safe multisig transactions
// Proposes a transaction once, collects detached signatures from key-holders
// on disconnected machines, merges them, and verifies/simulates/executes
// through external chain tooling.

pub mod cli;
pub mod config;
pub mod error;
pub mod merge;
pub mod models;
pub mod parser;
pub mod runner;
pub mod state;

pub use anyhow::{Context, Result};
pub use colored::Colorize;

// Re-export commonly used types
pub use error::WorkflowError;
pub use models::{SignatureEntry, SigningMethod, TxRecord, TxStage};
pub use state::{RecordName, RecordStore, Stage};
