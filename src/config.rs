//! Run context threaded into every command.
//!
//! Flags that used to be ambient globals are carried as an explicit value so
//! each transition states what it depends on.

use crate::error::WorkflowError;
use std::path::PathBuf;

/// Fallback RPC endpoint when neither the flag nor the record supplies one.
pub const DEFAULT_RPC_URL: &str = "https://eth.llamarpc.com";

/// Fallback chain id (mainnet).
pub const DEFAULT_CHAIN_ID: &str = "1";

/// Default hierarchical-deterministic derivation path for mnemonic or
/// hardware-device signing.
pub const DEFAULT_HD_PATH: &str = "m/44'/60'/0'/0/0";

/// Values shared by every subcommand.
#[derive(Debug, Clone)]
pub struct RunContext {
    /// Directory the collaborator tools run in.
    pub workdir: PathBuf,
    /// Transaction record file, when one is required or explicitly chosen.
    pub tx_file: Option<PathBuf>,
    /// Scripting entry point bound to the transaction.
    pub script_name: String,
}

impl RunContext {
    /// The record path for commands that operate on an existing record.
    pub fn record_path(&self) -> Result<PathBuf, WorkflowError> {
        self.tx_file
            .clone()
            .ok_or(WorkflowError::MissingParameter("tx-file"))
    }
}

/// Target network, with the original fallbacks applied.
#[derive(Debug, Clone)]
pub struct Network {
    pub chain_id: String,
    pub rpc_url: String,
}

impl Network {
    /// Resolve flags into a concrete network selection.
    pub fn resolve(chain: Option<String>, rpc_url: Option<String>) -> Self {
        Self {
            chain_id: chain
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| DEFAULT_CHAIN_ID.to_string()),
            rpc_url: rpc_url
                .filter(|u| !u.is_empty())
                .unwrap_or_else(|| DEFAULT_RPC_URL.to_string()),
        }
    }

    /// Network for a loaded record: the record's values, unless the operator
    /// overrides the endpoint for this invocation.
    pub fn for_record(chain_id: &str, record_rpc: &str, rpc_override: Option<&str>) -> Self {
        Self {
            chain_id: chain_id.to_string(),
            rpc_url: rpc_override
                .filter(|u| !u.is_empty())
                .unwrap_or(record_rpc)
                .to_string(),
        }
    }
}
