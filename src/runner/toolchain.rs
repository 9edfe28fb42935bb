//! External tool registry and argument mapping.
//!
//! Maps workflow intent onto the concrete argv of each collaborator CLI so
//! the commands never assemble tool arguments by hand.

use crate::config::Network;

/// The collaborator executables the workflow shells out to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExternalTool {
    /// Chain-scripting tool (propose/verify/simulate/execute entry points).
    Forge,
    /// Wallet-query tool returning ABI-hex-encoded results.
    Cast,
    /// Detached signing tool fed the payload on stdin.
    Eip712Sign,
    /// Secret-manager CLI used to move record files between machines.
    Op,
}

impl ExternalTool {
    /// Get the CLI command name
    pub fn command(&self) -> &'static str {
        match self {
            ExternalTool::Forge => "forge",
            ExternalTool::Cast => "cast",
            ExternalTool::Eip712Sign => "eip712sign",
            ExternalTool::Op => "op",
        }
    }
}

/// Entry points of the chain-scripting tool, keyed by `--sig` selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptMode {
    /// Derive the canonical payload (and report the current nonce).
    Sign,
    /// Validate a concatenated signature set against the threshold.
    Verify,
    /// Dry-run the transaction with the signature set applied.
    Simulate,
    /// Broadcast the transaction.
    Execute,
}

impl ScriptMode {
    pub fn selector(&self) -> &'static str {
        match self {
            ScriptMode::Sign => "sign()",
            ScriptMode::Verify => "verify(bytes)",
            ScriptMode::Simulate | ScriptMode::Execute => "run(bytes)",
        }
    }

    /// Build the scripting-tool argv for this entry point.
    ///
    /// `signatures` is the concatenated signature blob for the byte-taking
    /// selectors; broadcast-mode signer flags are appended by the caller.
    pub fn build_args(
        &self,
        script_name: &str,
        signatures: Option<&str>,
        network: &Network,
    ) -> Vec<String> {
        let mut args = vec![
            "script".to_string(),
            script_name.to_string(),
            "--sig".to_string(),
            self.selector().to_string(),
        ];
        if let Some(sigs) = signatures {
            args.push(sigs.to_string());
        }
        args.push("--rpc-url".to_string());
        args.push(network.rpc_url.clone());
        args.push("--chain".to_string());
        args.push(network.chain_id.clone());
        args.push("--via-ir".to_string());
        if matches!(self, ScriptMode::Execute) {
            args.push("--broadcast".to_string());
        }
        args
    }
}
