//! Read-only wallet queries: nonce, threshold, owners.
//!
//! No record is touched; the query tool's ABI-hex answer is decoded and
//! printed.

use crate::config::{Network, RunContext};
use crate::error::WorkflowError;
use crate::parser::abi;
use crate::runner::{ExternalTool, OutputMode, ProcessRunner};
use crate::Result;

/// The wallet-contract views exposed as subcommands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SafeQuery {
    Nonce,
    Threshold,
    Owners,
}

impl SafeQuery {
    fn selector(&self) -> &'static str {
        match self {
            SafeQuery::Nonce => "nonce()",
            SafeQuery::Threshold => "getThreshold()",
            SafeQuery::Owners => "getOwners()",
        }
    }
}

pub async fn run(
    ctx: &RunContext,
    network: &Network,
    safe_addr: Option<&str>,
    query: SafeQuery,
) -> Result<()> {
    let safe_addr = safe_addr
        .filter(|a| !a.is_empty())
        .ok_or(WorkflowError::MissingParameter("safe-addr"))?;

    let runner = ProcessRunner::new(&ctx.workdir);
    let args = vec![
        "call".to_string(),
        safe_addr.to_string(),
        query.selector().to_string(),
        "--rpc-url".to_string(),
        network.rpc_url.clone(),
    ];
    let out = runner
        .run(ExternalTool::Cast, &args, &[], None, OutputMode::Spinner)
        .await?;

    match query {
        SafeQuery::Nonce | SafeQuery::Threshold => {
            println!("{}", abi::decode_uint(&out.stdout)?);
        }
        SafeQuery::Owners => {
            for owner in abi::decode_address_list(&out.stdout)? {
                println!("{}", owner);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selectors_match_the_wallet_abi() {
        assert_eq!(SafeQuery::Nonce.selector(), "nonce()");
        assert_eq!(SafeQuery::Threshold.selector(), "getThreshold()");
        assert_eq!(SafeQuery::Owners.selector(), "getOwners()");
    }
}
