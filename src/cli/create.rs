//! Propose a transaction: derive the canonical payload and nonce, write a
//! fresh draft record.

use crate::config::{Network, RunContext};
use crate::error::WorkflowError;
use crate::models::TxRecord;
use crate::parser::forge;
use crate::runner::{ExternalTool, OutputMode, ProcessRunner, ScriptMode};
use crate::state::{RecordName, RecordStore};
use crate::Result;
use colored::Colorize;
use std::path::PathBuf;

pub async fn run(
    ctx: &RunContext,
    network: &Network,
    safe_addr: Option<&str>,
    target_addr: Option<&str>,
    safe_nonce: Option<&str>,
) -> Result<()> {
    let safe_addr = safe_addr
        .filter(|a| !a.is_empty())
        .ok_or(WorkflowError::MissingParameter("safe-addr"))?;
    let target_addr = target_addr
        .filter(|a| !a.is_empty())
        .ok_or(WorkflowError::MissingParameter("target-addr"))?;
    let requested_nonce = safe_nonce.filter(|n| !n.is_empty());

    println!("{}", "Proposing transaction...".cyan());

    let runner = ProcessRunner::new(&ctx.workdir);
    let env = vec![
        ("SAFE_ADDR".to_string(), safe_addr.to_string()),
        (
            "SAFE_NONCE".to_string(),
            requested_nonce.unwrap_or("").to_string(),
        ),
        ("TARGET_ADDR".to_string(), target_addr.to_string()),
    ];
    let args = ScriptMode::Sign.build_args(&ctx.script_name, None, network);
    let out = runner
        .run(ExternalTool::Forge, &args, &env, None, OutputMode::Stream)
        .await?;

    let nonce = match requested_nonce {
        Some(nonce) => nonce.to_string(),
        None => forge::extract_nonce(&out.stdout)?,
    };

    let record = TxRecord::new(
        network.chain_id.clone(),
        network.rpc_url.clone(),
        safe_addr,
        nonce.clone(),
        target_addr,
        ctx.script_name.clone(),
        forge::extract_data(&out.stdout),
    );

    let path = record_path(ctx, &nonce);
    RecordStore::new(path).save(&record)?;
    Ok(())
}

/// An explicit --tx-file wins; otherwise the draft lands in the `tx/`
/// directory under a stage-encoded name so listings show progress.
fn record_path(ctx: &RunContext, nonce: &str) -> PathBuf {
    match &ctx.tx_file {
        Some(path) => path.clone(),
        None => ctx
            .workdir
            .join("tx")
            .join(RecordName::draft(nonce).to_string()),
    }
}
