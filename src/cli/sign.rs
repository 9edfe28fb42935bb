//! Add this operator's detached signature to the record.
//!
//! The canonical payload is re-derived through the scripting tool bound to
//! the signer, then handed to the detached signing tool on stdin. The
//! record keeps at most one signature per signer.

use crate::config::{Network, RunContext};
use crate::error::WorkflowError;
use crate::models::SigningMethod;
use crate::parser::{forge, signer};
use crate::runner::{ExternalTool, OutputMode, ProcessRunner, ScriptMode};
use crate::state::{RecordName, RecordStore, Stage};
use crate::Result;
use colored::Colorize;

#[allow(clippy::too_many_arguments)]
pub async fn run(
    ctx: &RunContext,
    rpc_override: Option<&str>,
    private_key: Option<String>,
    ledger: bool,
    mnemonic: Option<String>,
    hd_path: &str,
    signer_override: Option<&str>,
) -> Result<()> {
    // Validated before anything is spawned.
    let method = SigningMethod::from_flags(private_key, ledger, mnemonic)?;

    let store = RecordStore::new(ctx.record_path()?);
    let mut record = store.load()?;
    let network = Network::for_record(&record.chain_id, &record.rpc_url, rpc_override);

    let runner = ProcessRunner::new(&ctx.workdir);

    // Re-derive the canonical payload for this signer; the signature must
    // bind to exactly what the record carries.
    let mut env = record.script_env();
    if let Some(addr) = signer_override.filter(|a| !a.is_empty()) {
        env.push(("SIGNER".to_string(), addr.to_string()));
    }
    let args = ScriptMode::Sign.build_args(&record.script_name, None, &network);
    let out = runner
        .run(ExternalTool::Forge, &args, &env, None, OutputMode::Stream)
        .await?;
    let payload = forge::extract_data(&out.stdout);
    if record.data.is_empty() {
        record.data = payload.clone();
    } else if payload != record.data {
        return Err(WorkflowError::Mismatch {
            field: "data",
            path: store.path().display().to_string(),
            ours: record.data.clone(),
            theirs: payload.clone(),
        }
        .into());
    }

    let signer_args = method.signer_args(hd_path, &ctx.workdir);
    let stdin_data = format!("{}\n", payload);
    let out = runner
        .run(
            ExternalTool::Eip712Sign,
            &signer_args,
            &[],
            Some(&stdin_data),
            OutputMode::Stream,
        )
        .await?;
    let detached = signer::extract_signature(&out.stdout)?;

    if let Some(expected) = signer_override.filter(|a| !a.is_empty()) {
        if !expected.eq_ignore_ascii_case(&detached.signer) {
            println!(
                "{}",
                format!(
                    "device reported signer {} instead of {}",
                    detached.signer, expected
                )
                .yellow()
            );
        }
    }

    let replaced = record.upsert_signature(&detached.signer, &detached.signature);
    if replaced {
        println!(
            "{}",
            format!(
                "signature for {} already exists, overwriting",
                detached.signer
            )
            .yellow()
        );
    } else {
        println!(
            "{}",
            format!("added signature for {}", detached.signer).green()
        );
    }

    store.save(&record)?;
    rename_draft_with_signer(store, &detached.signer)?;
    Ok(())
}

/// A draft file not yet claimed by a signer gets the signer identity
/// appended, so a directory of drafts shows who has signed what.
fn rename_draft_with_signer(store: RecordStore, signer: &str) -> Result<()> {
    let Some(name) = store.path().file_name().and_then(|n| n.to_str()) else {
        return Ok(());
    };
    let Ok(parsed) = RecordName::parse(name) else {
        // Caller-chosen name; leave it alone.
        return Ok(());
    };
    if parsed.stage == Stage::Draft && parsed.signer.is_none() {
        store.rename(&parsed.with_signer(signer).to_string())?;
    }
    Ok(())
}
