//! Dry-run the fully signed transaction and prepare it for broadcast.
//!
//! On success the record gains its calldata, the draft file becomes a
//! ready file, and the operator gets copy-paste broadcast instructions
//! plus a self-contained helper script next to the record.

use crate::config::{Network, RunContext};
use crate::error::WorkflowError;
use crate::models::TxRecord;
use crate::parser::forge;
use crate::runner::{ExternalTool, OutputMode, ProcessRunner, ScriptMode};
use crate::state::{RecordName, RecordStore, Stage};
use crate::Result;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use colored::Colorize;
use std::path::Path;

pub async fn run(ctx: &RunContext, rpc_override: Option<&str>) -> Result<()> {
    let store = RecordStore::new(ctx.record_path()?);
    let mut record = store.load()?;
    if record.signatures.is_empty() {
        return Err(WorkflowError::Precondition("no signatures found".to_string()).into());
    }

    let network = Network::for_record(&record.chain_id, &record.rpc_url, rpc_override);
    let signatures = record.concat_signatures();
    let args = ScriptMode::Simulate.build_args(&record.script_name, Some(&signatures), &network);

    let runner = ProcessRunner::new(&ctx.workdir);
    let out = runner
        .run(
            ExternalTool::Forge,
            &args,
            &record.script_env(),
            None,
            OutputMode::Stream,
        )
        .await?;

    let calldata = forge::extract_calldata(&out.stdout)?;
    record.calldata = Some(calldata.clone());
    store.save(&record)?;
    println!("{}", "added calldata".green());

    let store = promote_to_ready(store)?;
    emit_broadcast_helpers(store.path(), &record, &calldata, &network)?;
    Ok(())
}

/// Stage transition in the filename channel: draft becomes ready. A
/// caller-chosen name is left alone.
fn promote_to_ready(store: RecordStore) -> Result<RecordStore> {
    let Some(name) = store.path().file_name().and_then(|n| n.to_str()) else {
        return Ok(store);
    };
    match RecordName::parse(name) {
        Ok(parsed) if parsed.stage == Stage::Draft => {
            store.rename(&parsed.with_stage(Stage::Ready).to_string())
        }
        _ => Ok(store),
    }
}

/// Print the two ways to broadcast, and drop a base64-encoded shell script
/// next to the record so the instructions survive the terminal session.
fn emit_broadcast_helpers(
    record_path: &Path,
    record: &TxRecord,
    calldata: &str,
    network: &Network,
) -> Result<()> {
    let rerun_cmd = format!(
        "cosigner \\\n    --tx-file {} \\\n    --private-key $EXECUTORKEY \\\n    execute",
        record_path.display()
    );
    let cast_cmd = format!(
        "SAFE_ADDR={}\nCALLDATA={}\nEXECUTORKEY=********\ncast send \\\n    --rpc-url {} \\\n    --chain {} \\\n    --private-key $EXECUTORKEY \\\n    $SAFE_ADDR \\\n    $CALLDATA",
        record.safe_addr, calldata, network.rpc_url, network.chain_id
    );

    println!("\ntransaction now can be sent to network with:\n");
    println!("- - 8< - -\n");
    println!("{}\n", rerun_cmd.cyan());
    println!("- - or - -\n");
    println!("{}\n", cast_cmd.cyan());
    println!("- - 8< - -");

    let script = broadcast_script(record, calldata, network);
    let helper_path = record_path.with_extension("sh.b64");
    std::fs::write(&helper_path, BASE64.encode(script))?;
    println!(
        "{}",
        format!("saved broadcast helper: {}", helper_path.display()).green()
    );
    Ok(())
}

fn broadcast_script(record: &TxRecord, calldata: &str, network: &Network) -> String {
    format!(
        "#!/bin/sh\nset -e\n: \"${{EXECUTORKEY:?EXECUTORKEY must be set}}\"\ncast send \\\n    --rpc-url {} \\\n    --chain {} \\\n    --private-key \"$EXECUTORKEY\" \\\n    {} \\\n    {}\n",
        network.rpc_url, network.chain_id, record.safe_addr, calldata
    )
}
