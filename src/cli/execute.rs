//! Broadcast the fully signed transaction.

use crate::config::{Network, RunContext};
use crate::error::WorkflowError;
use crate::models::{SigningMethod, TxStage};
use crate::parser::forge;
use crate::runner::{ExternalTool, OutputMode, ProcessRunner, ScriptMode};
use crate::state::RecordStore;
use crate::Result;
use colored::Colorize;

pub async fn run(
    ctx: &RunContext,
    rpc_override: Option<&str>,
    private_key: Option<String>,
    ledger: bool,
) -> Result<()> {
    // Validated before anything is spawned.
    let method = SigningMethod::for_execution(private_key, ledger)?;

    let store = RecordStore::new(ctx.record_path()?);
    let mut record = store.load()?;
    if record.signatures.is_empty() {
        return Err(WorkflowError::Precondition("no signatures found".to_string()).into());
    }

    let network = Network::for_record(&record.chain_id, &record.rpc_url, rpc_override);
    let signatures = record.concat_signatures();
    let mut args = ScriptMode::Execute.build_args(&record.script_name, Some(&signatures), &network);
    args.extend(method.broadcast_args());

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

    // Keep the exact broadcast input on the record for the audit trail.
    let calldata = forge::extract_calldata(&out.stdout)?;
    record.calldata = Some(calldata);
    store.save(&record)?;
    println!(
        "{}",
        format!(
            "transaction {}, calldata recorded",
            TxStage::Executed.name()
        )
        .green()
        .bold()
    );
    Ok(())
}
