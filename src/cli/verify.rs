//! Check the collected signatures against the wallet's threshold.
//!
//! The external verification either succeeds (the transaction is ready to
//! execute) or reports a negative verdict, which is a distinct outcome
//! from the tool failing.

use crate::config::{Network, RunContext};
use crate::error::WorkflowError;
use crate::models::TxStage;
use crate::parser::forge;
use crate::runner::{ExternalTool, OutputMode, ProcessRunner, ScriptMode};
use crate::state::RecordStore;
use crate::Result;
use colored::Colorize;

pub async fn run(ctx: &RunContext, rpc_override: Option<&str>) -> Result<()> {
    let store = RecordStore::new(ctx.record_path()?);
    let record = store.load()?;
    if record.signatures.is_empty() {
        return Err(WorkflowError::Precondition("no signatures found".to_string()).into());
    }

    let network = Network::for_record(&record.chain_id, &record.rpc_url, rpc_override);
    let signatures = record.concat_signatures();
    let args = ScriptMode::Verify.build_args(&record.script_name, Some(&signatures), &network);

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

    if forge::ran_successfully(&out.stdout) {
        println!(
            "{}",
            format!(
                "signatures are valid, transaction is {}",
                TxStage::VerifiedReady.name()
            )
            .green()
            .bold()
        );
        Ok(())
    } else {
        // The tool ran; the signature set just does not satisfy the
        // threshold yet.
        Err(WorkflowError::Verdict(
            "signatures present but below the execution threshold".to_string(),
        )
        .into())
    }
}
