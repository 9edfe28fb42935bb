//! Union signatures from other record files of the same transaction.

use crate::config::RunContext;
use crate::error::WorkflowError;
use crate::merge::merge_all;
use crate::state::RecordStore;
use crate::Result;
use colored::Colorize;
use std::path::PathBuf;

pub fn run(ctx: &RunContext, input_files: &[PathBuf]) -> Result<()> {
    if input_files.is_empty() {
        return Err(WorkflowError::MissingParameter("input-files").into());
    }

    let store = RecordStore::new(ctx.record_path()?);
    let mut primary = store.load()?;

    // Load everything up front; the merge either fully applies or the
    // primary file is not rewritten at all.
    let mut others = Vec::with_capacity(input_files.len());
    for path in input_files {
        let other = RecordStore::new(path).load()?;
        others.push((path.display().to_string(), other));
    }

    merge_all(&mut primary, &others)?;
    store.save(&primary)?;

    println!(
        "{}",
        format!(
            "merged {} file(s), {} signature(s) collected, record is {}",
            input_files.len(),
            primary.signatures.len(),
            primary.stage().name()
        )
        .green()
    );
    Ok(())
}
