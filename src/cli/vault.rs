//! Move record files through the team secret manager.
//!
//! Signers on disconnected machines exchange records as vault items: the
//! file content travels base64-encoded in the item's `text` field. Push
//! never overwrites: an existing item is a negative verdict, not a crash.

use crate::config::RunContext;
use crate::error::WorkflowError;
use crate::runner::{ExternalTool, OutputMode, ProcessRunner};
use crate::Result;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use clap::{Args, Subcommand};
use colored::Colorize;

/// Marker the secret-manager CLI prints when an item does not exist.
const NOT_AN_ITEM: &str = "isn't an item";

#[derive(Debug, Args)]
pub struct VaultOpts {
    /// Secret-manager account
    #[arg(long, default_value = "my.1password.com")]
    pub account: String,

    /// Vault holding the transfer items
    #[arg(long, default_value = "Presigned Transactions")]
    pub vault: String,

    /// Local directory the items are pulled into / pushed from
    #[arg(long, default_value = "tx")]
    pub path: String,
}

#[derive(Debug, Subcommand)]
pub enum VaultCommands {
    /// List items in the transfer vault
    List,
    /// Download an item into the transfer path
    Pull { item: String },
    /// Upload a record file; refuses to overwrite an existing item
    Push { item: String },
}

pub async fn run(ctx: &RunContext, opts: &VaultOpts, command: VaultCommands) -> Result<()> {
    let runner = ProcessRunner::new(&ctx.workdir);
    match command {
        VaultCommands::List => list(&runner, opts).await,
        VaultCommands::Pull { item } => pull(ctx, &runner, opts, &item).await,
        VaultCommands::Push { item } => push(ctx, &runner, opts, &item).await,
    }
}

async fn list(runner: &ProcessRunner, opts: &VaultOpts) -> Result<()> {
    let args = vec![
        "--format".to_string(),
        "json".to_string(),
        "--account".to_string(),
        opts.account.clone(),
        "--vault".to_string(),
        opts.vault.clone(),
        "item".to_string(),
        "list".to_string(),
    ];
    let out = runner
        .run(ExternalTool::Op, &args, &[], None, OutputMode::Silent)
        .await?;

    let items: Vec<serde_json::Value> = serde_json::from_str(&out.stdout).map_err(|_| {
        WorkflowError::Parse {
            tool: "op",
            what: "item list",
        }
    })?;
    for item in items {
        if let Some(title) = item.get("title").and_then(|t| t.as_str()) {
            println!("{}", title);
        }
    }
    Ok(())
}

fn item_ref(opts: &VaultOpts, item: &str) -> String {
    format!("op://{}/{}/text", opts.vault, item)
}

async fn pull(
    ctx: &RunContext,
    runner: &ProcessRunner,
    opts: &VaultOpts,
    item: &str,
) -> Result<()> {
    let args = vec![
        "--account".to_string(),
        opts.account.clone(),
        "read".to_string(),
        item_ref(opts, item),
    ];
    let out = runner
        .run(ExternalTool::Op, &args, &[], None, OutputMode::Silent)
        .await?;

    let decoded = BASE64
        .decode(out.stdout.trim())
        .map_err(|_| WorkflowError::Parse {
            tool: "op",
            what: "base64 item text",
        })?;

    let dir = ctx.workdir.join(&opts.path);
    std::fs::create_dir_all(&dir)?;
    let dest = dir.join(item);
    if dest.exists() {
        println!(
            "{}",
            format!("file {} already exists, overwriting", dest.display()).yellow()
        );
    }
    std::fs::write(&dest, decoded)?;
    println!("{}", format!("saved: {}", dest.display()).green());
    Ok(())
}

async fn push(
    ctx: &RunContext,
    runner: &ProcessRunner,
    opts: &VaultOpts,
    item: &str,
) -> Result<()> {
    // Existence probe: a present item answers successfully, a missing one
    // fails with the marker on stderr.
    let args = vec![
        "--account".to_string(),
        opts.account.clone(),
        "read".to_string(),
        item_ref(opts, item),
    ];
    let probe = runner
        .run_tolerant(ExternalTool::Op, &args, &[], None, OutputMode::Silent)
        .await?;
    if probe.success {
        return Err(WorkflowError::Verdict(format!("item {} already exists", item)).into());
    }
    if !probe.stderr.contains(NOT_AN_ITEM) {
        return Err(WorkflowError::Invocation {
            tool: "op",
            detail: probe.stderr.trim().to_string(),
        }
        .into());
    }

    let source = ctx.workdir.join(&opts.path).join(item);
    let contents = std::fs::read(&source)
        .map_err(|e| WorkflowError::Precondition(format!("cannot read {}: {}", source.display(), e)))?;

    let args = vec![
        "--account".to_string(),
        opts.account.clone(),
        "--vault".to_string(),
        opts.vault.clone(),
        "item".to_string(),
        "create".to_string(),
        "--title".to_string(),
        item.to_string(),
        "--category".to_string(),
        "Login".to_string(),
        format!("text={}", BASE64.encode(contents)),
    ];
    runner
        .run(ExternalTool::Op, &args, &[], None, OutputMode::Silent)
        .await?;
    println!("{}", format!("pushed: {}", item).green());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_reference_is_scoped_to_the_vault() {
        let opts = VaultOpts {
            account: "my.1password.com".to_string(),
            vault: "Presigned Transactions".to_string(),
            path: "tx".to_string(),
        };
        assert_eq!(
            item_ref(&opts, "draft-5.json"),
            "op://Presigned Transactions/draft-5.json/text"
        );
    }
}
