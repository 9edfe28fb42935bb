use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use colored::Colorize;
use cosigner::cli::query::SafeQuery;
use cosigner::cli::vault::{VaultCommands, VaultOpts};
use cosigner::config::{Network, RunContext, DEFAULT_HD_PATH};
use cosigner::{Result, WorkflowError};
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cosigner")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Offline coordination for Safe multisig transactions", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Directory in which to run the collaborator tools
    #[arg(long, global = true, default_value = ".")]
    workdir: PathBuf,

    /// Transaction record file
    #[arg(long, global = true)]
    tx_file: Option<PathBuf>,

    /// Scripting entry point bound to the transaction
    #[arg(long, global = true, default_value = "CallPause")]
    script_name: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Propose a transaction and write a draft record
    Create {
        /// Chain ID (defaults to mainnet)
        #[arg(long)]
        chain: Option<String>,

        /// RPC endpoint
        #[arg(long)]
        rpc_url: Option<String>,

        /// Multisig wallet address
        #[arg(long)]
        safe_addr: Option<String>,

        /// Nonce to propose at (queried from the wallet when omitted)
        #[arg(long)]
        safe_nonce: Option<String>,

        /// Call target address
        #[arg(long)]
        target_addr: Option<String>,
    },

    /// Print the wallet's current nonce
    Nonce {
        #[arg(long)]
        rpc_url: Option<String>,
        #[arg(long)]
        safe_addr: Option<String>,
    },

    /// Print the wallet's signature threshold
    Threshold {
        #[arg(long)]
        rpc_url: Option<String>,
        #[arg(long)]
        safe_addr: Option<String>,
    },

    /// Print the wallet's owner addresses
    Owners {
        #[arg(long)]
        rpc_url: Option<String>,
        #[arg(long)]
        safe_addr: Option<String>,
    },

    /// Add this operator's detached signature to the record
    Sign {
        /// RPC endpoint override for this invocation
        #[arg(long)]
        rpc_url: Option<String>,

        /// Private key to sign with
        #[arg(long)]
        private_key: Option<String>,

        /// Use a ledger device to sign
        #[arg(long)]
        ledger: bool,

        /// Mnemonic to sign with
        #[arg(long)]
        mnemonic: Option<String>,

        /// Hierarchical deterministic derivation path
        #[arg(long, default_value = DEFAULT_HD_PATH)]
        hd_path: String,

        /// Expected signer address
        #[arg(long)]
        signer: Option<String>,
    },

    /// Union signatures from other records of the same transaction
    Merge {
        /// Record files to fold in, applied in order
        input_files: Vec<PathBuf>,
    },

    /// Check the collected signatures against the threshold
    Verify {
        #[arg(long)]
        rpc_url: Option<String>,
    },

    /// Dry-run the transaction and prepare it for broadcast
    Simulate {
        #[arg(long)]
        rpc_url: Option<String>,
    },

    /// Broadcast the transaction
    Execute {
        #[arg(long)]
        rpc_url: Option<String>,

        /// Private key to broadcast with
        #[arg(long)]
        private_key: Option<String>,

        /// Use a ledger device to broadcast
        #[arg(long)]
        ledger: bool,
    },

    /// Move records through the team secret manager
    Vault {
        #[command(flatten)]
        opts: VaultOpts,

        #[command(subcommand)]
        command: VaultCommands,
    },

    /// Generate shell completions
    Completions {
        /// Shell type (bash, zsh, fish, powershell)
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() {
    let cli = Cli::parse();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("Failed to create tokio runtime");

    if let Err(e) = runtime.block_on(run_async(cli)) {
        eprintln!("{}", format!("Error: {:#}", e).red());
        let code = e
            .downcast_ref::<WorkflowError>()
            .map_or(1, WorkflowError::exit_code);
        std::process::exit(code);
    }
}

async fn run_async(cli: Cli) -> Result<()> {
    let ctx = RunContext {
        workdir: cli.workdir,
        tx_file: cli.tx_file,
        script_name: cli.script_name,
    };

    match cli.command {
        Commands::Create {
            chain,
            rpc_url,
            safe_addr,
            safe_nonce,
            target_addr,
        } => {
            let network = Network::resolve(chain, rpc_url);
            cosigner::cli::create::run(
                &ctx,
                &network,
                safe_addr.as_deref(),
                target_addr.as_deref(),
                safe_nonce.as_deref(),
            )
            .await?;
        }

        Commands::Nonce { rpc_url, safe_addr } => {
            let network = Network::resolve(None, rpc_url);
            cosigner::cli::query::run(&ctx, &network, safe_addr.as_deref(), SafeQuery::Nonce)
                .await?;
        }

        Commands::Threshold { rpc_url, safe_addr } => {
            let network = Network::resolve(None, rpc_url);
            cosigner::cli::query::run(&ctx, &network, safe_addr.as_deref(), SafeQuery::Threshold)
                .await?;
        }

        Commands::Owners { rpc_url, safe_addr } => {
            let network = Network::resolve(None, rpc_url);
            cosigner::cli::query::run(&ctx, &network, safe_addr.as_deref(), SafeQuery::Owners)
                .await?;
        }

        Commands::Sign {
            rpc_url,
            private_key,
            ledger,
            mnemonic,
            hd_path,
            signer,
        } => {
            cosigner::cli::sign::run(
                &ctx,
                rpc_url.as_deref(),
                private_key,
                ledger,
                mnemonic,
                &hd_path,
                signer.as_deref(),
            )
            .await?;
        }

        Commands::Merge { input_files } => {
            cosigner::cli::merge::run(&ctx, &input_files)?;
        }

        Commands::Verify { rpc_url } => {
            cosigner::cli::verify::run(&ctx, rpc_url.as_deref()).await?;
        }

        Commands::Simulate { rpc_url } => {
            cosigner::cli::simulate::run(&ctx, rpc_url.as_deref()).await?;
        }

        Commands::Execute {
            rpc_url,
            private_key,
            ledger,
        } => {
            cosigner::cli::execute::run(&ctx, rpc_url.as_deref(), private_key, ledger).await?;
        }

        Commands::Vault { opts, command } => {
            cosigner::cli::vault::run(&ctx, &opts, command).await?;
        }

        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "cosigner", &mut io::stdout());
        }
    }

    Ok(())
}
