//! Process invoker for the external collaborator tools.
//!
//! One invocation is fully drained before the caller proceeds; stdout and
//! stderr are captured in whole while optionally being relayed to the
//! operator's terminal. There is no timeout: a hung tool hangs the command
//! and the operator interrupts manually.

use super::redact::redacted_command_line;
use super::toolchain::ExternalTool;
use crate::error::WorkflowError;
use anyhow::{Context, Result};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::Command;

/// Fully drained output of one tool invocation.
#[derive(Debug, Default)]
pub struct CapturedOutput {
    pub stdout: String,
    pub stderr: String,
    pub success: bool,
}

/// How a running tool's output reaches the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Relay every line to the terminal while capturing.
    Stream,
    /// Show a spinner with the most recent line as its message.
    Spinner,
    /// Capture only; nothing is echoed.
    Silent,
}

/// Runs collaborator tools in the configured workdir.
pub struct ProcessRunner {
    workdir: PathBuf,
}

impl ProcessRunner {
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
        }
    }

    /// Run a tool to completion, failing on abnormal exit.
    pub async fn run(
        &self,
        tool: ExternalTool,
        args: &[String],
        env: &[(String, String)],
        stdin_data: Option<&str>,
        mode: OutputMode,
    ) -> Result<CapturedOutput> {
        let captured = self.run_tolerant(tool, args, env, stdin_data, mode).await?;
        if !captured.success {
            let detail = if captured.stderr.trim().is_empty() {
                "exited abnormally".to_string()
            } else {
                captured.stderr.trim().to_string()
            };
            return Err(WorkflowError::Invocation {
                tool: tool.command(),
                detail,
            }
            .into());
        }
        Ok(captured)
    }

    /// Run a tool and report its outcome without failing on a non-zero
    /// exit. Used for probes whose negative answer arrives as an error
    /// status.
    pub async fn run_tolerant(
        &self,
        tool: ExternalTool,
        args: &[String],
        env: &[(String, String)],
        stdin_data: Option<&str>,
        mode: OutputMode,
    ) -> Result<CapturedOutput> {
        let command_name = tool.command();

        let mut cmd = Command::new(command_name);
        cmd.args(args)
            .current_dir(&self.workdir)
            .stdin(if stdin_data.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        for (key, value) in env {
            cmd.env(key, value);
        }

        if mode != OutputMode::Silent {
            println!(
                "{} {}",
                "running:".cyan(),
                redacted_command_line(command_name, args)
            );
        }

        let progress = if mode == OutputMode::Spinner {
            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.cyan} {msg}")
                    .unwrap()
                    .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ "),
            );
            pb.set_message(format!("Running {}...", command_name));
            pb.enable_steady_tick(std::time::Duration::from_millis(100));
            Some(pb)
        } else {
            None
        };

        let mut child = cmd.spawn().with_context(|| {
            format!(
                "Command '{}' not found. Please ensure it is installed and in your PATH.",
                command_name
            )
        })?;

        if let Some(data) = stdin_data {
            if let Some(mut stdin) = child.stdin.take() {
                stdin
                    .write_all(data.as_bytes())
                    .await
                    .context("Failed to write to stdin")?;
                stdin.flush().await.context("Failed to flush stdin")?;
                drop(stdin);
            }
        }

        // Drain stdout and stderr concurrently to avoid backpressure deadlock
        let stdout = child.stdout.take().context("Failed to capture stdout")?;
        let stderr = child.stderr.take().context("Failed to capture stderr")?;

        let mut stdout_reader = BufReader::new(stdout).lines();
        let mut stderr_reader = BufReader::new(stderr).lines();

        let mut output = String::new();
        let mut stderr_output = String::new();
        let mut stdout_done = false;
        let mut stderr_done = false;

        while !stdout_done || !stderr_done {
            tokio::select! {
                line = stdout_reader.next_line(), if !stdout_done => {
                    match line {
                        Ok(Some(line)) => {
                            output.push_str(&line);
                            output.push('\n');

                            match (&progress, mode) {
                                (Some(pb), _) => {
                                    let short_line = if line.chars().count() > 60 {
                                        let truncated: String = line.chars().take(60).collect();
                                        format!("{}...", truncated)
                                    } else {
                                        line.clone()
                                    };
                                    pb.set_message(short_line);
                                }
                                (None, OutputMode::Stream) => println!("{}", line),
                                (None, _) => {}
                            }
                        }
                        Ok(None) => stdout_done = true,
                        Err(e) => return Err(anyhow::anyhow!("Failed to read stdout: {}", e)),
                    }
                }
                line = stderr_reader.next_line(), if !stderr_done => {
                    match line {
                        Ok(Some(line)) => {
                            stderr_output.push_str(&line);
                            stderr_output.push('\n');

                            if mode == OutputMode::Stream {
                                eprintln!("{}", line);
                            }
                        }
                        Ok(None) => stderr_done = true,
                        Err(e) => return Err(anyhow::anyhow!("Failed to read stderr: {}", e)),
                    }
                }
            }
        }

        let status = child.wait().await?;

        if let Some(pb) = progress {
            pb.finish_and_clear();
        }

        Ok(CapturedOutput {
            stdout: output,
            stderr: stderr_output,
            success: status.success(),
        })
    }
}
