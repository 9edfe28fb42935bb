//! Stage-encoded record filenames.
//!
//! `<stage>-<token>[.signer-<addr>].json`, stage in {draft, ready}. The
//! token is the identifying nonce, optionally preceded by a human-chosen
//! label (`draft-pause-7.json`). Callers generate these names themselves
//! through create/simulate, so an unrecognized name indicates tampering or
//! a naming bug, not a recoverable condition.

use crate::error::WorkflowError;
use regex::Regex;
use std::fmt;

/// Workflow stage embedded in a record filename.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Still collecting signatures.
    Draft,
    /// Simulated and prepared for broadcast.
    Ready,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Draft => "draft",
            Stage::Ready => "ready",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parsed form of a stage-encoded record filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordName {
    pub stage: Stage,
    pub token: String,
    pub signer: Option<String>,
}

impl RecordName {
    /// A fresh draft name for the given identifying token.
    pub fn draft(token: impl Into<String>) -> Self {
        Self {
            stage: Stage::Draft,
            token: token.into(),
            signer: None,
        }
    }

    /// Parse a filename; anything outside the fixed pattern is an error.
    pub fn parse(name: &str) -> Result<Self, WorkflowError> {
        let re = match Regex::new(r"^(draft|ready)-(.+?)(?:\.signer-(0x[0-9a-fA-F]+))?\.json$") {
            Ok(re) => re,
            Err(_) => return Err(WorkflowError::Filename(name.to_string())),
        };
        let caps = re
            .captures(name)
            .ok_or_else(|| WorkflowError::Filename(name.to_string()))?;

        let stage = match caps.get(1).map(|m| m.as_str()) {
            Some("draft") => Stage::Draft,
            _ => Stage::Ready,
        };
        let token = caps
            .get(2)
            .map(|m| m.as_str().to_string())
            .unwrap_or_default();
        let signer = caps.get(3).map(|m| m.as_str().to_string());

        Ok(Self {
            stage,
            token,
            signer,
        })
    }

    /// Same name with the stage token replaced.
    pub fn with_stage(mut self, stage: Stage) -> Self {
        self.stage = stage;
        self
    }

    /// Same name with a signer suffix attached.
    pub fn with_signer(mut self, signer: impl Into<String>) -> Self {
        self.signer = Some(signer.into());
        self
    }
}

impl fmt::Display for RecordName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.signer {
            Some(signer) => write!(f, "{}-{}.signer-{}.json", self.stage, self.token, signer),
            None => write!(f, "{}-{}.json", self.stage, self.token),
        }
    }
}
