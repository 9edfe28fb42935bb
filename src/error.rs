//! Workflow error taxonomy
//!
//! Every failure class maps to an operator-facing exit code: 0 for success,
//! 255 when an operation completed but returned a negative verdict, 1 for
//! everything else. The 255 class exists so scripts can tell "the tool
//! broke" apart from "the tool worked and said no".

/// Errors produced by the signing workflow and its collaborators.
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    /// A required flag was absent; detected before any external call.
    #[error("missing required parameter: --{0}")]
    MissingParameter(&'static str),

    /// A precondition on the record or flag set was violated; detected
    /// before any external call.
    #[error("{0}")]
    Precondition(String),

    /// An external tool failed to start or exited abnormally.
    #[error("error running {tool}: {detail}")]
    Invocation { tool: &'static str, detail: String },

    /// Tool output did not match the expected grammar. The collaborator is
    /// assumed untrustworthy on malformed output, so nothing is persisted.
    #[error("invalid output from {tool}: no {what} found")]
    Parse { tool: &'static str, what: &'static str },

    /// The operation ran correctly and reported a negative answer
    /// (signatures below threshold, push target already present).
    #[error("{0}")]
    Verdict(String),

    /// Two record files claiming the same transaction disagree.
    #[error("{field} mismatch in {path}: have {ours:?}, found {theirs:?}")]
    Mismatch {
        field: &'static str,
        path: String,
        ours: String,
        theirs: String,
    },

    /// A record filename does not follow the stage-encoding pattern.
    #[error("unrecognized record filename: {0}")]
    Filename(String),
}

impl WorkflowError {
    /// Exit code reported to the operator for this failure class.
    pub fn exit_code(&self) -> i32 {
        match self {
            WorkflowError::Verdict(_) => 255,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verdict_gets_distinct_exit_code() {
        let err = WorkflowError::Verdict("not enough signatures".to_string());
        assert_eq!(err.exit_code(), 255);
    }

    #[test]
    fn other_errors_exit_one() {
        assert_eq!(WorkflowError::MissingParameter("safe-addr").exit_code(), 1);
        assert_eq!(
            WorkflowError::Parse {
                tool: "forge",
                what: "nonce"
            }
            .exit_code(),
            1
        );
    }

    #[test]
    fn messages_name_the_missing_flag() {
        let err = WorkflowError::MissingParameter("target-addr");
        assert_eq!(err.to_string(), "missing required parameter: --target-addr");
    }
}
