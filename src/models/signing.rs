//! Signing-method selection and detached-signer argument mapping.
//!
//! Exactly one key source may be selected per invocation; the check runs
//! before any external call so a misconfigured command never reaches a
//! device or leaks a prompt.

use crate::error::WorkflowError;
use std::path::Path;

/// Mutually exclusive key sources for the detached signing tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SigningMethod {
    /// Direct key material.
    PrivateKey(String),
    /// Hardware device.
    Ledger,
    /// Derivation-path mnemonic.
    Mnemonic(String),
}

impl SigningMethod {
    /// Validate that one (and only one) selector was set.
    pub fn from_flags(
        private_key: Option<String>,
        ledger: bool,
        mnemonic: Option<String>,
    ) -> Result<Self, WorkflowError> {
        let private_key = private_key.filter(|k| !k.is_empty());
        let mnemonic = mnemonic.filter(|m| !m.is_empty());

        let selected = usize::from(private_key.is_some())
            + usize::from(ledger)
            + usize::from(mnemonic.is_some());
        if selected != 1 {
            return Err(WorkflowError::Precondition(
                "one (and only one) of --private-key, --ledger, --mnemonic must be set"
                    .to_string(),
            ));
        }

        if let Some(key) = private_key {
            Ok(SigningMethod::PrivateKey(key))
        } else if ledger {
            Ok(SigningMethod::Ledger)
        } else {
            Ok(SigningMethod::Mnemonic(mnemonic.unwrap_or_default()))
        }
    }

    /// Execution only accepts key material or a hardware device.
    pub fn for_execution(
        private_key: Option<String>,
        ledger: bool,
    ) -> Result<Self, WorkflowError> {
        let private_key = private_key.filter(|k| !k.is_empty());
        let selected = usize::from(private_key.is_some()) + usize::from(ledger);
        if selected != 1 {
            return Err(WorkflowError::Precondition(
                "one (and only one) of --private-key, --ledger must be set for execution"
                    .to_string(),
            ));
        }
        match private_key {
            Some(key) => Ok(SigningMethod::PrivateKey(key)),
            None => Ok(SigningMethod::Ledger),
        }
    }

    /// Argument list for the detached signing tool. The tool uses Go-style
    /// single-dash flags.
    pub fn signer_args(&self, hd_path: &str, workdir: &Path) -> Vec<String> {
        let mut args = Vec::new();
        match self {
            SigningMethod::Ledger => args.push("-ledger".to_string()),
            SigningMethod::Mnemonic(mnemonic) => {
                args.push("-mnemonic".to_string());
                args.push(mnemonic.clone());
            }
            SigningMethod::PrivateKey(key) => {
                args.push("-private-key".to_string());
                args.push(key.clone());
            }
        }
        args.push("-hd-paths".to_string());
        args.push(hd_path.to_string());
        args.push("-workdir".to_string());
        args.push(workdir.display().to_string());
        args
    }

    /// Extra scripting-tool flags for broadcast mode.
    pub fn broadcast_args(&self) -> Vec<String> {
        match self {
            SigningMethod::Ledger => vec!["--ledger".to_string()],
            SigningMethod::PrivateKey(key) => {
                vec!["--private-key".to_string(), key.clone()]
            }
            SigningMethod::Mnemonic(mnemonic) => {
                vec!["--mnemonics".to_string(), mnemonic.clone()]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn exactly_one_method_required() {
        assert!(SigningMethod::from_flags(None, false, None).is_err());
        assert!(SigningMethod::from_flags(Some("0xkey".into()), true, None).is_err());
        assert!(
            SigningMethod::from_flags(Some("0xkey".into()), false, Some("seed words".into()))
                .is_err()
        );

        let method = SigningMethod::from_flags(None, true, None).unwrap();
        assert_eq!(method, SigningMethod::Ledger);
    }

    #[test]
    fn empty_strings_do_not_count_as_selected() {
        assert!(SigningMethod::from_flags(Some(String::new()), false, None).is_err());
        let method =
            SigningMethod::from_flags(Some(String::new()), true, Some(String::new())).unwrap();
        assert_eq!(method, SigningMethod::Ledger);
    }

    #[test]
    fn execution_rejects_mnemonic_path() {
        assert!(SigningMethod::for_execution(None, false).is_err());
        let method = SigningMethod::for_execution(Some("0xkey".into()), false).unwrap();
        assert_eq!(method, SigningMethod::PrivateKey("0xkey".into()));
    }

    #[test]
    fn signer_args_carry_hd_path_and_workdir() {
        let workdir = PathBuf::from("/work");
        let args = SigningMethod::Ledger.signer_args("m/44'/60'/0'/0/0", &workdir);
        assert_eq!(
            args,
            vec![
                "-ledger",
                "-hd-paths",
                "m/44'/60'/0'/0/0",
                "-workdir",
                "/work"
            ]
        );
    }

    #[test]
    fn broadcast_args_for_key_material() {
        let args = SigningMethod::PrivateKey("0xkey".into()).broadcast_args();
        assert_eq!(args, vec!["--private-key", "0xkey"]);
        assert_eq!(SigningMethod::Ledger.broadcast_args(), vec!["--ledger"]);
    }
}
