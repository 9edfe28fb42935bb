//! Grammar of the chain-scripting tool's output.
//!
//! First-match semantics over the whole captured buffer; an extractor
//! returns exactly one value or fails. A partial match is a failure.

use crate::error::WorkflowError;
use regex::Regex;

/// Literal the scripting tool prints after a clean run.
pub const SUCCESS_MARKER: &str = "Script ran successfully.";

/// Sentinels bounding the signable payload in script output.
const DATA_BEGIN: &str = "vvvvvvvv";
const DATA_END: &str = "^^^^^^^^";

/// The Safe's current replay-protection counter, from a line of the form
/// `Safe current nonce: <value>`.
pub fn extract_nonce(output: &str) -> Result<String, WorkflowError> {
    let re = match Regex::new(r"Safe current nonce: ([^\n]*)\n") {
        Ok(re) => re,
        Err(_) => {
            return Err(WorkflowError::Parse {
                tool: "forge",
                what: "nonce",
            })
        }
    };
    let value = re
        .captures(output)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default();
    if value.is_empty() {
        return Err(WorkflowError::Parse {
            tool: "forge",
            what: "nonce",
        });
    }
    Ok(value)
}

/// The signable payload between the begin and end sentinels, trimmed.
///
/// Permissive on purpose: the scripting tool does not always emit both
/// markers, so a missing end sentinel yields the remainder of the text and
/// missing markers altogether yield the whole text.
pub fn extract_data(output: &str) -> String {
    let mut text = output;
    if let Some(index) = text.find(DATA_BEGIN) {
        text = &text[index + DATA_BEGIN.len()..];
    }
    if let Some(index) = text.find(DATA_END) {
        text = &text[..index];
    }
    text.trim().to_string()
}

/// The raw call input out of the verification-URL fragment
/// `&rawFunctionInput=<value>` the scripting tool prints after a run.
pub fn extract_calldata(output: &str) -> Result<String, WorkflowError> {
    let re = match Regex::new(r"&rawFunctionInput=([^\n]*)\n") {
        Ok(re) => re,
        Err(_) => {
            return Err(WorkflowError::Parse {
                tool: "forge",
                what: "calldata",
            })
        }
    };
    let value = re
        .captures(output)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default();
    if value.is_empty() {
        return Err(WorkflowError::Parse {
            tool: "forge",
            what: "calldata",
        });
    }
    Ok(value)
}

/// Whether the captured run printed the success marker.
pub fn ran_successfully(output: &str) -> bool {
    output.contains(SUCCESS_MARKER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nonce_from_script_log() {
        let output = "== Logs ==\n  Safe current nonce: 5\n  something else\n";
        assert_eq!(extract_nonce(output).unwrap(), "5");
    }

    #[test]
    fn nonce_missing_is_an_error() {
        assert!(extract_nonce("no nonce here\n").is_err());
    }

    #[test]
    fn nonce_empty_value_is_an_error() {
        assert!(extract_nonce("Safe current nonce: \n").is_err());
    }

    #[test]
    fn data_between_sentinels_is_trimmed() {
        let output = "preamble\nvvvvvvvv\n  HELLO  \n^^^^^^^^\ntrailer\n";
        assert_eq!(extract_data(output), "HELLO");
    }

    #[test]
    fn data_without_end_sentinel_takes_the_rest() {
        let output = "preamble\nvvvvvvvv\nHELLO\nWORLD\n";
        assert_eq!(extract_data(output), "HELLO\nWORLD");
    }

    #[test]
    fn data_without_any_sentinel_takes_everything() {
        assert_eq!(extract_data("  HELLO  "), "HELLO");
    }

    #[test]
    fn calldata_from_url_fragment() {
        let output = "https://example/simulate?x=1&rawFunctionInput=0x6a761202abcd\nDone.\n";
        assert_eq!(extract_calldata(output).unwrap(), "0x6a761202abcd");
    }

    #[test]
    fn calldata_missing_is_an_error() {
        assert!(extract_calldata("no url here\n").is_err());
    }

    #[test]
    fn success_marker_detection() {
        assert!(ran_successfully("...\nScript ran successfully.\nGas used: 1\n"));
        assert!(!ran_successfully("...\nrevert: GS020\n"));
    }
}
