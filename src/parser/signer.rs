//! Grammar of the detached signing tool's output.

use crate::error::WorkflowError;
use regex::Regex;

/// A signer/signature pair reported by the signing tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetachedSignature {
    pub signer: String,
    pub signature: String,
}

/// Extract the `Signer:` / `Signature:` block. A `Data:` line may precede
/// the block; it is ignored here since the payload is already known.
pub fn extract_signature(output: &str) -> Result<DetachedSignature, WorkflowError> {
    let re = match Regex::new(r"Signer: ([^\n]*)\nSignature: ([^\n]*)(?:\n|$)") {
        Ok(re) => re,
        Err(_) => {
            return Err(WorkflowError::Parse {
                tool: "eip712sign",
                what: "signature block",
            })
        }
    };
    let caps = re.captures(output).ok_or(WorkflowError::Parse {
        tool: "eip712sign",
        what: "signature block",
    })?;

    let signer = caps
        .get(1)
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default();
    let signature = caps
        .get(2)
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default();
    if signer.is_empty() || signature.is_empty() {
        return Err(WorkflowError::Parse {
            tool: "eip712sign",
            what: "signature block",
        });
    }

    Ok(DetachedSignature { signer, signature })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_block_with_data_line() {
        let output = "\nData: 0x1901abcd\nSigner: 0xA11CE\nSignature: 0xfeed01\n";
        let sig = extract_signature(output).unwrap();
        assert_eq!(sig.signer, "0xA11CE");
        assert_eq!(sig.signature, "0xfeed01");
    }

    #[test]
    fn block_without_data_line() {
        let output = "Signer: 0xB0B\nSignature: 0xcafe02\n";
        let sig = extract_signature(output).unwrap();
        assert_eq!(sig.signer, "0xB0B");
    }

    #[test]
    fn signature_at_end_of_buffer() {
        let output = "Signer: 0xB0B\nSignature: 0xcafe02";
        assert!(extract_signature(output).is_ok());
    }

    #[test]
    fn missing_signature_line_is_an_error() {
        assert!(extract_signature("Signer: 0xB0B\n").is_err());
    }

    #[test]
    fn empty_captures_are_an_error() {
        assert!(extract_signature("Signer: \nSignature: 0xcafe\n").is_err());
        assert!(extract_signature("Signer: 0xB0B\nSignature: \n").is_err());
    }
}
