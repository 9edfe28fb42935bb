//! Persisted transaction record and its lifecycle stage.
//!
//! One JSON document per proposed transaction. The record travels between
//! machines as a flat file; the JSON content is the source of truth for all
//! identity and signature data, whatever the file is named.

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// One signer's detached signature over the record payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureEntry {
    pub signer: String,
    pub signature: String,
}

/// The unit of persisted state for a single multisig transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxRecord {
    pub chain_id: String,
    pub rpc_url: String,
    pub created_at: String,
    pub safe_addr: String,
    pub safe_nonce: String,
    pub target_addr: String,
    pub script_name: String,
    /// Canonical signable payload. Once signatures exist this must not
    /// change without invalidating them; the merge invariant enforces it.
    pub data: String,

    /// Semantically a set keyed by signer; at most one entry per signer.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub signatures: Vec<SignatureEntry>,

    /// Populated by a successful simulation; the exact input later
    /// broadcast on-chain.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calldata: Option<String>,
}

/// Lifecycle stage of a transaction.
///
/// `Proposed`, `PartiallySigned` and `Simulated` are derivable from field
/// population; `VerifiedReady` and `Executed` are outcomes reported by the
/// verify/execute commands, since the threshold lives on-chain and the
/// record schema carries no status field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxStage {
    Proposed,
    PartiallySigned,
    VerifiedReady,
    Simulated,
    Executed,
}

impl TxStage {
    pub fn name(&self) -> &'static str {
        match self {
            TxStage::Proposed => "proposed",
            TxStage::PartiallySigned => "partially signed",
            TxStage::VerifiedReady => "verified, ready to execute",
            TxStage::Simulated => "simulated",
            TxStage::Executed => "executed",
        }
    }
}

impl TxRecord {
    /// A freshly proposed record: identity fields set, no signatures yet.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        chain_id: impl Into<String>,
        rpc_url: impl Into<String>,
        safe_addr: impl Into<String>,
        safe_nonce: impl Into<String>,
        target_addr: impl Into<String>,
        script_name: impl Into<String>,
        data: impl Into<String>,
    ) -> Self {
        Self {
            chain_id: chain_id.into(),
            rpc_url: rpc_url.into(),
            created_at: Utc::now().to_rfc3339(),
            safe_addr: safe_addr.into(),
            safe_nonce: safe_nonce.into(),
            target_addr: target_addr.into(),
            script_name: script_name.into(),
            data: data.into(),
            signatures: Vec::new(),
            calldata: None,
        }
    }

    /// Stage derived from field population.
    pub fn stage(&self) -> TxStage {
        if self.calldata.is_some() {
            TxStage::Simulated
        } else if !self.signatures.is_empty() {
            TxStage::PartiallySigned
        } else {
            TxStage::Proposed
        }
    }

    /// Add or replace the signature for `signer`. Returns true when an
    /// existing entry was replaced.
    pub fn upsert_signature(&mut self, signer: &str, signature: &str) -> bool {
        for entry in &mut self.signatures {
            if entry.signer == signer {
                entry.signature = signature.to_string();
                return true;
            }
        }
        self.signatures.push(SignatureEntry {
            signer: signer.to_string(),
            signature: signature.to_string(),
        });
        false
    }

    /// All signatures concatenated in record order, the form the scripting
    /// tool expects for `verify(bytes)` and `run(bytes)`.
    pub fn concat_signatures(&self) -> String {
        self.signatures
            .iter()
            .map(|entry| entry.signature.as_str())
            .collect()
    }

    /// Environment overlay identifying the transaction to the scripting
    /// tool.
    pub fn script_env(&self) -> Vec<(String, String)> {
        vec![
            ("SAFE_ADDR".to_string(), self.safe_addr.clone()),
            ("SAFE_NONCE".to_string(), self.safe_nonce.clone()),
            ("TARGET_ADDR".to_string(), self.target_addr.clone()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> TxRecord {
        TxRecord::new(
            "1",
            "https://rpc.example",
            "0xSAFE",
            "5",
            "0xTARGET",
            "CallPause",
            "HELLO",
        )
    }

    #[test]
    fn new_record_is_proposed() {
        let tx = record();
        assert_eq!(tx.stage(), TxStage::Proposed);
        assert!(tx.signatures.is_empty());
        assert!(tx.calldata.is_none());
    }

    #[test]
    fn upsert_replaces_existing_signer() {
        let mut tx = record();
        assert!(!tx.upsert_signature("0xA", "0xsig1"));
        assert_eq!(tx.stage(), TxStage::PartiallySigned);

        // Same signer again: the entry is replaced, not duplicated.
        assert!(tx.upsert_signature("0xA", "0xsig2"));
        assert_eq!(tx.signatures.len(), 1);
        assert_eq!(tx.signatures[0].signature, "0xsig2");
    }

    #[test]
    fn concat_preserves_record_order() {
        let mut tx = record();
        tx.upsert_signature("0xA", "0xaaaa");
        tx.upsert_signature("0xB", "0xbbbb");
        assert_eq!(tx.concat_signatures(), "0xaaaa0xbbbb");
    }

    #[test]
    fn calldata_marks_simulated() {
        let mut tx = record();
        tx.upsert_signature("0xA", "0xsig");
        tx.calldata = Some("0xdead".to_string());
        assert_eq!(tx.stage(), TxStage::Simulated);
    }

    #[test]
    fn empty_collections_are_omitted_from_json() {
        let json = serde_json::to_string(&record()).unwrap();
        assert!(!json.contains("signatures"));
        assert!(!json.contains("calldata"));
    }

    #[test]
    fn json_round_trip() {
        let mut tx = record();
        tx.upsert_signature("0xA", "0xsig");
        let json = serde_json::to_string(&tx).unwrap();
        let back: TxRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tx);
    }
}
