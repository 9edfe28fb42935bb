//! Signature-merge engine.
//!
//! The only place independently-created record files are cross-checked.
//! Records travel between signers as flat files with no coordinator, so the
//! identity invariant here is what makes concurrent out-of-band signing
//! safe to reconcile: merging signatures from the wrong transaction must be
//! structurally impossible.

use crate::error::WorkflowError;
use crate::models::TxRecord;

fn check_identity(
    field: &'static str,
    ours: &str,
    theirs: &str,
    path: &str,
) -> Result<(), WorkflowError> {
    if ours != theirs {
        return Err(WorkflowError::Mismatch {
            field,
            path: path.to_string(),
            ours: ours.to_string(),
            theirs: theirs.to_string(),
        });
    }
    Ok(())
}

/// Fold `other` into `merged`, first asserting both describe the identical
/// transaction. `path` names the offending file in mismatch errors.
///
/// Conflict policy for a signer present on both sides: the incoming value
/// wins (last-applied wins overall, since files are folded in argument
/// order).
pub fn merge_into(merged: &mut TxRecord, other: &TxRecord, path: &str) -> Result<(), WorkflowError> {
    check_identity("safe_addr", &merged.safe_addr, &other.safe_addr, path)?;
    check_identity("target_addr", &merged.target_addr, &other.target_addr, path)?;
    check_identity("safe_nonce", &merged.safe_nonce, &other.safe_nonce, path)?;

    if merged.data.is_empty() {
        merged.data = other.data.clone();
    } else {
        check_identity("data", &merged.data, &other.data, path)?;
    }

    for entry in &other.signatures {
        merged.upsert_signature(&entry.signer, &entry.signature);
    }
    Ok(())
}

/// Merge every `(path, record)` pair into `primary`, in order, atomically:
/// on any mismatch the primary is left exactly as it was.
pub fn merge_all(
    primary: &mut TxRecord,
    others: &[(String, TxRecord)],
) -> Result<(), WorkflowError> {
    let mut merged = primary.clone();
    for (path, other) in others {
        merge_into(&mut merged, other, path)?;
    }
    *primary = merged;
    Ok(())
}
