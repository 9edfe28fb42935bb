//! Fixed-width ABI hex decoding for wallet-query output.
//!
//! The query tool prints a single `0x`-prefixed hex string; every 32-byte
//! word is one value. Dynamic arrays carry an offset word and a length word
//! before the elements.

use crate::error::WorkflowError;

const WORD_HEX: usize = 64;

fn words(raw: &str) -> Result<Vec<&str>, WorkflowError> {
    let trimmed = raw.trim();
    let body = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    if body.is_empty() || body.len() % WORD_HEX != 0 {
        return Err(WorkflowError::Parse {
            tool: "cast",
            what: "abi words",
        });
    }
    let mut out = Vec::with_capacity(body.len() / WORD_HEX);
    let mut rest = body;
    while !rest.is_empty() {
        let (word, tail) = rest.split_at(WORD_HEX);
        if hex::decode(word).is_err() {
            return Err(WorkflowError::Parse {
                tool: "cast",
                what: "abi words",
            });
        }
        out.push(word);
        rest = tail;
    }
    Ok(out)
}

/// Decode a single unsigned integer (nonce, threshold) to a decimal string.
pub fn decode_uint(raw: &str) -> Result<String, WorkflowError> {
    let words = words(raw)?;
    let significant = words[0].trim_start_matches('0');
    if significant.is_empty() {
        return Ok("0".to_string());
    }
    let value = u128::from_str_radix(significant, 16).map_err(|_| WorkflowError::Parse {
        tool: "cast",
        what: "uint word",
    })?;
    Ok(value.to_string())
}

/// Decode an address array: skip the offset/length header words, then
/// right-trim each element word to its 20-byte address.
pub fn decode_address_list(raw: &str) -> Result<Vec<String>, WorkflowError> {
    let words = words(raw)?;
    if words.len() < 2 {
        return Err(WorkflowError::Parse {
            tool: "cast",
            what: "address list header",
        });
    }
    let addresses = words[2..]
        .iter()
        .map(|word| format!("0x{}", word[WORD_HEX - 40..].to_lowercase()))
        .collect();
    Ok(addresses)
}
