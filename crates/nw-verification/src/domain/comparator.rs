//! Type-aware answer comparison.
//!
//! Different challenge kinds tolerate different encodings of the same
//! answer: balances can be zero-padded or differently cased hex, JSON
//! payloads can order fields arbitrarily. A parse failure on either side
//! degrades to strict string comparison; it is evidence of mismatch, not a
//! system fault.

use primitive_types::U256;
use serde_json::Value;
use shared_types::ChallengeKind;

/// Whether a submitted answer is equivalent to the expected one for the
/// given challenge kind.
pub fn answers_match(submitted: &str, expected: &str, kind: &ChallengeKind) -> bool {
    let submitted = normalize(submitted);
    let expected = normalize(expected);

    match kind {
        // Block hashes must match exactly
        ChallengeKind::BlockHash { .. } => submitted == expected,

        // Balances compare numerically so formatting differences don't matter
        ChallengeKind::BalanceAtHeight { .. } => numeric_eq(&submitted, &expected),

        // Structured payloads compare on a canonical re-serialization
        ChallengeKind::HeaderFields { .. } | ChallengeKind::SyncStatus => {
            json_eq(&submitted, &expected)
        }
    }
}

fn normalize(raw: &str) -> String {
    raw.trim().to_ascii_lowercase()
}

fn numeric_eq(submitted: &str, expected: &str) -> bool {
    match (parse_hex_u256(submitted), parse_hex_u256(expected)) {
        (Some(a), Some(b)) => a == b,
        _ => submitted == expected,
    }
}

fn parse_hex_u256(raw: &str) -> Option<U256> {
    let digits = raw.strip_prefix("0x").unwrap_or(raw);
    U256::from_str_radix(digits, 16).ok()
}

fn json_eq(submitted: &str, expected: &str) -> bool {
    match (parse_object(submitted), parse_object(expected)) {
        // serde_json maps are BTreeMaps, so re-serialization is canonical
        (Some(a), Some(b)) => a.to_string() == b.to_string(),
        _ => submitted == expected,
    }
}

fn parse_object(raw: &str) -> Option<Value> {
    serde_json::from_str::<Value>(raw)
        .ok()
        .filter(Value::is_object)
}
