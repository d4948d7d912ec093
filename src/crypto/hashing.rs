// Pseudo transaction hashes for registrations that never reach the network,
// plus the salted digest stored in place of user passwords.

use rand::RngCore;
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

// Domain separation so a pseudo hash can never equal a hash of the raw payload.
const PSEUDO_TX_DOMAIN: &[u8] = b"AGRITRACE-PSEUDO-TX";

/// Sorts a JSON object's keys recursively so equal payloads serialize identically.
fn sort_json_value(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let sorted_map: BTreeMap<String, Value> = map
                .iter()
                .map(|(k, v)| (k.clone(), sort_json_value(v)))
                .collect();
            Value::Object(sorted_map.into_iter().collect())
        }
        Value::Array(arr) => Value::Array(arr.iter().map(sort_json_value).collect()),
        _ => value.clone(),
    }
}

/// Canonical (key-sorted, compact) serialization of a JSON value.
pub fn canonical_json(value: &Value) -> String {
    sort_json_value(value).to_string()
}

/// Builds a `0x`-prefixed, 64-hex-digit hash for a payload.
///
/// `timestamp_ms` and `nonce` make repeated submissions of the same payload
/// produce distinct hashes.
pub fn fabricate_transaction_hash(payload: &Value, timestamp_ms: i64, nonce: u64) -> String {
    let mut hasher = Sha256::new();
    hasher.update(PSEUDO_TX_DOMAIN);
    hasher.update(canonical_json(payload).as_bytes());
    hasher.update(timestamp_ms.to_be_bytes());
    hasher.update(nonce.to_be_bytes());
    format!("0x{}", hex::encode(hasher.finalize()))
}

/// `salt$digest`, both hex. A fresh 16-byte salt is drawn per call.
pub fn hash_password(password: &str) -> String {
    let mut salt = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut salt);
    format!("{}${}", hex::encode(salt), salted_digest(&salt, password))
}

fn salted_digest(salt: &[u8], password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}
