//! Cache key generation
//!
//! A key is a pure function of (tool name, caller identity, canonicalized
//! parameters): `tool:caller:digest`. Object keys are sorted before hashing
//! so parameter insertion order never changes the digest, and control
//! parameters are stripped so toggling the bypass flag cannot fragment the
//! cache.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use serde_json::Value;

/// Parameters that steer the call itself rather than the query.
/// Never part of the digest.
const CONTROL_PARAMS: &[&str] = &["force_refresh"];

/// Build the cache key for one tool call.
pub fn cache_key(tool: &str, caller: &str, params: &Value) -> String {
    format!("{}:{}:{:016x}", tool, caller, params_digest(params))
}

/// Canonical digest of a parameter value.
///
/// Equal parameters always produce the same digest regardless of object key
/// order. The digest only needs process-lifetime stability; the cache does
/// not survive restart.
pub fn params_digest(params: &Value) -> u64 {
    let mut hasher = DefaultHasher::new();
    hash_value(params, &mut hasher, true);
    hasher.finish()
}

fn hash_value(value: &Value, hasher: &mut DefaultHasher, top_level: bool) {
    match value {
        Value::Null => {
            hasher.write_u8(0);
        }
        Value::Bool(b) => {
            hasher.write_u8(1);
            b.hash(hasher);
        }
        Value::Number(n) => {
            hasher.write_u8(2);
            // Stringified for consistent hashing across integer/float forms
            n.to_string().hash(hasher);
        }
        Value::String(s) => {
            hasher.write_u8(3);
            s.hash(hasher);
        }
        Value::Array(arr) => {
            hasher.write_u8(4);
            hasher.write_usize(arr.len());
            for item in arr {
                hash_value(item, hasher, false);
            }
        }
        Value::Object(obj) => {
            // Sorted keys; control parameters dropped at the top level only
            let mut keys: Vec<&String> = obj
                .keys()
                .filter(|k| !(top_level && CONTROL_PARAMS.contains(&k.as_str())))
                .collect();
            keys.sort();

            hasher.write_u8(5);
            hasher.write_usize(keys.len());
            for key in keys {
                key.hash(hasher);
                if let Some(v) = obj.get(key) {
                    hash_value(v, hasher, false);
                }
            }
        }
    }
}
