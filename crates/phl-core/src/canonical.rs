//! # Canonical Serialization — Stable Record Encoding
//!
//! This module defines `CanonicalBytes`, the sole construction path for the
//! bytes a custody record is persisted as.
//!
//! ## Audit Invariant
//!
//! The ledger substrate keeps every committed version of a record, and the
//! query layer replays that version history as the audit trail. For the
//! trail to be reproducible, re-encoding an unchanged record must produce
//! byte-identical output on every replica. `CanonicalBytes` guarantees this
//! by serializing through RFC 8785 (JSON Canonicalization Scheme): sorted
//! keys, compact separators, deterministic number rendering.
//!
//! The inner buffer is private; the only constructor is
//! [`CanonicalBytes::new()`], so no call site can fall back to an ad-hoc
//! `serde_json::to_vec()` with unstable key order.
//!
//! Floats are rejected outright. No custody field is fractional, and JCS
//! float rendering has edge cases that are not worth carrying into an audit
//! format.

use serde::Serialize;
use serde_json::Value;

use crate::error::CanonicalizationError;

/// Bytes produced exclusively by JCS-canonical serialization.
///
/// # Invariants
///
/// - The only constructor is `CanonicalBytes::new()`.
/// - No float values anywhere in the encoded document.
/// - Object keys are sorted, separators compact (RFC 8785).
///
/// Enforced by the constructor; the inner `Vec<u8>` is private.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalBytes(Vec<u8>);

impl CanonicalBytes {
    /// Encode any serializable value in canonical form.
    ///
    /// # Errors
    ///
    /// Returns [`CanonicalizationError::FloatRejected`] if the value
    /// contains a float, or [`CanonicalizationError::Json`] if JCS
    /// serialization fails.
    pub fn new(obj: &impl Serialize) -> Result<Self, CanonicalizationError> {
        let value = serde_json::to_value(obj)?;
        reject_floats(&value)?;
        let s = serde_jcs::to_string(&value)?;
        Ok(Self(s.into_bytes()))
    }

    /// The canonical bytes, ready for `put_state`.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Length of the canonical byte sequence.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the canonical byte sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consume into the underlying buffer.
    pub fn into_vec(self) -> Vec<u8> {
        self.0
    }
}

impl AsRef<[u8]> for CanonicalBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Walk a JSON value tree and reject any float leaf.
///
/// Integer-valued numbers (representable as i64/u64) pass; everything else
/// numeric is an error.
fn reject_floats(value: &Value) -> Result<(), CanonicalizationError> {
    match value {
        Value::Null | Value::Bool(_) | Value::String(_) => Ok(()),
        Value::Number(n) => {
            if n.is_f64() && !n.is_i64() && !n.is_u64() {
                if let Some(f) = n.as_f64() {
                    return Err(CanonicalizationError::FloatRejected(f));
                }
            }
            Ok(())
        }
        Value::Object(map) => map.values().try_for_each(reject_floats),
        Value::Array(arr) => arr.iter().try_for_each(reject_floats),
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    /// Strategy for float-free JSON values, the domain custody records
    /// live in.
    fn json_value_no_floats() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(|n| serde_json::json!(n)),
            "[a-zA-Z0-9_ -]{0,40}".prop_map(Value::String),
        ];
        leaf.prop_recursive(4, 64, 8, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..8).prop_map(Value::Array),
                prop::collection::btree_map("[a-z_]{1,10}", inner, 0..8).prop_map(|m| {
                    let map: serde_json::Map<String, Value> = m.into_iter().collect();
                    Value::Object(map)
                }),
            ]
        })
    }

    proptest! {
        /// Encoding never fails for float-free values.
        #[test]
        fn canonical_encoding_total_on_domain(value in json_value_no_floats()) {
            prop_assert!(CanonicalBytes::new(&value).is_ok());
        }

        /// Same input, same bytes — the audit reproducibility property.
        #[test]
        fn canonical_encoding_deterministic(value in json_value_no_floats()) {
            let a = CanonicalBytes::new(&value).unwrap();
            let b = CanonicalBytes::new(&value).unwrap();
            prop_assert_eq!(a.as_bytes(), b.as_bytes());
        }

        /// Decoding canonical bytes recovers the original value.
        #[test]
        fn canonical_encoding_lossless(value in json_value_no_floats()) {
            let cb = CanonicalBytes::new(&value).unwrap();
            let back: Value = serde_json::from_slice(cb.as_bytes()).unwrap();
            prop_assert_eq!(back, value);
        }
    }
}
