//! # Asset Record Store
//!
//! Get/put of serialized [`AssetRecord`]s over the ledger port, plus the
//! bulk reads the query layer builds on. All encoding flows through
//! `CanonicalBytes`, so a record that did not change re-encodes to the
//! same bytes on every replica.
//!
//! Decode failures on the single-record path abort the operation; on the
//! bulk paths (`scan_all`, `history_of`) a malformed stored row is skipped
//! with a warning instead, so one bad document cannot take down a
//! read-only query. Mutating operations never take that shortcut.

use tracing::warn;

use phl_core::{AssetId, CanonicalBytes, CanonicalizationError, CustodyError, Timestamp};

use crate::ledger::TransactionContext;
use crate::record::AssetRecord;

/// One decoded version of an asset record from the substrate's history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordVersion {
    /// Transaction that committed this version.
    pub tx_id: String,
    /// Logical commit timestamp of that transaction.
    pub timestamp: Timestamp,
    /// The record snapshot, or `None` for a tombstone.
    pub record: Option<AssetRecord>,
}

/// Load and decode the record stored under an asset key.
pub fn get(ctx: &dyn TransactionContext, asset_id: &AssetId) -> Result<AssetRecord, CustodyError> {
    let bytes = ctx
        .get_state(asset_id.as_str())?
        .ok_or_else(|| CustodyError::NotFound {
            asset_id: asset_id.to_string(),
        })?;
    decode(&bytes)
}

/// Whether any record is stored under an asset key.
pub fn exists(ctx: &dyn TransactionContext, asset_id: &AssetId) -> Result<bool, CustodyError> {
    Ok(ctx.get_state(asset_id.as_str())?.is_some())
}

/// Encode a record canonically and write it under its asset key.
///
/// Idempotent overwrite; this is the single write a mutating operation
/// performs, and it happens last.
pub fn put(ctx: &mut dyn TransactionContext, record: &AssetRecord) -> Result<(), CustodyError> {
    let bytes = CanonicalBytes::new(record)?;
    ctx.put_state(record.asset_id.as_str(), bytes.into_vec())
}

/// Every stored record whose `doc_type` matches, in substrate key order.
///
/// Rows that fail to decode are skipped with a warning.
pub fn scan_all(
    ctx: &dyn TransactionContext,
    doc_type: &str,
) -> Result<Vec<AssetRecord>, CustodyError> {
    let mut records = Vec::new();
    for (key, bytes) in ctx.get_state_by_range("", "")? {
        match decode(&bytes) {
            Ok(record) if record.doc_type == doc_type => records.push(record),
            Ok(_) => {}
            Err(err) => warn!(%key, %err, "skipping malformed record during scan"),
        }
    }
    Ok(records)
}

/// The full version history of an asset key, oldest first.
///
/// Tombstones are preserved as `None`; versions whose bytes fail to decode
/// are skipped with a warning.
pub fn history_of(
    ctx: &dyn TransactionContext,
    asset_id: &AssetId,
) -> Result<Vec<RecordVersion>, CustodyError> {
    let mut versions = Vec::new();
    for version in ctx.get_history_for_key(asset_id.as_str())? {
        let record = match &version.value {
            None => None,
            Some(bytes) => match decode(bytes) {
                Ok(record) => Some(record),
                Err(err) => {
                    warn!(
                        asset_id = %asset_id,
                        tx_id = %version.tx_id,
                        %err,
                        "skipping undecodable record version"
                    );
                    continue;
                }
            },
        };
        versions.push(RecordVersion {
            tx_id: version.tx_id,
            timestamp: version.timestamp,
            record,
        });
    }
    Ok(versions)
}

/// Decode stored record bytes.
fn decode(bytes: &[u8]) -> Result<AssetRecord, CustodyError> {
    serde_json::from_slice(bytes)
        .map_err(|e| CustodyError::Serialization(CanonicalizationError::Json(e)))
}
