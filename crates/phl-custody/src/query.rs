//! # Query Layer — Read-Only Projections
//!
//! Public reads over the record store: point lookup, scan-all, and
//! full-history replay from the substrate's per-key version chain. None of
//! these gate on caller identity, and none of them mutate anything.

use phl_core::{AssetId, CustodyError, Timestamp};

use crate::ledger::TransactionContext;
use crate::record::{AssetRecord, DOC_TYPE};
use crate::store;

/// One committed snapshot of an asset record, as returned by
/// [`get_history`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryItem {
    /// Transaction that committed the snapshot.
    pub tx_id: String,
    /// Logical commit timestamp of that transaction.
    pub timestamp: Timestamp,
    /// The record as of that transaction.
    pub record: AssetRecord,
}

/// Point read of one asset record.
pub fn get_asset(
    ctx: &dyn TransactionContext,
    asset_id: &AssetId,
) -> Result<AssetRecord, CustodyError> {
    store::get(ctx, asset_id)
}

/// All custody records currently in the store, in substrate key order.
///
/// Documents of other types sharing the store are filtered out by the
/// `doc_type` discriminator.
pub fn get_all_assets(ctx: &dyn TransactionContext) -> Result<Vec<AssetRecord>, CustodyError> {
    store::scan_all(ctx, DOC_TYPE)
}

/// The committed version history of an asset, oldest first.
///
/// Tombstoned versions are skipped. The custody core never deletes a
/// record, so none should occur, but the substrate contract permits them.
pub fn get_history(
    ctx: &dyn TransactionContext,
    asset_id: &AssetId,
) -> Result<Vec<HistoryItem>, CustodyError> {
    Ok(store::history_of(ctx, asset_id)?
        .into_iter()
        .filter_map(|version| {
            version.record.map(|record| HistoryItem {
                tx_id: version.tx_id,
                timestamp: version.timestamp,
                record,
            })
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use phl_core::{Actor, OrgId};

    use crate::memory::MemoryLedger;
    use crate::record::{CustodyState, Owner};

    fn ts(s: &str) -> Timestamp {
        Timestamp::parse(s).unwrap()
    }

    fn actor() -> Actor {
        Actor::new("lab-admin", OrgId::new("Org1MSP"))
    }

    fn record(id: &str) -> AssetRecord {
        AssetRecord {
            doc_type: DOC_TYPE.to_string(),
            asset_id: AssetId::new(id),
            name: "DrogaInmunologica-B".to_string(),
            lot: "LOTE-002".to_string(),
            manufacture_date: ts("2025-02-15T10:00:00Z"),
            expiry_date: ts("2026-02-15T10:00:00Z"),
            state: CustodyState::Created,
            owner: Owner {
                id: "lab-admin".to_string(),
                org: OrgId::new("Org1MSP"),
            },
            location: "manufacturing site".to_string(),
            patient_id: None,
            history: Vec::new(),
        }
    }

    #[test]
    fn test_get_asset_is_idempotent() {
        let mut ledger = MemoryLedger::new();
        let mut tx = ledger.transaction(Some(actor()), ts("2025-02-15T10:00:00Z"));
        store::put(&mut tx, &record("MED-1002")).unwrap();

        let first = get_asset(&tx, &AssetId::new("MED-1002")).unwrap();
        let second = get_asset(&tx, &AssetId::new("MED-1002")).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_get_asset_missing() {
        let mut ledger = MemoryLedger::new();
        let tx = ledger.transaction(Some(actor()), ts("2025-02-15T10:00:00Z"));
        assert!(matches!(
            get_asset(&tx, &AssetId::new("MED-0000")),
            Err(CustodyError::NotFound { .. })
        ));
    }

    #[test]
    fn test_get_all_assets_returns_every_custody_record() {
        let mut ledger = MemoryLedger::new();
        let mut tx = ledger.transaction(Some(actor()), ts("2025-02-15T10:00:00Z"));
        store::put(&mut tx, &record("MED-1001")).unwrap();
        store::put(&mut tx, &record("MED-1002")).unwrap();

        let all = get_all_assets(&tx).unwrap();
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn test_get_history_replays_versions_and_skips_tombstones() {
        let mut ledger = MemoryLedger::new();
        let mut tx = ledger.transaction(Some(actor()), ts("2025-02-15T10:00:00Z"));
        let mut rec = record("MED-1002");
        store::put(&mut tx, &rec).unwrap();
        rec.location = "warehouse 7".to_string();
        store::put(&mut tx, &rec).unwrap();
        tx.delete_state("MED-1002");

        let history = get_history(&tx, &AssetId::new("MED-1002")).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].record.location, "manufacturing site");
        assert_eq!(history[1].record.location, "warehouse 7");
    }

    #[test]
    fn test_get_history_of_unknown_key_is_empty() {
        let mut ledger = MemoryLedger::new();
        let tx = ledger.transaction(Some(actor()), ts("2025-02-15T10:00:00Z"));
        assert!(get_history(&tx, &AssetId::new("MED-0000")).unwrap().is_empty());
    }
}
