//! # Asset Record — Data Model and History Accumulator
//!
//! One [`AssetRecord`] exists per tracked pharmaceutical unit, keyed by its
//! asset id. The record carries its own append-only custody history in the
//! same document as the mutable fields, so a single-key write commits the
//! state change and its audit entry atomically.
//!
//! Serde field names are the stable wire schema. Records re-encode
//! byte-identically through `CanonicalBytes`, which the audit replay
//! depends on.

use serde::{Deserialize, Serialize};

use phl_core::{Actor, AssetId, OrgId, PatientId, Timestamp};

/// Value of the `doc_type` discriminator on every custody record.
///
/// Bulk scans keep only documents carrying this marker.
pub const DOC_TYPE: &str = "medication";

/// Placeholder affiliation assigned as owner org once an asset has been
/// dispensed to a patient.
pub const PATIENT_ORG: &str = "PATIENT";

// ─── Lifecycle State ─────────────────────────────────────────────────

/// Custody lifecycle state of an asset.
///
/// ```text
/// CREATED ──▶ IN_TRANSIT_LAB_TO_LOGISTICS ──▶ STORED_AT_LOGISTICS
///                                                    │
///                                                    ▼
///              RECEIVED_AT_HEALTH ◀── IN_TRANSIT_LOGISTICS_TO_HEALTH
///                      │
///                      ▼
///              DISPATCHED_TO_PATIENT  (terminal)
/// ```
///
/// The set is closed; transitions follow the table in `transitions` and
/// nothing else. No state is ever skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CustodyState {
    /// Manufactured, still held by the laboratory.
    Created,
    /// Handed off by the lab, in transit to the logistics operator.
    InTransitLabToLogistics,
    /// In the logistics operator's warehouse.
    StoredAtLogistics,
    /// Handed off by logistics, in transit to the health provider.
    InTransitLogisticsToHealth,
    /// In the health provider's custody, ready to dispense.
    ReceivedAtHealth,
    /// Dispensed to a patient (terminal).
    DispatchedToPatient,
}

impl CustodyState {
    /// Whether this state has no outgoing transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::DispatchedToPatient)
    }
}

impl std::fmt::Display for CustodyState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Created => "CREATED",
            Self::InTransitLabToLogistics => "IN_TRANSIT_LAB_TO_LOGISTICS",
            Self::StoredAtLogistics => "STORED_AT_LOGISTICS",
            Self::InTransitLogisticsToHealth => "IN_TRANSIT_LOGISTICS_TO_HEALTH",
            Self::ReceivedAtHealth => "RECEIVED_AT_HEALTH",
            Self::DispatchedToPatient => "DISPATCHED_TO_PATIENT",
        };
        f.write_str(s)
    }
}

// ─── History ─────────────────────────────────────────────────────────

/// Action label recorded in a custody history entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CustodyAction {
    /// Asset record created by the manufacturer.
    Created,
    /// Lab handed the asset to the logistics operator.
    TransferredToLogistics,
    /// Logistics operator confirmed warehouse receipt.
    ReceivedAtLogistics,
    /// Logistics handed the asset to the health provider.
    TransferredToHealth,
    /// Health provider confirmed receipt.
    ReceivedAtHealth,
    /// Asset dispensed to a patient.
    DispatchedToPatient,
}

impl std::fmt::Display for CustodyAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Created => "CREATED",
            Self::TransferredToLogistics => "TRANSFERRED_TO_LOGISTICS",
            Self::ReceivedAtLogistics => "RECEIVED_AT_LOGISTICS",
            Self::TransferredToHealth => "TRANSFERRED_TO_HEALTH",
            Self::ReceivedAtHealth => "RECEIVED_AT_HEALTH",
            Self::DispatchedToPatient => "DISPATCHED_TO_PATIENT",
        };
        f.write_str(s)
    }
}

/// One immutable entry in an asset's custody history.
///
/// Append order equals chronological order of the committing transactions;
/// timestamps are the transactions' logical timestamps, so replicas derive
/// identical entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Logical commit timestamp of the transaction that appended this entry.
    pub timestamp: Timestamp,
    /// Principal id of the acting caller.
    pub actor_id: String,
    /// Organizational affiliation of the acting caller.
    pub actor_org: OrgId,
    /// What happened.
    pub action: CustodyAction,
    /// Where it happened.
    pub location: String,
}

// ─── Owner ───────────────────────────────────────────────────────────

/// The identity currently authorized to act next on a record.
///
/// Holds the counterpart's principal id after a transfer (they must
/// receive), the holder's id while stored, and the patient id plus the
/// `PATIENT` placeholder org once dispatched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    /// Principal identifier of the owner.
    pub id: String,
    /// Organizational affiliation of the owner.
    pub org: OrgId,
}

// ─── Asset Record ────────────────────────────────────────────────────

/// The persisted custody record of one pharmaceutical unit.
///
/// # Invariants
///
/// - `asset_id` never changes after creation.
/// - `history` is non-empty after creation, strictly append-only, with
///   non-decreasing timestamps.
/// - `state` only moves along the legal edges in `transitions`.
/// - Records are never deleted; a dispatched record stays in the store as
///   a closed record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRecord {
    /// Record-type discriminator, always [`DOC_TYPE`].
    pub doc_type: String,
    /// Unique, immutable asset key.
    pub asset_id: AssetId,
    /// Commercial display name.
    pub name: String,
    /// Batch/lot identifier.
    pub lot: String,
    /// When the unit was manufactured.
    pub manufacture_date: Timestamp,
    /// When the unit expires. Never earlier than `manufacture_date`.
    pub expiry_date: Timestamp,
    /// Current lifecycle state.
    pub state: CustodyState,
    /// Identity authorized to perform the next action.
    pub owner: Owner,
    /// Current physical location, free text.
    pub location: String,
    /// Patient the unit was dispensed to; set only in the terminal state.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<PatientId>,
    /// Append-only custody history, oldest first.
    pub history: Vec<HistoryEntry>,
}

impl AssetRecord {
    /// Append a custody event to the record's embedded history log.
    ///
    /// Pure mutation: the entry is built from the arguments alone, and
    /// `timestamp` must be the transaction's logical timestamp (the caller
    /// reads it once per invocation and threads it through).
    pub fn append_history(
        &mut self,
        actor: &Actor,
        action: CustodyAction,
        location: &str,
        timestamp: Timestamp,
    ) {
        self.history.push(HistoryEntry {
            timestamp,
            actor_id: actor.id.clone(),
            actor_org: actor.org.clone(),
            action,
            location: location.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> AssetRecord {
        AssetRecord {
            doc_type: DOC_TYPE.to_string(),
            asset_id: AssetId::new("MED-1001"),
            name: "DrogaOncologica-A".to_string(),
            lot: "LOTE-001".to_string(),
            manufacture_date: Timestamp::parse("2025-01-10T10:00:00Z").unwrap(),
            expiry_date: Timestamp::parse("2026-01-10T10:00:00Z").unwrap(),
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
    fn test_state_wire_names() {
        let json = serde_json::to_string(&CustodyState::InTransitLabToLogistics).unwrap();
        assert_eq!(json, r#""IN_TRANSIT_LAB_TO_LOGISTICS""#);
        let json = serde_json::to_string(&CustodyState::DispatchedToPatient).unwrap();
        assert_eq!(json, r#""DISPATCHED_TO_PATIENT""#);
    }

    #[test]
    fn test_display_matches_wire_names() {
        for state in [
            CustodyState::Created,
            CustodyState::InTransitLabToLogistics,
            CustodyState::StoredAtLogistics,
            CustodyState::InTransitLogisticsToHealth,
            CustodyState::ReceivedAtHealth,
            CustodyState::DispatchedToPatient,
        ] {
            let wire = serde_json::to_string(&state).unwrap();
            assert_eq!(wire, format!("\"{state}\""));
        }
    }

    #[test]
    fn test_only_dispatched_is_terminal() {
        assert!(CustodyState::DispatchedToPatient.is_terminal());
        assert!(!CustodyState::Created.is_terminal());
        assert!(!CustodyState::ReceivedAtHealth.is_terminal());
    }

    #[test]
    fn test_append_history_records_actor_and_action() {
        let mut rec = record();
        let actor = Actor::new("lab-admin", OrgId::new("Org1MSP"));
        let ts = Timestamp::parse("2025-01-10T10:00:00Z").unwrap();
        rec.append_history(&actor, CustodyAction::Created, "manufacturing site", ts);

        assert_eq!(rec.history.len(), 1);
        let entry = &rec.history[0];
        assert_eq!(entry.actor_id, "lab-admin");
        assert_eq!(entry.actor_org, OrgId::new("Org1MSP"));
        assert_eq!(entry.action, CustodyAction::Created);
        assert_eq!(entry.location, "manufacturing site");
        assert_eq!(entry.timestamp, ts);
    }

    #[test]
    fn test_record_serde_roundtrip() {
        let mut rec = record();
        let actor = Actor::new("lab-admin", OrgId::new("Org1MSP"));
        rec.append_history(
            &actor,
            CustodyAction::Created,
            "manufacturing site",
            Timestamp::parse("2025-01-10T10:00:00Z").unwrap(),
        );
        let json = serde_json::to_string(&rec).unwrap();
        let back: AssetRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, rec);
    }

    #[test]
    fn test_absent_patient_id_not_serialized() {
        let rec = record();
        let json = serde_json::to_string(&rec).unwrap();
        assert!(!json.contains("patient_id"));
    }
}
