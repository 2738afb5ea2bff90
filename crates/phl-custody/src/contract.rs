//! # Custody Contract — State-Machine Operations
//!
//! The mutating operations of the custody chain. Every operation follows
//! the same shape: resolve the caller, load the record, authorize, validate
//! the transition against the table in `transitions`, mutate, append one
//! history entry, and persist with a single `put` at the very end. Any
//! failure before that `put` leaves the store untouched.
//!
//! Authorization is checked before state validation, so an unauthorized
//! caller never learns a record's position in the chain from the error it
//! receives.
//!
//! Timestamps are read once per invocation from the transaction context's
//! logical clock; the wall clock is never consulted, so replicas replaying
//! the same transaction derive identical history.

use tracing::info;

use phl_core::{Actor, AssetId, CustodyError, OrgId, PatientId, Timestamp};

use crate::ledger::TransactionContext;
use crate::query::{self, HistoryItem};
use crate::record::{
    AssetRecord, CustodyAction, CustodyState, HistoryEntry, Owner, DOC_TYPE, PATIENT_ORG,
};
use crate::roles::{Role, RoleDirectory};
use crate::store;
use crate::transitions::{edge, Operation, TransitionRule};

/// Location label written on creation and on the seed records.
pub const LOCATION_MANUFACTURING: &str = "manufacturing site";
/// Location label while an asset is between parties.
pub const LOCATION_IN_TRANSIT: &str = "in transit";
/// Location label once an asset has been dispensed.
pub const LOCATION_DISPENSED: &str = "dispensed";

/// The custody contract: the operation surface the ledger substrate's
/// dispatcher invokes.
///
/// Holds the role directory that gates every handoff; the transaction
/// context is passed per call because its lifetime is one invocation.
#[derive(Debug, Clone)]
pub struct CustodyContract {
    roles: RoleDirectory,
}

impl CustodyContract {
    /// Build a contract over the given role membership.
    pub fn new(roles: RoleDirectory) -> Self {
        Self { roles }
    }

    /// Build a contract over the original deployment's role topology.
    pub fn well_known() -> Self {
        Self::new(RoleDirectory::well_known())
    }

    // ─── Mutating operations ─────────────────────────────────────────

    /// Seed the ledger with the two demonstration assets.
    ///
    /// Idempotent: re-invocation overwrites the seed keys with fresh
    /// CREATED records.
    pub fn init_ledger(&self, ctx: &mut dyn TransactionContext) -> Result<(), CustodyError> {
        let now = ctx.tx_timestamp()?;
        let manufacturer = Actor::new("Org1MSP", OrgId::new("Org1MSP"));

        let seeds = [
            ("MED-1001", "DrogaOncologica-A", "LOTE-001", "2025-01-10T10:00:00Z", "2026-01-10T10:00:00Z"),
            ("MED-1002", "DrogaInmunologica-B", "LOTE-002", "2025-02-15T10:00:00Z", "2026-02-15T10:00:00Z"),
        ];

        for (asset_id, name, lot, manufacture, expiry) in seeds {
            let record = new_record(
                AssetId::new(asset_id),
                name,
                lot,
                Timestamp::parse(manufacture)?,
                Timestamp::parse(expiry)?,
                &manufacturer,
                now,
            );
            store::put(ctx, &record)?;
            info!(asset_id, "seeded demonstration asset");
        }
        Ok(())
    }

    /// Create a new asset record in state CREATED, owned by the caller.
    ///
    /// The caller's org must hold the manufacturer role; the key must be
    /// free; dates must parse as RFC 3339 with `manufacture ≤ expiry`.
    pub fn create_asset(
        &self,
        ctx: &mut dyn TransactionContext,
        asset_id: AssetId,
        name: &str,
        lot: &str,
        manufacture_date: &str,
        expiry_date: &str,
    ) -> Result<AssetRecord, CustodyError> {
        let actor = ctx.caller_identity()?;
        self.require_role(&actor, Role::Manufacturer, "only a manufacturer org may create assets")?;

        if store::exists(ctx, &asset_id)? {
            return Err(CustodyError::AlreadyExists {
                asset_id: asset_id.to_string(),
            });
        }

        let manufacture = Timestamp::parse(manufacture_date)?;
        let expiry = Timestamp::parse(expiry_date)?;
        if manufacture > expiry {
            return Err(CustodyError::InvalidDate {
                value: manufacture_date.to_string(),
                detail: format!("manufacture date is after expiry date {expiry_date}"),
            });
        }

        let now = ctx.tx_timestamp()?;
        let record = new_record(asset_id, name, lot, manufacture, expiry, &actor, now);
        store::put(ctx, &record)?;
        info!(asset_id = %record.asset_id, actor = %actor, "asset created");
        Ok(record)
    }

    /// Hand custody to the next party in the chain.
    ///
    /// Only the current owner may transfer, only from CREATED or
    /// STORED_AT_LOGISTICS, and only to a party whose org holds the role
    /// the next handoff expects.
    pub fn transfer(
        &self,
        ctx: &mut dyn TransactionContext,
        asset_id: &AssetId,
        new_owner_id: &str,
        new_owner_org: OrgId,
    ) -> Result<AssetRecord, CustodyError> {
        let actor = ctx.caller_identity()?;
        let mut record = store::get(ctx, asset_id)?;
        require_owner(&actor, &record, "only the current owner may transfer")?;

        let rule = self.transition_for(&record, Operation::Transfer)?;
        if !self.roles.is_member(rule.counterpart, &new_owner_org) {
            return Err(CustodyError::InvalidDestination {
                state: record.state.to_string(),
                proposed_org: new_owner_org.to_string(),
            });
        }

        let now = ctx.tx_timestamp()?;
        record.state = rule.to;
        record.owner = Owner {
            id: new_owner_id.to_string(),
            org: new_owner_org,
        };
        record.location = LOCATION_IN_TRANSIT.to_string();
        record.append_history(&actor, rule.action, LOCATION_IN_TRANSIT, now);
        store::put(ctx, &record)?;
        info!(
            asset_id = %record.asset_id,
            state = %record.state,
            new_owner = %record.owner.id,
            "asset transferred"
        );
        Ok(record)
    }

    /// Confirm physical receipt of an in-transit asset.
    ///
    /// Only the current owner (the party the asset was transferred to) may
    /// receive, and their org must hold the receiving role for that leg.
    pub fn receive(
        &self,
        ctx: &mut dyn TransactionContext,
        asset_id: &AssetId,
        location: &str,
    ) -> Result<AssetRecord, CustodyError> {
        let actor = ctx.caller_identity()?;
        let mut record = store::get(ctx, asset_id)?;
        require_owner(&actor, &record, "only the designated receiver may receive")?;

        let rule = self.transition_for(&record, Operation::Receive)?;
        if !self.roles.is_member(rule.counterpart, &actor.org) {
            return Err(CustodyError::WrongReceiver {
                state: record.state.to_string(),
                receiver_org: actor.org.to_string(),
            });
        }

        let now = ctx.tx_timestamp()?;
        record.state = rule.to;
        record.location = location.to_string();
        record.append_history(&actor, rule.action, location, now);
        store::put(ctx, &record)?;
        info!(asset_id = %record.asset_id, state = %record.state, "asset received");
        Ok(record)
    }

    /// Dispense an asset to a patient. Terminal.
    ///
    /// Only a health-role owner may dispatch, only from RECEIVED_AT_HEALTH,
    /// and only while the asset is not expired relative to transaction
    /// time (dispatch exactly at the expiry instant still succeeds).
    pub fn dispatch_to_patient(
        &self,
        ctx: &mut dyn TransactionContext,
        asset_id: &AssetId,
        patient_id: PatientId,
    ) -> Result<AssetRecord, CustodyError> {
        let actor = ctx.caller_identity()?;
        self.require_role(&actor, Role::Health, "only a health org may dispatch to a patient")?;

        let mut record = store::get(ctx, asset_id)?;
        // state before ownership: a dispatched record reports InvalidState
        let rule = self.transition_for(&record, Operation::Dispatch)?;
        require_owner(&actor, &record, "only the current owner may dispatch")?;

        let now = ctx.tx_timestamp()?;
        if now > record.expiry_date {
            return Err(CustodyError::Expired {
                asset_id: record.asset_id.to_string(),
                expiry: record.expiry_date.to_iso8601(),
            });
        }

        record.state = rule.to;
        record.owner = Owner {
            id: patient_id.as_str().to_string(),
            org: OrgId::new(PATIENT_ORG),
        };
        record.patient_id = Some(patient_id);
        record.location = LOCATION_DISPENSED.to_string();
        record.append_history(&actor, rule.action, LOCATION_DISPENSED, now);
        store::put(ctx, &record)?;
        info!(asset_id = %record.asset_id, "asset dispatched to patient");
        Ok(record)
    }

    // ─── Read-only operations ────────────────────────────────────────

    /// Point read of one asset record. Public, no authorization gate.
    pub fn get_asset(
        &self,
        ctx: &dyn TransactionContext,
        asset_id: &AssetId,
    ) -> Result<AssetRecord, CustodyError> {
        query::get_asset(ctx, asset_id)
    }

    /// All custody records in the store.
    pub fn get_all_assets(
        &self,
        ctx: &dyn TransactionContext,
    ) -> Result<Vec<AssetRecord>, CustodyError> {
        query::get_all_assets(ctx)
    }

    /// The committed version history of an asset, oldest first.
    pub fn get_history(
        &self,
        ctx: &dyn TransactionContext,
        asset_id: &AssetId,
    ) -> Result<Vec<HistoryItem>, CustodyError> {
        query::get_history(ctx, asset_id)
    }

    // ─── Helpers ─────────────────────────────────────────────────────

    /// Authorization gate on the caller's org membership.
    fn require_role(
        &self,
        actor: &Actor,
        role: Role,
        requirement: &str,
    ) -> Result<(), CustodyError> {
        if !self.roles.is_member(role, &actor.org) {
            return Err(CustodyError::Unauthorized {
                actor: actor.to_string(),
                requirement: requirement.to_string(),
            });
        }
        Ok(())
    }

    /// Look up the legal edge for this record and operation.
    fn transition_for(
        &self,
        record: &AssetRecord,
        operation: Operation,
    ) -> Result<&'static TransitionRule, CustodyError> {
        edge(record.state, operation).ok_or_else(|| CustodyError::InvalidState {
            state: record.state.to_string(),
            operation: operation.to_string(),
        })
    }
}

/// Identity gate: the caller must be the record's current owner.
///
/// Checked before any state validation so the error reveals nothing about
/// the record's position in the chain.
fn require_owner(
    actor: &Actor,
    record: &AssetRecord,
    requirement: &str,
) -> Result<(), CustodyError> {
    if actor.id != record.owner.id {
        return Err(CustodyError::Unauthorized {
            actor: actor.to_string(),
            requirement: requirement.to_string(),
        });
    }
    Ok(())
}

/// Assemble a fresh CREATED record with its first history entry.
fn new_record(
    asset_id: AssetId,
    name: &str,
    lot: &str,
    manufacture_date: Timestamp,
    expiry_date: Timestamp,
    creator: &Actor,
    now: Timestamp,
) -> AssetRecord {
    AssetRecord {
        doc_type: DOC_TYPE.to_string(),
        asset_id,
        name: name.to_string(),
        lot: lot.to_string(),
        manufacture_date,
        expiry_date,
        state: CustodyState::Created,
        owner: Owner {
            id: creator.id.clone(),
            org: creator.org.clone(),
        },
        location: LOCATION_MANUFACTURING.to_string(),
        patient_id: None,
        history: vec![HistoryEntry {
            timestamp: now,
            actor_id: creator.id.clone(),
            actor_org: creator.org.clone(),
            action: CustodyAction::Created,
            location: LOCATION_MANUFACTURING.to_string(),
        }],
    }
}
