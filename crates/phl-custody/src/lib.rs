//! # phl-custody — The Pharmaceutical Custody State Machine
//!
//! Tracks custody of pharmaceutical units through a fixed multi-party
//! supply chain, recording an append-only history and enforcing who may
//! move each unit between states. The ledger substrate (consensus,
//! persistence, transport, certificates) is a collaborator behind the
//! [`TransactionContext`] port, never reimplemented here.
//!
//! ## Lifecycle
//!
//! ```text
//! CREATED ──transfer──▶ IN_TRANSIT_LAB_TO_LOGISTICS ──receive──▶ STORED_AT_LOGISTICS
//!                                                                       │
//!                                                                   transfer
//!                                                                       ▼
//! DISPATCHED_TO_PATIENT ◀──dispatch── RECEIVED_AT_HEALTH ◀──receive── IN_TRANSIT_LOGISTICS_TO_HEALTH
//!      (terminal)
//! ```
//!
//! ## Modules
//!
//! - **`ledger`** — the substrate port: key-value state, range scan,
//!   per-key version history, caller identity, logical tx timestamp.
//! - **`record`** — the asset record, its embedded custody history, and
//!   the closed state/action sets.
//! - **`roles`** — role membership: handoff eligibility is "holds the
//!   role", not "is this hard-coded org".
//! - **`transitions`** — the legal edges as one const table.
//! - **`contract`** — the operations: create, transfer, receive,
//!   dispatch-to-patient, plus init-ledger seeding.
//! - **`store`** / **`query`** — canonical record persistence and the
//!   read-only projections (point read, scan-all, history replay).
//! - **`memory`** — an in-memory substrate for tests and local runs.
//!
//! ## Guarantees
//!
//! Every mutating operation is authorize → validate → mutate → append
//! history → one `put`, inside the substrate's atomic transaction. A
//! failed operation persists nothing. History timestamps come from the
//! transaction's logical clock, so replicated execution is deterministic.

pub mod contract;
pub mod ledger;
pub mod memory;
pub mod query;
pub mod record;
pub mod roles;
pub mod store;
pub mod transitions;

// ─── Contract re-exports ────────────────────────────────────────────

pub use contract::{
    CustodyContract, LOCATION_DISPENSED, LOCATION_IN_TRANSIT, LOCATION_MANUFACTURING,
};

// ─── Record re-exports ──────────────────────────────────────────────

pub use record::{
    AssetRecord, CustodyAction, CustodyState, HistoryEntry, Owner, DOC_TYPE, PATIENT_ORG,
};

// ─── Port re-exports ────────────────────────────────────────────────

pub use ledger::{KeyVersion, TransactionContext};
pub use memory::{MemoryLedger, MemoryTransaction};

// ─── Policy and query re-exports ────────────────────────────────────

pub use query::HistoryItem;
pub use roles::{Role, RoleDirectory};
pub use store::RecordVersion;
pub use transitions::{edge, Operation, TransitionRule, TRANSITIONS};
