//! # phl-core — Foundational Types for the PharmaLedger Custody Core
//!
//! This crate is the bedrock of the custody tracking stack. It defines the
//! primitives every other crate builds on; it depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for domain primitives.** `AssetId`, `OrgId`,
//!    `PatientId` — validated, namespaced, no bare strings for identifiers.
//!
//! 2. **`CanonicalBytes` newtype.** ALL persisted record bytes flow through
//!    `CanonicalBytes::new()` (RFC 8785). Re-encoding an unchanged record is
//!    byte-identical, which the audit-history replay depends on.
//!
//! 3. **UTC-only timestamps.** The `Timestamp` type normalizes every input
//!    to UTC at seconds precision, so date comparisons are calendar-aware
//!    and history entries render deterministically.
//!
//! 4. **One failure taxonomy.** `CustodyError` enumerates every
//!    caller-distinguishable failure kind with structured fields.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `phl-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - All persisted types derive `Debug`, `Clone`, `Serialize`, `Deserialize`.

pub mod canonical;
pub mod error;
pub mod identity;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use canonical::CanonicalBytes;
pub use error::{CanonicalizationError, CustodyError};
pub use identity::{Actor, AssetId, OrgId, PatientId};
pub use temporal::Timestamp;
