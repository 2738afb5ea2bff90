//! # Error Types — Custody Failure Taxonomy
//!
//! Defines the error types used throughout the custody core. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - Every failure kind a caller may need to branch on is a distinct variant
//!   with structured fields (asset id, state names, org ids) — no string
//!   matching on messages.
//! - Authorization failures carry the requirement that was not met, never
//!   the record state, so an unauthorized caller learns nothing about the
//!   asset's position in the chain.
//! - Any failure aborts the whole operation; there is no partial-persistence
//!   variant because partial persistence cannot occur.

use thiserror::Error;

/// Top-level error type for custody operations.
#[derive(Error, Debug)]
pub enum CustodyError {
    /// No record exists under the given asset key.
    #[error("asset {asset_id} does not exist")]
    NotFound {
        /// The asset key that was looked up.
        asset_id: String,
    },

    /// A record already exists under the given asset key.
    #[error("asset {asset_id} already exists")]
    AlreadyExists {
        /// The asset key that collided.
        asset_id: String,
    },

    /// The caller lacks the identity or role the operation requires.
    #[error("caller {actor} is not authorized: {requirement}")]
    Unauthorized {
        /// Identity of the rejected caller.
        actor: String,
        /// The requirement that was not met.
        requirement: String,
    },

    /// The requested operation is not legal from the record's current state.
    #[error("cannot {operation} an asset in state {state}")]
    InvalidState {
        /// Current lifecycle state of the record.
        state: String,
        /// The operation that was attempted.
        operation: String,
    },

    /// The proposed transfer counterpart does not hold the role expected
    /// for the next handoff.
    #[error("org {proposed_org} is not a valid destination for a transfer from state {state}")]
    InvalidDestination {
        /// Current lifecycle state of the record.
        state: String,
        /// Organizational affiliation of the proposed new owner.
        proposed_org: String,
    },

    /// The receiving caller does not hold the role expected for this
    /// transit leg.
    #[error("org {receiver_org} cannot receive an asset in state {state}")]
    WrongReceiver {
        /// Current (in-transit) lifecycle state of the record.
        state: String,
        /// Organizational affiliation of the caller.
        receiver_org: String,
    },

    /// A date failed to parse or violated date-ordering rules.
    #[error("invalid date {value:?}: {detail}")]
    InvalidDate {
        /// The offending input.
        value: String,
        /// What was wrong with it.
        detail: String,
    },

    /// The asset's expiry date is in the past relative to transaction time.
    #[error("asset {asset_id} expired at {expiry}")]
    Expired {
        /// The asset key.
        asset_id: String,
        /// The expiry timestamp, ISO 8601.
        expiry: String,
    },

    /// A record could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] CanonicalizationError),

    /// The ledger substrate failed a read or write.
    #[error("ledger store unavailable: {detail}")]
    StoreUnavailable {
        /// Substrate-reported failure detail.
        detail: String,
    },

    /// The invocation's authentication context could not produce a
    /// verified caller identity.
    #[error("authentication context error: {detail}")]
    AuthContext {
        /// What was missing or malformed in the credential.
        detail: String,
    },
}

/// Error during canonical serialization of a record.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// Float values are not permitted in canonical representations;
    /// they have non-deterministic serialization edge cases that would
    /// break byte-identical audit replay.
    #[error("float values are not permitted in canonical record encodings: {0}")]
    FloatRejected(f64),

    /// JSON encoding or decoding failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
