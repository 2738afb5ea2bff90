//! # Identity Newtypes and the Per-Invocation Actor
//!
//! Newtype wrappers for the identifier namespaces of the custody chain.
//! These prevent accidental identifier confusion — an `AssetId` cannot be
//! passed where an `OrgId` is expected.
//!
//! `Actor` is the verified caller of one invocation. It is derived from the
//! transaction's authentication context, used for authorization checks, and
//! never persisted as a foreign key — only its fields are compared against
//! the record's current owner.

use serde::{Deserialize, Serialize};

/// Unique key of one tracked pharmaceutical unit.
///
/// Immutable after creation; also the ledger key the record is stored under.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AssetId(pub String);

/// Organizational affiliation of an actor (an MSP-style org identifier).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OrgId(pub String);

/// Identifier of the patient an asset was dispensed to.
///
/// Populated only when the record reaches its terminal state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PatientId(pub String);

/// The verified caller of one invocation.
///
/// Produced exclusively by the transaction context's identity lookup;
/// downstream policy treats it as trusted ground truth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    /// Stable principal identifier (e.g., a certificate common name).
    pub id: String,
    /// Organizational affiliation the credential carries.
    pub org: OrgId,
}

impl AssetId {
    /// Wrap an externally supplied asset key.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw key string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl OrgId {
    /// Wrap an externally supplied org identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw org identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl PatientId {
    /// Wrap an externally supplied patient identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw patient identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Actor {
    /// Construct an actor from its verified credential fields.
    pub fn new(id: impl Into<String>, org: OrgId) -> Self {
        Self { id: id.into(), org }
    }
}

impl std::fmt::Display for AssetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::fmt::Display for OrgId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::fmt::Display for PatientId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::fmt::Display for Actor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.id, self.org)
    }
}
