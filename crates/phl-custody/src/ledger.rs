//! # Ledger Substrate Port
//!
//! The custody core does not persist anything itself. Every operation runs
//! inside one logical transaction provided by an external ledger service,
//! and this module defines the capability that service must supply:
//! [`TransactionContext`].
//!
//! The context is passed explicitly into each operation call — never fetched
//! from ambient or global state — so unit tests can drive the contract with
//! synthetic identities and timestamps (see `memory`).
//!
//! ## Substrate contract
//!
//! - `get_state`/`put_state` are atomic within one transaction: no other
//!   transaction observes a partially updated record, and concurrent
//!   transactions on the same key are serialized by the substrate.
//!   Optimistic-conflict retries are the caller's job, never this core's.
//! - `get_history_for_key` yields every committed version of a key, oldest
//!   first, including tombstones for deletions (this core never deletes,
//!   but the query layer still skips tombstones defensively).
//! - `caller_identity` is the Identity Resolver: it derives a verified
//!   [`Actor`] from the invocation's authenticated credential and fails with
//!   an auth-context error if the transport cannot produce one.
//! - `tx_timestamp` is the transaction's logical commit timestamp. It is
//!   deterministic across replicas, which is why history entries use it and
//!   never the wall clock.

use phl_core::{Actor, CustodyError, Timestamp};

/// One committed version of a ledger key, as reported by the substrate's
/// per-key history query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyVersion {
    /// Identifier of the transaction that committed this version.
    pub tx_id: String,
    /// Logical commit timestamp of that transaction.
    pub timestamp: Timestamp,
    /// The committed bytes, or `None` for a tombstone (key deleted).
    pub value: Option<Vec<u8>>,
}

impl KeyVersion {
    /// Whether this version is a deletion tombstone.
    pub fn is_tombstone(&self) -> bool {
        self.value.is_none()
    }
}

/// The capability an invocation receives from the ledger substrate.
///
/// All reads and writes performed through one `TransactionContext` belong to
/// a single atomic transaction; the substrate commits or discards them as a
/// unit after the operation returns.
pub trait TransactionContext {
    /// Read the current committed value of a key, if any.
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, CustodyError>;

    /// Write a key's value. Overwrites are idempotent.
    fn put_state(&mut self, key: &str, value: Vec<u8>) -> Result<(), CustodyError>;

    /// Current values of all keys in `[start, end)`, ascending by key.
    ///
    /// Empty bounds mean unbounded on that side. The result is a finite
    /// snapshot, restartable per call; there is no persistent cursor.
    fn get_state_by_range(
        &self,
        start: &str,
        end: &str,
    ) -> Result<Vec<(String, Vec<u8>)>, CustodyError>;

    /// Every committed version of a key, oldest first.
    fn get_history_for_key(&self, key: &str) -> Result<Vec<KeyVersion>, CustodyError>;

    /// The verified identity of the invoking caller.
    ///
    /// # Errors
    ///
    /// [`CustodyError::AuthContext`] if the credential is absent, malformed,
    /// or missing its organizational affiliation.
    fn caller_identity(&self) -> Result<Actor, CustodyError>;

    /// The transaction's logical commit timestamp.
    fn tx_timestamp(&self) -> Result<Timestamp, CustodyError>;
}
