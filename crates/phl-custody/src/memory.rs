//! # In-Memory Ledger Substrate
//!
//! A reference implementation of the [`TransactionContext`] port backed by
//! a `BTreeMap` of per-key version chains. It exists for the test suite and
//! as executable documentation of the substrate contract: per-key version
//! history in commit order, range scans over current values, and an
//! invocation-scoped caller identity and logical timestamp.
//!
//! One [`MemoryTransaction`] models one invocation. The custody operations
//! write at most once, at the very end, so applying writes directly gives
//! the same observable behavior as a buffered commit.

use std::collections::BTreeMap;
use std::ops::Bound;

use uuid::Uuid;

use phl_core::{Actor, CustodyError, Timestamp};

use crate::ledger::{KeyVersion, TransactionContext};

/// In-memory ledger: every key maps to its full version chain, oldest
/// first. The last version is the current value (`None` = deleted).
#[derive(Debug, Default)]
pub struct MemoryLedger {
    versions: BTreeMap<String, Vec<KeyVersion>>,
}

impl MemoryLedger {
    /// An empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin an invocation with the given caller identity and logical
    /// transaction timestamp. `actor = None` models a transport that could
    /// not produce a verified credential.
    pub fn transaction(
        &mut self,
        actor: Option<Actor>,
        timestamp: Timestamp,
    ) -> MemoryTransaction<'_> {
        MemoryTransaction {
            ledger: self,
            tx_id: Uuid::new_v4().to_string(),
            actor,
            timestamp,
        }
    }

    /// Begin an invocation stamped with the current wall-clock time.
    ///
    /// Convenience for local runs; replicated substrates inject their
    /// agreed logical timestamp through [`MemoryLedger::transaction`].
    pub fn transaction_now(&mut self, actor: Option<Actor>) -> MemoryTransaction<'_> {
        self.transaction(actor, Timestamp::now())
    }

    /// The current committed value of a key, bypassing any transaction.
    /// Test-inspection helper.
    pub fn current(&self, key: &str) -> Option<&[u8]> {
        self.versions
            .get(key)
            .and_then(|chain| chain.last())
            .and_then(|v| v.value.as_deref())
    }
}

/// One invocation against a [`MemoryLedger`].
#[derive(Debug)]
pub struct MemoryTransaction<'a> {
    ledger: &'a mut MemoryLedger,
    tx_id: String,
    actor: Option<Actor>,
    timestamp: Timestamp,
}

impl MemoryTransaction<'_> {
    /// The id assigned to this transaction.
    pub fn tx_id(&self) -> &str {
        &self.tx_id
    }

    /// Write a deletion tombstone for a key.
    ///
    /// The custody core never deletes, but the substrate contract allows
    /// it; tests use this to verify that tombstones are skipped on replay.
    pub fn delete_state(&mut self, key: &str) {
        self.ledger
            .versions
            .entry(key.to_string())
            .or_default()
            .push(KeyVersion {
                tx_id: self.tx_id.clone(),
                timestamp: self.timestamp,
                value: None,
            });
    }
}

impl TransactionContext for MemoryTransaction<'_> {
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, CustodyError> {
        Ok(self
            .ledger
            .versions
            .get(key)
            .and_then(|chain| chain.last())
            .and_then(|v| v.value.clone()))
    }

    fn put_state(&mut self, key: &str, value: Vec<u8>) -> Result<(), CustodyError> {
        self.ledger
            .versions
            .entry(key.to_string())
            .or_default()
            .push(KeyVersion {
                tx_id: self.tx_id.clone(),
                timestamp: self.timestamp,
                value: Some(value),
            });
        Ok(())
    }

    fn get_state_by_range(
        &self,
        start: &str,
        end: &str,
    ) -> Result<Vec<(String, Vec<u8>)>, CustodyError> {
        let lower = if start.is_empty() {
            Bound::Unbounded
        } else {
            Bound::Included(start.to_string())
        };
        let upper = if end.is_empty() {
            Bound::Unbounded
        } else {
            Bound::Excluded(end.to_string())
        };
        Ok(self
            .ledger
            .versions
            .range((lower, upper))
            .filter_map(|(key, chain)| {
                let value = chain.last().and_then(|v| v.value.clone())?;
                Some((key.clone(), value))
            })
            .collect())
    }

    fn get_history_for_key(&self, key: &str) -> Result<Vec<KeyVersion>, CustodyError> {
        Ok(self.ledger.versions.get(key).cloned().unwrap_or_default())
    }

    fn caller_identity(&self) -> Result<Actor, CustodyError> {
        self.actor.clone().ok_or_else(|| CustodyError::AuthContext {
            detail: "invocation carries no verified credential".to_string(),
        })
    }

    fn tx_timestamp(&self) -> Result<Timestamp, CustodyError> {
        Ok(self.timestamp)
    }
}
