//! # Custody Transition Table
//!
//! The legal edges of the custody state machine as one data structure,
//! instead of conditional branches scattered through the operations. Each
//! rule maps (current state, operation) to the next state, the history
//! action to record, and the role the counterpart must hold.
//!
//! Creation is not in the table — it starts a record rather than moving
//! one — so the six legal edges of the lifecycle are the create edge plus
//! the five rules below. A (state, operation) pair with no rule is an
//! invalid transition, full stop.

use crate::record::{CustodyAction, CustodyState};
use crate::roles::Role;

/// A state-machine operation that moves an existing record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Hand custody to the next party in the chain.
    Transfer,
    /// Confirm physical receipt of an in-transit asset.
    Receive,
    /// Dispense to a patient (terminal).
    Dispatch,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Transfer => "transfer",
            Self::Receive => "receive",
            Self::Dispatch => "dispatch",
        };
        f.write_str(s)
    }
}

/// One legal edge of the custody state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionRule {
    /// State the record must be in.
    pub from: CustodyState,
    /// Operation being performed.
    pub operation: Operation,
    /// State the record moves to.
    pub to: CustodyState,
    /// Action label appended to the custody history.
    pub action: CustodyAction,
    /// Role the counterpart must hold: the proposed new owner for a
    /// transfer, the receiving caller for a receive, the dispensing
    /// caller for a dispatch.
    pub counterpart: Role,
}

/// The complete set of record-moving edges. Nothing outside this slice is
/// a legal transition.
pub const TRANSITIONS: &[TransitionRule] = &[
    TransitionRule {
        from: CustodyState::Created,
        operation: Operation::Transfer,
        to: CustodyState::InTransitLabToLogistics,
        action: CustodyAction::TransferredToLogistics,
        counterpart: Role::Logistics,
    },
    TransitionRule {
        from: CustodyState::InTransitLabToLogistics,
        operation: Operation::Receive,
        to: CustodyState::StoredAtLogistics,
        action: CustodyAction::ReceivedAtLogistics,
        counterpart: Role::Logistics,
    },
    TransitionRule {
        from: CustodyState::StoredAtLogistics,
        operation: Operation::Transfer,
        to: CustodyState::InTransitLogisticsToHealth,
        action: CustodyAction::TransferredToHealth,
        counterpart: Role::Health,
    },
    TransitionRule {
        from: CustodyState::InTransitLogisticsToHealth,
        operation: Operation::Receive,
        to: CustodyState::ReceivedAtHealth,
        action: CustodyAction::ReceivedAtHealth,
        counterpart: Role::Health,
    },
    TransitionRule {
        from: CustodyState::ReceivedAtHealth,
        operation: Operation::Dispatch,
        to: CustodyState::DispatchedToPatient,
        action: CustodyAction::DispatchedToPatient,
        counterpart: Role::Health,
    },
];

/// Look up the rule for (current state, operation), if the edge is legal.
pub fn edge(from: CustodyState, operation: Operation) -> Option<&'static TransitionRule> {
    TRANSITIONS
        .iter()
        .find(|rule| rule.from == from && rule.operation == operation)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_STATES: [CustodyState; 6] = [
        CustodyState::Created,
        CustodyState::InTransitLabToLogistics,
        CustodyState::StoredAtLogistics,
        CustodyState::InTransitLogisticsToHealth,
        CustodyState::ReceivedAtHealth,
        CustodyState::DispatchedToPatient,
    ];

    const ALL_OPERATIONS: [Operation; 3] =
        [Operation::Transfer, Operation::Receive, Operation::Dispatch];

    #[test]
    fn test_exactly_five_record_moving_edges() {
        assert_eq!(TRANSITIONS.len(), 5);
    }

    #[test]
    fn test_every_state_has_at_most_one_outgoing_edge() {
        // The chain is linear: each non-terminal state has exactly one
        // legal operation, the terminal state has none.
        for state in ALL_STATES {
            let outgoing: Vec<_> = ALL_OPERATIONS
                .iter()
                .filter_map(|op| edge(state, *op))
                .collect();
            if state.is_terminal() {
                assert!(outgoing.is_empty(), "{state} must have no outgoing edges");
            } else {
                assert_eq!(outgoing.len(), 1, "{state} must have one outgoing edge");
            }
        }
    }

    #[test]
    fn test_transfer_edges() {
        let lab = edge(CustodyState::Created, Operation::Transfer).unwrap();
        assert_eq!(lab.to, CustodyState::InTransitLabToLogistics);
        assert_eq!(lab.counterpart, Role::Logistics);
        assert_eq!(lab.action, CustodyAction::TransferredToLogistics);

        let logistics = edge(CustodyState::StoredAtLogistics, Operation::Transfer).unwrap();
        assert_eq!(logistics.to, CustodyState::InTransitLogisticsToHealth);
        assert_eq!(logistics.counterpart, Role::Health);
        assert_eq!(logistics.action, CustodyAction::TransferredToHealth);
    }

    #[test]
    fn test_receive_edges() {
        let at_warehouse = edge(CustodyState::InTransitLabToLogistics, Operation::Receive).unwrap();
        assert_eq!(at_warehouse.to, CustodyState::StoredAtLogistics);
        assert_eq!(at_warehouse.counterpart, Role::Logistics);

        let at_health = edge(CustodyState::InTransitLogisticsToHealth, Operation::Receive).unwrap();
        assert_eq!(at_health.to, CustodyState::ReceivedAtHealth);
        assert_eq!(at_health.counterpart, Role::Health);
    }

    #[test]
    fn test_dispatch_edge() {
        let dispatch = edge(CustodyState::ReceivedAtHealth, Operation::Dispatch).unwrap();
        assert_eq!(dispatch.to, CustodyState::DispatchedToPatient);
        assert_eq!(dispatch.counterpart, Role::Health);
        assert!(dispatch.to.is_terminal());
    }

    #[test]
    fn test_illegal_pairs_have_no_edge() {
        assert!(edge(CustodyState::Created, Operation::Receive).is_none());
        assert!(edge(CustodyState::Created, Operation::Dispatch).is_none());
        assert!(edge(CustodyState::InTransitLabToLogistics, Operation::Transfer).is_none());
        assert!(edge(CustodyState::StoredAtLogistics, Operation::Dispatch).is_none());
        assert!(edge(CustodyState::ReceivedAtHealth, Operation::Transfer).is_none());
        assert!(edge(CustodyState::ReceivedAtHealth, Operation::Receive).is_none());
    }

    #[test]
    fn test_edges_never_skip_states() {
        // Every edge's target is the immediate successor in the chain.
        let order = |s: CustodyState| ALL_STATES.iter().position(|x| *x == s).unwrap();
        for rule in TRANSITIONS {
            assert_eq!(order(rule.to), order(rule.from) + 1);
        }
    }
}
