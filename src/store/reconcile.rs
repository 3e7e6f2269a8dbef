//! Reconciliation between in-memory state and the durable snapshot.
//!
//! Kept as a pure function of (durable snapshot, in-memory state) so the
//! policy is testable without a store or a database.

use crate::state::ResearchState;

/// What a reconciliation pass decided to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciliation {
    /// Durable snapshot has data, memory does not: adopt the snapshot.
    AdoptSnapshot,
    /// Memory is authoritative: serialize it over the durable snapshot.
    WriteSnapshot,
    /// Both sides already agree.
    Noop,
}

/// Decide how to reconcile the durable snapshot with in-memory state.
///
/// Exactly one rule fires per pass, ordered by the emptiness checks:
/// a non-empty snapshot recovers an uninitialized session; an uninitialized
/// session with no snapshot seeds the (empty) snapshot; otherwise memory
/// wins whenever the two structurally differ. Structurally equal states are
/// a no-op, so repeated identical updates never touch storage.
pub fn plan(durable: Option<&ResearchState>, memory: &ResearchState) -> Reconciliation {
    let durable_empty = durable.is_none_or(ResearchState::is_empty);

    if memory.is_empty() {
        if durable_empty {
            return Reconciliation::WriteSnapshot;
        }
        return Reconciliation::AdoptSnapshot;
    }

    if durable.is_some_and(|snapshot| snapshot == memory) {
        return Reconciliation::Noop;
    }
    Reconciliation::WriteSnapshot
}
