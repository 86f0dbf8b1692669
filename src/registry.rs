//! The content-addressed pool of minimized states.
//!
//! Frozen frontier slots are submitted here; structurally equivalent states
//! collapse onto a single registered node, which is what keeps the sealed
//! automaton minimal. Children freeze before their parents, so equivalence
//! can compare target identities directly.

use core::hash::{Hash, Hasher};
use std::mem;

use cranelift_entity::PrimaryMap;
use rustc_hash::{FxHashMap, FxHasher};
use smallvec::SmallVec;

use crate::output::Output;
use crate::state::{State, StateId};

/// Pool of registered states.
///
/// A state's identity is its arena index, assigned monotonically from 0.
/// The hash table maps a structural hash to a bucket of candidate ids;
/// collisions are resolved by full equality.
pub(crate) struct Registry<O: Output> {
    states: PrimaryMap<StateId, State<O>>,
    finals: Vec<StateId>,
    table: FxHashMap<u64, SmallVec<[StateId; 2]>>,
}

impl<O: Output> Registry<O> {
    pub(crate) fn new() -> Self {
        Self {
            states: PrimaryMap::new(),
            finals: Vec::new(),
            table: FxHashMap::default(),
        }
    }

    /// Submit a frozen frontier slot.
    ///
    /// Returns the canonical id: an existing equivalent state if one is
    /// registered, otherwise a fresh identity holding the slot's contents.
    /// The slot is left cleared either way.
    pub(crate) fn intern(&mut self, slot: &mut State<O>) -> StateId {
        debug_assert!(
            slot.arcs.iter().all(|arc| arc.target.is_some()),
            "cannot intern a state with unresolved arcs"
        );

        let hash = structural_hash(slot);
        if let Some(bucket) = self.table.get(&hash) {
            for &id in bucket {
                if self.states[id] == *slot {
                    log::trace!("dedup hit: reusing {id}");
                    slot.clear();
                    return id;
                }
            }
        }

        let state = mem::replace(slot, State::new());
        let is_final = state.is_final;
        let id = self.states.push(state);
        if is_final {
            self.finals.push(id);
        }
        self.table.entry(hash).or_default().push(id);
        id
    }

    pub(crate) fn state(&self, id: StateId) -> &State<O> {
        &self.states[id]
    }

    pub(crate) fn len(&self) -> usize {
        self.states.len()
    }

    pub(crate) fn num_finals(&self) -> usize {
        self.finals.len()
    }

    pub(crate) fn ids(&self) -> impl Iterator<Item = StateId> + '_ {
        self.states.keys()
    }
}

/// Hash a state's full structure: finality (leaves differing only in their
/// final flag must not collapse), final output, and every arc including its
/// output.
fn structural_hash<O: Output>(state: &State<O>) -> u64 {
    let mut hasher = FxHasher::default();
    state.hash(&mut hasher);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(is_final: bool, final_output: Vec<i32>) -> State<Vec<i32>> {
        let mut state = State::new();
        state.is_final = is_final;
        state.final_output = final_output;
        state
    }

    #[test]
    fn equivalent_states_collapse() {
        let mut registry = Registry::new();
        let mut a = leaf(true, vec![]);
        let mut b = leaf(true, vec![]);
        let id = registry.intern(&mut a);
        assert_eq!(registry.intern(&mut b), id);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.num_finals(), 1);
        // Both slots come back cleared.
        assert!(!a.is_final && !b.is_final);
    }

    #[test]
    fn finality_keeps_leaves_distinct() {
        let mut registry = Registry::new();
        let a = registry.intern(&mut leaf(true, vec![]));
        let b = registry.intern(&mut leaf(false, vec![]));
        assert_ne!(a, b);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.num_finals(), 1);
    }

    #[test]
    fn final_output_keeps_leaves_distinct() {
        let mut registry = Registry::new();
        let a = registry.intern(&mut leaf(true, vec![1]));
        let b = registry.intern(&mut leaf(true, vec![2]));
        assert_ne!(a, b);
    }

    #[test]
    fn arcs_participate_in_equivalence() {
        let mut registry = Registry::new();
        let target = registry.intern(&mut leaf(true, vec![]));

        let mut a = State::<Vec<i32>>::new();
        a.transition_to(b'x', target.into());
        a.arc_mut(b'x').output = vec![1];
        let mut b = a.clone();
        let mut c = State::<Vec<i32>>::new();
        c.transition_to(b'x', target.into());
        c.arc_mut(b'x').output = vec![2];

        let a = registry.intern(&mut a);
        assert_eq!(registry.intern(&mut b), a);
        assert_ne!(registry.intern(&mut c), a);
    }
}
