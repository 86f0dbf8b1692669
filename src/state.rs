//! Transducer states and the arcs connecting them.

use core::hash::{Hash, Hasher};

use cranelift_entity::entity_impl;
use cranelift_entity::packed_option::PackedOption;
use smallvec::SmallVec;

use crate::output::Output;

/// An opaque reference to a registered transducer state.
///
/// Identities are assigned densely from 0 in registration order, so the
/// initial state of an empty transducer is `state0`.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateId(u32);
entity_impl!(StateId, "state");

/// A directed transition between two states, labeled with the input byte it
/// consumes and the output it emits.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Arc<O: Output> {
    pub(crate) input: u8,
    /// `None` while the arc tentatively points at the next frontier slot;
    /// resolved to a registered state when that slot freezes.
    pub(crate) target: PackedOption<StateId>,
    pub(crate) output: O,
}

impl<O: Output> Arc<O> {
    /// The input byte consumed by this arc.
    pub fn input(&self) -> u8 {
        self.input
    }

    /// The state this arc leads to.
    ///
    /// Panics on an arc still pointing at the frontier; arcs reachable
    /// through a sealed transducer are always resolved.
    pub fn target(&self) -> StateId {
        self.target.expand().expect("arc target not yet registered")
    }

    /// The output emitted when this arc is taken.
    pub fn output(&self) -> &O {
        &self.output
    }
}

impl<O: Output> Hash for Arc<O> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.input.hash(state);
        self.target.expand().hash(state);
        self.output.hash(state);
    }
}

/// A transducer state: finality plus outgoing arcs kept sorted by input byte.
///
/// The same representation serves the mutable frontier slots during
/// construction and the immutable registered states after freezing. A state
/// that is not final always carries the identity as its final output.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct State<O: Output> {
    pub(crate) is_final: bool,
    /// Emitted on top of the path outputs when a key ends here. This is what
    /// lets a key remain correct after becoming a proper prefix of a later
    /// key whose output shares nothing with it.
    pub(crate) final_output: O,
    pub(crate) arcs: SmallVec<[Arc<O>; 4]>,
}

impl<O: Output> State<O> {
    pub(crate) fn new() -> Self {
        Self {
            is_final: false,
            final_output: O::empty(),
            arcs: SmallVec::new(),
        }
    }

    /// Reset to a cleared frontier slot.
    pub(crate) fn clear(&mut self) {
        self.is_final = false;
        self.final_output = O::empty();
        self.arcs.clear();
    }

    fn position(&self, input: u8) -> Result<usize, usize> {
        self.arcs.binary_search_by_key(&input, |arc| arc.input)
    }

    /// Point the arc labeled `input` at `target`, creating the arc with an
    /// identity output if it does not exist yet.
    pub(crate) fn transition_to(&mut self, input: u8, target: PackedOption<StateId>) {
        match self.position(input) {
            Ok(i) => self.arcs[i].target = target,
            Err(i) => self.arcs.insert(
                i,
                Arc {
                    input,
                    target,
                    output: O::empty(),
                },
            ),
        }
    }

    /// The arc labeled `input`, which must exist.
    pub(crate) fn arc_mut(&mut self, input: u8) -> &mut Arc<O> {
        let i = self.position(input).expect("no arc for input byte");
        &mut self.arcs[i]
    }

    /// The arc labeled `input`, if any.
    pub(crate) fn arc(&self, input: u8) -> Option<&Arc<O>> {
        self.position(input).ok().map(|i| &self.arcs[i])
    }

    /// Left-graft `prefix` onto every continuation of this state: each
    /// outgoing arc, and the final output if the state is final.
    pub(crate) fn prepend_output(&mut self, prefix: &O) {
        for arc in &mut self.arcs {
            arc.output = if arc.output.is_empty() {
                prefix.clone()
            } else {
                arc.output.prepend(prefix)
            };
        }
        if self.is_final {
            self.final_output = if self.final_output.is_empty() {
                prefix.clone()
            } else {
                self.final_output.prepend(prefix)
            };
        }
    }
}
