//! The incremental minimizing builder and its query runtime.

use core::cmp::Ordering;

use cranelift_entity::packed_option::PackedOption;
use thiserror::Error;

use crate::output::Output;
use crate::registry::Registry;
use crate::state::{Arc, State, StateId};

/// Errors from feeding keys into a transducer.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum FstError {
    /// `add` was called with a key at or before its predecessor in byte
    /// order. A key that is a proper prefix of its predecessor lands here
    /// too, since shorter keys sort first.
    #[error("key {key:?} added out of order after {prev:?}")]
    OutOfOrder {
        /// The previously added key.
        prev: String,
        /// The offending key.
        key: String,
    },
    /// `add` was called twice in a row with the same key.
    #[error("multiple outputs for key {key:?}")]
    Duplicate {
        /// The repeated key.
        key: String,
    },
    /// `add` or `finish` was called after the transducer was sealed.
    #[error("transducer is sealed")]
    Sealed,
}

fn lossy(key: &[u8]) -> String {
    String::from_utf8_lossy(key).into_owned()
}

/// A byte-keyed finite state transducer, built incrementally from sorted
/// keys and minimized on the fly.
///
/// The lifecycle has two phases. While building, [`add`](Fst::add) ingests
/// keys in strictly increasing byte order; [`finish`](Fst::finish) then
/// seals the automaton. Once sealed, [`run`](Fst::run) answers lookups and
/// no further mutation is possible.
///
/// Construction keeps a frontier of mutable states along the most recently
/// added key. When the next key diverges, the orphaned tail of the previous
/// key is frozen bottom-up through the registry, merging it with any
/// equivalent suffix already present.
pub struct Fst<O: Output> {
    /// Frontier slot `i` is the tentative state reached after consuming `i`
    /// bytes of the most recently added key. Slot 0 is the root in progress.
    frontier: Vec<State<O>>,
    /// The previously added key.
    prev: Vec<u8>,
    /// Number of keys accepted so far.
    keys: u64,
    registry: Registry<O>,
    /// Set by `finish`; doubles as the sealed flag.
    initial: PackedOption<StateId>,
}

impl<O: Output> Fst<O> {
    /// Create an empty transducer, ready to ingest keys.
    pub fn new() -> Self {
        Self {
            frontier: vec![State::new()],
            prev: Vec::new(),
            keys: 0,
            registry: Registry::new(),
            initial: PackedOption::default(),
        }
    }

    /// Insert `key` with `output`.
    ///
    /// Keys must arrive in strictly increasing lexicographic byte order.
    /// The empty key is accepted as the very first key; its output is
    /// emitted straight from the initial state. On error the transducer is
    /// left exactly as it was.
    pub fn add(&mut self, key: &[u8], output: O) -> Result<(), FstError> {
        if self.initial.is_some() {
            return Err(FstError::Sealed);
        }
        match key.cmp(self.prev.as_slice()) {
            Ordering::Less => {
                return Err(FstError::OutOfOrder {
                    prev: lossy(&self.prev),
                    key: lossy(key),
                });
            }
            Ordering::Equal => {
                if self.keys == 0 && key.is_empty() {
                    self.frontier[0].is_final = true;
                    self.frontier[0].final_output = output;
                    self.keys = 1;
                    return Ok(());
                }
                return Err(FstError::Duplicate { key: lossy(key) });
            }
            Ordering::Greater => {}
        }

        let p = common_prefix_len(&self.prev, key);
        log::trace!(
            "add key of {} bytes: shared prefix {p}, freezing {} slots",
            key.len(),
            self.prev.len().saturating_sub(p)
        );

        // Freeze the diverging tail of the previous key, deepest slot first,
        // retargeting the parent arc at each step.
        for i in (p + 1..=self.prev.len()).rev() {
            let frozen = self.registry.intern(&mut self.frontier[i]);
            let input = self.prev[i - 1];
            self.frontier[i - 1].transition_to(input, frozen.into());
        }

        // Lay out cleared slots for the new key's tail and link them up
        // tentatively. The last slot becomes the key's terminal state.
        if self.frontier.len() < key.len() + 1 {
            self.frontier.resize_with(key.len() + 1, State::new);
        }
        for i in p + 1..=key.len() {
            self.frontier[i].clear();
            self.frontier[i - 1].transition_to(key[i - 1], PackedOption::default());
        }
        self.frontier[key.len()].is_final = true;

        // Walk the shared prefix, splitting each arc output into the part
        // still common with the new key (which stays) and the rest (which is
        // pushed down onto every continuation below the arc).
        let mut out = output;
        for j in 1..=p {
            let input = key[j - 1];
            let existing = self.frontier[j - 1].arc_mut(input).output.clone();
            if existing.is_empty() {
                continue;
            }
            let shared = existing.common(&out);
            let pushed = existing.subtract(&shared);
            self.frontier[j - 1].arc_mut(input).output = shared.clone();
            if !pushed.is_empty() {
                self.frontier[j].prepend_output(&pushed);
            }
            out = out.subtract(&shared);
        }

        // Whatever remains of the new key's output lands on its first arc
        // past the shared prefix.
        self.frontier[p].arc_mut(key[p]).output = out;

        self.prev.clear();
        self.prev.extend_from_slice(key);
        self.keys += 1;
        Ok(())
    }

    /// Seal the transducer.
    ///
    /// Freezes the remaining frontier and registers the initial state.
    /// Further calls to `add` or `finish` return [`FstError::Sealed`].
    pub fn finish(&mut self) -> Result<(), FstError> {
        if self.initial.is_some() {
            return Err(FstError::Sealed);
        }
        for i in (1..=self.prev.len()).rev() {
            let frozen = self.registry.intern(&mut self.frontier[i]);
            let input = self.prev[i - 1];
            self.frontier[i - 1].transition_to(input, frozen.into());
        }
        let root = self.registry.intern(&mut self.frontier[0]);
        self.initial = root.into();
        log::trace!(
            "sealed: {} keys, {} states, {} final",
            self.keys,
            self.registry.len(),
            self.registry.num_finals()
        );
        Ok(())
    }

    /// Look up `key`, starting from the accumulator `acc` (typically the
    /// identity).
    ///
    /// Returns the accumulated output and whether the key is accepted. On a
    /// missing transition the accumulator gathered so far comes back with
    /// `false`. Before [`finish`](Fst::finish) every lookup misses.
    pub fn run(&self, key: &[u8], acc: O) -> (O, bool) {
        let Some(initial) = self.initial.expand() else {
            return (acc, false);
        };
        let mut state = self.registry.state(initial);
        let mut out = acc;
        for &input in key {
            let Some(arc) = state.arc(input) else {
                return (out, false);
            };
            if !arc.output.is_empty() {
                out = out.concat(&arc.output);
            }
            state = self.registry.state(arc.target());
        }
        if state.is_final {
            if !state.final_output.is_empty() {
                out = out.concat(&state.final_output);
            }
            (out, true)
        } else {
            (out, false)
        }
    }

    /// Number of registered states. Before sealing this counts only frozen
    /// suffixes.
    pub fn num_states(&self) -> usize {
        self.registry.len()
    }

    /// Number of registered final states.
    pub fn num_final_states(&self) -> usize {
        self.registry.num_finals()
    }

    /// The initial state, or `None` while the transducer is still building.
    pub fn initial(&self) -> Option<StateId> {
        self.initial.expand()
    }

    /// Iterate over all registered states in identity order.
    pub fn states(&self) -> impl Iterator<Item = StateId> + '_ {
        self.registry.ids()
    }

    /// Whether `state` is final.
    ///
    /// Panics if `state` is not registered here.
    pub fn is_final(&self, state: StateId) -> bool {
        self.registry.state(state).is_final
    }

    /// The output emitted when a key ends in `state`, on top of its path
    /// outputs. The identity for non-final states.
    ///
    /// Panics if `state` is not registered here.
    pub fn final_output(&self, state: StateId) -> &O {
        &self.registry.state(state).final_output
    }

    /// The outgoing arcs of `state`, sorted by input byte.
    ///
    /// Panics if `state` is not registered here.
    pub fn arcs(&self, state: StateId) -> &[Arc<O>] {
        &self.registry.state(state).arcs
    }
}

impl<O: Output> Default for Fst<O> {
    fn default() -> Self {
        Self::new()
    }
}

fn common_prefix_len(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}
