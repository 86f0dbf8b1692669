//! An incremental builder and runtime for minimal finite state transducers.
//!
//! This crate provides a deterministic, acyclic transducer keyed by byte
//! strings. Keys are fed in strictly increasing lexicographic order, each
//! paired with an output value; suffixes shared between keys are merged into
//! a single DAG node as construction advances, so the sealed automaton is
//! minimal without a separate minimization pass. The algorithm is described
//! at <http://citeseerx.ist.psu.edu/viewdoc/summary?doi=10.1.1.24.3698>.
//!
//! The tradeoffs are different from a sorted map:
//!
//! - Keys must arrive pre-sorted and are never enumerated back out.
//! - Equal suffixes are stored once, so a large lexicon with regular
//!   morphology compresses heavily.
//! - Outputs form a monoid with difference (see [`Output`]); lookups
//!   reassemble a key's output from fragments spread along its path.
//! - After [`Fst::finish`] the automaton is immutable and can be queried from
//!   any number of threads without synchronization.
//!
//! ```
//! use lexfst::Fst;
//!
//! let mut fst = Fst::new();
//! fst.add(b"apr", vec![30]).unwrap();
//! fst.add(b"aug", vec![31]).unwrap();
//! fst.finish().unwrap();
//!
//! let (days, found) = fst.run(b"apr", Vec::new());
//! assert!(found);
//! assert_eq!(days, vec![30]);
//! ```

#![deny(missing_docs, trivial_numeric_casts, unused_extern_crates)]
#![warn(unused_import_braces)]

mod dot;
mod fst;
mod output;
mod registry;
mod state;

pub use self::dot::DotPrinter;
pub use self::fst::{Fst, FstError};
pub use self::output::Output;
pub use self::state::{Arc, StateId};
