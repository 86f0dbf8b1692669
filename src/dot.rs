//! Rendering a sealed transducer as a graphviz digraph.

use core::fmt::{self, Display, Formatter, Write};

use cranelift_entity::EntityRef;

use crate::fst::Fst;
use crate::output::Output;

/// A utility for rendering the state graph of a sealed [`Fst`] in graphviz
/// `dot` format, mainly for debugging and tests.
///
/// Final states are drawn with a double circle; arcs are labeled with their
/// input byte and, when not the identity, their output.
pub struct DotPrinter<'a, O: Output> {
    fst: &'a Fst<O>,
}

impl<'a, O: Output> DotPrinter<'a, O> {
    /// Create a new printer borrowing `fst`.
    pub fn new(fst: &'a Fst<O>) -> Self {
        Self { fst }
    }

    /// Write the graph to `w`.
    pub fn write(&self, w: &mut dyn Write) -> fmt::Result {
        writeln!(w, "digraph fst {{")?;
        writeln!(w, "    rankdir=LR;")?;
        writeln!(w, "    node [shape=circle]")?;
        self.final_nodes(w)?;
        self.arcs(w)?;
        writeln!(w, "}}")
    }

    fn final_nodes(&self, w: &mut dyn Write) -> fmt::Result {
        for state in self.fst.states().filter(|&s| self.fst.is_final(s)) {
            let output = self.fst.final_output(state);
            if output.is_empty() {
                writeln!(w, "    {} [peripheries = 2];", state.index())?;
            } else {
                writeln!(
                    w,
                    "    {} [peripheries = 2 label=\"{} {:?}\"];",
                    state.index(),
                    state.index(),
                    output
                )?;
            }
        }
        Ok(())
    }

    fn arcs(&self, w: &mut dyn Write) -> fmt::Result {
        for state in self.fst.states() {
            for arc in self.fst.arcs(state) {
                write!(
                    w,
                    "    {} -> {} [label=\"{}",
                    state.index(),
                    arc.target().index(),
                    Label(arc.input())
                )?;
                if !arc.output().is_empty() {
                    write!(w, " {:?}", arc.output())?;
                }
                writeln!(w, "\"];")?;
            }
        }
        Ok(())
    }
}

impl<O: Output> Display for DotPrinter<'_, O> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        self.write(f)
    }
}

/// An input byte in edge-label form: printable ASCII as itself, anything
/// else in hex.
struct Label(u8);

impl Display for Label {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        if self.0.is_ascii_graphic() && self.0 != b'"' && self.0 != b'\\' {
            write!(f, "{}", self.0 as char)
        } else {
            write!(f, "0x{:02x}", self.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_final_states_and_arcs() {
        let mut fst = Fst::new();
        fst.add(b"no", vec![1]).unwrap();
        fst.add(b"yes", vec![2]).unwrap();
        fst.finish().unwrap();

        let graph = DotPrinter::new(&fst).to_string();
        assert!(graph.starts_with("digraph fst {"));
        assert!(graph.contains("peripheries = 2"));
        assert!(graph.contains("[label=\"n [1]\"];"));
        assert!(graph.contains("[label=\"y [2]\"];"));
        assert!(graph.ends_with("}\n"));
    }

    #[test]
    fn non_printable_bytes_render_in_hex() {
        let mut fst = Fst::<Vec<i32>>::new();
        fst.add(&[0x07], vec![]).unwrap();
        fst.finish().unwrap();
        let graph = DotPrinter::new(&fst).to_string();
        assert!(graph.contains("label=\"0x07\""));
    }
}
