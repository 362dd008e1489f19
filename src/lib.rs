//! # rpal
//! An interpreter for RPAL (Right-reference Pedagogic Algorithmic
//! Language), built around a CSE (Control-Structure-Environment) abstract
//! machine.
//!
//! ## Overview of the pipeline
//! A `Source` (a named string of program text) is lexed into a flat
//! stream of `Spanned<Token>`s by `compiler::lex`. The parser
//! (`compiler::parse`) turns that stream into a tree (`construct::tree`),
//! using the left-child/right-sibling encoding. That tree still has
//! surface sugar in it — `let`, `where`, curried `fn`, `within`, `and`,
//! `rec` — which `compiler::standardize` rewrites away into the small set
//! of forms the rest of the pipeline understands: `lambda`, `gamma`,
//! `tau`, the conditional, and the built-in operators.
//!
//! `compiler::flatten` walks the standardized tree once, pre-order, and
//! produces a `ControlStructureMap`: a dense map from a control
//! structure's index ("delta") to the flat sequence of `Symbol`s it
//! holds. Lambdas and conditional branches each get their own delta,
//! allocated as the traversal encounters them.
//!
//! `vm::machine::Machine` then runs that map: it holds a `Control` (the
//! instruction sequence currently executing), a `Stack` (values and
//! partial results), and an `EnvironmentArena` (the tree of scopes
//! created as closures are applied). Fourteen rewrite rules, one per
//! `Symbol` shape `Machine::step` can see in control, drive the machine
//! forward until the stack holds a single resolved value.
//!
//! Compilation errors (lexing or parsing) are reported as `Syntax`;
//! runtime errors (an undefined name, a division by zero, a step-limit
//! timeout) are reported as `vm::trace::Trace`. Both carry enough of a
//! `Span` to point back at the offending source text.

pub mod common;
pub mod compiler;
pub mod construct;
pub mod core;
pub mod vm;

use std::rc::Rc;

pub use common::source::Source;
pub use compiler::syntax::Syntax;
pub use construct::symbol::Value;
pub use vm::trace::Trace;

/// Runs a complete RPAL program from source to a final value, in one
/// call: lex, parse, standardize, flatten, then run the resulting
/// control structures on a fresh `Machine`.
pub fn run(source: &Rc<Source>) -> Result<Value, RunError> {
    let tokens = compiler::lex::lex(source).map_err(RunError::Syntax)?;
    let ast = compiler::parse::parse(tokens).map_err(RunError::Syntax)?;
    let standardized = compiler::standardize::standardize(&ast);
    let cs_map = compiler::flatten::flatten(&standardized);
    vm::machine::Machine::new(cs_map).run().map_err(RunError::Trace)
}

/// Either stage of `run` can fail: compiling the source, or running the
/// compiled control structures.
#[derive(Debug)]
pub enum RunError {
    Syntax(Syntax),
    Trace(Trace),
}

impl std::fmt::Display for RunError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunError::Syntax(s) => write!(f, "{}", s),
            RunError::Trace(t) => write!(f, "{}", t),
        }
    }
}

impl std::error::Error for RunError {}
