//! # syntab
//!
//! Compiles hand-authored rule files into dense syntax tables.
//!
//! A rule file interleaves scanner state declarations, single-character
//! matchers, and parser productions. [`generate`] reads one and writes a
//! single dependency-free Rust source file, `syntax_tables.rs`, holding a
//! dense scanner transition table over a 98-symbol alphabet, a sparse
//! `(state, token)` parser map, and named constants for every symbol. All
//! ids share one byte, partitioned into bands a range test can classify.
//!
//! ```no_run
//! let summary = syntab::generate("syntax.rules", "src/")?;
//! println!("{} scanner states", summary.states);
//! # Ok::<(), syntab::GenError>(())
//! ```
//!
//! The same call slots into a `build.rs` by pointing the output at
//! `$OUT_DIR`; the artifact is then pulled in as its own module:
//!
//! ```ignore
//! #[allow(dead_code)]
//! mod syntax_tables {
//!     include!(concat!(env!("OUT_DIR"), "/syntax_tables.rs"));
//! }
//! ```
//!
//! Everything fatal surfaces as [`GenError`]; shadowed rules are reported
//! through [`log`] warnings and never abort a run.

pub mod emit;
pub mod error;
pub mod generate;
pub mod parse;
pub mod registry;
pub mod rules;
pub mod scan;

// Committed render of the rule set in generate's tests; those tests hold it
// byte-equal to the generator's output and drive its lookup API.
#[cfg(test)]
#[allow(dead_code)]
mod test_tables_data;

pub use crate::error::GenError;
pub use crate::generate::{generate, Summary, ARTIFACT_NAME};
