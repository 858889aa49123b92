//! # parse
//!
//! Sparse parser table: `(sub-state, token)` keys mapping to replacement
//! productions. A key present with an empty body is an epsilon production
//! and is nothing like an absent key, which the finished artifact reports
//! as a parse error. Re-inserting a key silently replaces the production,
//! mirroring the cell-overwrite rule of the scanner table.

use indexmap::IndexMap;

/// One production: replacement ids leftmost-first, plus the rule line that
/// produced it for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Production {
    pub body: Vec<u8>,
    pub line_no: usize,
    pub text: String,
}

/// In-progress parser table, keyed by `(sub-state id, token id)`.
///
/// Keys keep first-insertion order, so emission is deterministic for a
/// given rule file even across overrides.
#[derive(Debug, Default)]
pub struct ParseTable {
    map: IndexMap<(u8, u8), Production>,
    replaced: Vec<Replaced>,
}

/// A production knocked out by a later rule under the same key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replaced {
    pub line_no: usize,
    pub text: String,
    pub by_line: usize,
}

impl ParseTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a production, replacing any earlier one under the same key.
    pub fn insert(&mut self, state: u8, token: u8, body: Vec<u8>, line_no: usize, text: &str) {
        let prod = Production {
            body,
            line_no,
            text: text.to_string(),
        };
        if let Some(old) = self.map.insert((state, token), prod) {
            self.replaced.push(Replaced {
                line_no: old.line_no,
                text: old.text,
                by_line: line_no,
            });
        }
    }

    pub fn get(&self, state: u8, token: u8) -> Option<&Production> {
        self.map.get(&(state, token))
    }

    /// Distinct keys in the table; overridden rules do not add to this.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Keys and productions in first-insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&(u8, u8), &Production)> {
        self.map.iter()
    }

    /// Rules whose key was later re-inserted, in replacement order.
    pub fn shadowed(&self) -> &[Replaced] {
        &self.replaced
    }
}
