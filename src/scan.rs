//! # scan
//!
//! Dense scanner transition table.
//!
//! One row per sub-state, one column per alphabet symbol. The alphabet is
//! the 98-symbol scanner universe: the 95 printable ASCII characters at
//! columns 0 through 94 (column = byte - 0x20), TAB at 95, LF at 96, and
//! an end-of-input sentinel at 97. Every cell starts as the scan-error
//! token; rules overwrite cells in file order, so a later rule silently
//! wins every cell it shares with an earlier one.

use crate::registry::ERROR_ID;
use crate::rules::Matcher;

/// Alphabet width of the scanner table.
pub const SCAN_COLS: usize = 98;
/// Column of the TAB character.
pub const TAB_COL: usize = 95;
/// Column of the LF character.
pub const LF_COL: usize = 96;
/// Column of the end-of-input sentinel.
pub const EOF_COL: usize = 97;

/// Column for an input symbol, `None` meaning end of input.
///
/// Returns `None` for bytes outside the scanner alphabet; a table consumer
/// maps those to the scan-error token before ever indexing a row.
pub fn scan_col(sym: Option<u8>) -> Option<usize> {
    match sym {
        Some(b @ 0x20..=0x7e) => Some((b - 0x20) as usize),
        Some(b'\t') => Some(TAB_COL),
        Some(b'\n') => Some(LF_COL),
        Some(_) => None,
        None => Some(EOF_COL),
    }
}

/// Symbol carried by a column, `None` for the end-of-input sentinel.
pub fn col_sym(col: usize) -> Option<u8> {
    match col {
        0..=94 => Some(0x20 + col as u8),
        TAB_COL => Some(b'\t'),
        LF_COL => Some(b'\n'),
        _ => None,
    }
}

/// In-progress scanner table.
///
/// Rows appear on demand as states are declared or targeted, filled with
/// the scan-error token. Each applied rule remembers which cells it wrote
/// last, so fully shadowed rules can be reported once the table is done.
#[derive(Debug, Default)]
pub struct ScanTable {
    rows: Vec<[u8; SCAN_COLS]>,
    writers: Vec<[u32; SCAN_COLS]>,
    applied: Vec<(usize, String)>,
}

impl ScanTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes sure a row exists for sub-state `id`.
    pub fn declare(&mut self, id: u8) {
        let want = id as usize + 1;
        while self.rows.len() < want {
            self.rows.push([ERROR_ID; SCAN_COLS]);
            self.writers.push([0; SCAN_COLS]);
        }
    }

    /// Writes `dest` into every column of row `src` the matcher covers.
    ///
    /// `line_no` and `text` identify the rule for shadow reporting.
    pub fn apply(&mut self, src: u8, matcher: &Matcher, dest: u8, line_no: usize, text: &str) {
        self.declare(src);
        let row = src as usize;
        for col in 0..SCAN_COLS {
            if matcher.matches(col_sym(col)) {
                self.rows[row][col] = dest;
                self.writers[row][col] = line_no as u32;
            }
        }
        self.applied.push((line_no, text.to_string()));
    }

    /// Rules that no longer own a single cell, in application order.
    pub fn shadowed(&self) -> Vec<(usize, String)> {
        self.applied
            .iter()
            .filter(|(line_no, _)| {
                let line = *line_no as u32;
                !self
                    .writers
                    .iter()
                    .any(|row| row.iter().any(|&w| w == line))
            })
            .cloned()
            .collect()
    }

    /// Cells holding a real transition. Cells a rule explicitly pointed at
    /// the scan-error token count as empty, same as untouched ones.
    pub fn edges(&self) -> usize {
        self.rows
            .iter()
            .map(|row| row.iter().filter(|&&d| d != ERROR_ID).count())
            .sum()
    }

    /// Finished grid with exactly `n_rows` rows; states never mentioned by
    /// a lexer rule get an all-error row.
    pub fn into_rows(mut self, n_rows: usize) -> Vec<[u8; SCAN_COLS]> {
        while self.rows.len() < n_rows {
            self.rows.push([ERROR_ID; SCAN_COLS]);
        }
        self.rows.truncate(n_rows);
        self.rows
    }

    pub fn rows(&self) -> &[[u8; SCAN_COLS]] {
        &self.rows
    }
}
