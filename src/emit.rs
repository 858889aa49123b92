//! # emit
//!
//! Renders finished tables into Rust source through a skeleton.
//!
//! The skeleton is a complete artifact with five insertion markers, each
//! alone on its own line: `@counts`, `@symbols`, `@exclude_pairs`,
//! `@scan_table`, and `@parse_arms`. Rendering replaces each marker line
//! with generated text and leaves every other line untouched, so the
//! artifact's fixed API lives in the skeleton where it can be read and
//! reviewed as plain Rust. A skeleton missing a marker is a hard error.
//!
//! Output is a pure function of the tables: no timestamps, no absolute
//! paths, map iteration in first-reference order. Rendering the same
//! rule file twice produces identical bytes.

use std::collections::HashSet;
use std::fmt::Write as _;

use crate::error::GenError;
use crate::parse::ParseTable;
use crate::registry::{Registry, Symbol, SymbolKind};
use crate::scan::SCAN_COLS;

/// Skeleton compiled into the binary; [`render`] accepts any other.
pub const SKELETON: &str = include_str!("skeleton.rs.in");

/// Insertion markers a skeleton must carry.
pub const MARKERS: [&str; 5] = [
    "@counts",
    "@symbols",
    "@exclude_pairs",
    "@scan_table",
    "@parse_arms",
];

// Identifiers the skeleton and the @counts block already define. A symbol
// whose rendered constant lands on one of these cannot be emitted.
const RESERVED: [&str; 13] = [
    "SCAN_COLS",
    "SCAN_END_MIN",
    "SCAN_EXCLUDE_MIN",
    "ACTION_MIN",
    "SCAN_END_MAX",
    "ACTION_MAX",
    "N_SCAN_STATES",
    "N_PARSE_RULES",
    "N_SYMBOLS",
    "N_EXCLUDES",
    "SYMBOL_NAMES",
    "EXCLUDE_TOKENS",
    "SCAN_TABLE",
];

/// Constant name a symbol renders under.
///
/// Sub-states gain a `SUB_` prefix and uppercase, tokens keep their own
/// spelling, exclude variants swap the `*` for an `_EXC` suffix, actions
/// trade the `#` sigil for an `ACT_` prefix. The built-ins come out as
/// `SUB_START`, `SCAN_ERROR`, and `EOF`.
pub fn const_name(name: &str, kind: SymbolKind) -> String {
    match kind {
        SymbolKind::SubState => format!("SUB_{}", name.to_ascii_uppercase()),
        SymbolKind::Token | SymbolKind::Eof => name.to_string(),
        SymbolKind::TokenExclude => format!("{}_EXC", name.trim_end_matches('*')),
        SymbolKind::Action => format!("ACT_{}", name.trim_start_matches('#')),
    }
}

/// Renders the artifact text. Nothing is written to disk here.
pub fn render(
    skeleton: &str,
    reg: &Registry,
    rows: &[[u8; SCAN_COLS]],
    parse: &ParseTable,
) -> Result<String, GenError> {
    let names = const_names(reg)?;
    let blocks = [
        counts_block(reg, rows.len(), parse.len())?,
        symbols_block(&names)?,
        exclude_block(reg)?,
        scan_block(reg, rows)?,
        parse_block(reg, parse)?,
    ];

    let mut out = String::with_capacity(skeleton.len() + 16 * 1024);
    let mut seen = [false; MARKERS.len()];
    for line in skeleton.lines() {
        match MARKERS.iter().position(|m| *m == line.trim()) {
            Some(i) => {
                seen[i] = true;
                out.push_str(&blocks[i]);
            }
            None => {
                out.push_str(line);
                out.push('\n');
            }
        }
    }
    for (i, marker) in MARKERS.into_iter().enumerate() {
        if !seen[i] {
            return Err(GenError::SkeletonMarker { marker });
        }
    }
    Ok(out)
}

/// Maps every symbol to its rendered constant, rejecting collisions with
/// each other and with the skeleton's fixed identifiers.
fn const_names(reg: &Registry) -> Result<Vec<(String, &str, Symbol)>, GenError> {
    let mut taken: HashSet<String> = RESERVED.iter().map(|s| s.to_string()).collect();
    let mut names = Vec::new();
    for (name, sym) in reg.iter() {
        let cname = const_name(name, sym.kind);
        if !taken.insert(cname.clone()) {
            return Err(GenError::ConstClash { name: cname });
        }
        names.push((cname, name, sym));
    }
    Ok(names)
}

fn counts_block(reg: &Registry, n_rows: usize, n_parse: usize) -> Result<String, GenError> {
    let mut s = String::new();
    writeln!(s, "/// Scanner states (rows of SCAN_TABLE).")?;
    writeln!(s, "pub const N_SCAN_STATES: usize = {n_rows};")?;
    writeln!(s, "/// Distinct (state, token) parser keys.")?;
    writeln!(s, "pub const N_PARSE_RULES: usize = {n_parse};")?;
    writeln!(s, "/// Registered symbols, built-ins included.")?;
    writeln!(s, "pub const N_SYMBOLS: usize = {};", reg.iter().count())?;
    writeln!(s, "/// Exclude variants.")?;
    writeln!(s, "pub const N_EXCLUDES: usize = {};", reg.exclude_pairs().len())?;
    writeln!(s, "/// Highest id that ends a scan.")?;
    writeln!(s, "pub const SCAN_END_MAX: u8 = {};", reg.scan_end_max())?;
    writeln!(s, "/// Highest action id, one below ACTION_MIN when none exist.")?;
    writeln!(s, "pub const ACTION_MAX: u8 = {};", reg.action_max())?;
    Ok(s)
}

fn symbols_block(names: &[(String, &str, Symbol)]) -> Result<String, GenError> {
    let mut s = String::new();
    for (cname, name, sym) in names {
        writeln!(s, "pub const {cname}: u8 = {}; // {} {:?}", sym.id, sym.kind, name)?;
    }
    writeln!(s)?;
    writeln!(s, "/// Id and source spelling of every symbol, first-reference order.")?;
    writeln!(s, "pub const SYMBOL_NAMES: [(u8, &str); N_SYMBOLS] = [")?;
    for (_, name, sym) in names {
        writeln!(s, "    ({}, {:?}),", sym.id, name)?;
    }
    writeln!(s, "];")?;
    Ok(s)
}

fn exclude_block(reg: &Registry) -> Result<String, GenError> {
    let mut s = String::new();
    for (exc, plain) in reg.exclude_pairs() {
        writeln!(
            s,
            "    ({exc}, {plain}), // {} -> {}",
            name_or(reg, exc),
            name_or(reg, plain)
        )?;
    }
    Ok(s)
}

fn scan_block(reg: &Registry, rows: &[[u8; SCAN_COLS]]) -> Result<String, GenError> {
    let mut s = String::new();
    for (i, row) in rows.iter().enumerate() {
        writeln!(s, "    // {}: {}", i, name_or(reg, i as u8))?;
        writeln!(s, "    [")?;
        for chunk in row.chunks(16) {
            let cells: Vec<String> = chunk.iter().map(|d| d.to_string()).collect();
            writeln!(s, "        {},", cells.join(", "))?;
        }
        writeln!(s, "    ],")?;
    }
    Ok(s)
}

fn parse_block(reg: &Registry, parse: &ParseTable) -> Result<String, GenError> {
    let mut s = String::new();
    for ((state, token), prod) in parse.iter() {
        let ids: Vec<String> = prod.body.iter().map(u8::to_string).collect();
        let names: Vec<&str> = prod.body.iter().map(|&id| name_or(reg, id)).collect();
        let spelled = if names.is_empty() {
            "--".to_string()
        } else {
            names.join(", ")
        };
        writeln!(
            s,
            "        ({state}, {token}) => Some(&[{}]), // {} :: {} :: {spelled}",
            ids.join(", "),
            name_or(reg, *state),
            name_or(reg, *token),
        )?;
    }
    Ok(s)
}

fn name_or(reg: &Registry, id: u8) -> &str {
    reg.name_of(id).unwrap_or("?")
}
