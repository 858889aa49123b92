//! # registry
//!
//! Band-partitioned symbol registry built on [`indexmap::IndexMap`].
//!
//! Every name referenced by a rule file (state declarations, rule
//! destinations, parser tokens, action markers) is interned here exactly
//! once and receives a one-byte id from the band belonging to its kind:
//!
//! | band            | ids       | built-ins        |
//! |-----------------|-----------|------------------|
//! | sub-states      | 0..100    | `start` = 0      |
//! | tokens          | 100..150  | `SCAN_ERROR` = 100 |
//! | exclude variants| 150..200  |                  |
//! | action markers  | 200..255  |                  |
//! | end of input    | 255       | `EOF` = 255      |
//!
//! Fixed band bases let a consumer classify a raw id with a range test and
//! keep the whole id space inside one byte. Ids are handed out in
//! first-reference order within a band, so iteration order (and therefore
//! emitted output) is deterministic for a given rule file.
//!
//! ## Example
//! ```rust
//! # use syntab::registry::{Registry, SymbolKind};
//! let mut reg = Registry::new();
//! let digit = reg.register("digit", SymbolKind::SubState).unwrap();
//! assert_eq!(digit, 1); // 0 is the built-in start state
//! assert_eq!(reg.register("digit", SymbolKind::SubState).unwrap(), 1);
//! assert_eq!(reg.register("TOKEN_NUM", SymbolKind::Token).unwrap(), 101);
//! ```

use std::fmt;

use indexmap::IndexMap;
use smartstring::alias::String;
use thiserror::Error;

/// First id of the token band; also the id of the built-in error token.
pub const TOKEN_BASE: u8 = 100;
/// First id of the exclude-variant band.
pub const EXCLUDE_BASE: u8 = 150;
/// First id of the action-marker band.
pub const ACTION_BASE: u8 = 200;
/// Reserved id of the end-of-input sentinel.
pub const EOF_ID: u8 = 255;
/// Reserved id of the built-in error token.
pub const ERROR_ID: u8 = TOKEN_BASE;

/// Built-in start sub-state name.
pub const START_NAME: &str = "start";
/// Built-in error token name.
pub const ERROR_NAME: &str = "SCAN_ERROR";
/// Built-in end-of-input sentinel name.
pub const EOF_NAME: &str = "EOF";

/// What a registered name denotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    /// Non-terminal automaton state ("still scanning/parsing").
    SubState,
    /// Completed-token terminal.
    Token,
    /// Terminal variant that must not consume the triggering character.
    TokenExclude,
    /// Parser production element firing a semantic action.
    Action,
    /// The reserved end-of-input sentinel; never minted for new names.
    Eof,
}

impl SymbolKind {
    fn band(self) -> Option<Band> {
        match self {
            SymbolKind::SubState => Some(Band::SubState),
            SymbolKind::Token => Some(Band::Token),
            SymbolKind::TokenExclude => Some(Band::TokenExclude),
            SymbolKind::Action => Some(Band::Action),
            SymbolKind::Eof => None,
        }
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SymbolKind::SubState => "sub-state",
            SymbolKind::Token => "token",
            SymbolKind::TokenExclude => "token-exclude",
            SymbolKind::Action => "action",
            SymbolKind::Eof => "end-of-input",
        };
        f.write_str(s)
    }
}

/// Numeric id band backing one symbol kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Band {
    SubState,
    Token,
    TokenExclude,
    Action,
}

impl Band {
    /// Maximum number of names the band can hold, built-ins included.
    ///
    /// The sub-state band spans 100 ids but its occupancy must stay below
    /// 100; the action band stops one short of the EOF sentinel.
    pub fn capacity(self) -> usize {
        match self {
            Band::SubState => 99,
            Band::Token => 50,
            Band::TokenExclude => 50,
            Band::Action => 55,
        }
    }

    fn base(self) -> u8 {
        match self {
            Band::SubState => 0,
            Band::Token => TOKEN_BASE,
            Band::TokenExclude => EXCLUDE_BASE,
            Band::Action => ACTION_BASE,
        }
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Band::SubState => "sub-state",
            Band::Token => "token",
            Band::TokenExclude => "token-exclude",
            Band::Action => "action",
        };
        f.write_str(s)
    }
}

/// Errors that can occur when registering a symbol.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// The name already exists with a different kind.
    #[error("{name:?} already registered as {have}, referenced as {want}")]
    KindConflict {
        name: std::string::String,
        have: SymbolKind,
        want: SymbolKind,
    },

    /// The band for the requested kind is full.
    #[error("{band} band overflow (capacity {})", .band.capacity())]
    Overflow { band: Band },

    /// Attempted to mint a fresh name with the reserved end-of-input kind.
    #[error("{name:?} cannot be registered as the end-of-input sentinel")]
    ReservedKind { name: std::string::String },

    /// The combined registry no longer fits the one-byte id space.
    #[error("{total} symbols exceed the one-byte id space (256)")]
    TooManySymbols { total: usize },
}

/// A registered symbol: its kind and the id assigned from the kind's band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Symbol {
    pub kind: SymbolKind,
    pub id: u8,
}

/// Occupancy counts reported by [`Registry::finalize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryStats {
    pub sub_states: usize,
    pub tokens: usize,
    pub excludes: usize,
    pub actions: usize,
    pub total: usize,
}

/// Bidirectional name ↔ id map partitioned into disjoint numeric bands.
#[derive(Debug)]
pub struct Registry {
    syms: IndexMap<String, Symbol>,
    next: [u8; 4], // next free id per band, indexed by Band order
}

impl Registry {
    /// Creates a registry holding only the built-in symbols.
    pub fn new() -> Self {
        let mut syms = IndexMap::new();
        syms.insert(
            String::from(START_NAME),
            Symbol {
                kind: SymbolKind::SubState,
                id: 0,
            },
        );
        syms.insert(
            String::from(ERROR_NAME),
            Symbol {
                kind: SymbolKind::Token,
                id: ERROR_ID,
            },
        );
        syms.insert(
            String::from(EOF_NAME),
            Symbol {
                kind: SymbolKind::Eof,
                id: EOF_ID,
            },
        );
        Self {
            syms,
            next: [1, TOKEN_BASE + 1, EXCLUDE_BASE, ACTION_BASE],
        }
    }

    /// Interns `name` with `kind` and returns its id.
    ///
    /// Idempotent: a name already present with the same kind returns its
    /// existing id. A name present with a different kind is a
    /// [`RegistryError::KindConflict`]. Registering an exclude variant
    /// (`NAME*`) also interns the plain token `NAME`, so the canonical
    /// token id always exists alongside the variant.
    pub fn register(&mut self, name: &str, kind: SymbolKind) -> Result<u8, RegistryError> {
        if let Some(sym) = self.syms.get(name) {
            if sym.kind == kind {
                return Ok(sym.id);
            }
            return Err(RegistryError::KindConflict {
                name: name.to_string(),
                have: sym.kind,
                want: kind,
            });
        }

        if kind == SymbolKind::TokenExclude {
            let plain = name.strip_suffix('*').unwrap_or(name);
            self.register(plain, SymbolKind::Token)?;
        }

        let band = kind.band().ok_or_else(|| RegistryError::ReservedKind {
            name: name.to_string(),
        })?;
        let id = self.alloc(band)?;
        self.syms.insert(String::from(name), Symbol { kind, id });
        Ok(id)
    }

    fn alloc(&mut self, band: Band) -> Result<u8, RegistryError> {
        let slot = band as usize;
        let id = self.next[slot];
        let used = (id - band.base()) as usize;
        if used >= band.capacity() {
            return Err(RegistryError::Overflow { band });
        }
        self.next[slot] += 1;
        Ok(id)
    }

    /// Looks up a symbol by name.
    pub fn get(&self, name: &str) -> Option<Symbol> {
        self.syms.get(name).copied()
    }

    /// Id for `name`, if registered.
    pub fn id_of(&self, name: &str) -> Option<u8> {
        self.syms.get(name).map(|s| s.id)
    }

    /// Spelled name for `id`, if assigned. Linear over at most 256 entries.
    pub fn name_of(&self, id: u8) -> Option<&str> {
        self.syms
            .iter()
            .find(|(_, s)| s.id == id)
            .map(|(n, _)| n.as_str())
    }

    /// Symbols in first-reference order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Symbol)> {
        self.syms.iter().map(|(n, s)| (n.as_str(), *s))
    }

    /// Number of registered sub-states; the scan table row count.
    pub fn sub_state_count(&self) -> usize {
        self.next[Band::SubState as usize] as usize
    }

    /// Highest assigned id in the terminal region (tokens and excludes).
    pub fn scan_end_max(&self) -> u8 {
        let next_exclude = self.next[Band::TokenExclude as usize];
        if next_exclude > EXCLUDE_BASE {
            next_exclude - 1
        } else {
            self.next[Band::Token as usize] - 1
        }
    }

    /// Highest assigned action id, or `ACTION_BASE - 1` when no actions exist.
    pub fn action_max(&self) -> u8 {
        self.next[Band::Action as usize] - 1
    }

    /// Exclude-variant id paired with its plain token id, in first-reference
    /// order of the variants.
    pub fn exclude_pairs(&self) -> Vec<(u8, u8)> {
        self.syms
            .iter()
            .filter(|(_, s)| s.kind == SymbolKind::TokenExclude)
            .filter_map(|(name, s)| {
                let plain = name.strip_suffix('*').unwrap_or(name);
                self.id_of(plain).map(|p| (s.id, p))
            })
            .collect()
    }

    /// Verifies band occupancy after all rules are read and reports counts.
    ///
    /// Overflow is normally caught the moment a band fills; this re-checks
    /// every band against its capacity and the total against the one-byte
    /// id space, then returns the occupancy statistics for the run summary.
    pub fn finalize(&self) -> Result<RegistryStats, RegistryError> {
        let mut counts = [0usize; 4];
        let mut total = 0usize;
        for (_, sym) in self.syms.iter() {
            total += 1;
            if let Some(band) = sym.kind.band() {
                counts[band as usize] += 1;
            }
        }
        for band in [
            Band::SubState,
            Band::Token,
            Band::TokenExclude,
            Band::Action,
        ] {
            if counts[band as usize] > band.capacity() {
                return Err(RegistryError::Overflow { band });
            }
        }
        if total > 256 {
            return Err(RegistryError::TooManySymbols { total });
        }
        Ok(RegistryStats {
            sub_states: counts[Band::SubState as usize],
            tokens: counts[Band::Token as usize],
            excludes: counts[Band::TokenExclude as usize],
            actions: counts[Band::Action as usize],
            total,
        })
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
