use std::io;

use thiserror::Error;

use crate::registry::Band;

/// Fatal generation errors.
///
/// Every variant aborts the run. Line-scoped variants carry the rule file
/// path, the 1-based line number, and the offending line verbatim so the
/// printed diagnostic reads `<file>:<line>: <reason>` followed by the text.
#[derive(Debug, Error)]
pub enum GenError {
    /// Malformed directive: unknown keyword, bad argument count, bad charset.
    #[error("{path}:{line}: {reason}\n    {text}")]
    Syntax {
        path: String,
        line: usize,
        reason: String,
        text: String,
    },

    /// Well-formed directive with an invalid meaning: rule before its state
    /// declaration, undeclared parser source, symbol kind conflict.
    #[error("{path}:{line}: {reason}\n    {text}")]
    Semantic {
        path: String,
        line: usize,
        reason: String,
        text: String,
    },

    /// An id band ran out of room.
    #[error("{path}:{line}: {band} band overflow (capacity {cap})\n    {text}")]
    Capacity {
        path: String,
        line: usize,
        band: Band,
        cap: usize,
        text: String,
    },

    /// The rule file contained no directives at all.
    #[error("{path}: no states or rules declared")]
    EmptyRuleSet { path: String },

    /// The skeleton text lacks a required insertion marker.
    #[error("skeleton missing insertion marker {marker:?}")]
    SkeletonMarker { marker: &'static str },

    /// Two symbols render to the same generated constant name.
    #[error("generated constant {name:?} would be defined twice")]
    ConstClash { name: String },

    #[error("failed to format generated source")]
    Fmt(#[from] std::fmt::Error),

    #[error("{path}: {source}")]
    Registry {
        path: String,
        #[source]
        source: crate::registry::RegistryError,
    },

    #[error("{path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
}

impl GenError {
    pub(crate) fn io(path: impl Into<String>, source: io::Error) -> Self {
        GenError::Io {
            path: path.into(),
            source,
        }
    }
}
