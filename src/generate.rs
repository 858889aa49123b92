//! # generate
//!
//! End-to-end run: read a rule file, build the registry and both tables,
//! render the artifact, and place it in the output directory atomically.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::emit;
use crate::error::GenError;
use crate::parse::ParseTable;
use crate::registry::{Registry, RegistryError, SymbolKind, EOF_ID, EOF_NAME};
use crate::rules::{self, Directive, Record};
use crate::scan::ScanTable;

/// Artifact file name inside the output directory.
pub const ARTIFACT_NAME: &str = "syntax_tables.rs";

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub artifact: PathBuf,
    /// Scanner states, the scan table row count.
    pub states: usize,
    /// Scan table cells holding a non-error transition.
    pub scan_edges: usize,
    /// Distinct (state, token) parser keys.
    pub parse_rules: usize,
}

/// Compiles `rules_path` into `<out_dir>/syntax_tables.rs`.
///
/// The artifact is rendered in memory, written to a scratch file beside
/// its final place, and renamed into place only once complete, so a failed
/// run never leaves a partial or stale-looking artifact behind. The output
/// directory must already exist.
pub fn generate(
    rules_path: impl AsRef<Path>,
    out_dir: impl AsRef<Path>,
) -> Result<Summary, GenError> {
    let rules_path = rules_path.as_ref();
    let out_dir = out_dir.as_ref();
    let path_label = rules_path.display().to_string();

    let text = fs::read_to_string(rules_path).map_err(|e| GenError::io(&path_label, e))?;
    let records = rules::read(&path_label, &text)?;
    info!("{path_label}: {} directives", records.len());

    let mut reg = Registry::new();
    let mut scan = ScanTable::new();
    let mut parse = ParseTable::new();
    for rec in &records {
        apply_record(&path_label, rec, &mut reg, &mut scan, &mut parse)?;
    }

    let stats = reg.finalize().map_err(|e| GenError::Registry {
        path: path_label.clone(),
        source: e,
    })?;
    info!(
        "{} sub-states, {} tokens, {} excludes, {} actions",
        stats.sub_states, stats.tokens, stats.excludes, stats.actions
    );

    for (line, text) in scan.shadowed() {
        warn!("{path_label}:{line}: rule is fully shadowed by later rules\n    {text}");
    }
    for r in parse.shadowed() {
        warn!(
            "{path_label}:{}: rule is overridden by the rule at line {}\n    {}",
            r.line_no, r.by_line, r.text
        );
    }

    let scan_edges = scan.edges();
    let rows = scan.into_rows(reg.sub_state_count());
    let rendered = emit::render(emit::SKELETON, &reg, &rows, &parse)?;

    if !out_dir.is_dir() {
        return Err(GenError::io(
            out_dir.display().to_string(),
            io::Error::new(io::ErrorKind::NotFound, "output directory does not exist"),
        ));
    }
    let artifact = out_dir.join(ARTIFACT_NAME);
    let scratch = out_dir.join(format!("{ARTIFACT_NAME}.tmp"));
    fs::write(&scratch, rendered).map_err(|e| GenError::io(scratch.display().to_string(), e))?;
    fs::rename(&scratch, &artifact)
        .map_err(|e| GenError::io(artifact.display().to_string(), e))?;
    info!("wrote {}", artifact.display());

    Ok(Summary {
        artifact,
        states: rows.len(),
        scan_edges,
        parse_rules: parse.len(),
    })
}

/// Feeds one directive into the registry and the matching table.
fn apply_record(
    path: &str,
    rec: &Record,
    reg: &mut Registry,
    scan: &mut ScanTable,
    parse: &mut ParseTable,
) -> Result<(), GenError> {
    match &rec.directive {
        Directive::State { name } => {
            let id = reg
                .register(name, SymbolKind::SubState)
                .map_err(|e| located(path, rec, e))?;
            scan.declare(id);
        }
        Directive::Scan {
            source,
            matcher,
            dest,
        } => {
            let src = reg
                .register(source, SymbolKind::SubState)
                .map_err(|e| located(path, rec, e))?;
            let did = register_named(path, rec, reg, dest)?;
            scan.apply(src, matcher, did, rec.line_no, &rec.text);
        }
        Directive::Parse {
            source,
            token,
            body,
        } => {
            let src = reg
                .register(source, SymbolKind::SubState)
                .map_err(|e| located(path, rec, e))?;
            let tok = if token == EOF_NAME {
                EOF_ID
            } else {
                reg.register(token, SymbolKind::Token)
                    .map_err(|e| located(path, rec, e))?
            };
            let mut ids = Vec::with_capacity(body.len());
            for item in body {
                ids.push(register_named(path, rec, reg, item)?);
            }
            parse.insert(src, tok, ids, rec.line_no, &rec.text);
        }
    }
    Ok(())
}

/// Interns a name under the kind its spelling implies.
fn register_named(
    path: &str,
    rec: &Record,
    reg: &mut Registry,
    name: &str,
) -> Result<u8, GenError> {
    let kind = rules::classify_name(name).ok_or_else(|| GenError::Semantic {
        path: path.to_string(),
        line: rec.line_no,
        reason: format!("unclassifiable name {name:?}"),
        text: rec.text.clone(),
    })?;
    reg.register(name, kind).map_err(|e| located(path, rec, e))
}

/// Pins a registry error to the rule that triggered it.
fn located(path: &str, rec: &Record, err: RegistryError) -> GenError {
    match err {
        RegistryError::Overflow { band } => GenError::Capacity {
            path: path.to_string(),
            line: rec.line_no,
            band,
            cap: band.capacity(),
            text: rec.text.clone(),
        },
        other => GenError::Semantic {
            path: path.to_string(),
            line: rec.line_no,
            reason: other.to_string(),
            text: rec.text.clone(),
        },
    }
}
