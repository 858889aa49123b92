//! # rules
//!
//! Line-oriented reader for the rule language.
//!
//! A rule file mixes three directive kinds, one per line; blank lines and
//! lines starting with `//` or `#` are ignored (comments are whole-line
//! only). Surrounding whitespace is insignificant.
//!
//! - `name:` declares sub-state `name` and opens its rule group.
//!   Re-opening an already-declared state is legal; rules accumulate.
//! - A lexer rule is a matcher followed by a destination, applied to the
//!   current group's state:
//!   `IS <c> <dest>` | `IN <lo> <hi> <dest>` | `LBL <dest>` | `HEX <dest>` |
//!   `ELSE <dest>` | `EOF <dest>` | `[set] <dest>` | `[^set] <dest>`.
//!   Character arguments and set members accept `\s` (space), `\t`, `\n`;
//!   sets may contain `a-z` style inclusive ranges. The destination is a
//!   sub-state (`lower_case`), a token (`UPPER_CASE`), or a token exclude
//!   variant (`UPPER_CASE*`).
//! - A parser rule reads `<state> :: <TOKEN or EOF> :: <items>` where items
//!   is blank or `--` for an epsilon production, or a comma-separated list
//!   of sub-states, tokens, and `#ACTION` markers.
//!
//! The reader validates lexical form and declaration order and produces
//! positioned [`Record`]s; every violation is fatal and reports
//! `<file>:<line>: <reason>` with the offending line.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::GenError;
use crate::registry::SymbolKind;

static DECL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z_][a-z0-9_]*:$").unwrap());
static SUB_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z_][a-z0-9_]*$").unwrap());
static TOKEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z_][A-Z0-9_]*$").unwrap());
static EXCLUDE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z_][A-Z0-9_]*\*$").unwrap());
static ACTION_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^#[A-Z_][A-Z0-9_]*$").unwrap());

/// Named single-character classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    /// Lowercase letter, decimal digit, or underscore.
    Label,
    /// Hexadecimal digit, either case.
    Hex,
    /// Every alphabet column, the end-of-input column included.
    Any,
    /// The end-of-input column only.
    Eof,
}

/// A single-character test, evaluated against every alphabet column.
///
/// `None` stands for the end-of-input column. Only `Any`, `Eof`, and
/// negated sets cover it; every other matcher is a plain character test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Matcher {
    Literal(u8),
    Range(u8, u8),
    Class(CharClass),
    Set { ranges: Vec<(u8, u8)>, negated: bool },
}

impl Matcher {
    pub fn matches(&self, sym: Option<u8>) -> bool {
        match self {
            Matcher::Literal(c) => sym == Some(*c),
            Matcher::Range(lo, hi) => sym.is_some_and(|b| (*lo..=*hi).contains(&b)),
            Matcher::Class(CharClass::Label) => {
                sym.is_some_and(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_')
            }
            Matcher::Class(CharClass::Hex) => sym.is_some_and(|b| b.is_ascii_hexdigit()),
            Matcher::Class(CharClass::Any) => true,
            Matcher::Class(CharClass::Eof) => sym.is_none(),
            Matcher::Set { ranges, negated } => match sym {
                Some(b) => ranges.iter().any(|(lo, hi)| (*lo..=*hi).contains(&b)) != *negated,
                None => *negated,
            },
        }
    }
}

/// One validated directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    State {
        name: String,
    },
    Scan {
        source: String,
        matcher: Matcher,
        dest: String,
    },
    Parse {
        source: String,
        token: String,
        body: Vec<String>,
    },
}

/// A directive plus its provenance for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub line_no: usize,
    pub text: String,
    pub directive: Directive,
}

/// Symbol kind implied by a name's lexical form.
pub fn classify_name(name: &str) -> Option<SymbolKind> {
    if SUB_RE.is_match(name) {
        Some(SymbolKind::SubState)
    } else if EXCLUDE_RE.is_match(name) {
        Some(SymbolKind::TokenExclude)
    } else if TOKEN_RE.is_match(name) {
        Some(SymbolKind::Token)
    } else if ACTION_RE.is_match(name) {
        Some(SymbolKind::Action)
    } else {
        None
    }
}

fn keyword_arity(kw: &str) -> Option<usize> {
    match kw {
        "IS" => Some(2),
        "IN" => Some(3),
        "LBL" | "HEX" | "ELSE" | "EOF" => Some(1),
        _ => None,
    }
}

fn syntax(path: &str, line_no: usize, text: &str, reason: impl Into<String>) -> GenError {
    GenError::Syntax {
        path: path.to_string(),
        line: line_no,
        reason: reason.into(),
        text: text.to_string(),
    }
}

fn semantic(path: &str, line_no: usize, text: &str, reason: impl Into<String>) -> GenError {
    GenError::Semantic {
        path: path.to_string(),
        line: line_no,
        reason: reason.into(),
        text: text.to_string(),
    }
}

/// Reads rule-file text into an ordered list of validated records.
///
/// `path` labels diagnostics only; the text is supplied by the caller.
pub fn read(path: &str, input: &str) -> Result<Vec<Record>, GenError> {
    let mut records: Vec<Record> = Vec::new();
    // States usable as a parser rule source: declared, or already referenced
    // as a destination. The built-in start state is always available.
    let mut known_states: HashSet<String> = HashSet::new();
    known_states.insert(crate::registry::START_NAME.to_string());
    let mut current: Option<String> = None;

    for (i, raw_line) in input.lines().enumerate() {
        let line_no = i + 1;
        let line = raw_line.trim();

        if line.is_empty() || line.starts_with("//") || line.starts_with('#') {
            continue;
        }

        if line
            .bytes()
            .any(|b| b >= 0x7f || (b < 0x20 && b != b'\t'))
        {
            return Err(syntax(
                path,
                line_no,
                line,
                "non-ASCII or control character in directive",
            ));
        }

        if line.contains("::") {
            let record = read_parser_rule(path, line_no, line, &mut known_states)?;
            records.push(record);
            continue;
        }

        let fields: Vec<&str> = line.split_whitespace().collect();

        if fields.len() == 1 && fields[0].ends_with(':') {
            if !DECL_RE.is_match(fields[0]) {
                return Err(syntax(
                    path,
                    line_no,
                    line,
                    format!(
                        "invalid state declaration {:?} (want lowercase_name:)",
                        fields[0]
                    ),
                ));
            }
            let name = fields[0].trim_end_matches(':').to_string();
            known_states.insert(name.clone());
            current = Some(name.clone());
            records.push(Record {
                line_no,
                text: line.to_string(),
                directive: Directive::State { name },
            });
            continue;
        }

        let source = match &current {
            Some(s) => s.clone(),
            None => {
                return Err(semantic(
                    path,
                    line_no,
                    line,
                    "rule appears before any state declaration",
                ));
            }
        };

        let (matcher, dest) = read_lexer_rule(path, line_no, line, &fields)?;
        if SUB_RE.is_match(&dest) {
            known_states.insert(dest.clone());
        }
        records.push(Record {
            line_no,
            text: line.to_string(),
            directive: Directive::Scan {
                source,
                matcher,
                dest,
            },
        });
    }

    if records.is_empty() {
        return Err(GenError::EmptyRuleSet {
            path: path.to_string(),
        });
    }

    Ok(records)
}

fn read_lexer_rule(
    path: &str,
    line_no: usize,
    line: &str,
    fields: &[&str],
) -> Result<(Matcher, String), GenError> {
    let matcher = if fields[0].starts_with('[') {
        if fields.len() != 2 {
            return Err(syntax(
                path,
                line_no,
                line,
                format!(
                    "character class expects 1 arg (destination), {} given",
                    fields.len() - 1
                ),
            ));
        }
        parse_set(fields[0]).map_err(|reason| syntax(path, line_no, line, reason))?
    } else {
        let kw = fields[0];
        if let Some(arity) = keyword_arity(kw) {
            if fields.len() - 1 != arity {
                return Err(syntax(
                    path,
                    line_no,
                    line,
                    format!("{} expects {} args, {} given", kw, arity, fields.len() - 1),
                ));
            }
        }
        match kw {
            "IS" => {
                let c = unescape_char(fields[1])
                    .map_err(|reason| syntax(path, line_no, line, reason))?;
                Matcher::Literal(c)
            }
            "IN" => {
                let lo = unescape_char(fields[1])
                    .map_err(|reason| syntax(path, line_no, line, reason))?;
                let hi = unescape_char(fields[2])
                    .map_err(|reason| syntax(path, line_no, line, reason))?;
                if lo > hi {
                    return Err(syntax(path, line_no, line, "empty character range"));
                }
                Matcher::Range(lo, hi)
            }
            "LBL" => Matcher::Class(CharClass::Label),
            "HEX" => Matcher::Class(CharClass::Hex),
            "ELSE" => Matcher::Class(CharClass::Any),
            "EOF" => Matcher::Class(CharClass::Eof),
            _ => {
                return Err(syntax(
                    path,
                    line_no,
                    line,
                    format!("unknown matcher keyword {kw:?}"),
                ));
            }
        }
    };

    let dest = fields[fields.len() - 1];
    if !(SUB_RE.is_match(dest) || TOKEN_RE.is_match(dest) || EXCLUDE_RE.is_match(dest)) {
        return Err(syntax(
            path,
            line_no,
            line,
            format!("invalid destination {dest:?} (want state, TOKEN, or TOKEN*)"),
        ));
    }
    Ok((matcher, dest.to_string()))
}

fn read_parser_rule(
    path: &str,
    line_no: usize,
    line: &str,
    known_states: &mut HashSet<String>,
) -> Result<Record, GenError> {
    let segs: Vec<&str> = line.split("::").map(str::trim).collect();
    if segs.len() != 3 {
        return Err(syntax(
            path,
            line_no,
            line,
            "parser rule must be <state>::<TOKEN>::<item,item,...>",
        ));
    }

    let source = segs[0];
    if !SUB_RE.is_match(source) {
        return Err(syntax(
            path,
            line_no,
            line,
            format!("invalid parser source state {source:?}"),
        ));
    }
    if !known_states.contains(source) {
        return Err(semantic(
            path,
            line_no,
            line,
            format!("undeclared state {source:?}"),
        ));
    }

    let token = segs[1];
    if !(token == crate::registry::EOF_NAME || TOKEN_RE.is_match(token)) {
        return Err(syntax(
            path,
            line_no,
            line,
            format!("expected a token name or EOF, got {token:?}"),
        ));
    }

    let mut body: Vec<String> = Vec::new();
    if !(segs[2].is_empty() || segs[2] == "--") {
        for item in segs[2].split(',') {
            let item = item.trim();
            if item.is_empty() {
                return Err(syntax(path, line_no, line, "empty production item"));
            }
            if !(SUB_RE.is_match(item) || TOKEN_RE.is_match(item) || ACTION_RE.is_match(item)) {
                return Err(syntax(
                    path,
                    line_no,
                    line,
                    format!("invalid production item {item:?}"),
                ));
            }
            if SUB_RE.is_match(item) {
                known_states.insert(item.to_string());
            }
            body.push(item.to_string());
        }
    }

    Ok(Record {
        line_no,
        text: line.to_string(),
        directive: Directive::Parse {
            source: source.to_string(),
            token: token.to_string(),
            body,
        },
    })
}

/// Decodes a single-character argument: `\s`, `\t`, `\n`, or one printable
/// ASCII character standing for itself.
fn unescape_char(tok: &str) -> Result<u8, String> {
    match tok {
        r"\s" => return Ok(b' '),
        r"\t" => return Ok(b'\t'),
        r"\n" => return Ok(b'\n'),
        _ => {}
    }
    let bytes = tok.as_bytes();
    if bytes.len() == 1 && (b' '..=b'~').contains(&bytes[0]) {
        Ok(bytes[0])
    } else {
        Err(format!(
            "expected a single character or \\s/\\t/\\n escape, got {tok:?}"
        ))
    }
}

/// Parses a `[...]` / `[^...]` class into a set matcher.
fn parse_set(tok: &str) -> Result<Matcher, String> {
    let inner = tok
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .ok_or_else(|| format!("unterminated character class {tok:?}"))?;
    let (negated, inner) = match inner.strip_prefix('^') {
        Some(rest) => (true, rest),
        None => (false, inner),
    };
    if inner.is_empty() {
        return Err("empty character class".to_string());
    }

    // One element is a raw byte or an escape; elements may pair into ranges.
    let bytes = inner.as_bytes();
    let mut elems: Vec<u8> = Vec::new(); // decoded element per position
    let mut dashes: Vec<bool> = Vec::new(); // element is a bare '-'
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'\\' {
            if i + 1 >= bytes.len() {
                return Err("dangling escape in character class".to_string());
            }
            let e = match bytes[i + 1] {
                b's' => b' ',
                b't' => b'\t',
                b'n' => b'\n',
                b'\\' => b'\\',
                b']' => b']',
                b'-' => b'-',
                other => {
                    return Err(format!(
                        "bad escape \"\\{}\" in character class",
                        other as char
                    ));
                }
            };
            elems.push(e);
            dashes.push(false);
            i += 2;
        } else {
            elems.push(bytes[i]);
            dashes.push(bytes[i] == b'-');
            i += 1;
        }
    }

    let mut ranges: Vec<(u8, u8)> = Vec::new();
    let mut j = 0;
    while j < elems.len() {
        // `a-z` needs a dash with an element on both sides; a dash first or
        // last stands for itself.
        if j + 2 < elems.len() && dashes[j + 1] && !dashes[j] {
            let (lo, hi) = (elems[j], elems[j + 2]);
            if lo > hi {
                return Err("reversed range in character class".to_string());
            }
            ranges.push((lo, hi));
            j += 3;
        } else {
            ranges.push((elems[j], elems[j]));
            j += 1;
        }
    }

    Ok(Matcher::Set { ranges, negated })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directives(input: &str) -> Vec<Record> {
        read("rules.txt", input).unwrap()
    }

    #[test]
    fn classifies_all_three_directive_kinds() {
        let recs = directives(
            r#"
// scanner
start:
IN 0 9 digit

# parser
start :: TOKEN_A :: expr
"#,
        );
        assert_eq!(recs.len(), 3);
        assert!(matches!(recs[0].directive, Directive::State { .. }));
        assert!(matches!(recs[1].directive, Directive::Scan { .. }));
        assert!(matches!(recs[2].directive, Directive::Parse { .. }));
        assert_eq!(recs[1].line_no, 4);
    }

    #[test]
    fn scan_rules_bind_to_the_open_group() {
        let recs = directives("start:\nIS a word\nword:\nLBL word\nELSE TOKEN_WORD*\n");
        match &recs[4].directive {
            Directive::Scan { source, dest, .. } => {
                assert_eq!(source, "word");
                assert_eq!(dest, "TOKEN_WORD*");
            }
            other => panic!("expected scan rule, got {other:?}"),
        }
    }

    #[test]
    fn keyword_arity_is_enforced() {
        let err = read("rules.txt", "start:\nIS digit\n").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("rules.txt:2:"), "{msg}");
        assert!(msg.contains("IS expects 2 args, 1 given"), "{msg}");
    }

    #[test]
    fn unknown_keyword_is_fatal() {
        let err = read("rules.txt", "start:\nISH a digit\n").unwrap_err();
        assert!(err.to_string().contains("unknown matcher keyword \"ISH\""));
    }

    #[test]
    fn escapes_decode_in_char_args() {
        let recs = directives("start:\nIS \\s space_run\nIN \\t \\n ws\n");
        assert!(matches!(
            recs[1].directive,
            Directive::Scan {
                matcher: Matcher::Literal(b' '),
                ..
            }
        ));
        assert!(matches!(
            recs[2].directive,
            Directive::Scan {
                matcher: Matcher::Range(b'\t', b'\n'),
                ..
            }
        ));
    }

    #[test]
    fn reversed_keyword_range_is_rejected() {
        let err = read("rules.txt", "start:\nIN 9 0 digit\n").unwrap_err();
        assert!(err.to_string().contains("empty character range"));
    }

    #[test]
    fn bracket_sets_parse_with_ranges_and_negation() {
        let recs = directives("start:\n[0-9a-f_] hexy\n[^0-9] TOKEN_NUM*\n");
        match &recs[1].directive {
            Directive::Scan { matcher, .. } => {
                assert_eq!(
                    matcher,
                    &Matcher::Set {
                        ranges: vec![(b'0', b'9'), (b'a', b'f'), (b'_', b'_')],
                        negated: false,
                    }
                );
            }
            other => panic!("expected scan rule, got {other:?}"),
        }
        match &recs[2].directive {
            Directive::Scan { matcher, .. } => {
                assert!(matcher.matches(Some(b'x')));
                assert!(!matcher.matches(Some(b'5')));
                assert!(matcher.matches(None)); // negated sets cover end of input
            }
            other => panic!("expected scan rule, got {other:?}"),
        }
    }

    #[test]
    fn malformed_bracket_sets_are_rejected() {
        for (input, want) in [
            ("start:\n[] x\n", "empty character class"),
            ("start:\n[9-0] x\n", "reversed range"),
            ("start:\n[a-z x\n", "unterminated character class"),
            ("start:\n[\\q] x\n", "bad escape"),
        ] {
            let err = read("rules.txt", input).unwrap_err();
            assert!(err.to_string().contains(want), "{input:?}: {err}");
        }
    }

    #[test]
    fn literal_dash_allowed_at_set_edges() {
        let recs = directives("start:\n[-+] sign\n");
        match &recs[1].directive {
            Directive::Scan { matcher, .. } => {
                assert!(matcher.matches(Some(b'-')));
                assert!(matcher.matches(Some(b'+')));
                assert!(!matcher.matches(Some(b'*')));
            }
            other => panic!("expected scan rule, got {other:?}"),
        }
    }

    #[test]
    fn rule_before_declaration_is_fatal() {
        let err = read("rules.txt", "IN 0 9 digit\n").unwrap_err();
        assert!(matches!(err, GenError::Semantic { line: 1, .. }));
        assert!(err
            .to_string()
            .contains("rule appears before any state declaration"));
    }

    #[test]
    fn parser_source_must_exist() {
        let err = read("rules.txt", "expr :: TOKEN_A :: --\n").unwrap_err();
        assert!(err.to_string().contains("undeclared state \"expr\""));

        // start is built in, and a body reference creates the state.
        let recs = directives("start :: TOKEN_A :: expr\nexpr :: TOKEN_B :: --\n");
        assert_eq!(recs.len(), 2);
    }

    #[test]
    fn parser_bodies_split_and_validate() {
        let recs = directives("start :: TOKEN_A :: expr, TOKEN_B ,#MK_NODE\n");
        match &recs[0].directive {
            Directive::Parse { token, body, .. } => {
                assert_eq!(token, "TOKEN_A");
                assert_eq!(body, &["expr", "TOKEN_B", "#MK_NODE"]);
            }
            other => panic!("expected parse rule, got {other:?}"),
        }

        let err = read("rules.txt", "start :: TOKEN_A :: ex pr\n").unwrap_err();
        assert!(err.to_string().contains("invalid production item"));
    }

    #[test]
    fn epsilon_spellings_yield_empty_bodies() {
        let recs = directives("start :: TOKEN_A :: --\nstart :: TOKEN_B ::\n");
        for rec in &recs {
            match &rec.directive {
                Directive::Parse { body, .. } => assert!(body.is_empty()),
                other => panic!("expected parse rule, got {other:?}"),
            }
        }
    }

    #[test]
    fn eof_is_a_valid_parser_key() {
        let recs = directives("start :: EOF :: --\n");
        assert!(matches!(
            &recs[0].directive,
            Directive::Parse { token, .. } if token == "EOF"
        ));
    }

    #[test]
    fn malformed_parser_shapes_are_rejected() {
        for input in [
            "start :: TOKEN_A\n",
            "start :: tok_a :: --\n",
            "Start :: TOKEN_A :: --\n",
            "start :: TOKEN_A :: a,,b\n",
        ] {
            assert!(read("rules.txt", input).is_err(), "{input:?}");
        }
    }

    #[test]
    fn invalid_destination_is_rejected() {
        let err = read("rules.txt", "start:\nIS a #MK\n").unwrap_err();
        assert!(err.to_string().contains("invalid destination"));
    }

    #[test]
    fn empty_rule_file_is_fatal() {
        let err = read("rules.txt", "// nothing here\n\n").unwrap_err();
        assert!(matches!(err, GenError::EmptyRuleSet { .. }));
    }

    #[test]
    fn non_ascii_directives_are_rejected() {
        let err = read("rules.txt", "start:\nIS é digit\n").unwrap_err();
        assert!(matches!(err, GenError::Syntax { line: 2, .. }));
    }

    #[test]
    fn class_matchers_cover_their_columns() {
        assert!(Matcher::Class(CharClass::Label).matches(Some(b'x')));
        assert!(Matcher::Class(CharClass::Label).matches(Some(b'_')));
        assert!(!Matcher::Class(CharClass::Label).matches(Some(b'X')));
        assert!(!Matcher::Class(CharClass::Label).matches(None));
        assert!(Matcher::Class(CharClass::Hex).matches(Some(b'F')));
        assert!(!Matcher::Class(CharClass::Hex).matches(Some(b'g')));
        assert!(Matcher::Class(CharClass::Any).matches(None));
        assert!(Matcher::Class(CharClass::Eof).matches(None));
        assert!(!Matcher::Class(CharClass::Eof).matches(Some(b'a')));
    }

    #[test]
    fn name_classification_follows_lexical_form() {
        assert_eq!(classify_name("digit"), Some(SymbolKind::SubState));
        assert_eq!(classify_name("TOKEN_NUM"), Some(SymbolKind::Token));
        assert_eq!(classify_name("TOKEN_NUM*"), Some(SymbolKind::TokenExclude));
        assert_eq!(classify_name("#MK_NODE"), Some(SymbolKind::Action));
        assert_eq!(classify_name("9bad"), None);
    }
}
