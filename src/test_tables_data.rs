// Generated by syntab. Do not edit.
//
// One-byte ids partition into bands: sub-states below SCAN_END_MIN, end
// tokens from SCAN_END_MIN, exclude variants from SCAN_EXCLUDE_MIN, action
// markers from ACTION_MIN, and EOF at 255. The scanner table is dense over
// a 98-symbol alphabet; the parser table is a sparse (state, token) match.

/// Scanner alphabet width: printable ASCII, TAB, LF, end of input.
pub const SCAN_COLS: usize = 98;
/// First end-token id; also the scan-error token.
pub const SCAN_END_MIN: u8 = 100;
/// First exclude-variant id.
pub const SCAN_EXCLUDE_MIN: u8 = 150;
/// First action-marker id.
pub const ACTION_MIN: u8 = 200;

/// Scanner states (rows of SCAN_TABLE).
pub const N_SCAN_STATES: usize = 2;
/// Distinct (state, token) parser keys.
pub const N_PARSE_RULES: usize = 2;
/// Registered symbols, built-ins included.
pub const N_SYMBOLS: usize = 7;
/// Exclude variants.
pub const N_EXCLUDES: usize = 1;
/// Highest id that ends a scan.
pub const SCAN_END_MAX: u8 = 150;
/// Highest action id, one below ACTION_MIN when none exist.
pub const ACTION_MAX: u8 = 200;

// Symbol ids in first-reference order.
pub const SUB_START: u8 = 0; // sub-state "start"
pub const SCAN_ERROR: u8 = 100; // token "SCAN_ERROR"
pub const EOF: u8 = 255; // end-of-input "EOF"
pub const SUB_DIGIT: u8 = 1; // sub-state "digit"
pub const TOKEN_NUM: u8 = 101; // token "TOKEN_NUM"
pub const TOKEN_NUM_EXC: u8 = 150; // token-exclude "TOKEN_NUM*"
pub const ACT_MK_NUM: u8 = 200; // action "#MK_NUM"

/// Id and source spelling of every symbol, first-reference order.
pub const SYMBOL_NAMES: [(u8, &str); N_SYMBOLS] = [
    (0, "start"),
    (100, "SCAN_ERROR"),
    (255, "EOF"),
    (1, "digit"),
    (101, "TOKEN_NUM"),
    (150, "TOKEN_NUM*"),
    (200, "#MK_NUM"),
];

/// Exclude variant paired with the plain token it delivers.
pub const EXCLUDE_TOKENS: [(u8, u8); N_EXCLUDES] = [
    (150, 101), // TOKEN_NUM* -> TOKEN_NUM
];

/// Dense scanner transitions, indexed `SCAN_TABLE[state][column]`.
pub const SCAN_TABLE: [[u8; SCAN_COLS]; N_SCAN_STATES] = [
    // 0: start
    [
        100, 100, 100, 100, 100, 100, 100, 100, 100, 100, 100, 100, 100, 100, 100, 100,
        1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 100, 100, 100, 100, 100, 100,
        100, 100, 100, 100, 100, 100, 100, 100, 100, 100, 100, 100, 100, 100, 100, 100,
        100, 100, 100, 100, 100, 100, 100, 100, 100, 100, 100, 100, 100, 100, 100, 100,
        100, 100, 100, 100, 100, 100, 100, 100, 100, 100, 100, 100, 100, 100, 100, 100,
        100, 100, 100, 100, 100, 100, 100, 100, 100, 100, 100, 100, 100, 100, 100, 100,
        100, 100,
    ],
    // 1: digit
    [
        150, 150, 150, 150, 150, 150, 150, 150, 150, 150, 150, 150, 150, 150, 150, 150,
        1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 150, 150, 150, 150, 150, 150,
        150, 150, 150, 150, 150, 150, 150, 150, 150, 150, 150, 150, 150, 150, 150, 150,
        150, 150, 150, 150, 150, 150, 150, 150, 150, 150, 150, 150, 150, 150, 150, 150,
        150, 150, 150, 150, 150, 150, 150, 150, 150, 150, 150, 150, 150, 150, 150, 150,
        150, 150, 150, 150, 150, 150, 150, 150, 150, 150, 150, 150, 150, 150, 150, 150,
        150, 150,
    ],
];

/// Table column for a scanner input, `None` meaning end of input.
///
/// Bytes outside the alphabet have no column; feed them to the error path
/// without indexing the table.
pub fn scan_col(sym: Option<u8>) -> Option<usize> {
    match sym {
        Some(b @ 0x20..=0x7e) => Some((b - 0x20) as usize),
        Some(b'\t') => Some(95),
        Some(b'\n') => Some(96),
        Some(_) => None,
        None => Some(97),
    }
}

/// Whether a scanner input belongs to the alphabet (`None`, the end of
/// input, always does).
pub fn is_scan_symbol(sym: Option<u8>) -> bool {
    scan_col(sym).is_some()
}

/// One scanner move from `state` over `sym` (`None` at end of input).
///
/// `None` is a scan error: an id that is not a scanner state, a byte
/// outside the alphabet, or a cell holding the scan-error token.
pub fn scan_step(state: u8, sym: Option<u8>) -> Option<u8> {
    let row = SCAN_TABLE.get(state as usize)?;
    let dest = row[scan_col(sym)?];
    if dest == SCAN_ERROR {
        None
    } else {
        Some(dest)
    }
}

/// Token delivered when scanning lands on `id`, with `true` when the
/// character that triggered the move is not part of the lexeme and must
/// be rescanned from the start state.
///
/// The scan-error id sits in the token band but delivers nothing.
pub fn scan_token(id: u8) -> Option<(u8, bool)> {
    if id == SCAN_ERROR {
        None
    } else if is_exclude(id) {
        Some((canonical_token(id), true))
    } else if is_token(id) {
        Some((id, false))
    } else {
        None
    }
}

/// Plain token behind an exclude variant; any other id passes through.
pub fn canonical_token(id: u8) -> u8 {
    EXCLUDE_TOKENS
        .iter()
        .find(|&&(exc, _)| exc == id)
        .map(|&(_, plain)| plain)
        .unwrap_or(id)
}

/// Production replacing `state` when `token` arrives, leftmost first.
///
/// The caller pushes the body onto its stack in reverse. `Some(&[])` is an
/// epsilon production; `None` means the pair has no rule and the input is
/// rejected.
pub fn parse_step(state: u8, token: u8) -> Option<&'static [u8]> {
    match (state, token) {
        (0, 101) => Some(&[101, 200]), // start :: TOKEN_NUM :: TOKEN_NUM, #MK_NUM
        (0, 255) => Some(&[]), // start :: EOF :: --
        _ => None,
    }
}

pub fn is_sub_state(id: u8) -> bool {
    id < SCAN_END_MIN
}

pub fn is_token(id: u8) -> bool {
    id >= SCAN_END_MIN && id < SCAN_EXCLUDE_MIN
}

pub fn is_exclude(id: u8) -> bool {
    id >= SCAN_EXCLUDE_MIN && id < ACTION_MIN
}

pub fn is_action(id: u8) -> bool {
    id >= ACTION_MIN && id < EOF
}
