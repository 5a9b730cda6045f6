//! Syntactic-to-semantic type resolution.
//!
//! Matching is case-insensitive throughout. The subtle part is the
//! prefix-collision rule: `TextConst`, `RecordRef`, `CodeunitRunner` and
//! friends start with a recognized type prefix but must resolve to
//! `Unknown`. After a prefix match, the next character must be
//! end-of-string, whitespace, `[`, or a digit; any letter disqualifies
//! the match entirely.

use cal_parser::ast::{DataType, VariableDecl};

use crate::ty::SemanticType;

/// Built-in scalar names, canonical spelling.
const PRIMITIVES: &[&str] = &[
    "Integer",
    "Decimal",
    "Boolean",
    "Date",
    "Time",
    "DateTime",
    "Char",
    "Byte",
    "GUID",
    "Duration",
    "BigInteger",
];

/// Resolution options. An explicit `is_temporary` wins over
/// `default_temporary`; the default applies only when no explicit flag is
/// in play. Temporary-ness only affects `Record` results.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResolveOptions {
    pub is_temporary: Option<bool>,
    pub default_temporary: bool,
}

/// Resolve a syntactic [`DataType`] to a [`SemanticType`].
pub fn resolve_type(data_type: &DataType, opts: &ResolveOptions) -> SemanticType {
    let name = data_type.type_name.trim();

    // ARRAY [..] OF .. -- placeholder element resolution.
    if let Some(rest) = strip_prefix_ci(name, "array") {
        if valid_after_prefix(rest) {
            return SemanticType::array();
        }
    }

    // Exact primitive names first, so `BigInteger` never falls into a
    // shorter prefix.
    for primitive in PRIMITIVES {
        if name.eq_ignore_ascii_case(primitive) {
            return SemanticType::primitive(*primitive);
        }
    }

    // `Decimal5` carries a length-like digit whose meaning is not pinned
    // down; it resolves to plain Decimal.
    if let Some(rest) = strip_prefix_ci(name, "decimal") {
        if !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit()) {
            return SemanticType::decimal();
        }
    }

    // Codeunit before Code: `Codeunit` must not be read as `Code` + "unit".
    if let Some(rest) = strip_prefix_ci(name, "codeunit") {
        if valid_after_prefix(rest) {
            let id = trailing_id(rest).or(data_type.table_id);
            return SemanticType::codeunit(id);
        }
    }

    if let Some(rest) = strip_prefix_ci(name, "code") {
        if valid_after_prefix(rest) {
            if let Some(max_length) = text_length(rest, data_type) {
                return SemanticType::code(max_length);
            }
        }
    }

    if let Some(rest) = strip_prefix_ci(name, "text") {
        if valid_after_prefix(rest) {
            if let Some(max_length) = text_length(rest, data_type) {
                return SemanticType::text(max_length);
            }
        }
    }

    if let Some(rest) = strip_prefix_ci(name, "record") {
        if valid_after_prefix(rest) {
            let table_id = trailing_id(rest).or(data_type.table_id);
            let is_temporary = opts.is_temporary.unwrap_or(opts.default_temporary);
            return SemanticType::record(table_id, is_temporary);
        }
    }

    if name.eq_ignore_ascii_case("option") {
        let values = data_type
            .option_string
            .as_deref()
            .unwrap_or("")
            .split(',')
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(String::from)
            .collect();
        return SemanticType::option(values);
    }

    SemanticType::unknown(format!("Unrecognized type: {}", data_type.type_name))
}

/// Resolve a variable declaration, folding in its own `TEMPORARY` marker
/// unless the options carry an explicit override.
pub fn resolve_variable_type(variable: &VariableDecl, opts: &ResolveOptions) -> SemanticType {
    let mut effective = *opts;
    if effective.is_temporary.is_none() && variable.is_temporary {
        effective.is_temporary = Some(true);
    }
    resolve_type(&variable.data_type, &effective)
}

// ── Prefix machinery ───────────────────────────────────────────────────

/// Case-insensitive prefix strip.
fn strip_prefix_ci<'a>(name: &'a str, prefix: &str) -> Option<&'a str> {
    if name.len() >= prefix.len() && name[..prefix.len()].eq_ignore_ascii_case(prefix) {
        Some(&name[prefix.len()..])
    } else {
        None
    }
}

/// The prefix-collision rule: after the prefix, only end-of-string,
/// whitespace, `[`, or a digit keeps the match alive.
fn valid_after_prefix(rest: &str) -> bool {
    match rest.chars().next() {
        None => true,
        Some(c) => c.is_ascii_digit() || c.is_whitespace() || c == '[',
    }
}

/// Parse a trailing object id: `18`, ` 18`.
fn trailing_id(rest: &str) -> Option<u32> {
    let trimmed = rest.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse().ok()
}

/// Length for Text/Code from the lexeme remainder or the structured
/// fields: `Text50` (digit suffix), `Text[50]` (bracketed), or the
/// parser-supplied `length`. Returns `None` (no match) when the remainder
/// is present but malformed.
fn text_length(rest: &str, data_type: &DataType) -> Option<Option<u32>> {
    let trimmed = rest.trim();
    if trimmed.is_empty() {
        return Some(data_type.length);
    }
    if trimmed.chars().all(|c| c.is_ascii_digit()) {
        return Some(trimmed.parse().ok());
    }
    if let Some(inner) = trimmed.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
        let inner = inner.trim();
        if inner.chars().all(|c| c.is_ascii_digit()) && !inner.is_empty() {
            return Some(inner.parse().ok());
        }
    }
    None
}
