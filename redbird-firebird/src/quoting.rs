//! Identifier quoting and the bridge between canonical (lower case) and native (upper case)
//! names.

use regex::Regex;
use redbird_core::SqlLiteral;
use std::{borrow::Cow, fmt::Write, sync::LazyLock};
use time::{Date, OffsetDateTime, PrimitiveDateTime, Time, UtcOffset};

/// Longest identifier the server accepts, in bytes.
pub const MAX_IDENTIFIER_LENGTH: usize = 31;

/// Words that collide with column names commonly produced by the ORM.
static RESERVED_IN_FRAGMENTS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:position|value|count)\b").expect("the reserved words pattern is valid")
});

/// Reserved words of the dialect, upper case.
const RESERVED_WORDS: &[&str] = &[
    "ADD", "ADMIN", "ALL", "ALTER", "AND", "ANY", "AS", "AT", "AVG", "BEGIN", "BETWEEN",
    "BIGINT", "BLOB", "BOOLEAN", "BOTH", "BY", "CASE", "CAST", "CHAR", "CHARACTER", "CHECK",
    "CLOSE", "COLLATE", "COLUMN", "COMMIT", "CONNECT", "CONSTRAINT", "COUNT", "CREATE",
    "CROSS", "CURRENT", "CURRENT_DATE", "CURRENT_ROLE", "CURRENT_TIME", "CURRENT_TIMESTAMP",
    "CURRENT_USER", "CURSOR", "DATE", "DAY", "DEC", "DECIMAL", "DECLARE", "DEFAULT", "DELETE",
    "DISCONNECT", "DISTINCT", "DOUBLE", "DROP", "ELSE", "END", "ESCAPE", "EXECUTE", "EXISTS",
    "EXTERNAL", "EXTRACT", "FALSE", "FETCH", "FILTER", "FLOAT", "FOR", "FOREIGN", "FROM",
    "FULL", "FUNCTION", "GDSCODE", "GLOBAL", "GRANT", "GROUP", "HAVING", "HOUR", "IN", "INDEX",
    "INNER", "INSENSITIVE", "INSERT", "INT", "INTEGER", "INTO", "IS", "JOIN", "LEADING",
    "LEFT", "LIKE", "LONG", "LOWER", "MAX", "MERGE", "MIN", "MINUTE", "MONTH", "NATIONAL",
    "NATURAL", "NCHAR", "NO", "NOT", "NULL", "NUMERIC", "OF", "OFFSET", "ON", "ONLY", "OPEN",
    "OR", "ORDER", "OUTER", "PARAMETER", "PLAN", "POSITION", "POST_EVENT", "PRECISION",
    "PRIMARY", "PROCEDURE", "RECORD_VERSION", "RECREATE", "REFERENCES", "RELEASE", "RETURNING",
    "REVOKE", "RIGHT", "ROLLBACK", "ROW_COUNT", "ROWS", "SAVEPOINT", "SECOND", "SELECT",
    "SENSITIVE", "SET", "SIMILAR", "SMALLINT", "SOME", "START", "SUM", "TABLE", "THEN", "TIME",
    "TIMESTAMP", "TO", "TRAILING", "TRIGGER", "TRIM", "TRUE", "UNION", "UNIQUE", "UNKNOWN",
    "UPDATE", "UPPER", "USER", "USING", "VALUE", "VALUES", "VARCHAR", "VARIABLE", "VARYING",
    "VIEW", "WHEN", "WHERE", "WHILE", "WITH", "YEAR",
];

pub fn is_reserved_word(name: &str) -> bool {
    RESERVED_WORDS
        .iter()
        .any(|v| v.eq_ignore_ascii_case(name))
}

/// Letter first, then letters, digits, `_` or `$`, not reserved and within the length limit.
pub fn is_plain_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    first.is_ascii_alphabetic()
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
        && name.len() <= MAX_IDENTIFIER_LENGTH
        && !is_reserved_word(name)
}

/// `"NAME"` with embedded quotes doubled.
pub fn quote_identifier(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 2);
    out.push('"');
    for c in name.to_uppercase().chars() {
        if c == '"' {
            out.push('"');
        }
        out.push(c);
    }
    out.push('"');
    out
}

/// Upper-cased identifier, quoted unless `always_quote` is off and the name is plain.
pub fn format_identifier(name: &str, always_quote: bool) -> String {
    if !always_quote && is_plain_identifier(name) {
        name.to_uppercase()
    } else {
        quote_identifier(name)
    }
}

/// `schema.table` quoted part by part.
pub fn format_table_name(name: &str, always_quote: bool) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, part) in name.split('.').enumerate() {
        if i > 0 {
            out.push('.');
        }
        out.push_str(&format_identifier(part, always_quote));
    }
    out
}

/// Content of a string literal, single quotes doubled.
pub fn quote_string(value: &str) -> String {
    value.replace('\'', "''")
}

/// Native names come back upper case, those without any lower case letter are folded down.
pub fn dialect_to_canonical(name: &str) -> Cow<'_, str> {
    if name.chars().any(char::is_lowercase) {
        Cow::Borrowed(name)
    } else {
        Cow::Owned(name.to_lowercase())
    }
}

pub fn canonical_to_dialect(name: &str) -> String {
    name.to_uppercase()
}

/// `'DD.MM.YYYY'`
pub fn quoted_date(value: &Date) -> String {
    format!(
        "'{:02}.{:02}.{:04}'",
        value.day(),
        value.month() as u8,
        value.year()
    )
}

pub fn quoted_time(value: &Time) -> String {
    format!(
        "'{:02}:{:02}:{:02}'",
        value.hour(),
        value.minute(),
        value.second()
    )
}

/// `'DD.MM.YYYY HH:MM:SS'`, the value is taken as local time already.
pub fn quoted_timestamp(value: &PrimitiveDateTime) -> String {
    let mut out = String::with_capacity(21);
    let _ = write!(
        out,
        "'{:02}.{:02}.{:04} {:02}:{:02}:{:02}'",
        value.day(),
        value.month() as u8,
        value.year(),
        value.hour(),
        value.minute(),
        value.second()
    );
    out
}

/// Like [`quoted_timestamp`] after converting the instant to the local offset.
///
/// When the local offset cannot be determined the value keeps its own offset.
pub fn quoted_local_timestamp(value: &OffsetDateTime) -> String {
    let local = UtcOffset::current_local_offset()
        .map(|offset| value.to_offset(offset))
        .unwrap_or(*value);
    quoted_timestamp(&PrimitiveDateTime::new(local.date(), local.time()))
}

/// Quote the reserved words `position`, `value` and `count` appearing as bare tokens.
///
/// A token preceded by `"`, or followed by `"` or `(`, is left alone so quoted names and
/// function calls such as `count(*)` survive. String literals are copied verbatim.
pub fn escape_reserved_words(sql: &str) -> String {
    let mut out = String::with_capacity(sql.len() + 8);
    let mut rest = sql;
    while let Some(start) = rest.find('\'') {
        escape_segment(&mut out, &rest[..start]);
        let literal = &rest[start..];
        let end = closing_quote(literal);
        out.push_str(&literal[..end]);
        rest = &literal[end..];
    }
    escape_segment(&mut out, rest);
    out
}

/// Byte index right after the literal starting at `literal[0]`.
fn closing_quote(literal: &str) -> usize {
    let bytes = literal.as_bytes();
    let mut i = 1;
    while i < bytes.len() {
        if bytes[i] == b'\'' {
            if bytes.get(i + 1) == Some(&b'\'') {
                i += 2;
                continue;
            }
            return i + 1;
        }
        i += 1;
    }
    bytes.len()
}

fn escape_segment(out: &mut String, segment: &str) {
    let mut position = 0;
    for found in RESERVED_IN_FRAGMENTS.find_iter(segment) {
        let before = segment[..found.start()].chars().next_back();
        let after = segment[found.end()..].chars().next();
        if before == Some('"') || matches!(after, Some('"' | '(')) {
            continue;
        }
        out.push_str(&segment[position..found.start()]);
        out.push_str(&quote_identifier(found.as_str()));
        position = found.end();
    }
    out.push_str(&segment[position..]);
}

/// Build a pre-rendered fragment, reserved words escaped once here.
pub fn sql(fragment: impl AsRef<str>) -> SqlLiteral {
    SqlLiteral::new(escape_reserved_words(fragment.as_ref()))
}
