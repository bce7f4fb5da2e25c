//! SQL dialect discriminator.

/// The database family a statement is rendered for.
///
/// Statements are written in MySQL syntax (`?` placeholders, backtick
/// identifiers, `LIMIT offset,count`). Other families only change the parts
/// that differ: identifier quoting, whether `LIMIT` is rendered, and how byte
/// strings are written as literals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dialect {
    #[default]
    MySql,
    Postgres,
}

impl Dialect {
    /// Identifier quote character.
    pub fn quote_char(self) -> char {
        match self {
            Dialect::MySql => '`',
            Dialect::Postgres => '"',
        }
    }

    /// Whether `LIMIT` fragments are rendered for this family.
    pub fn renders_limit(self) -> bool {
        matches!(self, Dialect::MySql)
    }

    /// Whether `INSERT ... ON DUPLICATE KEY UPDATE` is available.
    pub fn supports_upsert(self) -> bool {
        matches!(self, Dialect::MySql)
    }

    /// Prefix written before a quoted string literal.
    pub(crate) fn string_prefix(self) -> &'static str {
        match self {
            Dialect::MySql => "",
            Dialect::Postgres => "E",
        }
    }

    /// Append `ident` wrapped in the quote character.
    ///
    /// Embedded quote characters are doubled.
    pub(crate) fn write_ident(self, out: &mut String, ident: &str) {
        let q = self.quote_char();
        out.push(q);
        for c in ident.chars() {
            if c == q {
                out.push(q);
            }
            out.push(c);
        }
        out.push(q);
    }

    /// Append a byte string literal.
    pub(crate) fn write_bytes(self, out: &mut String, bytes: &[u8]) {
        use std::fmt::Write;

        match self {
            Dialect::MySql => out.push_str("X'"),
            Dialect::Postgres => out.push_str("'\\x"),
        }
        for b in bytes {
            let _ = write!(out, "{b:02x}");
        }
        match self {
            Dialect::MySql => out.push('\''),
            Dialect::Postgres => out.push_str("'::bytea"),
        }
    }
}
