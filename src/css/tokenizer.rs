//! logos-based CSS tokenizer.
//!
//! Token priority in logos is determined by:
//! 1. Longest match wins (e.g. `#main` as [`Token::Hash`] beats a lone `#`)
//! 2. For equal length matches, earlier-defined variants win
//!
//! The parsers never rebuild text from tokens. They slice the source with the
//! byte spans kept in [`SpannedToken`], so values and at-rules come out exactly
//! as written.

use logos::Logos;

/// CSS token produced by the lexer.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\n\r\f]+")]
pub enum Token {
    // ── Compound tokens (longer matches, defined first) ──────────────

    /// `!important` flag, with optional whitespace after the `!`.
    #[regex(r"![ \t\n\r\f]*[iI][mM][pP][oO][rR][tT][aA][nN][tT]")]
    Important,

    /// At-keyword: `@media`, `@font-face`, `@import`.
    #[regex(r"@-?[a-zA-Z_][a-zA-Z0-9_-]*")]
    AtKeyword,

    /// Hash: `#main`, `#fff`. Used for id selectors and hex colors alike.
    #[regex(r"#([a-zA-Z0-9_-]|[^\x00-\x7F]|\\[^\n])+")]
    Hash,

    /// Quoted string literal, either quote style.
    #[regex(r#""([^"\\\n]|\\[^\n])*""#)]
    #[regex(r"'([^'\\\n]|\\[^\n])*'")]
    Str,

    /// Unquoted `url(...)`, kept whole so `//` and `:` inside it stay opaque.
    #[regex(r#"[uU][rR][lL]\([^)"'\n]*\)"#)]
    Url,

    /// Number, percentage or dimension: `10`, `-1.5em`, `50%`, `.5s`.
    #[regex(r"-?([0-9]+(\.[0-9]+)?|\.[0-9]+)([a-zA-Z%]+)?")]
    Number,

    /// Identifier: property names, type selectors, class names, keywords.
    #[regex(r"(--|-?([a-zA-Z_]|[^\x00-\x7F]|\\[^\n]))([a-zA-Z0-9_-]|[^\x00-\x7F]|\\[^\n])*")]
    Ident,

    /// `<!--`, tolerated at the top level of a `<style>` block.
    #[token("<!--")]
    Cdo,

    /// `-->`
    #[token("-->")]
    Cdc,

    // ── Single-character punctuation ─────────────────────────────────

    /// `{`
    #[token("{")]
    BraceOpen,

    /// `}`
    #[token("}")]
    BraceClose,

    /// `(`
    #[token("(")]
    ParenOpen,

    /// `)`
    #[token(")")]
    ParenClose,

    /// `[`
    #[token("[")]
    BracketOpen,

    /// `]`
    #[token("]")]
    BracketClose,

    /// `:`
    #[token(":")]
    Colon,

    /// `;`
    #[token(";")]
    Semicolon,

    /// `,`
    #[token(",")]
    Comma,

    /// `.`
    #[token(".")]
    Dot,

    /// `*`
    #[token("*")]
    Star,

    /// `>`
    #[token(">")]
    GreaterThan,

    /// `+`
    #[token("+")]
    Plus,

    /// `~`
    #[token("~")]
    Tilde,

    /// `=`
    #[token("=")]
    Equals,

    /// `|`
    #[token("|")]
    Pipe,

    /// `^`
    #[token("^")]
    Caret,

    /// `$`
    #[token("$")]
    Dollar,

    /// Any other single character. Characters the lexer cannot classify are
    /// reported as `Delim` too.
    #[token("!")]
    #[token("%")]
    #[token("&")]
    #[token("/")]
    #[token("?")]
    #[token("@")]
    #[token("#")]
    #[token("<")]
    #[token("\\")]
    #[token("-")]
    Delim,
}

impl Token {
    /// Whether this token opens a `()`, `[]` or `{}` block.
    pub fn opens_block(self) -> bool {
        matches!(self, Token::ParenOpen | Token::BracketOpen | Token::BraceOpen)
    }

    /// Whether this token closes a `()`, `[]` or `{}` block.
    pub fn closes_block(self) -> bool {
        matches!(self, Token::ParenClose | Token::BracketClose | Token::BraceClose)
    }
}

/// A token with its index in the stream and its byte span in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpannedToken {
    pub token: Token,
    /// Index in the token stream (for error reporting).
    pub pos: usize,
    /// Byte offset where this token starts in the source.
    pub start: usize,
    /// Byte offset where this token ends in the source.
    pub end: usize,
}

impl SpannedToken {
    /// The source text covered by this token.
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start..self.end]
    }
}

/// Tokenize `input`, keeping byte spans.
///
/// Lexer errors become [`Token::Delim`] so that no source byte is silently
/// dropped from the stream.
pub fn tokenize(input: &str) -> Vec<SpannedToken> {
    Token::lexer(input)
        .spanned()
        .enumerate()
        .map(|(pos, (result, span))| SpannedToken {
            token: result.unwrap_or(Token::Delim),
            pos,
            start: span.start,
            end: span.end,
        })
        .collect()
}

/// Strip CSS block comments (`/* ... */`), replacing each with a single space.
///
/// Comment markers inside quoted strings are left alone.
pub fn strip_comments(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut rest = input;
    let mut quote: Option<char> = None;

    while let Some(ch) = rest.chars().next() {
        match quote {
            Some(q) => {
                if ch == '\\' {
                    let escaped = rest[1..].chars().next().map_or(0, char::len_utf8);
                    result.push_str(&rest[..1 + escaped]);
                    rest = &rest[1 + escaped..];
                    continue;
                }
                if ch == q {
                    quote = None;
                }
            }
            None => {
                if rest.starts_with("/*") {
                    // Unterminated comments consume the rest of the input.
                    rest = rest[2..].find("*/").map_or("", |end| &rest[2 + end + 2..]);
                    result.push(' ');
                    continue;
                }
                if ch == '"' || ch == '\'' {
                    quote = Some(ch);
                }
            }
        }
        result.push(ch);
        rest = &rest[ch.len_utf8()..];
    }

    result
}

/// Decode CSS escapes (`\:`, `\31 `, `\"`) in an identifier or string body.
pub fn unescape(input: &str) -> String {
    if !input.contains('\\') {
        return input.to_owned();
    }

    let mut result = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            result.push(ch);
            continue;
        }
        let mut hex = String::new();
        while hex.len() < 6 {
            match chars.peek() {
                Some(c) if c.is_ascii_hexdigit() => {
                    hex.push(*c);
                    chars.next();
                }
                _ => break,
            }
        }
        if hex.is_empty() {
            if let Some(next) = chars.next() {
                result.push(next);
            }
            continue;
        }
        // A single whitespace terminates a hex escape.
        if chars.peek().is_some_and(|c| c.is_ascii_whitespace()) {
            chars.next();
        }
        let decoded = u32::from_str_radix(&hex, 16)
            .ok()
            .and_then(char::from_u32)
            .unwrap_or(char::REPLACEMENT_CHARACTER);
        result.push(decoded);
    }
    result
}
