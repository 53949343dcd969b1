//! Recursive descent CSS parser.
//!
//! Parses CSS text into a [`StyleSheet`] of qualified rules and verbatim
//! at-rules. Uses the logos-based tokenizer from [`crate::css::tokenizer`] and
//! slices the comment-stripped source for selector, value and at-rule text.

use crate::css::model::*;
use crate::css::tokenizer::{strip_comments, tokenize, SpannedToken, Token};

/// Errors from CSS parsing.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("unexpected token at position {position}: {message}")]
    UnexpectedToken { position: usize, message: String },
    #[error("unexpected end of input: {0}")]
    UnexpectedEof(String),
}

/// Parse a CSS string into a [`StyleSheet`].
pub fn parse_stylesheet(input: &str) -> Result<StyleSheet, ParseError> {
    let mut parser = Parser::new(input);
    let mut sheet = StyleSheet::new();
    let rules = &mut sheet.rules;

    while let Some(tok) = parser.peek() {
        match tok.token {
            // HTML comment markers and stray semicolons between rules.
            Token::Cdo | Token::Cdc | Token::Semicolon => {
                parser.advance();
            }
            Token::AtKeyword => rules.push(Rule::At(parser.parse_at_rule()?)),
            Token::BraceClose => {
                return Err(parser.unexpected(tok, "'}' without a matching '{'"));
            }
            _ => rules.push(Rule::Qualified(parser.parse_qualified_rule()?)),
        }
    }

    Ok(sheet)
}

/// Parse the body of a `style="..."` attribute: declarations without braces.
pub fn parse_declaration_list(input: &str) -> Result<Vec<Declaration>, ParseError> {
    let mut parser = Parser::new(input);
    parser.parse_declarations(false)
}

/// Recursive descent parser state.
struct Parser {
    source: String,
    tokens: Vec<SpannedToken>,
    cursor: usize,
}

impl Parser {
    fn new(input: &str) -> Self {
        let source = strip_comments(input);
        let tokens = tokenize(&source);
        Self {
            source,
            tokens,
            cursor: 0,
        }
    }

    fn peek(&self) -> Option<SpannedToken> {
        self.tokens.get(self.cursor).copied()
    }

    fn advance(&mut self) -> Option<SpannedToken> {
        let tok = self.peek()?;
        self.cursor += 1;
        Some(tok)
    }

    fn expect(&mut self, expected: Token) -> Result<SpannedToken, ParseError> {
        match self.advance() {
            Some(tok) if tok.token == expected => Ok(tok),
            Some(tok) => Err(self.unexpected(tok, &format!("expected {expected:?}"))),
            None => Err(ParseError::UnexpectedEof(format!("expected {expected:?}"))),
        }
    }

    fn unexpected(&self, tok: SpannedToken, message: &str) -> ParseError {
        ParseError::UnexpectedToken {
            position: tok.pos,
            message: format!("{message}, got {:?} '{}'", tok.token, tok.text(&self.source)),
        }
    }

    fn slice(&self, start: usize, end: usize) -> &str {
        self.source[start..end].trim()
    }

    /// Parse an at-rule, keeping its full text.
    ///
    /// A statement at-rule ends at the first top-level `;`; a block at-rule
    /// ends at the `}` closing its first top-level block.
    fn parse_at_rule(&mut self) -> Result<AtRule, ParseError> {
        let keyword = self.expect(Token::AtKeyword)?;
        let name = keyword.text(&self.source)[1..].to_string();
        let mut depth = 0usize;
        let mut end = self.source.len();

        while let Some(tok) = self.advance() {
            match tok.token {
                Token::Semicolon if depth == 0 => {
                    end = tok.end;
                    break;
                }
                t if t.opens_block() => depth += 1,
                t if t.closes_block() => {
                    if depth == 0 {
                        return Err(self.unexpected(tok, &format!("unbalanced block in @{name}")));
                    }
                    depth -= 1;
                    if depth == 0 && t == Token::BraceClose {
                        end = tok.end;
                        break;
                    }
                }
                _ => {}
            }
        }

        if depth > 0 {
            return Err(ParseError::UnexpectedEof(format!(
                "unterminated block in @{name}"
            )));
        }

        let raw = self.source[keyword.start..end].trim_end().to_string();
        Ok(AtRule { name, raw })
    }

    /// Parse a qualified rule: selector list `{` declarations `}`.
    fn parse_qualified_rule(&mut self) -> Result<QualifiedRule, ParseError> {
        let selectors = self.parse_selector_list()?;
        self.expect(Token::BraceOpen)?;
        let declarations = self.parse_declarations(true)?;
        self.expect(Token::BraceClose)?;

        Ok(QualifiedRule {
            selectors,
            declarations,
        })
    }

    /// Read the prelude up to the rule's `{`, splitting on top-level commas.
    fn parse_selector_list(&mut self) -> Result<Vec<String>, ParseError> {
        let Some(first) = self.peek() else {
            return Err(ParseError::UnexpectedEof("expected selector".into()));
        };
        let mut selectors = Vec::new();
        let mut segment_start = first.start;
        let mut depth = 0usize;

        loop {
            let Some(tok) = self.peek() else {
                return Err(ParseError::UnexpectedEof(
                    "expected '{' after selector".into(),
                ));
            };
            match tok.token {
                Token::BraceOpen if depth == 0 => {
                    self.push_selector(&mut selectors, segment_start, tok.start, tok)?;
                    return Ok(selectors);
                }
                Token::Comma if depth == 0 => {
                    self.push_selector(&mut selectors, segment_start, tok.start, tok)?;
                    segment_start = tok.end;
                }
                Token::Semicolon | Token::BraceClose if depth == 0 => {
                    return Err(self.unexpected(tok, "expected '{' after selector"));
                }
                t if t.opens_block() => depth += 1,
                t if t.closes_block() => depth = depth.saturating_sub(1),
                _ => {}
            }
            self.advance();
        }
    }

    fn push_selector(
        &self,
        selectors: &mut Vec<String>,
        start: usize,
        end: usize,
        at: SpannedToken,
    ) -> Result<(), ParseError> {
        let text = self.slice(start, end);
        if text.is_empty() {
            return Err(self.unexpected(at, "empty selector"));
        }
        selectors.push(text.to_string());
        Ok(())
    }

    /// Parse declarations until `}` (inside a block) or end of input.
    fn parse_declarations(&mut self, in_block: bool) -> Result<Vec<Declaration>, ParseError> {
        let mut declarations = Vec::new();

        loop {
            match self.peek() {
                None if in_block => {
                    return Err(ParseError::UnexpectedEof("expected '}'".into()));
                }
                None => break,
                Some(tok) if tok.token == Token::BraceClose => {
                    if in_block {
                        break;
                    }
                    return Err(self.unexpected(tok, "'}' outside of a block"));
                }
                Some(tok) if tok.token == Token::Semicolon => {
                    self.advance();
                }
                Some(_) => declarations.push(self.parse_declaration()?),
            }
        }

        Ok(declarations)
    }

    /// Parse a single declaration: `property: value [!important];`
    fn parse_declaration(&mut self) -> Result<Declaration, ParseError> {
        let prop_tok = self
            .advance()
            .ok_or_else(|| ParseError::UnexpectedEof("expected property name".into()))?;
        if prop_tok.token != Token::Ident {
            return Err(self.unexpected(prop_tok, "expected property name"));
        }
        let name = prop_tok.text(&self.source);
        let property = if name.starts_with("--") {
            name.to_string()
        } else {
            name.to_ascii_lowercase()
        };

        let colon = self.expect(Token::Colon)?;

        // Value runs to the first top-level `;` or `}`; `!important` cuts it short.
        let mut depth = 0usize;
        let mut value_end = None;
        let mut important = false;
        let mut end = self.source.len();

        while let Some(tok) = self.peek() {
            match tok.token {
                Token::Semicolon | Token::BraceClose if depth == 0 => {
                    end = tok.start;
                    break;
                }
                Token::Important if depth == 0 => {
                    important = true;
                    value_end.get_or_insert(tok.start);
                }
                t if t.opens_block() => depth += 1,
                t if t.closes_block() => depth = depth.saturating_sub(1),
                _ => {}
            }
            self.advance();
        }

        let value = self.slice(colon.end, value_end.unwrap_or(end));
        // Custom properties may hold an empty value.
        if value.is_empty() && !property.starts_with("--") {
            return Err(ParseError::UnexpectedToken {
                position: colon.pos,
                message: format!("empty value for property '{property}'"),
            });
        }
        let value = value.to_string();

        if self.peek().is_some_and(|t| t.token == Token::Semicolon) {
            self.advance();
        }

        Ok(Declaration {
            property,
            value,
            important,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(input: &str) -> StyleSheet {
        parse_stylesheet(input).unwrap()
    }

    fn first_rule(input: &str) -> QualifiedRule {
        match parse(input).rules.into_iter().next() {
            Some(Rule::Qualified(rule)) => rule,
            other => panic!("expected a qualified rule, got {other:?}"),
        }
    }

    #[test]
    fn parse_simple_rule() {
        let rule = first_rule("p { color: red; }");
        assert_eq!(rule.selectors, vec!["p".to_string()]);
        assert_eq!(rule.declarations, vec![Declaration::new("color", "red", false)]);
    }

    #[test]
    fn parse_compact_rule() {
        let rule = first_rule("p{color:red}");
        assert_eq!(rule.selectors, vec!["p".to_string()]);
        assert_eq!(rule.declarations, vec![Declaration::new("color", "red", false)]);
    }

    #[test]
    fn parse_multiple_selectors() {
        let rule = first_rule("h1,  h2 > span , a:hover { margin: 0 }");
        assert_eq!(rule.selectors, vec!["h1", "h2 > span", "a:hover"]);
    }

    #[test]
    fn parse_comma_inside_attribute_is_not_a_separator() {
        let rule = first_rule(r#"a[title="x,y"] { color: red }"#);
        assert_eq!(rule.selectors, vec![r#"a[title="x,y"]"#]);
    }

    #[test]
    fn parse_multiple_declarations() {
        let rule = first_rule("td { padding: 4px 8px; border: 1px solid #ccc; font-family: 'Helvetica Neue', Arial }");
        assert_eq!(
            rule.declarations,
            vec![
                Declaration::new("padding", "4px 8px", false),
                Declaration::new("border", "1px solid #ccc", false),
                Declaration::new("font-family", "'Helvetica Neue', Arial", false),
            ]
        );
    }

    #[test]
    fn parse_important() {
        let rule = first_rule(".a { color: red !important; margin: 0 ! important }");
        assert_eq!(
            rule.declarations,
            vec![
                Declaration::new("color", "red", true),
                Declaration::new("margin", "0", true),
            ]
        );
    }

    #[test]
    fn parse_value_with_semicolon_in_url() {
        let rule = first_rule("div { background: url(data:image/png;base64,AAAA) no-repeat; }");
        assert_eq!(
            rule.declarations[0].value,
            "url(data:image/png;base64,AAAA) no-repeat"
        );
    }

    #[test]
    fn parse_property_is_lowercased() {
        let rule = first_rule("p { COLOR: Red; --Brand: Blue }");
        assert_eq!(rule.declarations[0].property, "color");
        assert_eq!(rule.declarations[0].value, "Red");
        assert_eq!(rule.declarations[1].property, "--Brand");
    }

    #[test]
    fn parse_with_comments() {
        let sheet = parse("/* header */ p { /* inside */ color: red; } /* trailer */");
        assert_eq!(sheet.rules.len(), 1);
    }

    #[test]
    fn parse_html_comment_markers() {
        let sheet = parse("<!-- p { color: red } -->");
        assert_eq!(sheet.rules.len(), 1);
    }

    #[test]
    fn parse_media_at_rule_verbatim() {
        let input = "@media (max-width: 600px) { p { color: red } .x { margin: 0 } }\np { color: blue }";
        let sheet = parse(input);
        assert_eq!(sheet.rules.len(), 2);
        assert_eq!(
            sheet.rules[0],
            Rule::At(AtRule {
                name: "media".into(),
                raw: "@media (max-width: 600px) { p { color: red } .x { margin: 0 } }".into(),
            })
        );
    }

    #[test]
    fn parse_statement_at_rule() {
        let sheet = parse("@import url(foo.css);\n@charset \"utf-8\";");
        assert_eq!(
            sheet.rules,
            vec![
                Rule::At(AtRule {
                    name: "import".into(),
                    raw: "@import url(foo.css);".into(),
                }),
                Rule::At(AtRule {
                    name: "charset".into(),
                    raw: "@charset \"utf-8\";".into(),
                }),
            ]
        );
    }

    #[test]
    fn parse_empty_input() {
        assert!(parse("").rules.is_empty());
        assert!(parse("   \n ").rules.is_empty());
    }

    #[test]
    fn parse_empty_block() {
        let rule = first_rule("p {}");
        assert!(rule.declarations.is_empty());
    }

    #[test]
    fn parse_unclosed_brace() {
        assert!(matches!(
            parse_stylesheet("p { color: red"),
            Err(ParseError::UnexpectedEof(_))
        ));
    }

    #[test]
    fn parse_missing_block() {
        assert!(matches!(
            parse_stylesheet("p color: red"),
            Err(ParseError::UnexpectedEof(_))
        ));
    }

    #[test]
    fn parse_stray_close_brace() {
        assert!(matches!(
            parse_stylesheet("} p { color: red }"),
            Err(ParseError::UnexpectedToken { .. })
        ));
    }

    #[test]
    fn parse_empty_selector_in_list() {
        assert!(parse_stylesheet("p, { color: red }").is_err());
    }

    #[test]
    fn parse_missing_colon() {
        assert!(parse_stylesheet("p { color red }").is_err());
    }

    #[test]
    fn parse_empty_value() {
        assert!(parse_stylesheet("p { color: ; }").is_err());
    }

    #[test]
    fn parse_empty_custom_property_value() {
        let rule = first_rule("p { --x:; --Y: ; color: red }");
        assert_eq!(
            rule.declarations,
            vec![
                Declaration::new("--x", "", false),
                Declaration::new("--Y", "", false),
                Declaration::new("color", "red", false),
            ]
        );
    }

    #[test]
    fn parse_unterminated_media_block() {
        assert!(matches!(
            parse_stylesheet("@media print { p { color: red }"),
            Err(ParseError::UnexpectedEof(_))
        ));
    }

    // ── Declaration lists ────────────────────────────────────────────

    #[test]
    fn declaration_list_from_style_attribute() {
        let decls = parse_declaration_list("color: red; font-weight:bold").unwrap();
        assert_eq!(
            decls,
            vec![
                Declaration::new("color", "red", false),
                Declaration::new("font-weight", "bold", false),
            ]
        );
    }

    #[test]
    fn declaration_list_rejects_braces() {
        assert!(parse_declaration_list("color: red; }").is_err());
    }
}
