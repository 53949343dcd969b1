//! Selector parser: selector text to [`Selector`].
//!
//! Selectors arrive as text (one entry of a rule's selector list) and are only
//! parsed when they need to be matched or weighed.

use crate::css::model::*;
use crate::css::parser::ParseError;
use crate::css::tokenizer::{strip_comments, tokenize, unescape, SpannedToken, Token};

/// Parse a single complex selector such as `table.data > tr:first-child td`.
pub fn parse_selector(input: &str) -> Result<Selector, ParseError> {
    let source = strip_comments(input);
    let tokens = tokenize(&source);
    let mut parser = SelectorParser {
        source: &source,
        tokens,
        cursor: 0,
    };
    parser.parse_selector()
}

/// Parse a comma-separated selector list, as found inside `:not(...)`.
pub fn parse_selector_list(input: &str) -> Result<Vec<Selector>, ParseError> {
    let source = strip_comments(input);
    let mut selectors = Vec::new();
    let mut depth = 0usize;
    let mut segment_start = 0;

    for tok in tokenize(&source) {
        match tok.token {
            Token::Comma if depth == 0 => {
                selectors.push(parse_selector(&source[segment_start..tok.start])?);
                segment_start = tok.end;
            }
            t if t.opens_block() => depth += 1,
            t if t.closes_block() => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    selectors.push(parse_selector(&source[segment_start..])?);
    Ok(selectors)
}

struct SelectorParser<'a> {
    source: &'a str,
    tokens: Vec<SpannedToken>,
    cursor: usize,
}

impl<'a> SelectorParser<'a> {
    fn peek(&self) -> Option<SpannedToken> {
        self.tokens.get(self.cursor).copied()
    }

    fn advance(&mut self) -> Option<SpannedToken> {
        let tok = self.peek()?;
        self.cursor += 1;
        Some(tok)
    }

    fn text(&self, tok: SpannedToken) -> &'a str {
        tok.text(self.source)
    }

    fn current_pos(&self) -> usize {
        self.peek().map_or(self.tokens.len(), |t| t.pos)
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        match self.peek() {
            Some(tok) => ParseError::UnexpectedToken {
                position: tok.pos,
                message: format!("{}, got '{}'", message.into(), self.text(tok)),
            },
            None => ParseError::UnexpectedEof(message.into()),
        }
    }

    /// Returns `true` if the current token touches the previous one (no whitespace).
    fn is_adjacent(&self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        let prev = self.tokens[self.cursor - 1];
        self.peek().is_some_and(|curr| curr.start == prev.end)
    }

    fn next_is(&self, token: Token) -> bool {
        self.peek().is_some_and(|t| t.token == token)
    }

    /// Expect an identifier touching the previous token and return its text.
    fn expect_adjacent_ident(&mut self, what: &str) -> Result<&'a str, ParseError> {
        if !self.is_adjacent() || !self.next_is(Token::Ident) {
            return Err(self.error(format!("expected {what}")));
        }
        let tok = self.advance().ok_or_else(|| self.error(format!("expected {what}")))?;
        Ok(self.text(tok))
    }

    fn parse_selector(&mut self) -> Result<Selector, ParseError> {
        let mut parts = vec![SelectorPart::Compound(self.parse_compound()?)];

        while let Some(tok) = self.peek() {
            let combinator = match tok.token {
                Token::GreaterThan => Some(Combinator::Child),
                Token::Plus => Some(Combinator::NextSibling),
                Token::Tilde => Some(Combinator::SubsequentSibling),
                _ => None,
            };
            let combinator = match combinator {
                Some(combinator) => {
                    self.advance();
                    combinator
                }
                // A compound start after whitespace is a descendant combinator;
                // an adjacent one would already have been consumed.
                None if starts_compound(tok.token) && !self.is_adjacent() => {
                    Combinator::Descendant
                }
                None => return Err(self.error("expected combinator or end of selector")),
            };
            parts.push(SelectorPart::Combinator(combinator));
            parts.push(SelectorPart::Compound(self.parse_compound()?));
        }

        Ok(Selector { parts })
    }

    /// Parse a compound selector such as `a.button[href]:first-child`.
    fn parse_compound(&mut self) -> Result<CompoundSelector, ParseError> {
        let mut compound = CompoundSelector::new();

        match self.peek().map(|t| t.token) {
            Some(Token::Ident) => {
                let tok = self.advance().ok_or_else(|| self.error("expected type"))?;
                compound.push(SelectorComponent::Type(
                    unescape(self.text(tok)).to_ascii_lowercase(),
                ));
            }
            Some(Token::Star) => {
                self.advance();
                compound.push(SelectorComponent::Universal);
            }
            Some(t) if starts_compound(t) => {}
            _ => return Err(self.error("expected selector")),
        }

        // Subclass selectors must touch the previous token.
        loop {
            let first = compound.components.is_empty();
            if !first && !self.is_adjacent() {
                break;
            }
            let Some(tok) = self.peek() else { break };
            match tok.token {
                Token::Dot => {
                    self.advance();
                    let name = self.expect_adjacent_ident("class name after '.'")?;
                    compound.push(SelectorComponent::Class(unescape(name)));
                }
                Token::Hash => {
                    self.advance();
                    compound.push(SelectorComponent::Id(unescape(&self.text(tok)[1..])));
                }
                Token::BracketOpen => {
                    self.advance();
                    compound.push(SelectorComponent::Attribute(self.parse_attribute()?));
                }
                Token::Colon => {
                    self.advance();
                    compound.push(self.parse_pseudo()?);
                }
                _ if first => return Err(self.error("expected selector")),
                _ => break,
            }
        }

        Ok(compound)
    }

    /// Parse the inside of `[...]`; the `[` is already consumed.
    fn parse_attribute(&mut self) -> Result<AttributeSelector, ParseError> {
        let name = match self.advance() {
            Some(tok) if tok.token == Token::Ident => unescape(self.text(tok)).to_ascii_lowercase(),
            _ => return Err(self.error("expected attribute name")),
        };

        let operator = match self.peek().map(|t| t.token) {
            Some(Token::BracketClose) => {
                self.advance();
                return Ok(AttributeSelector {
                    name,
                    condition: None,
                    case_insensitive: false,
                });
            }
            Some(Token::Equals) => {
                self.advance();
                AttributeOperator::Equals
            }
            Some(prefix) => {
                let operator = match prefix {
                    Token::Tilde => AttributeOperator::Includes,
                    Token::Pipe => AttributeOperator::DashMatch,
                    Token::Caret => AttributeOperator::Prefix,
                    Token::Dollar => AttributeOperator::Suffix,
                    Token::Star => AttributeOperator::Substring,
                    _ => return Err(self.error("expected attribute operator")),
                };
                self.advance();
                if !self.is_adjacent() || !self.next_is(Token::Equals) {
                    return Err(self.error("expected '=' in attribute operator"));
                }
                self.advance();
                operator
            }
            None => return Err(self.error("expected ']'")),
        };

        let value = match self.advance() {
            Some(tok) if tok.token == Token::Str => {
                let quoted = self.text(tok);
                unescape(&quoted[1..quoted.len() - 1])
            }
            Some(tok) if matches!(tok.token, Token::Ident | Token::Number) => {
                unescape(self.text(tok))
            }
            _ => return Err(self.error("expected attribute value")),
        };

        let mut case_insensitive = false;
        if let Some(tok) = self.peek().filter(|t| t.token == Token::Ident) {
            match self.text(tok) {
                "i" | "I" => case_insensitive = true,
                "s" | "S" => {}
                _ => return Err(self.error("expected attribute flag or ']'")),
            }
            self.advance();
        }

        if !self.next_is(Token::BracketClose) {
            return Err(self.error("expected ']'"));
        }
        self.advance();

        Ok(AttributeSelector {
            name,
            condition: Some((operator, value)),
            case_insensitive,
        })
    }

    /// Parse a pseudo-class or pseudo-element; the first `:` is already consumed.
    fn parse_pseudo(&mut self) -> Result<SelectorComponent, ParseError> {
        if self.is_adjacent() && self.next_is(Token::Colon) {
            self.advance();
            let name = self.expect_adjacent_ident("pseudo-element name")?;
            return Ok(SelectorComponent::PseudoElement(name.to_ascii_lowercase()));
        }

        let name = self.expect_adjacent_ident("pseudo-class name")?.to_ascii_lowercase();
        if !(self.is_adjacent() && self.next_is(Token::ParenOpen)) {
            return Ok(SelectorComponent::PseudoClass {
                name,
                argument: None,
            });
        }

        let open = self.advance().ok_or_else(|| self.error("expected '('"))?;
        let mut depth = 1usize;
        while let Some(tok) = self.advance() {
            if tok.token.opens_block() {
                depth += 1;
            } else if tok.token.closes_block() {
                depth -= 1;
                if depth == 0 {
                    let argument = self.source[open.end..tok.start].trim().to_string();
                    return Ok(SelectorComponent::PseudoClass {
                        name,
                        argument: Some(argument),
                    });
                }
            }
        }
        Err(ParseError::UnexpectedEof(format!(
            "unterminated argument of :{name} at position {}",
            self.current_pos()
        )))
    }
}

/// Tokens that can begin a compound selector.
fn starts_compound(token: Token) -> bool {
    matches!(
        token,
        Token::Ident | Token::Star | Token::Dot | Token::Hash | Token::BracketOpen | Token::Colon
    )
}
