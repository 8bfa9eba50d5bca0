//! Parser implementation for rules
//!
//! Recursive descent over the token stream with one token of lookahead:
//!
//! ```text
//! expression := comparison ( (AND|OR) comparison )*
//! comparison := '(' expression ')' | field compare_op literal
//! ```
//!
//! `AND` and `OR` share a single precedence level and fold to the left, so
//! `a AND b OR c` is `((a AND b) OR c)`. Grouping needs explicit parentheses.

use super::lexer::Lexer;
use super::token::Token;
use crate::ast::nodes::{ComparisonOp, Literal, LogicalOp, Node};
use thiserror::Error;

/// Default cap on parenthesis nesting
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Cap on comparisons in one rule. Tree height never exceeds the number of
/// comparisons, so this bounds every recursive walk over a parsed tree.
pub const MAX_TERMS: usize = 4096;

/// Parse error
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Unexpected token: expected {expected}, got {got}")]
    UnexpectedToken { expected: String, got: String },

    #[error("Unexpected end of expression: expected {expected}")]
    UnexpectedEof { expected: String },

    #[error("Unexpected character: {0:?}")]
    UnexpectedCharacter(char),

    #[error("Unterminated string literal: '{0}")]
    UnterminatedString(String),

    #[error("Invalid numeric literal: {0}")]
    InvalidLiteral(String),

    #[error("Unexpected trailing input starting at {0}")]
    TrailingInput(String),

    #[error("Expression nested deeper than {limit} levels")]
    NestingTooDeep { limit: usize },

    #[error("Rule has more than {limit} comparisons")]
    TooManyTerms { limit: usize },
}

pub type ParseResult<T> = Result<T, ParseError>;

/// Knobs for tokenizing and parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Maximum parenthesis nesting
    pub max_depth: usize,
    /// Drop unrecognized characters instead of failing
    pub lenient_tokens: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            lenient_tokens: false,
        }
    }
}

/// Parser for rule strings
pub struct Parser {
    tokens: Vec<Token>,
    position: usize,
    max_depth: usize,
    terms: usize,
}

impl Parser {
    /// Create a new parser from source code with default options
    pub fn new(source: &str) -> ParseResult<Self> {
        Self::with_options(source, ParseOptions::default())
    }

    /// Create a new parser from source code
    pub fn with_options(source: &str, options: ParseOptions) -> ParseResult<Self> {
        let tokens = Lexer::new(source)
            .lenient(options.lenient_tokens)
            .tokenize()?;
        Ok(Self::from_tokens(tokens).with_max_depth(options.max_depth))
    }

    /// Create a parser over an existing token sequence
    pub fn from_tokens(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            position: 0,
            max_depth: DEFAULT_MAX_DEPTH,
            terms: 0,
        }
    }

    /// Override the nesting limit
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Parse the whole input as one rule; leftover tokens are an error
    pub fn parse(&mut self) -> ParseResult<Node> {
        let node = self.parse_expression()?;
        match self.current() {
            None => Ok(node),
            Some(token) => Err(ParseError::TrailingInput(token.to_string())),
        }
    }

    /// Parse an expression starting at the cursor
    pub fn parse_expression(&mut self) -> ParseResult<Node> {
        self.expression(0)
    }

    /// Chains fold in a loop, so only parentheses add parser recursion.
    fn expression(&mut self, nesting: usize) -> ParseResult<Node> {
        let mut left = self.comparison(nesting)?;

        while let Some(op) = self.logical_op() {
            self.advance();
            let right = self.comparison(nesting)?;
            left = Node::operator(op, left, right);
        }

        Ok(left)
    }

    fn comparison(&mut self, nesting: usize) -> ParseResult<Node> {
        match self.current() {
            Some(Token::LParen) => {
                if nesting + 1 > self.max_depth {
                    return Err(ParseError::NestingTooDeep {
                        limit: self.max_depth,
                    });
                }
                self.advance();
                let grouped = self.expression(nesting + 1)?;
                self.expect(Token::RParen, "closing parenthesis")?;
                Ok(grouped)
            }
            Some(Token::Ident(_)) => {
                self.terms += 1;
                if self.terms > MAX_TERMS {
                    return Err(ParseError::TooManyTerms { limit: MAX_TERMS });
                }
                let field = self.expect_identifier()?;
                let op = self.expect_comparison_op()?;
                let value = self.expect_literal()?;
                Ok(Node::Comparison { field, op, value })
            }
            Some(token) => Err(ParseError::UnexpectedToken {
                expected: "field name or '('".to_string(),
                got: token.to_string(),
            }),
            None => Err(ParseError::UnexpectedEof {
                expected: "field name or '('".to_string(),
            }),
        }
    }

    fn logical_op(&self) -> Option<LogicalOp> {
        match self.current() {
            Some(Token::And) => Some(LogicalOp::And),
            Some(Token::Or) => Some(LogicalOp::Or),
            _ => None,
        }
    }

    // Helper methods

    fn current(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    fn advance(&mut self) {
        if self.position < self.tokens.len() {
            self.position += 1;
        }
    }

    /// Take the current token, failing at end of input
    fn next_or_eof(&mut self, expected: &str) -> ParseResult<Token> {
        let token = self
            .current()
            .cloned()
            .ok_or_else(|| ParseError::UnexpectedEof {
                expected: expected.to_string(),
            })?;
        self.advance();
        Ok(token)
    }

    fn expect(&mut self, expected: Token, description: &str) -> ParseResult<()> {
        let token = self.next_or_eof(description)?;
        if token == expected {
            Ok(())
        } else {
            Err(ParseError::UnexpectedToken {
                expected: description.to_string(),
                got: token.to_string(),
            })
        }
    }

    fn expect_identifier(&mut self) -> ParseResult<String> {
        match self.next_or_eof("field name")? {
            Token::Ident(name) => Ok(name),
            other => Err(ParseError::UnexpectedToken {
                expected: "field name".to_string(),
                got: other.to_string(),
            }),
        }
    }

    fn expect_comparison_op(&mut self) -> ParseResult<ComparisonOp> {
        let token = self.next_or_eof("comparison operator")?;
        let op = match token {
            Token::Gt => ComparisonOp::Gt,
            Token::Lt => ComparisonOp::Lt,
            Token::GtEq => ComparisonOp::GtEq,
            Token::LtEq => ComparisonOp::LtEq,
            Token::Eq => ComparisonOp::Eq,
            Token::Neq => ComparisonOp::Neq,
            other => {
                return Err(ParseError::UnexpectedToken {
                    expected: "comparison operator".to_string(),
                    got: other.to_string(),
                })
            }
        };
        Ok(op)
    }

    fn expect_literal(&mut self) -> ParseResult<Literal> {
        match self.next_or_eof("literal value")? {
            Token::StringLit(s) => Ok(Literal::String(s)),
            // Bare words are string literals: `department = Sales`
            Token::Ident(s) => Ok(Literal::String(s)),
            Token::Number(text) => parse_number(&text),
            other => Err(ParseError::UnexpectedToken {
                expected: "literal value".to_string(),
                got: other.to_string(),
            }),
        }
    }
}

/// Classify raw numeric text: `\d+` is an integer, `\d+\.\d+` a float,
/// anything else is rejected.
fn parse_number(text: &str) -> ParseResult<Literal> {
    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    let invalid = || ParseError::InvalidLiteral(text.to_string());

    if all_digits(text) {
        return text.parse::<i64>().map(Literal::Int).map_err(|_| invalid());
    }

    match text.split_once('.') {
        Some((whole, fraction)) if all_digits(whole) && all_digits(fraction) => {
            match text.parse::<f64>() {
                Ok(value) if value.is_finite() => Ok(Literal::Float(value)),
                _ => Err(invalid()),
            }
        }
        _ => Err(invalid()),
    }
}

/// Parse a rule string with default options
pub fn parse(source: &str) -> ParseResult<Node> {
    Parser::new(source)?.parse()
}

/// Parse a rule string with explicit options
pub fn parse_with(source: &str, options: ParseOptions) -> ParseResult<Node> {
    Parser::with_options(source, options)?.parse()
}
