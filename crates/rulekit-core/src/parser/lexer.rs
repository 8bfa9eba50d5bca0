//! Lexer for the rule language
//!
//! The lexer turns a rule string into a flat sequence of tokens in a single
//! pass. Whitespace is insignificant. Numeric interpretation is left to the
//! parser: digit-led runs come out as raw [`Token::Number`] text.

use super::parse::{ParseError, ParseResult};
use super::token::Token;
use tracing::debug;

/// Lexer for tokenizing rule strings
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    lenient: bool,
}

impl Lexer {
    /// Create a new strict lexer: unrecognized characters are errors
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            lenient: false,
        }
    }

    /// Drop unrecognized characters instead of failing
    pub fn lenient(mut self, lenient: bool) -> Self {
        self.lenient = lenient;
        self
    }

    /// Get the next token, or `None` at end of input
    pub fn next_token(&mut self) -> ParseResult<Option<Token>> {
        loop {
            self.skip_whitespace();

            if self.is_at_end() {
                return Ok(None);
            }

            let ch = self.current_char();

            if ch == '\'' {
                return self.lex_string().map(Some);
            }

            if ch.is_ascii_digit() {
                return Ok(Some(self.lex_number()));
            }

            if ch.is_alphabetic() || ch == '_' {
                return Ok(Some(self.lex_identifier_or_keyword()));
            }

            if let Some(token) = self.lex_operator_or_punctuation() {
                return Ok(Some(token));
            }

            // Nothing matched at this position
            let ch = self.advance();
            if !self.lenient {
                return Err(ParseError::UnexpectedCharacter(ch));
            }
            debug!(character = %ch, "dropping unrecognized character");
        }
    }

    /// Tokenize all input
    pub fn tokenize(&mut self) -> ParseResult<Vec<Token>> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token()? {
            tokens.push(token);
        }
        Ok(tokens)
    }

    fn current_char(&self) -> char {
        self.input[self.position]
    }

    fn peek_char(&self) -> Option<char> {
        self.input.get(self.position + 1).copied()
    }

    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    fn advance(&mut self) -> char {
        let ch = self.current_char();
        self.position += 1;
        ch
    }

    fn skip_whitespace(&mut self) {
        while !self.is_at_end() && self.current_char().is_whitespace() {
            self.advance();
        }
    }

    fn lex_string(&mut self) -> ParseResult<Token> {
        self.advance(); // Skip opening quote

        let mut value = String::new();
        while !self.is_at_end() {
            let ch = self.advance();
            if ch == '\'' {
                return Ok(Token::StringLit(value));
            }
            value.push(ch);
        }

        Err(ParseError::UnterminatedString(value))
    }

    fn lex_number(&mut self) -> Token {
        // Swallow the whole word, dots included, so that `1.2.3` or `30abc`
        // reach the parser as one malformed literal instead of several tokens.
        let mut text = String::new();
        while !self.is_at_end() {
            let ch = self.current_char();
            if ch.is_alphanumeric() || ch == '_' || ch == '.' {
                text.push(self.advance());
            } else {
                break;
            }
        }
        Token::Number(text)
    }

    fn lex_identifier_or_keyword(&mut self) -> Token {
        let mut ident = String::new();

        while !self.is_at_end() {
            let ch = self.current_char();
            if ch.is_alphanumeric() || ch == '_' {
                ident.push(self.advance());
            } else {
                break;
            }
        }

        // Keywords are case-sensitive whole words
        match ident.as_str() {
            "AND" => Token::And,
            "OR" => Token::Or,
            _ => Token::Ident(ident),
        }
    }

    fn lex_operator_or_punctuation(&mut self) -> Option<Token> {
        let ch = self.current_char();

        // Two-character operators win over their one-character prefixes
        let two_char = match (ch, self.peek_char()) {
            ('>', Some('=')) => Some(Token::GtEq),
            ('<', Some('=')) => Some(Token::LtEq),
            ('!', Some('=')) => Some(Token::Neq),
            _ => None,
        };
        if let Some(token) = two_char {
            self.advance();
            self.advance();
            return Some(token);
        }

        let token = match ch {
            '>' => Token::Gt,
            '<' => Token::Lt,
            '=' => Token::Eq,
            '(' => Token::LParen,
            ')' => Token::RParen,
            _ => return None,
        };
        self.advance();
        Some(token)
    }
}

/// Tokenize a rule string with the strict lexer
pub fn tokenize(input: &str) -> ParseResult<Vec<Token>> {
    Lexer::new(input).tokenize()
}
