//! Token definitions for the rule language

use std::fmt;

/// A lexical unit of a rule string.
///
/// Tokens carry no position information; errors name the offending text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    // Keywords
    And,
    Or,

    // Comparison operators
    Eq,   // =
    Neq,  // !=
    Lt,   // <
    Gt,   // >
    LtEq, // <=
    GtEq, // >=

    // Literals
    /// Single-quoted text with the quotes stripped
    StringLit(String),
    /// Raw digit-led text; the parser decides between integer and float
    Number(String),

    // Identifiers
    Ident(String),

    // Punctuation
    LParen, // (
    RParen, // )
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::And => write!(f, "AND"),
            Token::Or => write!(f, "OR"),
            Token::Eq => write!(f, "="),
            Token::Neq => write!(f, "!="),
            Token::Lt => write!(f, "<"),
            Token::Gt => write!(f, ">"),
            Token::LtEq => write!(f, "<="),
            Token::GtEq => write!(f, ">="),
            Token::StringLit(s) => write!(f, "'{}'", s),
            Token::Number(n) => write!(f, "{}", n),
            Token::Ident(s) => write!(f, "{}", s),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
        }
    }
}

impl Token {
    /// Check if this token is a logical keyword
    pub fn is_keyword(&self) -> bool {
        matches!(self, Token::And | Token::Or)
    }

    /// Check if this token is a comparison operator
    pub fn is_operator(&self) -> bool {
        matches!(
            self,
            Token::Eq | Token::Neq | Token::Lt | Token::Gt | Token::LtEq | Token::GtEq
        )
    }

    /// Check if this token can stand in literal position
    pub fn is_literal(&self) -> bool {
        matches!(self, Token::StringLit(_) | Token::Number(_) | Token::Ident(_))
    }
}
