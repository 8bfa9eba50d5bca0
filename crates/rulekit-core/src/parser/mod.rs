//! Rule language parser
//!
//! Tokenizer and recursive-descent parser turning rule text into an AST.

pub mod lexer;
pub mod parse;
pub mod token;

pub use lexer::{tokenize, Lexer};
pub use parse::{
    parse, parse_with, ParseError, ParseOptions, ParseResult, Parser, DEFAULT_MAX_DEPTH, MAX_TERMS,
};
pub use token::Token;
