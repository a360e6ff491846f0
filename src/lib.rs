// Declare modules publicly so they are part of the library interface
pub mod ast;
pub mod environment;
pub mod evaluator;
pub mod lexer;
pub mod object;
pub mod parser;
mod pretty_print;
pub mod source;

pub use ast::{Node, Program};
pub use environment::Environment;
pub use evaluator::evaluate;
pub use lexer::{Lexer, Token, TokenKind, tokenize};
pub use object::Object;
pub use parser::{ParseError, Parser, parse_str};
pub use source::Span;
