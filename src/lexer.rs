use logos::Logos;
use std::fmt;

use crate::Span;

#[derive(Logos, Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[logos(skip r"[ \t\n\r]+")] // Skip whitespace
pub enum TokenKind {
    // Never produced by logos itself; see `Lexer::next_token`.
    Illegal,
    Eof,

    // Identifiers + literals
    #[regex(r"[a-zA-Z_]+")]
    Ident,
    #[regex(r"[0-9]+")]
    Int,

    // Operators
    #[token("=")]
    Assign,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("!")]
    Bang,
    #[token("*")]
    Asterisk,
    #[token("/")]
    Slash,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("==")]
    Eq,
    #[token("!=")]
    NotEq,

    // Delimiters
    #[token(",")]
    Comma,
    #[token(";")]
    Semicolon,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,

    // Keywords, reclassified from `Ident` by `lookup_ident`
    Function,
    Let,
    True,
    False,
    If,
    Else,
    Return,
}

impl TokenKind {
    /// Maps an identifier to its keyword kind, or `Ident` if it isn't one.
    pub fn lookup_ident(ident: &str) -> TokenKind {
        match ident {
            "fn" => TokenKind::Function,
            "let" => TokenKind::Let,
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            "if" => TokenKind::If,
            "else" => TokenKind::Else,
            "return" => TokenKind::Return,
            _ => TokenKind::Ident,
        }
    }

    pub fn is_keyword(self) -> bool {
        matches!(
            self,
            TokenKind::Function
                | TokenKind::Let
                | TokenKind::True
                | TokenKind::False
                | TokenKind::If
                | TokenKind::Else
                | TokenKind::Return
        )
    }
}

pub const KEYWORDS: [&str; 7] = ["fn", "let", "true", "false", "if", "else", "return"];

// Names used in parser error messages
impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Illegal => "ILLEGAL",
            TokenKind::Eof => "EOF",
            TokenKind::Ident => "IDENT",
            TokenKind::Int => "INT",
            TokenKind::Assign => "=",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Bang => "!",
            TokenKind::Asterisk => "*",
            TokenKind::Slash => "/",
            TokenKind::Lt => "<",
            TokenKind::Gt => ">",
            TokenKind::Eq => "==",
            TokenKind::NotEq => "!=",
            TokenKind::Comma => ",",
            TokenKind::Semicolon => ";",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::Function => "FUNCTION",
            TokenKind::Let => "LET",
            TokenKind::True => "TRUE",
            TokenKind::False => "FALSE",
            TokenKind::If => "IF",
            TokenKind::Else => "ELSE",
            TokenKind::Return => "RETURN",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub literal: String,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, literal: impl Into<String>, span: Span) -> Self {
        Token {
            kind,
            literal: literal.into(),
            span,
        }
    }
}

/// Pull-based lexer. Wraps the logos lexer so callers get one token per call,
/// with unknown characters surfacing as `Illegal` tokens instead of errors.
pub struct Lexer<'source> {
    inner: logos::Lexer<'source, TokenKind>,
    end: usize,
}

impl<'source> Lexer<'source> {
    pub fn new(source: &'source str) -> Self {
        Lexer {
            inner: TokenKind::lexer(source),
            end: source.len(),
        }
    }

    /// Returns the next token. Once the input is exhausted every call yields `Eof`.
    pub fn next_token(&mut self) -> Token {
        match self.inner.next() {
            Some(Ok(kind)) => {
                let literal = self.inner.slice();
                let kind = match kind {
                    TokenKind::Ident => TokenKind::lookup_ident(literal),
                    other => other,
                };
                Token::new(kind, literal, self.inner.span().into())
            }
            Some(Err(())) => Token::new(
                TokenKind::Illegal,
                self.inner.slice(),
                self.inner.span().into(),
            ),
            None => Token::new(TokenKind::Eof, "", Span::new(self.end, self.end)),
        }
    }
}

// Helper function to tokenize a string directly (useful for tests, benches and the REPL).
// The trailing `Eof` is not included.
pub fn tokenize(input: &str) -> Vec<Token> {
    let mut lexer = Lexer::new(input);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token();
        if token.kind == TokenKind::Eof {
            return tokens;
        }
        tokens.push(token);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Helper to simplify testing token sequences
    fn assert_tokens(input: &str, expected: Vec<(TokenKind, &str)>) {
        let mut lexer = Lexer::new(input);
        for (i, (kind, literal)) in expected.iter().enumerate() {
            let token = lexer.next_token();
            assert_eq!(
                (token.kind, token.literal.as_str()),
                (*kind, *literal),
                "Input: '{}', token #{}",
                input,
                i
            );
        }
        assert_eq!(lexer.next_token().kind, TokenKind::Eof, "Input: '{}'", input);
    }

    #[test]
    fn test_empty_input() {
        assert_tokens("", vec![]);
        assert_tokens(" \t\r\n ", vec![]);
    }

    #[test]
    fn test_let_statement() {
        assert_tokens(
            "let five = 5;",
            vec![
                (TokenKind::Let, "let"),
                (TokenKind::Ident, "five"),
                (TokenKind::Assign, "="),
                (TokenKind::Int, "5"),
                (TokenKind::Semicolon, ";"),
            ],
        );
    }

    #[test]
    fn test_two_character_operators() {
        assert_tokens(
            "10 == 10; 10 != 9;",
            vec![
                (TokenKind::Int, "10"),
                (TokenKind::Eq, "=="),
                (TokenKind::Int, "10"),
                (TokenKind::Semicolon, ";"),
                (TokenKind::Int, "10"),
                (TokenKind::NotEq, "!="),
                (TokenKind::Int, "9"),
                (TokenKind::Semicolon, ";"),
            ],
        );
        assert_tokens(
            "!= = ! ==",
            vec![
                (TokenKind::NotEq, "!="),
                (TokenKind::Assign, "="),
                (TokenKind::Bang, "!"),
                (TokenKind::Eq, "=="),
            ],
        );
    }

    #[test]
    fn test_single_character_tokens() {
        assert_tokens(
            "=+-!*/<>,;(){}",
            vec![
                (TokenKind::Assign, "="),
                (TokenKind::Plus, "+"),
                (TokenKind::Minus, "-"),
                (TokenKind::Bang, "!"),
                (TokenKind::Asterisk, "*"),
                (TokenKind::Slash, "/"),
                (TokenKind::Lt, "<"),
                (TokenKind::Gt, ">"),
                (TokenKind::Comma, ","),
                (TokenKind::Semicolon, ";"),
                (TokenKind::LParen, "("),
                (TokenKind::RParen, ")"),
                (TokenKind::LBrace, "{"),
                (TokenKind::RBrace, "}"),
            ],
        );
    }

    #[test]
    fn test_keywords_and_identifiers() {
        assert_tokens(
            "fn let true false if else return",
            vec![
                (TokenKind::Function, "fn"),
                (TokenKind::Let, "let"),
                (TokenKind::True, "true"),
                (TokenKind::False, "false"),
                (TokenKind::If, "if"),
                (TokenKind::Else, "else"),
                (TokenKind::Return, "return"),
            ],
        );
        // Keywords only match whole identifiers
        assert_tokens(
            "fnord letter _if foo_bar",
            vec![
                (TokenKind::Ident, "fnord"),
                (TokenKind::Ident, "letter"),
                (TokenKind::Ident, "_if"),
                (TokenKind::Ident, "foo_bar"),
            ],
        );
    }

    #[test]
    fn test_digits_split_identifiers() {
        // Identifiers are letters/underscore only
        assert_tokens(
            "x1 123abc",
            vec![
                (TokenKind::Ident, "x"),
                (TokenKind::Int, "1"),
                (TokenKind::Int, "123"),
                (TokenKind::Ident, "abc"),
            ],
        );
    }

    #[test]
    fn test_illegal_characters_do_not_halt() {
        assert_tokens(
            "a @ 1 # b",
            vec![
                (TokenKind::Ident, "a"),
                (TokenKind::Illegal, "@"),
                (TokenKind::Int, "1"),
                (TokenKind::Illegal, "#"),
                (TokenKind::Ident, "b"),
            ],
        );
    }

    #[test]
    fn test_eof_is_sticky() {
        let mut lexer = Lexer::new("x");
        assert_eq!(lexer.next_token().kind, TokenKind::Ident);
        for _ in 0..3 {
            let token = lexer.next_token();
            assert_eq!(token.kind, TokenKind::Eof);
            assert_eq!(token.span, Span::new(1, 1));
        }
    }

    #[test]
    fn test_full_program() {
        let input = "let add = fn(x, y) {
            x + y;
        };
        let result = add(five, ten);
        if (5 < 10) { return true; } else { return false; }";
        let kinds: Vec<TokenKind> = tokenize(input).into_iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Let,
                TokenKind::Ident,
                TokenKind::Assign,
                TokenKind::Function,
                TokenKind::LParen,
                TokenKind::Ident,
                TokenKind::Comma,
                TokenKind::Ident,
                TokenKind::RParen,
                TokenKind::LBrace,
                TokenKind::Ident,
                TokenKind::Plus,
                TokenKind::Ident,
                TokenKind::Semicolon,
                TokenKind::RBrace,
                TokenKind::Semicolon,
                TokenKind::Let,
                TokenKind::Ident,
                TokenKind::Assign,
                TokenKind::Ident,
                TokenKind::LParen,
                TokenKind::Ident,
                TokenKind::Comma,
                TokenKind::Ident,
                TokenKind::RParen,
                TokenKind::Semicolon,
                TokenKind::If,
                TokenKind::LParen,
                TokenKind::Int,
                TokenKind::Lt,
                TokenKind::Int,
                TokenKind::RParen,
                TokenKind::LBrace,
                TokenKind::Return,
                TokenKind::True,
                TokenKind::Semicolon,
                TokenKind::RBrace,
                TokenKind::Else,
                TokenKind::LBrace,
                TokenKind::Return,
                TokenKind::False,
                TokenKind::Semicolon,
                TokenKind::RBrace,
            ]
        );
    }

    #[test]
    fn test_tokenize_spans() {
        // Verify spans manually for a simple case
        let tokens = tokenize("a == 12");

        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0].span, Span { start: 0, end: 1 });
        assert_eq!(tokens[1].span, Span { start: 2, end: 4 });
        assert_eq!(tokens[2].span, Span { start: 5, end: 7 });
    }

    #[test]
    fn test_token_kind_display() {
        assert_eq!(TokenKind::Assign.to_string(), "=");
        assert_eq!(TokenKind::Ident.to_string(), "IDENT");
        assert_eq!(TokenKind::Function.to_string(), "FUNCTION");
        assert!(TokenKind::Return.is_keyword());
        assert!(!TokenKind::Ident.is_keyword());
    }
}
