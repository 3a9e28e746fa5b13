//! Lexer for component schema files.

use std::fmt;

use crate::{ParseError, Result};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Token {
    Ident(String),
    Str(String),
    Integer(i64),
    At,
    Colon,
    Comma,
    Question,
    Star,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    LParen,
    RParen,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Ident(name) => write!(f, "identifier '{}'", name),
            Token::Str(value) => write!(f, "string \"{}\"", value),
            Token::Integer(value) => write!(f, "integer {}", value),
            Token::At => f.write_str("'@'"),
            Token::Colon => f.write_str("':'"),
            Token::Comma => f.write_str("','"),
            Token::Question => f.write_str("'?'"),
            Token::Star => f.write_str("'*'"),
            Token::LBrace => f.write_str("'{'"),
            Token::RBrace => f.write_str("'}'"),
            Token::LBracket => f.write_str("'['"),
            Token::RBracket => f.write_str("']'"),
            Token::LParen => f.write_str("'('"),
            Token::RParen => f.write_str("')'"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SpannedToken {
    pub token: Token,
    pub line: usize,
    pub column: usize,
}

struct Scanner<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    line: usize,
    column: usize,
}

impl<'a> Scanner<'a> {
    fn new(source: &'a str) -> Self {
        Self { chars: source.chars().peekable(), line: 1, column: 1 }
    }

    fn peek(&mut self) -> Option<char> { self.chars.peek().copied() }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }
}

pub(crate) fn tokenize(source: &str) -> Result<Vec<SpannedToken>> {
    let mut scanner = Scanner::new(source);
    let mut tokens = Vec::new();

    while let Some(c) = scanner.peek() {
        let line = scanner.line;
        let column = scanner.column;

        if c.is_whitespace() {
            scanner.bump();
            continue;
        }
        if c == '#' {
            while let Some(c) = scanner.peek() {
                if c == '\n' {
                    break;
                }
                scanner.bump();
            }
            continue;
        }

        let token = match c {
            '"' => Token::Str(lex_string(&mut scanner, line, column)?),
            '@' => punct(&mut scanner, Token::At),
            ':' => punct(&mut scanner, Token::Colon),
            ',' => punct(&mut scanner, Token::Comma),
            '?' => punct(&mut scanner, Token::Question),
            '*' => punct(&mut scanner, Token::Star),
            '{' => punct(&mut scanner, Token::LBrace),
            '}' => punct(&mut scanner, Token::RBrace),
            '[' => punct(&mut scanner, Token::LBracket),
            ']' => punct(&mut scanner, Token::RBracket),
            '(' => punct(&mut scanner, Token::LParen),
            ')' => punct(&mut scanner, Token::RParen),
            c if c.is_ascii_alphabetic() || c == '_' => lex_ident(&mut scanner),
            c if c.is_ascii_digit() || c == '-' => lex_integer(&mut scanner, line, column)?,
            other => {
                return Err(ParseError::UnexpectedCharacter { character: other, line, column })
            }
        };
        tokens.push(SpannedToken { token, line, column });
    }

    Ok(tokens)
}

fn punct(scanner: &mut Scanner<'_>, token: Token) -> Token {
    scanner.bump();
    token
}

fn lex_ident(scanner: &mut Scanner<'_>) -> Token {
    let mut ident = String::new();
    while let Some(c) = scanner.peek() {
        if c.is_ascii_alphanumeric() || c == '_' {
            ident.push(c);
            scanner.bump();
        } else {
            break;
        }
    }
    Token::Ident(ident)
}

fn lex_integer(scanner: &mut Scanner<'_>, line: usize, column: usize) -> Result<Token> {
    let mut digits = String::new();
    if scanner.peek() == Some('-') {
        digits.push('-');
        scanner.bump();
    }
    while let Some(c) = scanner.peek() {
        if c.is_ascii_digit() {
            digits.push(c);
            scanner.bump();
        } else {
            break;
        }
    }
    digits
        .parse::<i64>()
        .map(Token::Integer)
        .map_err(|_| ParseError::InvalidInteger { line, column })
}

fn lex_string(scanner: &mut Scanner<'_>, line: usize, column: usize) -> Result<String> {
    scanner.bump(); // opening quote
    let mut value = String::new();
    loop {
        let Some(c) = scanner.bump() else {
            return Err(ParseError::UnterminatedString { line, column });
        };
        match c {
            '"' => return Ok(value),
            '\\' => {
                let escape_line = scanner.line;
                let escape_column = scanner.column;
                let Some(escape) = scanner.bump() else {
                    return Err(ParseError::UnterminatedString { line, column });
                };
                match escape {
                    'n' => value.push('\n'),
                    't' => value.push('\t'),
                    '"' => value.push('"'),
                    '\\' => value.push('\\'),
                    other => {
                        return Err(ParseError::InvalidEscape {
                            escape: other,
                            line: escape_line,
                            column: escape_column,
                        })
                    }
                }
            }
            other => value.push(other),
        }
    }
}
