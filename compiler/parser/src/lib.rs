#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! Parser for the component schema definition language.
//!
//! Schemas are small interface-definition files: a namespace declaration,
//! struct type definitions with annotated fields, and imports that splice
//! type definitions from sibling files. This crate turns schema source into
//! the [`ast::Document`] consumed by the schema interpreter; it knows nothing
//! about signatures, catalogs, or code generation.
//!
//! ```
//! let source = r#"
//! namespace "greeter"
//! type Inputs { name: string }
//! type Outputs { greeting: string }
//! "#;
//! let resolver = |location: &str| -> std::io::Result<String> {
//!     Err(std::io::Error::new(std::io::ErrorKind::NotFound, location.to_string()))
//! };
//! let document = parser::parse(source, &resolver).expect("parse");
//! assert_eq!(document.definitions.len(), 3);
//! ```

pub mod ast;
mod lexer;

use ast::{
    Annotation, Definition, Document, Field, ImportDefinition, Literal, NamespaceDefinition,
    TypeDefinition, TypeExpression,
};
use lexer::{tokenize, SpannedToken, Token};

/// Errors produced while lexing or parsing a schema file.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// The parser met a token it did not expect.
    #[error("unexpected {found} at line {line}, column {column} (expected {expected})")]
    UnexpectedToken {
        /// What the parser was looking for.
        expected: String,
        /// The token actually found.
        found: String,
        /// 1-based source line.
        line: usize,
        /// 1-based source column.
        column: usize,
    },
    /// The source ended mid-construct.
    #[error("unexpected end of input (expected {expected})")]
    UnexpectedEof {
        /// What the parser was looking for.
        expected: String,
    },
    /// A character outside the schema language's alphabet.
    #[error("unexpected character '{character}' at line {line}, column {column}")]
    UnexpectedCharacter {
        /// The offending character.
        character: char,
        /// 1-based source line.
        line: usize,
        /// 1-based source column.
        column: usize,
    },
    /// A string literal with no closing quote.
    #[error("unterminated string literal starting at line {line}, column {column}")]
    UnterminatedString {
        /// 1-based source line of the opening quote.
        line: usize,
        /// 1-based source column of the opening quote.
        column: usize,
    },
    /// An escape sequence the lexer does not recognize.
    #[error("invalid escape sequence '\\{escape}' at line {line}, column {column}")]
    InvalidEscape {
        /// The character following the backslash.
        escape: char,
        /// 1-based source line.
        line: usize,
        /// 1-based source column.
        column: usize,
    },
    /// An integer literal that does not fit in `i64`.
    #[error("invalid integer literal at line {line}, column {column}")]
    InvalidInteger {
        /// 1-based source line.
        line: usize,
        /// 1-based source column.
        column: usize,
    },
    /// The import resolver failed to supply a file's contents.
    #[error("could not resolve import \"{location}\": {source}")]
    ImportResolution {
        /// The import path as written in the schema.
        location: String,
        /// The underlying resolver error.
        #[source]
        source: std::io::Error,
    },
    /// A file imports itself, directly or through other imports.
    #[error("import cycle detected at \"{location}\"")]
    ImportCycle {
        /// The import path that closed the cycle.
        location: String,
    },
}

/// Result alias for parser operations.
pub type Result<T> = std::result::Result<T, ParseError>;

/// Supplies the contents of imported schema files.
///
/// The parser calls this synchronously, at most once per import per file.
/// Resolution strategy belongs to the caller; the directory walker resolves
/// locations relative to the importing file's own directory.
pub trait ImportResolver {
    /// Return the source text behind `location`.
    fn resolve(&self, location: &str) -> std::io::Result<String>;
}

impl<F> ImportResolver for F
where F: Fn(&str) -> std::io::Result<String>
{
    fn resolve(&self, location: &str) -> std::io::Result<String> { self(location) }
}

/// Parse one schema file into a [`Document`].
///
/// Imports are resolved through `resolver` and their type definitions are
/// spliced into the returned document; import cycles are rejected.
pub fn parse(source: &str, resolver: &dyn ImportResolver) -> Result<Document> {
    let mut visiting = Vec::new();
    parse_with_context(source, resolver, &mut visiting)
}

fn parse_with_context(
    source: &str,
    resolver: &dyn ImportResolver,
    visiting: &mut Vec<String>,
) -> Result<Document> {
    let tokens = tokenize(source)?;
    let mut parser = Parser { tokens, pos: 0, resolver, visiting };
    parser.parse_document()
}

struct Parser<'a> {
    tokens: Vec<SpannedToken>,
    pos: usize,
    resolver: &'a dyn ImportResolver,
    visiting: &'a mut Vec<String>,
}

fn unexpected(spanned: &SpannedToken, expected: &str) -> ParseError {
    ParseError::UnexpectedToken {
        expected: expected.to_string(),
        found: spanned.token.to_string(),
        line: spanned.line,
        column: spanned.column,
    }
}

fn eof(expected: &str) -> ParseError {
    ParseError::UnexpectedEof { expected: expected.to_string() }
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&SpannedToken> { self.tokens.get(self.pos) }

    fn bump(&mut self) -> Option<SpannedToken> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn expect(&mut self, expected: &Token, what: &str) -> Result<()> {
        match self.bump() {
            Some(spanned) if spanned.token == *expected => Ok(()),
            Some(spanned) => Err(unexpected(&spanned, what)),
            None => Err(eof(what)),
        }
    }

    fn expect_ident(&mut self, what: &str) -> Result<String> {
        match self.bump() {
            Some(SpannedToken { token: Token::Ident(name), .. }) => Ok(name),
            Some(spanned) => Err(unexpected(&spanned, what)),
            None => Err(eof(what)),
        }
    }

    fn expect_keyword(&mut self, keyword: &str) -> Result<()> {
        match self.bump() {
            Some(spanned) => match &spanned.token {
                Token::Ident(word) if word == keyword => Ok(()),
                _ => Err(unexpected(&spanned, &format!("'{}'", keyword))),
            },
            None => Err(eof(&format!("'{}'", keyword))),
        }
    }

    fn expect_string(&mut self, what: &str) -> Result<String> {
        match self.bump() {
            Some(SpannedToken { token: Token::Str(value), .. }) => Ok(value),
            Some(spanned) => Err(unexpected(&spanned, what)),
            None => Err(eof(what)),
        }
    }

    fn parse_document(&mut self) -> Result<Document> {
        let mut definitions = Vec::new();
        while let Some(spanned) = self.peek().cloned() {
            match &spanned.token {
                Token::Ident(keyword) => match keyword.as_str() {
                    "namespace" => {
                        self.bump();
                        let name = self.expect_string("a quoted namespace name")?;
                        definitions.push(Definition::Namespace(NamespaceDefinition { name }));
                    }
                    "type" => {
                        let definition = self.parse_type_definition()?;
                        definitions.push(Definition::Type(definition));
                    }
                    "import" => self.parse_import(&mut definitions)?,
                    _ => return Err(unexpected(&spanned, "'namespace', 'type', or 'import'")),
                },
                _ => return Err(unexpected(&spanned, "'namespace', 'type', or 'import'")),
            }
        }
        Ok(Document { definitions })
    }

    fn parse_type_definition(&mut self) -> Result<TypeDefinition> {
        self.bump(); // 'type'
        let name = self.expect_ident("a type name")?;
        self.expect(&Token::LBrace, "'{'")?;

        let mut fields = Vec::new();
        loop {
            let spanned = self.peek().cloned().ok_or_else(|| eof("'}' or a field name"))?;
            match spanned.token {
                Token::RBrace => {
                    self.bump();
                    break;
                }
                Token::Ident(_) => fields.push(self.parse_field()?),
                _ => return Err(unexpected(&spanned, "'}' or a field name")),
            }
        }
        Ok(TypeDefinition { name, fields })
    }

    fn parse_field(&mut self) -> Result<Field> {
        let name = self.expect_ident("a field name")?;
        self.expect(&Token::Colon, "':'")?;
        let ty = self.parse_type_expression()?;

        let mut annotations = Vec::new();
        while matches!(self.peek().map(|s| &s.token), Some(Token::At)) {
            annotations.push(self.parse_annotation()?);
        }
        Ok(Field { name, ty, annotations })
    }

    fn parse_type_expression(&mut self) -> Result<TypeExpression> {
        let spanned = self.bump().ok_or_else(|| eof("a type expression"))?;
        let mut expression = match spanned.token {
            Token::Ident(name) => TypeExpression::Named(name),
            Token::LBracket => {
                let element = self.parse_type_expression()?;
                self.expect(&Token::RBracket, "']'")?;
                TypeExpression::List(Box::new(element))
            }
            Token::LBrace => {
                let key = self.parse_type_expression()?;
                self.expect(&Token::Colon, "':'")?;
                let value = self.parse_type_expression()?;
                self.expect(&Token::RBrace, "'}'")?;
                TypeExpression::Map { key: Box::new(key), value: Box::new(value) }
            }
            _ => return Err(unexpected(&spanned, "a type expression")),
        };

        // The optional suffix binds to the whole preceding expression and
        // may be stacked: `[string]??` is Optional(Optional(List)).
        while matches!(self.peek().map(|s| &s.token), Some(Token::Question)) {
            self.bump();
            expression = TypeExpression::Optional(Box::new(expression));
        }
        Ok(expression)
    }

    fn parse_annotation(&mut self) -> Result<Annotation> {
        self.bump(); // '@'
        let name = self.expect_ident("an annotation name")?;

        let mut arguments = Vec::new();
        if matches!(self.peek().map(|s| &s.token), Some(Token::LParen)) {
            self.bump();
            loop {
                let spanned =
                    self.bump().ok_or_else(|| eof("an annotation argument or ')'"))?;
                let literal = match spanned.token {
                    Token::RParen if arguments.is_empty() => break,
                    Token::Str(value) => Literal::String(value),
                    Token::Integer(value) => Literal::Integer(value),
                    Token::Ident(word) if word == "true" => Literal::Bool(true),
                    Token::Ident(word) if word == "false" => Literal::Bool(false),
                    _ => return Err(unexpected(&spanned, "a literal annotation argument")),
                };
                arguments.push(literal);

                let next = self.bump().ok_or_else(|| eof("',' or ')'"))?;
                match next.token {
                    Token::Comma => continue,
                    Token::RParen => break,
                    _ => return Err(unexpected(&next, "',' or ')'")),
                }
            }
        }
        Ok(Annotation { name, arguments })
    }

    fn parse_import(&mut self, definitions: &mut Vec<Definition>) -> Result<()> {
        self.bump(); // 'import'
        let spanned = self.bump().ok_or_else(|| eof("'*' or '{'"))?;
        let names = match spanned.token {
            Token::Star => None,
            Token::LBrace => {
                let mut names = Vec::new();
                loop {
                    names.push(self.expect_ident("an imported type name")?);
                    let next = self.bump().ok_or_else(|| eof("',' or '}'"))?;
                    match next.token {
                        Token::Comma => continue,
                        Token::RBrace => break,
                        _ => return Err(unexpected(&next, "',' or '}'")),
                    }
                }
                Some(names)
            }
            _ => return Err(unexpected(&spanned, "'*' or '{'")),
        };
        self.expect_keyword("from")?;
        let location = self.expect_string("a quoted import path")?;

        if self.visiting.iter().any(|active| active == &location) {
            return Err(ParseError::ImportCycle { location });
        }
        let source = self
            .resolver
            .resolve(&location)
            .map_err(|source| ParseError::ImportResolution { location: location.clone(), source })?;

        self.visiting.push(location.clone());
        let imported = parse_with_context(&source, self.resolver, self.visiting)?;
        self.visiting.pop();

        for definition in imported.definitions {
            if let Definition::Type(ty) = definition {
                let keep = match &names {
                    Some(names) => names.iter().any(|name| name == &ty.name),
                    None => true,
                };
                if keep {
                    definitions.push(Definition::Type(ty));
                }
            }
        }
        definitions.push(Definition::Import(ImportDefinition { names, location }));
        Ok(())
    }
}
