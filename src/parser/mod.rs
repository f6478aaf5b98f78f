use std::fs;
use std::path::Path;

use crate::ast::Document;
use crate::lexer::{Lexer, Token};
use crate::options::ParseOptions;
use crate::utils::expand_home;
use crate::VdfError;

mod document;

pub struct Parser<'a> {
    lexer: Lexer<'a>,
    pos: (usize, usize),
    done: bool,
    options: ParseOptions,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str) -> Self {
        Self::with_options(input, ParseOptions::default())
    }

    pub fn with_options(input: &'a str, options: ParseOptions) -> Self {
        Self {
            lexer: Lexer::with_comments(input, options.allow_comments),
            pos: (1, 1),
            done: false,
            options,
        }
    }

    /// Lex and return the next token. There is no lookahead.
    pub(crate) fn bump(&mut self) -> Result<Token, VdfError> {
        if self.done {
            return Err(VdfError::syntax("Unexpected end of input", self.lexer.line(), self.lexer.column() + 1, 201));
        }
        let token = self.lexer.next_token()?;
        self.pos = (self.lexer.token_line(), self.lexer.token_column());
        self.done = token == Token::Eof;
        Ok(token)
    }

    /// Line of the token most recently returned by `bump`.
    pub(crate) fn line(&self) -> usize {
        self.pos.0
    }

    /// Column of the token most recently returned by `bump`.
    pub(crate) fn column(&self) -> usize {
        self.pos.1
    }

    pub(crate) fn options(&self) -> &ParseOptions {
        &self.options
    }

    pub fn parse_document(&mut self) -> Result<Document, VdfError> {
        document::parse_document(self)
    }
}

/// Parse VDF text with default options.
///
/// ```
/// let doc = vdf_cfg::parser::parse("\"a\" \"b\"\n").unwrap();
/// assert_eq!(doc.root.get_str("a").unwrap(), "b");
/// ```
pub fn parse(input: &str) -> Result<Document, VdfError> {
    parse_with(input, &ParseOptions::default())
}

pub fn parse_with(input: &str, options: &ParseOptions) -> Result<Document, VdfError> {
    Parser::with_options(input, options.clone()).parse_document()
}

/// Read and parse a file. A leading `~/` is expanded to the home directory.
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Document, VdfError> {
    parse_file_with(path, &ParseOptions::default())
}

pub fn parse_file_with<P: AsRef<Path>>(path: P, options: &ParseOptions) -> Result<Document, VdfError> {
    let path = expand_home(path.as_ref())?;
    log::debug!("parsing VDF file {}", path.display());

    let content = fs::read_to_string(&path)?;
    let mut doc = parse_with(&content, options)?;
    doc.origin = Some(path);
    Ok(doc)
}
