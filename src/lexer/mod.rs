// Author: Dustin Pilgrim
// License: GPL-3.0-or-later

use std::str::Chars;

mod scanner;
mod tokenizer;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // --- literals ---
    String(String),

    // --- structure ---
    LBrace,
    RBrace,

    Eof,
}

impl Token {
    /// Short human description used in diagnostics.
    pub fn describe(&self) -> String {
        match self {
            Token::String(s) => format!("string \"{}\"", s),
            Token::LBrace => "'{'".into(),
            Token::RBrace => "'}'".into(),
            Token::Eof => "end of input".into(),
        }
    }
}

pub struct Lexer<'a> {
    input: Chars<'a>,
    peek: Option<char>,
    line: usize,
    column: usize,
    token_line: usize,
    token_column: usize,
    allow_comments: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self::with_comments(input, true)
    }

    /// With `allow_comments` off, `//` is reported as an unexpected character.
    pub fn with_comments(input: &'a str, allow_comments: bool) -> Self {
        let mut lexer = Lexer {
            input: input.chars(),
            peek: None,
            line: 1,
            column: 0,
            token_line: 1,
            token_column: 1,
            allow_comments,
        };
        lexer.peek = lexer.input.next();
        // byte order mark written by some Windows editors
        if lexer.peek == Some('\u{feff}') {
            lexer.peek = lexer.input.next();
        }
        lexer
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn column(&self) -> usize {
        self.column
    }

    /// Line of the first character of the most recent token.
    pub fn token_line(&self) -> usize {
        self.token_line
    }

    /// 1-based column of the first character of the most recent token.
    pub fn token_column(&self) -> usize {
        self.token_column
    }

    pub fn next_token(&mut self) -> Result<Token, crate::VdfError> {
        tokenizer::next_token(self)
    }
}
