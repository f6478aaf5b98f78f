use super::*;
use super::scanner::{bump, mark_token_start, skip_whitespace_and_comments};
use crate::VdfError;

pub(super) fn next_token(lexer: &mut Lexer) -> Result<Token, VdfError> {
    skip_whitespace_and_comments(lexer);
    mark_token_start(lexer);

    match lexer.peek {
        Some('{') => tokenize_symbol(lexer, Token::LBrace),
        Some('}') => tokenize_symbol(lexer, Token::RBrace),
        Some('"') => tokenize_string(lexer),
        Some(ch) => tokenize_unexpected_char(lexer, ch),
        None => Ok(Token::Eof),
    }
}

fn tokenize_symbol(lexer: &mut Lexer, token: Token) -> Result<Token, VdfError> {
    bump(lexer);
    Ok(token)
}

fn tokenize_string(lexer: &mut Lexer) -> Result<Token, VdfError> {
    let (line, column) = (lexer.token_line, lexer.token_column);
    bump(lexer); // opening quote

    let mut content = String::new();
    loop {
        match bump(lexer) {
            Some('"') => break,
            Some('\\') => match bump(lexer) {
                Some('n') => content.push('\n'),
                Some('t') => content.push('\t'),
                Some('r') => content.push('\r'),
                Some('"') => content.push('"'),
                Some('\\') => content.push('\\'),
                Some(other) => {
                    // unknown escapes stay verbatim
                    content.push('\\');
                    content.push(other);
                }
                None => {
                    return Err(VdfError::syntax("Unterminated quoted string", line, column, 103)
                        .with_hint("Trailing backslash in string"));
                }
            },
            Some(ch) => content.push(ch),
            None => {
                return Err(VdfError::syntax("Unterminated quoted string", line, column, 103)
                    .with_hint("String literal not closed"));
            }
        }
    }

    Ok(Token::String(content))
}

fn tokenize_unexpected_char(lexer: &mut Lexer, ch: char) -> Result<Token, VdfError> {
    let (line, column) = (lexer.token_line, lexer.token_column);
    bump(lexer);
    Err(VdfError::syntax(format!("Unexpected character '{}'", ch), line, column, 104)
        .with_hint("Keys and values must be double-quoted strings"))
}
