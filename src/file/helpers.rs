use crate::ast::{Block, Node};
use crate::lexer::{Lexer, Token};

/// Index of the first entry for `key`: exact match first, then ASCII case-insensitive.
pub(super) fn child_index(block: &Block, key: &str) -> Option<usize> {
    let entries = block.entries();
    entries
        .iter()
        .position(|(k, _)| k == key)
        .or_else(|| entries.iter().position(|(k, _)| k.eq_ignore_ascii_case(key)))
}

pub(super) fn find_child<'a>(block: &'a Block, key: &str) -> Option<&'a Node> {
    child_index(block, key).map(|idx| &block.entries()[idx].1)
}

/// Line number and trimmed source line where `path` is defined, or `(0, ..)`.
///
/// Re-lexes the raw text and tracks the enclosing block keys, so it agrees
/// with the parser on what a key is. Text that no longer lexes yields what
/// was found before the error.
pub(super) fn find_config_line(path: &str, raw_content: &str) -> (usize, String) {
    let wanted: Vec<&str> = path.split('.').collect();
    let mut scope: Vec<String> = Vec::new();
    let mut pending_key: Option<(String, usize)> = None;
    let mut lexer = Lexer::new(raw_content);

    while let Ok(token) = lexer.next_token() {
        match (token, pending_key.take()) {
            (Token::String(key), None) => pending_key = Some((key, lexer.token_line())),
            (Token::String(_), Some((key, line))) => {
                if path_matches(&scope, &key, &wanted) {
                    return (line, snippet(raw_content, line));
                }
            }
            (Token::LBrace, Some((key, line))) => {
                if path_matches(&scope, &key, &wanted) {
                    return (line, snippet(raw_content, line));
                }
                scope.push(key);
            }
            (Token::RBrace, _) => {
                scope.pop();
            }
            (Token::Eof, _) | (Token::LBrace, None) => break,
        }
    }

    (0, "<key not found>".into())
}

fn path_matches(scope: &[String], key: &str, wanted: &[&str]) -> bool {
    scope.len() + 1 == wanted.len()
        && scope
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(key))
            .zip(wanted)
            .all(|(have, want)| have.eq_ignore_ascii_case(want))
}

fn snippet(raw_content: &str, line: usize) -> String {
    raw_content
        .lines()
        .nth(line.saturating_sub(1))
        .map(|l| l.trim().to_string())
        .unwrap_or_default()
}
