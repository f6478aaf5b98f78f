use std::mem;

use super::*;
use crate::ast::{Block, Node};

/// A block that has been opened but not yet closed.
struct PendingBlock {
    key: String,
    line: usize,
    column: usize,
    entries: Vec<(String, Node)>,
}

enum State {
    ReadingKey,
    ReadingValueOrBlock { key: String },
}

pub(super) fn parse_document(parser: &mut Parser) -> Result<Document, VdfError> {
    // arena slot 0 is the root; `open` holds arena indices, innermost last
    let mut arena = vec![PendingBlock {
        key: String::new(),
        line: 1,
        column: 1,
        entries: Vec::new(),
    }];
    let mut open: Vec<usize> = vec![0];
    let mut state = State::ReadingKey;

    loop {
        let token = parser.bump()?;
        let (line, column) = (parser.line(), parser.column());
        let top = open[open.len() - 1];

        state = match (state, token) {
            (State::ReadingKey, Token::String(key)) => State::ReadingValueOrBlock { key },
            (State::ReadingKey, Token::RBrace) => {
                if open.len() == 1 {
                    return Err(VdfError::syntax("Unmatched '}'", line, column, 202)
                        .with_hint("There is no open block to close"));
                }
                open.pop();
                let parent = open[open.len() - 1];
                close_block(&mut arena, top, parent);
                State::ReadingKey
            }
            (State::ReadingKey, Token::LBrace) => {
                return Err(VdfError::syntax("Expected a quoted key, found '{'", line, column, 203)
                    .with_hint("Every block needs a key before its opening brace"));
            }
            (State::ReadingKey, Token::Eof) => {
                if open.len() > 1 {
                    let pending = &arena[top];
                    return Err(VdfError::syntax(
                        format!("Unterminated block '{}'", pending.key),
                        pending.line,
                        pending.column,
                        204,
                    )
                    .with_hint("Add the missing '}'"));
                }
                break;
            }
            (State::ReadingValueOrBlock { key }, Token::String(value)) => {
                arena[top].entries.push((key, Node::Scalar(value)));
                State::ReadingKey
            }
            (State::ReadingValueOrBlock { key }, Token::LBrace) => {
                if open.len() > parser.options().max_depth {
                    return Err(VdfError::syntax(
                        format!("Block '{}' exceeds the maximum nesting depth of {}", key, parser.options().max_depth),
                        line,
                        column,
                        206,
                    ));
                }
                log::trace!("open block '{}' at {}:{} (depth {})", key, line, column, open.len());
                arena.push(PendingBlock {
                    key,
                    line,
                    column,
                    entries: Vec::new(),
                });
                open.push(arena.len() - 1);
                State::ReadingKey
            }
            (State::ReadingValueOrBlock { key }, found) => {
                return Err(VdfError::syntax(
                    format!("Missing value after key '{}', found {}", key, found.describe()),
                    line,
                    column,
                    205,
                )
                .with_hint("A key must be followed by a quoted value or a '{' block"));
            }
        };
    }

    let entries = mem::take(&mut arena[0].entries);
    log::debug!("parsed VDF document with {} top-level entries", entries.len());

    Ok(Document {
        root: Block::from_entries(entries),
        origin: None,
    })
}

/// Move a finished block's entries into its parent as one block-valued entry.
fn close_block(arena: &mut [PendingBlock], idx: usize, parent: usize) {
    let key = mem::take(&mut arena[idx].key);
    let entries = mem::take(&mut arena[idx].entries);
    log::trace!("close block '{}' ({} entries)", key, entries.len());
    arena[parent]
        .entries
        .push((key, Node::Block(Block::from_entries(entries))));
}
