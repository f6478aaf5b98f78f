use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::slice;

use crate::ast::{Block, Document, Node};
use crate::options::WriteOptions;

/// Serialize a document with default formatting (tab indents, Valve layout).
///
/// Comments from the source text are not preserved. Output nested deeper
/// than [`crate::options::DEFAULT_MAX_DEPTH`] only parses back with a raised
/// [`ParseOptions::max_depth`](crate::options::ParseOptions::max_depth).
///
/// ```
/// use vdf_cfg::{Block, Document};
///
/// let mut doc = Document::new();
/// let mut state = Block::new();
/// state.append("appid", "440");
/// doc.append("AppState", state);
///
/// assert_eq!(
///     vdf_cfg::writer::to_string(&doc),
///     "\"AppState\"\n{\n\t\"appid\"\t\t\"440\"\n}\n"
/// );
/// ```
pub fn to_string(doc: &Document) -> String {
    to_string_with(doc, &WriteOptions::default())
}

pub fn to_string_with(doc: &Document, options: &WriteOptions) -> String {
    let mut out = String::new();
    write_block(&mut out, &doc.root, options);
    out
}

pub fn write_document<W: Write>(writer: &mut W, doc: &Document, options: &WriteOptions) -> io::Result<()> {
    writer.write_all(to_string_with(doc, options).as_bytes())
}

pub fn write_file<P: AsRef<Path>>(path: P, doc: &Document, options: &WriteOptions) -> io::Result<()> {
    log::debug!("writing VDF file {}", path.as_ref().display());
    fs::write(path, to_string_with(doc, options))
}

// Walks the tree with an explicit stack of child iterators, innermost last.
fn write_block(out: &mut String, root: &Block, options: &WriteOptions) {
    let mut stack: Vec<slice::Iter<'_, (String, Node)>> = vec![root.entries().iter()];

    loop {
        let depth = stack.len() - 1;
        let Some(children) = stack.last_mut() else {
            break;
        };

        match children.next() {
            Some((key, Node::Scalar(value))) => {
                push_indent(out, options, depth);
                push_quoted(out, key);
                out.push_str(&options.separator);
                push_quoted(out, value);
                out.push('\n');
            }
            Some((key, Node::Block(block))) => {
                push_indent(out, options, depth);
                push_quoted(out, key);
                out.push('\n');
                push_indent(out, options, depth);
                out.push_str("{\n");
                stack.push(block.entries().iter());
            }
            None => {
                stack.pop();
                if depth > 0 {
                    push_indent(out, options, depth - 1);
                    out.push_str("}\n");
                } else {
                    break;
                }
            }
        }
    }
}

fn push_indent(out: &mut String, options: &WriteOptions, depth: usize) {
    for _ in 0..depth {
        out.push_str(&options.indent);
    }
}

fn push_quoted(out: &mut String, s: &str) {
    out.push('"');
    for ch in s.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            other => out.push(other),
        }
    }
    out.push('"');
}
