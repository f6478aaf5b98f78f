pub mod archive;
pub mod ast;
pub mod error;
pub mod export;
pub mod file;
pub mod lexer;
pub mod options;
pub mod parser;
pub mod utils;
pub mod writer;

pub use archive::{ArchiveEntry, VdfArchive};
pub use ast::{Block, Document, Node, RemoveMode};
pub use error::{Result, VdfError};
pub use file::VdfFile;
pub use options::{ParseOptions, WriteOptions};
pub use parser::{parse, parse_with};
