use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::VdfError;

/// A value in a VDF tree: either a quoted string or a nested block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Node {
    Scalar(String),
    Block(Block),
}

/// An ordered list of key/value entries. Keys may repeat.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Block {
    entries: Vec<(String, Node)>,
}

/// Which matches [`Block::remove`] deletes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveMode {
    First,
    All,
}

/// A root block plus the path it was read from, if any.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    pub root: Block,
    #[serde(skip)]
    pub origin: Option<PathBuf>,
}

impl Node {
    pub fn as_str(&self) -> Option<&str> {
        if let Node::Scalar(s) = self {
            Some(s)
        } else {
            None
        }
    }

    pub fn as_block(&self) -> Option<&Block> {
        if let Node::Block(b) = self {
            Some(b)
        } else {
            None
        }
    }

    pub fn as_block_mut(&mut self) -> Option<&mut Block> {
        if let Node::Block(b) = self {
            Some(b)
        } else {
            None
        }
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self, Node::Scalar(_))
    }

    pub fn is_block(&self) -> bool {
        matches!(self, Node::Block(_))
    }

    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Node::Scalar(_) => "scalar",
            Node::Block(_) => "block",
        }
    }
}

impl From<&str> for Node {
    fn from(s: &str) -> Self {
        Node::Scalar(s.to_string())
    }
}

impl From<String> for Node {
    fn from(s: String) -> Self {
        Node::Scalar(s)
    }
}

impl From<Block> for Node {
    fn from(b: Block) -> Self {
        Node::Block(b)
    }
}

impl Block {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_entries(entries: Vec<(String, Node)>) -> Self {
        Self { entries }
    }

    pub(crate) fn entries_mut(&mut self) -> &mut Vec<(String, Node)> {
        &mut self.entries
    }

    /// First entry for `key`, in order.
    pub fn get(&self, key: &str) -> Result<&Node, VdfError> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
            .ok_or_else(|| VdfError::not_found(key))
    }

    pub fn get_mut(&mut self, key: &str) -> Result<&mut Node, VdfError> {
        self.entries
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
            .ok_or_else(|| VdfError::not_found(key))
    }

    /// Every entry for `key`, lazily and in order. VDF allows duplicate keys.
    pub fn get_all<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a Node> + 'a {
        self.entries
            .iter()
            .filter(move |(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn get_str(&self, key: &str) -> Result<&str, VdfError> {
        let node = self.get(key)?;
        node.as_str().ok_or_else(|| mismatch(key, "scalar", node))
    }

    pub fn get_block(&self, key: &str) -> Result<&Block, VdfError> {
        let node = self.get(key)?;
        node.as_block().ok_or_else(|| mismatch(key, "block", node))
    }

    pub fn get_block_mut(&mut self, key: &str) -> Result<&mut Block, VdfError> {
        let node = self.get_mut(key)?;
        let kind = node.kind();
        node.as_block_mut().ok_or_else(|| VdfError::TypeError {
            message: format!("Expected block for '{}', got {}", key, kind),
            line: 0,
            hint: None,
            code: Some(409),
        })
    }

    /// Replace the first entry for `key`, or append one if there is none.
    /// Later duplicates are left untouched.
    pub fn set(&mut self, key: impl Into<String>, node: impl Into<Node>) {
        let key = key.into();
        let node = node.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, v)) => *v = node,
            None => self.entries.push((key, node)),
        }
    }

    pub fn append(&mut self, key: impl Into<String>, node: impl Into<Node>) {
        self.entries.push((key.into(), node.into()));
    }

    /// Delete the first or all entries for `key`, returning what was removed.
    pub fn remove(&mut self, key: &str, mode: RemoveMode) -> Vec<Node> {
        match mode {
            RemoveMode::First => self
                .entries
                .iter()
                .position(|(k, _)| k == key)
                .map(|idx| vec![self.entries.remove(idx).1])
                .unwrap_or_default(),
            RemoveMode::All => {
                let mut removed = Vec::new();
                let mut kept = Vec::with_capacity(self.entries.len());
                for (k, v) in self.entries.drain(..) {
                    if k == key {
                        removed.push(v);
                    } else {
                        kept.push((k, v));
                    }
                }
                self.entries = kept;
                removed
            }
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut Node)> {
        self.entries.iter_mut().map(|(k, v)| (k.as_str(), v))
    }

    /// Keys in order, duplicates included.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn entries(&self) -> &[(String, Node)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn mismatch(key: &str, expected: &str, node: &Node) -> VdfError {
    VdfError::TypeError {
        message: format!("Expected {} for '{}', got {}", expected, key, node.kind()),
        line: 0,
        hint: None,
        code: Some(409),
    }
}

impl<K: Into<String>, V: Into<Node>> FromIterator<(K, V)> for Block {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

impl IntoIterator for Block {
    type Item = (String, Node);
    type IntoIter = std::vec::IntoIter<(String, Node)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse VDF text with default options.
    pub fn parse(input: &str) -> Result<Self, VdfError> {
        crate::parser::parse(input)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, VdfError> {
        crate::parser::parse_file(path)
    }

    pub fn origin(&self) -> Option<&Path> {
        self.origin.as_deref()
    }

    pub fn root(&self) -> &Block {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Block {
        &mut self.root
    }

    pub fn get(&self, key: &str) -> Result<&Node, VdfError> {
        self.root.get(key)
    }

    pub fn get_all<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a Node> + 'a {
        self.root.get_all(key)
    }

    pub fn set(&mut self, key: impl Into<String>, node: impl Into<Node>) {
        self.root.set(key, node)
    }

    pub fn append(&mut self, key: impl Into<String>, node: impl Into<Node>) {
        self.root.append(key, node)
    }

    pub fn remove(&mut self, key: &str, mode: RemoveMode) -> Vec<Node> {
        self.root.remove(key, mode)
    }
}

// origin is metadata, not content
impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.root == other.root
    }
}

impl Eq for Document {}

impl From<Block> for Document {
    fn from(root: Block) -> Self {
        Self { root, origin: None }
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::writer::to_string(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Block {
        let mut user = Block::new();
        user.append("language", "english");

        let mut root = Block::new();
        root.append("platform", "linux");
        root.append("UserConfig", user);
        root.append("platform", "windows");
        root
    }

    #[test]
    fn test_get_missing_key_is_not_found() {
        let block = sample();
        let err = block.get("missing").unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.code(), Some(304));

        let doc = Document::from(block);
        assert!(doc.get("missing").unwrap_err().is_not_found());
        assert_eq!(doc.get("platform").unwrap().as_str(), Some("linux"));
    }

    #[test]
    fn test_set_replaces_first_match_only() {
        let mut block = sample();
        block.set("platform", "macos");
        let platforms: Vec<&str> = block.get_all("platform").filter_map(Node::as_str).collect();
        assert_eq!(platforms, vec!["macos", "windows"]);
        assert_eq!(block.len(), 3);

        block.set("installdir", "Team Fortress 2");
        assert_eq!(block.keys().last(), Some("installdir"));
        assert_eq!(block.get_str("installdir").unwrap(), "Team Fortress 2");
    }

    #[test]
    fn test_remove_modes() {
        let mut block = sample();
        assert!(block.remove("missing", RemoveMode::First).is_empty());
        assert!(block.remove("missing", RemoveMode::All).is_empty());
        assert_eq!(block.len(), 3);

        let removed = block.remove("platform", RemoveMode::First);
        assert_eq!(removed, vec![Node::from("linux")]);
        assert_eq!(block.keys().collect::<Vec<_>>(), vec!["UserConfig", "platform"]);

        let removed = block.remove("platform", RemoveMode::All);
        assert_eq!(removed, vec![Node::from("windows")]);
        assert!(!block.contains_key("platform"));
    }

    #[test]
    fn test_typed_getters_reject_wrong_kind() {
        let mut block = sample();

        let err = block.get_str("UserConfig").unwrap_err();
        assert!(matches!(err, VdfError::TypeError { .. }));
        assert_eq!(err.code(), Some(409));
        assert_eq!(block.get_block("platform").unwrap_err().code(), Some(409));
        assert_eq!(block.get_block_mut("platform").unwrap_err().code(), Some(409));

        block.get_block_mut("UserConfig").unwrap().set("language", "german");
        assert_eq!(block.get_block("UserConfig").unwrap().get_str("language").unwrap(), "german");
    }

    #[test]
    fn test_document_equality_ignores_origin() {
        let mut loaded = Document::from(sample());
        loaded.origin = Some(PathBuf::from("appmanifest_440.acf"));
        assert_eq!(loaded, Document::from(sample()));
    }
}
