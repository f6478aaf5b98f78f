// Author: Dustin Pilgrim
// License: GPL-3.0-or-later

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::ast::{Block, Document, Node, RemoveMode};
use crate::options::{ParseOptions, WriteOptions};
use crate::utils::expand_home;
use crate::{parser, writer, VdfError};

mod access;
mod conversion;
mod helpers;
mod validation;

/// A VDF document bound to the file (or text) it was loaded from.
///
/// Lookups take dotted paths such as `"AppState.UserConfig.language"`.
/// Keys that themselves contain dots are reachable through [`VdfFile::lookup`]
/// or the [`Block`] API.
///
/// Error line numbers refer to the loaded text, re-rendered after each
/// `set`/`append`/`remove`. Edits made through `document_mut` are not reflected.
#[derive(Debug)]
pub struct VdfFile {
    document: Document,
    raw_content: String, // kept for error line lookup
    write_options: WriteOptions,
}

impl VdfFile {
    pub fn new() -> Self {
        Self {
            document: Document::new(),
            raw_content: String::new(),
            write_options: WriteOptions::default(),
        }
    }

    /// Load and parse a VDF file. A leading `~/` is expanded.
    ///
    /// # Example
    /// ```no_run
    /// # use vdf_cfg::VdfFile;
    /// # fn main() -> Result<(), vdf_cfg::VdfError> {
    /// let manifest = VdfFile::from_file("~/.steam/steam/steamapps/appmanifest_440.acf")?;
    /// let name: String = manifest.get("AppState.name")?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, VdfError> {
        Self::from_file_with(path, &ParseOptions::default())
    }

    pub fn from_file_with<P: AsRef<Path>>(path: P, options: &ParseOptions) -> Result<Self, VdfError> {
        let path = expand_home(path.as_ref())?;
        let content = fs::read_to_string(&path)?;
        log::debug!("loaded {} ({} bytes)", path.display(), content.len());

        let mut document = parser::parse_with(&content, options)?;
        document.origin = Some(path);

        Ok(Self {
            document,
            raw_content: content,
            write_options: WriteOptions::default(),
        })
    }

    /// Load from the primary path, or from the fallback if the primary does not exist.
    ///
    /// Only a missing primary file triggers the fallback; syntax errors are returned as-is.
    pub fn from_file_with_fallback<P: AsRef<Path>>(primary: P, fallback: P) -> Result<Self, VdfError> {
        match Self::from_file(&primary) {
            Err(VdfError::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
                log::debug!(
                    "{} not found, trying {}",
                    primary.as_ref().display(),
                    fallback.as_ref().display()
                );
                Self::from_file(&fallback)
            }
            other => other,
        }
    }

    /// Parse VDF text (no file, no origin).
    pub fn from_str(content: &str) -> Result<Self, VdfError> {
        Ok(Self {
            document: parser::parse(content)?,
            raw_content: content.to_string(),
            write_options: WriteOptions::default(),
        })
    }

    pub fn with_write_options(mut self, options: WriteOptions) -> Self {
        self.write_options = options;
        self
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn into_document(self) -> Document {
        self.document
    }

    pub fn root(&self) -> &Block {
        &self.document.root
    }

    pub fn path(&self) -> Option<&Path> {
        self.document.origin()
    }

    /// Write back to the file this was loaded from.
    pub fn save(&mut self) -> Result<(), VdfError> {
        let path: PathBuf = self.document.origin.clone().ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidInput, "document has no origin path; use save_as")
        })?;
        self.write_to(&path)
    }

    /// Write to `path` and make it the new origin.
    pub fn save_as<P: AsRef<Path>>(&mut self, path: P) -> Result<(), VdfError> {
        let path = expand_home(path.as_ref())?;
        self.write_to(&path)?;
        self.document.origin = Some(path);
        Ok(())
    }

    /// Re-render the text used for error line lookup.
    fn refresh_raw_content(&mut self) {
        self.raw_content = writer::to_string_with(&self.document, &self.write_options);
    }

    fn write_to(&mut self, path: &Path) -> Result<(), VdfError> {
        let text = writer::to_string_with(&self.document, &self.write_options);
        fs::write(path, &text)?;
        log::debug!("saved {} ({} bytes)", path.display(), text.len());
        self.raw_content = text;
        Ok(())
    }
}

impl Default for VdfFile {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Document> for VdfFile {
    fn from(document: Document) -> Self {
        Self {
            raw_content: writer::to_string(&document),
            document,
            write_options: WriteOptions::default(),
        }
    }
}

impl fmt::Display for VdfFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&writer::to_string_with(&self.document, &self.write_options))
    }
}

#[cfg(test)]
mod tests;
