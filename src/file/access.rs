use super::*;

impl VdfFile {
    /// Get a typed value using dot notation.
    ///
    /// Each segment takes the first matching key. Keys are matched exactly first,
    /// then ASCII case-insensitively, since Valve files mix `AppID` and `appid`.
    ///
    /// # Examples
    /// ```no_run
    /// # use vdf_cfg::VdfFile;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// # let manifest = VdfFile::from_file("appmanifest_440.acf")?;
    /// let appid: u32 = manifest.get("AppState.appid")?;
    /// let installdir: String = manifest.get("AppState.installdir")?;
    /// let auto_update: bool = manifest.get("AppState.AutoUpdateBehavior")?;
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    /// `NotFound` if the path is absent, `TypeError` if the value can't be converted to `T`.
    pub fn get<T>(&self, path: &str) -> Result<T, VdfError>
    where
        T: TryFrom<Node, Error = VdfError>,
    {
        let node = self.get_node(path)?;
        T::try_from(node.clone()).map_err(|e| enhance_error_with_line_info(e, path, &self.raw_content))
    }

    /// Like [`VdfFile::get`], but a missing path is `Ok(None)`.
    pub fn get_optional<T>(&self, path: &str) -> Result<Option<T>, VdfError>
    where
        T: TryFrom<Node, Error = VdfError>,
    {
        match self.get(path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Get a value with a fallback default.
    ///
    /// ```
    /// # use vdf_cfg::VdfFile;
    /// let file = VdfFile::from_str(r#""cfg" { "fov" "90" }"#).unwrap();
    /// assert_eq!(file.get_or("cfg.fov", 75u32), 90);
    /// assert_eq!(file.get_or("cfg.sensitivity", 2.5f64), 2.5);
    /// ```
    pub fn get_or<T>(&self, path: &str, default: T) -> T
    where
        T: TryFrom<Node, Error = VdfError>,
    {
        self.get(path).unwrap_or(default)
    }

    /// Every value stored under the last segment of `path`, in order.
    ///
    /// Returns an empty vector when the parent exists but has no such key.
    pub fn get_all<T>(&self, path: &str) -> Result<Vec<T>, VdfError>
    where
        T: TryFrom<Node, Error = VdfError>,
    {
        let segments = split_path(path);
        let Some((last, parents)) = segments.split_last() else {
            return Err(VdfError::not_found(path));
        };

        let parent = self.lookup_block(parents, path)?;
        let mut matches: Vec<&Node> = parent.get_all(last).collect();
        if matches.is_empty() {
            matches = parent
                .iter()
                .filter(|(k, _)| k.eq_ignore_ascii_case(last))
                .map(|(_, v)| v)
                .collect();
        }

        matches
            .into_iter()
            .map(|node| {
                T::try_from(node.clone()).map_err(|e| enhance_error_with_line_info(e, path, &self.raw_content))
            })
            .collect()
    }

    /// The raw node at `path`.
    pub fn get_node(&self, path: &str) -> Result<&Node, VdfError> {
        self.lookup(&split_path(path))
    }

    /// The node at the given key segments. Unlike the dotted-path methods,
    /// segments may contain dots.
    pub fn lookup(&self, segments: &[&str]) -> Result<&Node, VdfError> {
        let Some((last, parents)) = segments.split_last() else {
            return Err(VdfError::not_found(""));
        };
        let parent = self.lookup_block(parents, &segments.join("."))?;
        helpers::find_child(parent, last).ok_or_else(|| VdfError::not_found(segments.join(".")))
    }

    /// Keys of the block at `path`, in order and including duplicates.
    /// An empty path lists the top-level keys.
    pub fn get_keys(&self, path: &str) -> Result<Vec<String>, VdfError> {
        let block = if path.trim().is_empty() {
            &self.document.root
        } else {
            match self.get_node(path)? {
                Node::Block(block) => block,
                Node::Scalar(_) => {
                    return Err(VdfError::TypeError {
                        message: format!("Path '{}' is not a block", path),
                        line: helpers::find_config_line(path, &self.raw_content).0,
                        hint: Some("Only blocks have keys".into()),
                        code: Some(306),
                    });
                }
            }
        };
        Ok(block.keys().map(str::to_string).collect())
    }

    /// Check if a path exists.
    pub fn has(&self, path: &str) -> bool {
        self.get_node(path).is_ok()
    }

    /// Set the value at `path`, replacing the first match or appending.
    /// Missing intermediate blocks are created.
    ///
    /// ```
    /// # use vdf_cfg::VdfFile;
    /// let mut file = VdfFile::new();
    /// file.set("AppState.UserConfig.language", "english").unwrap();
    /// assert_eq!(file.get::<String>("AppState.UserConfig.language").unwrap(), "english");
    /// ```
    pub fn set(&mut self, path: &str, node: impl Into<Node>) -> Result<(), VdfError> {
        let segments = split_path(path);
        let Some((last, parents)) = segments.split_last() else {
            return Err(VdfError::not_found(path));
        };

        let parent = self.lookup_block_mut(parents, path, true)?;
        match helpers::child_index(parent, last) {
            Some(idx) => parent.entries_mut()[idx].1 = node.into(),
            None => parent.append(*last, node),
        }
        self.refresh_raw_content();
        Ok(())
    }

    /// Append a value under `path`, keeping existing entries with the same key.
    pub fn append(&mut self, path: &str, node: impl Into<Node>) -> Result<(), VdfError> {
        let segments = split_path(path);
        let Some((last, parents)) = segments.split_last() else {
            return Err(VdfError::not_found(path));
        };

        self.lookup_block_mut(parents, path, true)?.append(*last, node);
        self.refresh_raw_content();
        Ok(())
    }

    /// Remove the first or all entries at `path`. The parent must exist.
    pub fn remove(&mut self, path: &str, mode: RemoveMode) -> Result<Vec<Node>, VdfError> {
        let segments = split_path(path);
        let Some((last, parents)) = segments.split_last() else {
            return Err(VdfError::not_found(path));
        };

        let parent = self.lookup_block_mut(parents, path, false)?;
        // remove under the spelling that lookups would resolve to
        let key = match helpers::child_index(parent, last) {
            Some(idx) => parent.entries()[idx].0.clone(),
            None => return Ok(Vec::new()),
        };
        let removed = parent.remove(&key, mode);
        self.refresh_raw_content();
        Ok(removed)
    }

    fn lookup_block(&self, segments: &[&str], path: &str) -> Result<&Block, VdfError> {
        let mut current = &self.document.root;
        for seg in segments {
            current = match helpers::find_child(current, seg) {
                Some(Node::Block(block)) => block,
                Some(Node::Scalar(_)) => return Err(not_a_block(seg, path)),
                None => return Err(VdfError::not_found(path)),
            };
        }
        Ok(current)
    }

    fn lookup_block_mut(&mut self, segments: &[&str], path: &str, create: bool) -> Result<&mut Block, VdfError> {
        let mut current = &mut self.document.root;
        for seg in segments {
            let idx = match helpers::child_index(current, seg) {
                Some(idx) => idx,
                None if create => {
                    current.append(*seg, Block::new());
                    current.len() - 1
                }
                None => return Err(VdfError::not_found(path)),
            };
            current = match &mut current.entries_mut()[idx].1 {
                Node::Block(block) => block,
                Node::Scalar(_) => return Err(not_a_block(seg, path)),
            };
        }
        Ok(current)
    }
}

fn split_path(path: &str) -> Vec<&str> {
    if path.trim().is_empty() {
        Vec::new()
    } else {
        path.split('.').collect()
    }
}

fn not_a_block(segment: &str, path: &str) -> VdfError {
    VdfError::TypeError {
        message: format!("'{}' in path '{}' is a scalar, not a block", segment, path),
        line: 0,
        hint: Some("Only blocks can contain further keys".into()),
        code: Some(307),
    }
}

/// Attach the source line of `path` to conversion errors.
fn enhance_error_with_line_info(e: VdfError, path: &str, raw_content: &str) -> VdfError {
    match e {
        VdfError::TypeError { message, hint, code, .. } => {
            let (line, snippet) = helpers::find_config_line(path, raw_content);
            if line > 0 {
                VdfError::TypeError {
                    message: format!("{}\n  → {}", message, snippet),
                    line,
                    hint,
                    code,
                }
            } else {
                VdfError::TypeError { message, line: 0, hint, code }
            }
        }
        other => other,
    }
}
