use std::io;
use std::path::{Path, PathBuf};

/// Expand a leading `~/` to the user's home directory.
pub fn expand_home(path: &Path) -> io::Result<PathBuf> {
    let Some(rest) = path.to_str().and_then(|s| s.strip_prefix("~/")) else {
        return Ok(path.to_path_buf());
    };

    let home = dirs::home_dir().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::NotFound,
            "could not determine home directory for ~ expansion",
        )
    })?;
    Ok(home.join(rest))
}
