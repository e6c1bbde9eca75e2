use anyhow::{anyhow, Context, Result};
use std::fs::File;
use std::path::Path;

/// Opens `path` for reading; `kind` names the file in the error message.
pub fn open(path: &Path, kind: &str) -> Result<File> {
    match File::open(path) {
        Err(e) => Err(anyhow!("Opening {} file `{}`: {}", kind, path.display(), e)),
        Ok(file) => Ok(file),
    }
}

/// Creates (or truncates) `path`, creating missing parent directories first.
pub fn create(path: &Path, kind: &str) -> Result<File> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Creating directory for {} file `{}`", kind, path.display()))?;
    }
    File::create(path).with_context(|| format!("Creating {} file `{}`", kind, path.display()))
}
