//! Maps a local directory tree onto a flat object key namespace

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// One planned transfer: an object key and the local file behind it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadEntry {
    /// Object key the file will be stored under
    pub key: String,
    /// Local file to read
    pub path: PathBuf,
}

/// Plans the uploads for every file below `dir`.
///
/// Children are visited in lexical order so the plan is deterministic. The
/// directory's own name is not part of any key; its contents land directly
/// under `base`.
///
/// # Errors
///
/// Returns the underlying `io::Error` when a directory cannot be listed.
pub fn plan_uploads(base: &str, dir: &Path) -> io::Result<Vec<UploadEntry>> {
    let mut entries = Vec::new();
    visit(base, dir, &mut entries)?;
    Ok(entries)
}

fn visit(prefix: &str, dir: &Path, out: &mut Vec<UploadEntry>) -> io::Result<()> {
    let mut children = fs::read_dir(dir)?.collect::<io::Result<Vec<_>>>()?;
    children.sort_by_key(fs::DirEntry::file_name);

    for child in children {
        let name = child.file_name().to_string_lossy().into_owned();
        let key = format!("{prefix}/{name}");
        if child.file_type()?.is_dir() {
            visit(&key, &child.path(), out)?;
        } else {
            out.push(UploadEntry {
                key,
                path: child.path(),
            });
        }
    }

    Ok(())
}
