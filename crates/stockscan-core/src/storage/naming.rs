//! File naming for stored uploads and dumps.

use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::Path;

use chrono::Local;
use tracing::warn;

use crate::error::StorageError;

/// Local timestamp with one-second granularity, `YYYYmmdd_HHMMSS`.
pub fn timestamp() -> String {
    Local::now().format("%Y%m%d_%H%M%S").to_string()
}

/// Create a new file named `<prefix>_<stamp>.<ext>` in `dir`.
///
/// Requests landing in the same second get a counter suffix, see
/// [`create_unique_named`].
pub fn create_unique(
    dir: &Path,
    prefix: &str,
    stamp: &str,
    ext: &str,
) -> Result<(String, File), StorageError> {
    create_unique_named(dir, &format!("{prefix}_{stamp}"), ext)
}

/// Create a new file named `<stem>.<ext>` in `dir`.
///
/// The file is opened with create-new semantics. If the name is taken, a
/// counter is appended (`<stem>_1.<ext>`, `_2`, ...) until creation
/// succeeds, so no existing file is ever reused. An empty `ext` gives a name
/// without extension.
pub fn create_unique_named(dir: &Path, stem: &str, ext: &str) -> Result<(String, File), StorageError> {
    let mut attempt: u32 = 0;
    loop {
        let stem = if attempt == 0 {
            stem.to_string()
        } else {
            format!("{stem}_{attempt}")
        };
        let name = if ext.is_empty() {
            stem
        } else {
            format!("{stem}.{ext}")
        };
        let path = dir.join(&name);

        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => return Ok((name, file)),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => attempt += 1,
            Err(e) => return Err(StorageError::io(path, e)),
        }
    }
}

/// Write `bytes` to a freshly created file, removing it if the write fails.
pub(crate) fn write_new(path: &Path, mut file: File, bytes: &[u8]) -> Result<(), StorageError> {
    if let Err(e) = file.write_all(bytes).and_then(|()| file.flush()) {
        drop(file);
        if let Err(remove_err) = fs::remove_file(path) {
            warn!("Failed to remove partial file {}: {}", path.display(), remove_err);
        }
        return Err(StorageError::io(path, e));
    }
    Ok(())
}

/// Reduce a client-supplied filename to a safe flat name.
///
/// Non-ASCII characters are dropped, path separators become word breaks,
/// whitespace runs become `_`, anything outside `[A-Za-z0-9._-]` is removed
/// and leading/trailing dots and underscores are stripped. The result may be
/// empty.
pub fn sanitize_filename(filename: &str) -> String {
    let ascii: String = filename
        .chars()
        .filter(char::is_ascii)
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();

    let joined = ascii.split_whitespace().collect::<Vec<_>>().join("_");

    joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect::<String>()
        .trim_matches(|c| c == '.' || c == '_')
        .to_string()
}
