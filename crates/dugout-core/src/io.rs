// Small file-system helpers shared by the stores and CSV writers.

use std::io::Write;
use std::path::{Path, PathBuf};

/// Write `bytes` to `path` by writing a sibling temp file and renaming it over
/// the target, creating parent directories as needed.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp = path.with_file_name(tmp_name);
    let result = write_and_sync(&tmp, bytes).and_then(|()| std::fs::rename(&tmp, path));
    if result.is_err() {
        let _ = std::fs::remove_file(&tmp);
    }
    result
}

fn write_and_sync(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}

/// The newest `{prefix}*.{ext}` file in `dir`, by file name. Timestamped
/// names (`YYYYmmdd_HHMMSS`) sort chronologically.
pub fn latest_file(dir: &Path, prefix: &str, ext: &str) -> Option<PathBuf> {
    let suffix = format!(".{ext}");
    std::fs::read_dir(dir)
        .ok()?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file())
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with(prefix) && n.ends_with(&suffix))
        })
        .max_by(|a, b| a.file_name().cmp(&b.file_name()))
}

/// Timestamp used in generated file names.
pub fn file_timestamp(now: chrono::NaiveDateTime) -> String {
    now.format("%Y%m%d_%H%M%S").to_string()
}
