use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use crate::time_utils::current_unix_timestamp;

/// Sibling path a report is staged at before it replaces `destination`.
fn staging_path_for(destination: &Path, directory: &Path) -> PathBuf {
    let stem = destination
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("report");
    directory.join(format!(
        ".{stem}.partial-{}-{}",
        std::process::id(),
        current_unix_timestamp()
    ))
}

/// Replaces `destination` with `content` in one rename.
///
/// The previous report stays readable until the new one is fully flushed;
/// missing parent directories are created.
pub fn write_text_atomic(destination: &Path, content: &str) -> Result<()> {
    if destination.as_os_str().is_empty() {
        bail!("report destination cannot be empty");
    }
    if destination.is_dir() {
        bail!("report destination '{}' is a directory", destination.display());
    }

    let directory = match destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(directory)
        .with_context(|| format!("failed to create report directory {}", directory.display()))?;

    let staging = staging_path_for(destination, directory);
    let mut file = File::create(&staging)
        .with_context(|| format!("failed to stage report at {}", staging.display()))?;
    file.write_all(content.as_bytes())
        .and_then(|()| file.sync_all())
        .with_context(|| format!("failed to flush staged report {}", staging.display()))?;
    drop(file);

    if let Err(error) = std::fs::rename(&staging, destination) {
        let _ = std::fs::remove_file(&staging);
        return Err(error).with_context(|| {
            format!(
                "failed to move staged report into place at {}",
                destination.display()
            )
        });
    }
    Ok(())
}
