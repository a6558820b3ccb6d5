//! Filesystem adapters: reading logo files and saving exported artifacts.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::domain::{AppError, Artifact, Result};

/// Read a logo file, refusing files larger than `max_bytes`.
///
/// # Errors
/// Returns `Io` if the file cannot be read and `LogoTooLarge` over the limit.
pub fn read_logo_file(path: &Path, max_bytes: u64) -> Result<Vec<u8>> {
    let file = fs::File::open(path)
        .map_err(|e| AppError::io(format!("Failed to open logo: {}", path.display()), e))?;

    let size = file
        .metadata()
        .map_err(|e| AppError::io(format!("Failed to stat logo: {}", path.display()), e))?
        .len();
    if size > max_bytes {
        return Err(AppError::LogoTooLarge {
            size,
            limit: max_bytes,
        });
    }

    let mut bytes = Vec::new();
    file.take(max_bytes.saturating_add(1))
        .read_to_end(&mut bytes)
        .map_err(|e| AppError::io(format!("Failed to read logo: {}", path.display()), e))?;

    let read = bytes.len() as u64;
    if read > max_bytes {
        return Err(AppError::LogoTooLarge {
            size: read,
            limit: max_bytes,
        });
    }
    Ok(bytes)
}

/// Write `artifact` into `dir` under its own filename.
///
/// The bytes go to a hidden temporary file first and are renamed into place,
/// so an interrupted save never leaves a truncated artifact.
///
/// # Errors
/// Returns `Io` if the directory cannot be created or the file written.
pub fn save_artifact(dir: &Path, artifact: &Artifact) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .map_err(|e| AppError::io(format!("Failed to create output directory: {}", dir.display()), e))?;

    let target = dir.join(&artifact.filename);
    let temp = dir.join(format!(".{}.part", artifact.filename));

    if let Err(e) = fs::write(&temp, &artifact.bytes) {
        let _ = fs::remove_file(&temp);
        return Err(AppError::io(format!("Failed to write {}", temp.display()), e));
    }
    fs::rename(&temp, &target).map_err(|e| {
        let _ = fs::remove_file(&temp);
        AppError::io(format!("Failed to move export into place: {}", target.display()), e)
    })?;

    tracing::info!(path = %target.display(), size = artifact.bytes.len(), "Saved export");
    Ok(target)
}
