use crate::shared::Result;
use std::fs;
use std::path::Path;

/// Upper bound for the persisted cache document (50 MB)
pub const MAX_CACHE_FILE_SIZE: u64 = 50 * 1024 * 1024;

/// Validates that an existing path is a regular file and not a symbolic link
///
/// `symlink_metadata()` is used so the link itself is inspected, not its target.
///
/// # Errors
/// Returns an error if metadata cannot be read, the path is a symbolic link,
/// or it is not a regular file
pub fn validate_regular_file(path: &Path, file_description: &str) -> Result<()> {
    let metadata = fs::symlink_metadata(path).map_err(|e| {
        anyhow::anyhow!(
            "Failed to read {} metadata: {}",
            file_description,
            e
        )
    })?;

    if metadata.is_symlink() {
        anyhow::bail!(
            "Security: {} is a symbolic link. For security reasons, symbolic links are not allowed.",
            path.display()
        );
    }

    if !metadata.is_file() {
        anyhow::bail!("{} is not a regular file", path.display());
    }

    Ok(())
}

/// Validates file size is within acceptable limits
///
/// # Errors
/// Returns an error if the file size exceeds `max_size`
pub fn validate_file_size(file_size: u64, path: &Path, max_size: u64) -> Result<()> {
    if file_size > max_size {
        anyhow::bail!(
            "Security: {} is too large ({} bytes). Maximum allowed size is {} bytes.",
            path.display(),
            file_size,
            max_size
        );
    }
    Ok(())
}
