use std::io::Write;

/// Writes `path` through a temporary file created in the same directory,
/// then renames it over the target.
///
/// The temporary file must live next to the target: a rename across
/// filesystems is not atomic and fails outright on most platforms.
///
/// # Errors
///
/// Returns [`crate::StoreError`] if the temporary file cannot be created,
/// if `fill` fails, or if the final rename fails. The target is untouched in
/// every error case.
pub fn write_atomic<F>(path: impl AsRef<std::path::Path>, fill: F) -> crate::StoreResult<()>
where
    F: FnOnce(&mut dyn Write) -> std::io::Result<()>,
{
    let path = path.as_ref();
    let parent_dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => std::path::Path::new("."),
    };
    let temp_save_file = tempfile::Builder::new()
        .prefix(".save_tmp_")
        .tempfile_in(parent_dir)
        .map_err(|e| crate::StoreError::from_io(path, e))?;

    let mut writer = std::io::BufWriter::new(temp_save_file);
    fill(&mut writer).map_err(|e| crate::StoreError::from_io(path, e))?;

    let temp_save_file = writer
        .into_inner()
        .map_err(|e| crate::StoreError::from_io(path, e.into_error()))?;

    temp_save_file
        .as_file()
        .sync_all()
        .map_err(|e| crate::StoreError::from_io(path, e))?;
    temp_save_file
        .persist(path)
        .map_err(|e| crate::StoreError::from_io(path, e.error))?;

    tracing::debug!(path = %path.display(), "file written");

    Ok(())
}
