/// Immutable view of the original file.
///
/// The bytes are memory-mapped once on open and never written through. An
/// empty file has no mapping at all, since there is nothing to address.
#[derive(Debug)]
pub struct BaseStore {
    _file: std::fs::File,
    mmap: Option<memmap2::Mmap>,
    path: std::path::PathBuf,
}

impl BaseStore {
    /// # Errors
    ///
    /// - [`crate::StoreError::NotFound`] if `path` does not exist.
    /// - [`crate::StoreError::Io`] if the file cannot be opened or mapped.
    /// - [`crate::StoreError::TooLarge`] if the length does not fit `usize`.
    pub fn open(path: impl AsRef<std::path::Path>) -> crate::StoreResult<Self> {
        let path_buf = path.as_ref().to_path_buf();
        let file = std::fs::File::open(&path_buf)
            .map_err(|e| crate::StoreError::from_io(&path_buf, e))?;
        let len = file
            .metadata()
            .map_err(|e| crate::StoreError::from_io(&path_buf, e))?
            .len();

        if usize::try_from(len).is_err() {
            return Err(crate::StoreError::TooLarge(len));
        }

        let mmap = if len == 0 {
            None
        } else {
            // SAFETY:
            // - File is opened read-only
            // - We keep the file handle alive in struct
            // - Caller only gets immutable &[u8]
            Some(unsafe { memmap2::Mmap::map(&file) }.map_err(|e| crate::StoreError::from_io(&path_buf, e))?)
        };

        tracing::debug!(path = %path_buf.display(), len, "base store opened");

        Ok(Self {
            _file: file,
            mmap,
            path: path_buf,
        })
    }

    /// The byte at `offset`, or `None` past the end of the file.
    #[inline]
    #[must_use]
    pub fn byte_at(&self, offset: u64) -> Option<u8> {
        let idx = usize::try_from(offset).ok()?;

        self.as_slice().get(idx).copied()
    }

    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        self.mmap.as_deref().unwrap_or(&[])
    }

    /// File length in bytes.
    #[inline]
    #[must_use]
    pub fn len(&self) -> u64 {
        // Checked against usize in `open`, so this widening cannot truncate.
        self.as_slice().len() as u64
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}
