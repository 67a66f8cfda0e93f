pub type BufferResult<T> = Result<T, BufferError>;

#[derive(Debug, thiserror::Error)]
pub enum BufferError {
    #[error(transparent)]
    Store(#[from] io::StoreError),

    #[error("invalid configuration: {0}")]
    Config(#[from] crate::config::ConfigError),
}

impl BufferError {
    /// True when the failure only means the file is not there, which callers
    /// treat as a declined open or save rather than a fault.
    #[inline]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, BufferError::Store(e) if e.is_not_found())
    }
}
