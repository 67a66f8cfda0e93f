pub type EditorResult<T> = Result<T, EditorError>;

#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    #[error(transparent)]
    Buffer(#[from] editor_core::BufferError),

    #[error("invalid search pattern: {0}")]
    Pattern(#[from] crate::search::PatternError),
}

impl EditorError {
    #[inline]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, EditorError::Buffer(e) if e.is_not_found())
    }
}
