/// Whether the editor has a file loaded.
#[derive(Debug, Default)]
pub enum Session {
    #[default]
    NoDocument,
    Open(Box<editor_core::HexBuffer>),
}

impl Session {
    #[inline]
    #[must_use]
    pub fn is_open(&self) -> bool {
        matches!(self, Session::Open(_))
    }

    #[inline]
    #[must_use]
    pub fn buffer(&self) -> Option<&editor_core::HexBuffer> {
        match self {
            Session::Open(buffer) => Some(buffer),
            Session::NoDocument => None,
        }
    }

    #[inline]
    pub fn buffer_mut(&mut self) -> Option<&mut editor_core::HexBuffer> {
        match self {
            Session::Open(buffer) => Some(buffer),
            Session::NoDocument => None,
        }
    }

    /// Drops the loaded buffer, if any, and reports whether there was one.
    pub fn close(&mut self) -> bool {
        let was_open = self.is_open();
        *self = Session::NoDocument;
        was_open
    }
}
