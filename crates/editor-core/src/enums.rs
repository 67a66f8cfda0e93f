/// Tag of one primitive overlay mutation.
///
/// There is no overwrite kind: replacing a byte is a delete followed by an
/// insert at the same shift, and each half inverts on its own.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditKind {
    Insert,
    Delete,
}

/// Where [`crate::HexBuffer::add_byte`] puts its byte relative to the view
/// index it is given.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Placement {
    /// Stage the byte into the slot of the byte at `index`. An unedited
    /// original byte is replaced by a one-byte entry, an edited slot is
    /// overwritten inside its entry.
    InPlace,
    /// Place a new byte right after the byte at `index - 1`, so it becomes
    /// the byte at `index` and everything after moves one byte on.
    Grow,
}

/// Typing mode reported by the UI.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InputMode {
    /// Typed digits replace existing bytes. Only at the end of the window
    /// does typing grow the document.
    #[default]
    Overwrite,
    /// Typed digits at a byte boundary create a new byte.
    Insert,
}

impl InputMode {
    /// Placement used for a keystroke at a byte boundary.
    #[inline]
    #[must_use]
    pub fn boundary_placement(self, at_end: bool) -> Placement {
        match self {
            InputMode::Overwrite if !at_end => Placement::InPlace,
            _ => Placement::Grow,
        }
    }
}

impl std::str::FromStr for InputMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "overwrite" | "ovr" => Ok(InputMode::Overwrite),
            "insert" | "ins" => Ok(InputMode::Insert),
            other => Err(format!("unknown input mode `{other}`")),
        }
    }
}
