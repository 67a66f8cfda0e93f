use crate::commands::{Caret, Command, Declined, Outcome, Pane};
use crate::pipeline::{Pipeline, Step};

/// The single editor instance a UI drives.
///
/// - Every UI action is a [`Command`] run through [`Editor::dispatch`],
///   wrapped in the [`Pipeline`] that fits it.
/// - Opening and saving are direct calls, since they are the only
///   operations that can fail.
#[derive(Debug)]
pub struct Editor {
    session: crate::session::Session,
    config: editor_core::BufferConfig,
    mode: editor_core::InputMode,
    caret: Caret,
    pattern: Option<Vec<u8>>,
    matches: Vec<usize>,
    events: crate::events::EventBus,
}

/*

==================================
========= SESSION CONTROL ========
==================================

*/

impl Editor {
    #[must_use]
    pub fn new(config: editor_core::BufferConfig) -> Self {
        Self {
            session: crate::session::Session::NoDocument,
            config,
            mode: editor_core::InputMode::default(),
            caret: Caret::default(),
            pattern: None,
            matches: Vec::new(),
            events: crate::events::EventBus::default(),
        }
    }

    /// Loads `path`, replacing any open document.
    ///
    /// # Errors
    ///
    /// Returns [`crate::EditorError::Buffer`] if the file cannot be opened.
    /// The editor keeps whatever it had open before.
    pub fn open(&mut self, path: impl AsRef<std::path::Path>) -> crate::errors::EditorResult<()> {
        let path = path.as_ref();
        let buffer = editor_core::HexBuffer::open(path, self.config.clone()).inspect_err(|e| {
            tracing::warn!(path = %path.display(), error = %e, "open failed");
        })?;
        let size = buffer.get_size();

        self.session = crate::session::Session::Open(Box::new(buffer));
        self.caret = Caret::default();
        self.research();

        tracing::debug!(path = %path.display(), size, "document opened");
        self.events.emit(crate::events::EditorEvent::Opened {
            path: path.to_path_buf(),
            size,
        });

        Ok(())
    }

    /// Writes the document to `path` and closes it. `Ok(false)` when nothing
    /// is loaded.
    ///
    /// # Errors
    ///
    /// Returns [`crate::EditorError::Buffer`] if the destination cannot be
    /// written. The document stays open with its history intact.
    pub fn save_as(&mut self, path: impl AsRef<std::path::Path>) -> crate::errors::EditorResult<bool> {
        let path = path.as_ref();
        let Some(buffer) = self.session.buffer() else {
            self.decline(Declined::NoDocument);
            return Ok(false);
        };

        buffer.save_as(path).inspect_err(|e| {
            tracing::warn!(path = %path.display(), error = %e, "save failed");
        })?;

        self.events.emit(crate::events::EditorEvent::Saved {
            path: path.to_path_buf(),
        });
        self.close();

        Ok(true)
    }

    /// Drops the document with its history and cursors.
    pub fn close(&mut self) -> bool {
        let was_open = self.session.close();

        if was_open {
            self.caret = Caret::default();
            self.matches.clear();
            self.events.emit(crate::events::EditorEvent::Closed);
        }

        was_open
    }

    /// Drops every extra cursor. Harmless without a document or cursors.
    pub fn reset_cursors(&mut self) {
        if let Some(buffer) = self.session.buffer_mut() {
            buffer.reset_cursors();
        }
    }

    pub fn subscribe(&mut self) -> crossbeam_channel::Receiver<crate::events::EditorEvent> {
        self.events.subscribe()
    }
}

/*

==================================
============ QUERIES =============
==================================

*/

impl Editor {
    #[inline]
    #[must_use]
    pub fn session(&self) -> &crate::session::Session {
        &self.session
    }

    #[inline]
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.session.is_open()
    }

    #[inline]
    #[must_use]
    pub fn buffer(&self) -> Option<&editor_core::HexBuffer> {
        self.session.buffer()
    }

    #[inline]
    #[must_use]
    pub fn mode(&self) -> editor_core::InputMode {
        self.mode
    }

    #[inline]
    #[must_use]
    pub fn caret(&self) -> Caret {
        self.caret
    }

    #[inline]
    #[must_use]
    pub fn matches(&self) -> &[usize] {
        &self.matches
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &editor_core::BufferConfig {
        &self.config
    }

    /// What the panes should show right now; `None` without a document.
    #[must_use]
    pub fn frame(&self) -> Option<crate::frame::Frame> {
        self.session
            .buffer()
            .map(|buffer| crate::frame::Frame::capture(buffer, self.caret, &self.matches, self.mode))
    }
}

/*

==================================
============ DISPATCH ============
==================================

*/

impl Editor {
    /// Runs one UI command.
    pub fn dispatch(&mut self, command: Command) -> Outcome {
        tracing::trace!(?command, "dispatch");

        // Editor-level settings apply with or without a document.
        match &command {
            Command::SetMode(mode) => self.mode = *mode,
            Command::Find(pattern) => self.pattern.clone_from(pattern),
            _ => {}
        }

        if !self.session.is_open() {
            return self.decline(Declined::NoDocument);
        }

        let mode = self.mode;
        let result = match command {
            Command::Type { pane, position, ch } => self.run(Pipeline::EDIT, |buffer, caret| {
                let next = match pane {
                    Pane::Hex => buffer.update_from_hex_position(position, ch, mode),
                    Pane::Text => buffer.update_from_text_position(position, ch, mode),
                };
                caret.set(pane, next);
                Ok(next != position)
            }),
            Command::Backspace { pane, position } => self.run(Pipeline::EDIT, |buffer, caret| {
                let next = match pane {
                    Pane::Hex => buffer.backspace_event_from_hex(position),
                    Pane::Text => buffer.backspace_event_from_text(position),
                };
                caret.set(pane, next);
                Ok(next != position)
            }),
            Command::Undo => self.run(Pipeline::HISTORY, |buffer, _| {
                buffer.undo().then_some(true).ok_or(Declined::HistoryExhausted)
            }),
            Command::Redo => self.run(Pipeline::HISTORY, |buffer, _| {
                buffer.redo().then_some(true).ok_or(Declined::HistoryExhausted)
            }),
            Command::Scroll(row) => self.run(Pipeline::VIEW, |buffer, _| {
                buffer.scroll_to(row);
                Ok(true)
            }),
            Command::OpenCursor(position) => self.run(Pipeline::VIEW, |buffer, _| {
                buffer.open_cursor(position);
                Ok(true)
            }),
            Command::ResetCursors => self.run(Pipeline::VIEW, |buffer, _| {
                buffer.reset_cursors();
                Ok(true)
            }),
            Command::SetMode(_) | Command::Find(_) => self.run(Pipeline::VIEW, |_, _| Ok(true)),
        };

        match result {
            Ok(frame) => {
                self.events.emit(crate::events::EditorEvent::Changed { size: frame.size });
                Outcome::Changed(frame)
            }
            Err(reason) => self.decline(reason),
        }
    }

    /// Wraps `action` in the stages of `pipeline` and captures the frame.
    ///
    /// `action` reports whether the buffer moved the caret it was handed. An
    /// edit command that did not, and left the history alone, is reported as
    /// [`Declined::Ignored`] with the stored caret untouched.
    fn run<F>(&mut self, pipeline: Pipeline, action: F) -> Result<crate::frame::Frame, Declined>
    where
        F: FnOnce(&mut editor_core::HexBuffer, &mut Caret) -> Result<bool, Declined>,
    {
        let saved = self.caret;
        let Some(buffer) = self.session.buffer_mut() else {
            return Err(Declined::NoDocument);
        };
        let edits_before = buffer.log().undo_len();

        let moved = action(buffer, &mut self.caret)?;

        if pipeline == Pipeline::EDIT && !moved && buffer.log().undo_len() == edits_before {
            self.caret = saved;
            return Err(Declined::Ignored);
        }

        for step in pipeline.steps() {
            match step {
                Step::PreserveCaret => self.caret = saved,
                Step::Refresh => buffer.refresh(),
                Step::Research => {}
            }
        }
        if pipeline.has(Step::Research) {
            self.research();
        }

        self.frame().ok_or(Declined::NoDocument)
    }

    /// Re-runs the search pattern over the visible window.
    fn research(&mut self) {
        self.matches = match (&self.pattern, self.session.buffer()) {
            (Some(pattern), Some(buffer)) => crate::search::find_all(buffer.shown(), pattern),
            _ => Vec::new(),
        };
    }

    fn decline(&mut self, reason: Declined) -> Outcome {
        tracing::debug!(%reason, "command declined");
        self.events.emit(crate::events::EditorEvent::Declined(reason));
        Outcome::Unchanged(reason)
    }
}
