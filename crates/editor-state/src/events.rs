/// Notifications for whoever renders the editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorEvent {
    Opened { path: std::path::PathBuf, size: u64 },
    /// The document or its window changed.
    Changed { size: u64 },
    Saved { path: std::path::PathBuf },
    Closed,
    Declined(crate::commands::Declined),
}

/// Fans events out to every live subscriber. A subscriber that dropped its
/// receiver is forgotten on the next send.
#[derive(Debug, Default)]
pub struct EventBus {
    subscribers: Vec<crossbeam_channel::Sender<EditorEvent>>,
}

impl EventBus {
    #[must_use]
    pub fn subscribe(&mut self) -> crossbeam_channel::Receiver<EditorEvent> {
        let (tx, rx) = crossbeam_channel::unbounded();
        self.subscribers.push(tx);
        rx
    }

    pub fn emit(&mut self, event: EditorEvent) {
        tracing::trace!(?event, subscribers = self.subscribers.len(), "emit");

        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }
}
