use std::sync::Arc;
use uuid::Uuid;

use crate::error::AppError;
use super::entry::ChatEntry;

/// Observer notified with the full entry list after every structural change.
///
/// The host uses this to re-render the chat container. Replaces the captured
/// mutable-closure pattern so the list owns its state exclusively.
pub trait ChatObserver: Send + Sync {
    fn entries_changed(&self, entries: &[ChatEntry]);
}

/// Interactive confirmation gate for entry deletion.
///
/// The host shows a confirm dialog; tests answer directly.
pub trait DeleteConfirmer {
    fn confirm(&self, entry: &ChatEntry) -> bool;
}

/// Ordered, mutable list of chat entries.
///
/// Insertion order defines display and send order. Owned by one modal
/// session; discarded when the session closes, never persisted.
pub struct ChatList {
    entries: Vec<ChatEntry>,
    observer: Option<Arc<dyn ChatObserver>>,
}

impl ChatList {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            observer: None,
        }
    }

    /// Attach the observer that receives every structural change.
    pub fn set_observer(&mut self, observer: Arc<dyn ChatObserver>) {
        self.observer = Some(observer);
    }

    pub fn entries(&self) -> &[ChatEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append a new entry with a freshly generated unique id.
    ///
    /// No content validation beyond caller discipline — an all-empty entry is
    /// accepted and renders as a visually empty message.
    pub fn append(
        &mut self,
        text: String,
        image_ref: Option<String>,
        audio_ref: Option<String>,
    ) -> &ChatEntry {
        let entry = ChatEntry::new(text, image_ref, audio_ref);
        self.entries.push(entry);
        self.notify();
        self.entries.last().expect("entry was just pushed")
    }

    /// Move the entry at `from` to position `to` in a single atomic step.
    ///
    /// Both indices must address current positions. `reorder(i, i)` leaves
    /// the list unchanged (but still notifies, matching a drag released in
    /// place).
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidIndex` if either index is out of range;
    /// the list is untouched in that case.
    pub fn reorder(&mut self, from: usize, to: usize) -> Result<(), AppError> {
        let len = self.entries.len();
        for index in [from, to] {
            if index >= len {
                return Err(AppError::InvalidIndex { index, len });
            }
        }

        let moved = self.entries.remove(from);
        self.entries.insert(to, moved);
        self.notify();
        Ok(())
    }

    /// Delete the entry with `id` after interactive confirmation.
    ///
    /// Declined confirmation leaves the list untouched and is not an error.
    /// Removal is immediate and irreversible.
    ///
    /// # Returns
    ///
    /// `true` if an entry was removed, `false` if the confirmation was
    /// declined or no entry has that id.
    pub fn delete(&mut self, id: Uuid, confirmer: &dyn DeleteConfirmer) -> bool {
        let Some(position) = self.entries.iter().position(|e| e.id == id) else {
            return false;
        };

        if !confirmer.confirm(&self.entries[position]) {
            return false;
        }

        self.entries.remove(position);
        self.notify();
        true
    }

    /// Produce the entries' text fields in display order.
    ///
    /// Image and audio references are not forwarded on this path; entries
    /// with empty text contribute an empty line. This is the hand-off point
    /// to the tool-calling protocol.
    pub fn submit(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.text.clone()).collect()
    }

    fn notify(&self) {
        if let Some(observer) = &self.observer {
            observer.entries_changed(&self.entries);
        }
    }
}

impl Default for ChatList {
    fn default() -> Self {
        Self::new()
    }
}
