use uuid::Uuid;

/// One user-composed chat unit.
///
/// Created by exactly one of three producers (typed text, image attachment,
/// recorded audio). Content is never mutated after creation — entries only
/// move (reorder) or disappear (delete). Never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatEntry {
    /// Opaque unique identifier, stable for the entry's lifetime
    pub id: Uuid,

    /// Entry text; empty string means "no text" for rendering purposes
    pub text: String,

    /// Reference to attached image data (data URI or equivalent handle)
    pub image_ref: Option<String>,

    /// Reference to attached audio data
    pub audio_ref: Option<String>,
}

impl ChatEntry {
    pub(crate) fn new(text: String, image_ref: Option<String>, audio_ref: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text,
            image_ref,
            audio_ref,
        }
    }

    /// Whether the entry carries any text, image, or audio.
    pub fn has_content(&self) -> bool {
        !self.text.is_empty() || self.image_ref.is_some() || self.audio_ref.is_some()
    }
}
