use crate::error::AppError;
use crate::notify::Notifier;
use crate::protocol::{ProcessOutcome, Processor};
use crate::vault::Vault;
use crate::wav::audio_data_uri;

use super::list::ChatList;

/// Which composition surface the modal presents.
///
/// Both surfaces are supported as configuration rather than picking one:
/// a freeform multi-entry chat list, or a single voice memo that goes
/// straight to the tool protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposerMode {
    /// Multi-entry list of text/image/audio messages
    Freeform,
    /// One recorded voice memo, no list
    AudioCapture,
}

impl ComposerMode {
    /// Parse the settings string ("freeform" | "audio").
    pub fn from_settings(mode: &str) -> Result<Self, String> {
        match mode {
            "freeform" => Ok(ComposerMode::Freeform),
            "audio" => Ok(ComposerMode::AudioCapture),
            other => Err(format!("Unknown composer mode '{}'", other)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ComposerMode::Freeform => "freeform",
            ComposerMode::AudioCapture => "audio",
        }
    }
}

/// One modal session: the entry list, the three input producers, and the
/// hand-off to the tool-calling protocol.
///
/// Discarded when the modal closes; nothing here is persisted.
pub struct ComposerSession {
    mode: ComposerMode,
    list: ChatList,
    captured_audio: Option<Vec<u8>>,
}

impl ComposerSession {
    pub fn new(mode: ComposerMode) -> Self {
        Self {
            mode,
            list: ChatList::new(),
            captured_audio: None,
        }
    }

    pub fn mode(&self) -> ComposerMode {
        self.mode
    }

    pub fn list(&self) -> &ChatList {
        &self.list
    }

    pub fn list_mut(&mut self) -> &mut ChatList {
        &mut self.list
    }

    /// Free-text producer. Trims the input; whitespace-only submissions are
    /// dropped without creating an entry.
    ///
    /// # Returns
    ///
    /// `true` if an entry was appended.
    pub fn send_text(&mut self, input: &str) -> bool {
        let text = input.trim();
        if text.is_empty() {
            return false;
        }
        self.list.append(text.to_string(), None, None);
        true
    }

    /// Image producer. Appends an entry carrying only the image reference.
    pub fn attach_image(&mut self, image_ref: String) {
        self.list.append(String::new(), Some(image_ref), None);
    }

    /// Audio producer, called with complete WAV bytes when recording stops.
    ///
    /// In freeform mode the memo becomes a list entry (as a data URI); in
    /// audio-capture mode it is held for the next `process()` call,
    /// replacing any previous capture.
    pub fn finish_recording(&mut self, wav_data: Vec<u8>) {
        match self.mode {
            ComposerMode::Freeform => {
                let audio_ref = audio_data_uri(&wav_data);
                self.list.append(String::new(), None, Some(audio_ref));
            }
            ComposerMode::AudioCapture => {
                self.captured_audio = Some(wav_data);
            }
        }
    }

    /// Whether a voice memo is waiting to be processed (audio-capture mode).
    pub fn has_captured_audio(&self) -> bool {
        self.captured_audio.is_some()
    }

    /// Hand the session's content to the tool-calling protocol.
    ///
    /// Freeform mode sends the entries' text lines. Audio-capture mode sends
    /// the recorded memo and returns to idle: the capture is consumed once a
    /// request was actually dispatched, whether or not it succeeds — there is
    /// no automatic retry. If the processor rejects the call before sending
    /// anything (missing API key, another request in flight), the memo is
    /// kept so the user does not have to re-record.
    ///
    /// # Errors
    ///
    /// `AppError::NoAudioCaptured` in audio-capture mode with nothing
    /// recorded, plus everything the processor can fail with.
    pub async fn process(
        &mut self,
        processor: &Processor,
        vault: &dyn Vault,
        notifier: &dyn Notifier,
    ) -> Result<ProcessOutcome, AppError> {
        match self.mode {
            ComposerMode::Freeform => {
                processor
                    .process_list(vault, notifier, self.list.submit())
                    .await
            }
            ComposerMode::AudioCapture => {
                let wav_data = self
                    .captured_audio
                    .as_deref()
                    .ok_or(AppError::NoAudioCaptured)?;
                let result = processor.process_audio(vault, notifier, wav_data).await;
                match &result {
                    Err(AppError::MissingApiKey) | Err(AppError::ConcurrentRequest) => {}
                    _ => self.captured_audio = None,
                }
                result
            }
        }
    }
}
