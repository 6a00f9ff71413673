// Recording — voice memo capture lifecycle
//
// Wraps an injected AudioCapture source (the host's microphone access) and
// tracks the one-recording-at-a-time state. Stopping yields complete WAV
// bytes ready for the composer or the tool protocol.

use async_trait::async_trait;

use crate::error::AppError;
use crate::wav::WavEncoder;

/// Microphone capture source provided by the host.
///
/// Starting blocks on the user's permission grant; a denial is reported as
/// an error and no recording begins.
#[async_trait]
pub trait AudioCapture: Send + Sync {
    /// Acquire the capture resource and begin recording.
    async fn start(&mut self) -> Result<(), String>;

    /// Stop recording and return the captured raw PCM bytes
    /// (16kHz, 16-bit signed little-endian, mono).
    async fn stop(&mut self) -> Result<Vec<u8>, String>;
}

/// Manages the lifecycle of one recording session
///
/// RecordingManager is responsible for:
/// - Starting and stopping the injected capture source
/// - Tracking the current recording state
/// - Refusing overlapping recording sessions
/// - Wrapping the captured PCM into a WAV file on stop
pub struct RecordingManager {
    capture: Box<dyn AudioCapture>,
    recording: bool,
}

impl RecordingManager {
    pub fn new(capture: Box<dyn AudioCapture>) -> Self {
        Self {
            capture,
            recording: false,
        }
    }

    /// Check if a recording is currently active
    pub fn is_recording(&self) -> bool {
        self.recording
    }

    /// Start a new recording session.
    ///
    /// # Errors
    ///
    /// * `AppError::ConcurrentRecording` if a session is already active
    /// * `AppError::PermissionDenied` if the capture source refuses to start
    ///   (microphone permission not granted); no entry is produced
    pub async fn start(&mut self) -> Result<(), AppError> {
        if self.recording {
            return Err(AppError::ConcurrentRecording);
        }

        self.capture
            .start()
            .await
            .map_err(AppError::PermissionDenied)?;

        self.recording = true;
        eprintln!("Recording: Started");
        Ok(())
    }

    /// Stop the active recording and return the captured audio as WAV bytes.
    ///
    /// Can be called early at any time after `start` (explicit user gesture).
    ///
    /// # Errors
    ///
    /// * `AppError::CaptureFailed` if no recording is active or the capture
    ///   source fails to deliver its audio
    pub async fn stop(&mut self) -> Result<Vec<u8>, AppError> {
        if !self.recording {
            return Err(AppError::CaptureFailed("no recording in progress".to_string()));
        }

        self.recording = false;
        let pcm_data = self
            .capture
            .stop()
            .await
            .map_err(AppError::CaptureFailed)?;

        eprintln!("Recording: Stopped with {} PCM bytes", pcm_data.len());
        WavEncoder::from_pcm_bytes(&pcm_data).map_err(AppError::CaptureFailed)
    }
}
