use std::fmt::{self, Display, Formatter};

/// Application error types for vaultchat
#[derive(Debug)]
pub enum AppError {
    /// No API key configured at the moment processing was attempted
    MissingApiKey,

    /// Microphone (or other capture) access was denied by the user
    PermissionDenied(String),

    /// Attempted to start a model request while one is already in flight
    ConcurrentRequest,

    /// Attempted to start recording while already recording
    ConcurrentRecording,

    /// Audio capture failed after it had started
    CaptureFailed(String),

    /// Audio-capture composer asked to process before any audio was recorded
    NoAudioCaptured,

    /// The model request failed (network error or API error response)
    RequestFailed(String),

    /// The model request did not complete within the configured timeout
    RequestTimeout,

    /// The in-flight model request was aborted by the user
    RequestCancelled,

    /// The model response could not be interpreted
    InvalidResponse(String),

    /// The model requested a tool outside the dispatch table
    UnknownTool(String),

    /// Vault folder creation or file write failed
    FileIO(String),

    /// Reorder index outside the current list bounds
    InvalidIndex { index: usize, len: usize },
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            AppError::MissingApiKey => {
                write!(f, "No API key configured. Add one in settings before processing.")
            }
            AppError::PermissionDenied(msg) => {
                write!(f, "Permission denied: {}", msg)
            }
            AppError::ConcurrentRequest => {
                write!(f, "A request is already in flight")
            }
            AppError::ConcurrentRecording => {
                write!(f, "A recording is already in progress")
            }
            AppError::CaptureFailed(msg) => {
                write!(f, "Audio capture failed: {}", msg)
            }
            AppError::NoAudioCaptured => {
                write!(f, "No audio captured yet. Record a voice memo first.")
            }
            AppError::RequestFailed(msg) => {
                write!(f, "Model request failed: {}", msg)
            }
            AppError::RequestTimeout => {
                write!(f, "Model request timed out")
            }
            AppError::RequestCancelled => {
                write!(f, "Model request was cancelled")
            }
            AppError::InvalidResponse(msg) => {
                write!(f, "Could not interpret model response: {}", msg)
            }
            AppError::UnknownTool(name) => {
                write!(f, "Model requested unknown tool '{}'", name)
            }
            AppError::FileIO(msg) => {
                write!(f, "File operation failed: {}", msg)
            }
            AppError::InvalidIndex { index, len } => {
                write!(f, "Index {} is out of range for a list of {} entries", index, len)
            }
        }
    }
}

impl std::error::Error for AppError {}
