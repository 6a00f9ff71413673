// Module declarations
pub mod composer;
pub mod error;
pub mod intelligence;
pub mod logging;
pub mod notify;
pub mod protocol;
pub mod recording;
pub mod settings;
pub mod vault;
pub mod wav;

use std::sync::Arc;

pub use error::AppError;

use intelligence::GeminiProvider;
use protocol::{Processor, ProcessorConfig};
use settings::Settings;

/// Wire a Processor from persisted settings, using the Gemini backend.
///
/// Configuration is passed in explicitly at construction time; the processor
/// holds no reference to the settings store.
pub fn processor_from_settings(settings: &Settings) -> Processor {
    let provider = Arc::new(GeminiProvider::new(settings.api_key.clone()));
    Processor::new(
        provider,
        ProcessorConfig {
            api_key: settings.api_key.clone(),
            model: settings.model.clone(),
            request_timeout_secs: settings.request_timeout_secs,
        },
    )
}

/// Build a composer session in the mode the settings select.
///
/// # Errors
///
/// Returns an error if the persisted composer mode string is unknown
/// (validation normally prevents this).
pub fn session_from_settings(settings: &Settings) -> Result<composer::ComposerSession, String> {
    let mode = composer::ComposerMode::from_settings(&settings.composer_mode)?;
    Ok(composer::ComposerSession::new(mode))
}

#[cfg(test)]
mod tests {
    use super::*;
    use composer::ComposerMode;

    #[test]
    fn test_session_mode_follows_settings() {
        let mut settings = Settings::default();
        assert_eq!(
            session_from_settings(&settings).unwrap().mode(),
            ComposerMode::Freeform
        );

        settings.composer_mode = "audio".into();
        assert_eq!(
            session_from_settings(&settings).unwrap().mode(),
            ComposerMode::AudioCapture
        );

        settings.composer_mode = "voice".into();
        assert!(session_from_settings(&settings).is_err());
    }
}
