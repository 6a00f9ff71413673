use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

/// Main settings structure containing all application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Gemini API key; may be empty until the user provides one
    #[serde(default)]
    pub api_key: String,

    /// Model identifier sent with every request
    #[serde(default = "default_model")]
    pub model: String,

    /// Which composition surface the modal presents: "freeform" or "audio"
    #[serde(default = "default_composer_mode")]
    pub composer_mode: String,

    /// Model request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_model() -> String {
    "gemini-pro".to_string()
}

fn default_composer_mode() -> String {
    "freeform".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: default_model(),
            composer_mode: default_composer_mode(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

/// Manages settings persistence and provides thread-safe access
pub struct SettingsManager {
    settings_path: PathBuf,
    current_settings: Arc<RwLock<Settings>>,
}

impl SettingsManager {
    /// Creates a new SettingsManager and loads settings from disk
    ///
    /// If the settings file doesn't exist, creates it with default values.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The settings directory cannot be created
    /// - The settings file cannot be read or written
    pub fn new() -> Result<Self, String> {
        let home_dir = dirs::home_dir()
            .ok_or_else(|| "Failed to get home directory".to_string())?;

        let settings_path = home_dir.join(".vaultchat").join("settings.json");

        Self::new_with_path(settings_path)
    }

    /// Creates a new SettingsManager with a custom settings path
    ///
    /// This is primarily used for testing but is also used internally by new().
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The settings directory cannot be created
    /// - The settings file cannot be read or written
    pub(crate) fn new_with_path(settings_path: PathBuf) -> Result<Self, String> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = settings_path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| format!("Failed to create settings directory: {}", e))?;
            }
        }

        let manager = Self {
            settings_path: settings_path.clone(),
            current_settings: Arc::new(RwLock::new(Settings::default())),
        };

        // Load settings from file or create with defaults
        let settings = if settings_path.exists() {
            manager.load_from_file()?
        } else {
            let defaults = Settings::default();
            manager.save_to_file(&defaults)?;
            defaults
        };

        // Update in-memory settings
        *manager.current_settings.write()
            .map_err(|e| format!("Failed to acquire write lock: {}", e))? = settings;

        Ok(manager)
    }

    /// Returns a clone of the current settings
    pub fn get(&self) -> Settings {
        self.current_settings.read()
            .expect("Failed to acquire read lock")
            .clone()
    }

    /// Updates settings (validates, persists to disk, then updates in-memory)
    ///
    /// Ordering matters here:
    /// 1. Validate settings
    /// 2. Persist to disk (FIRST)
    /// 3. Update in-memory state (ONLY if persist succeeded)
    ///
    /// If an error occurs, in-memory state remains unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Validation fails
    /// - Disk write fails
    pub fn update(&self, settings: Settings) -> Result<(), String> {
        // Step 1: Validate
        Self::validate(&settings)?;

        // Step 2: Persist to disk FIRST
        self.save_to_file(&settings)?;

        // Step 3: Update in-memory state ONLY if save succeeded
        *self.current_settings.write()
            .map_err(|e| format!("Failed to acquire write lock: {}", e))? = settings;

        Ok(())
    }

    /// Validates settings schema and constraints
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - model is an empty string
    /// - composer_mode is not "freeform" or "audio"
    /// - request_timeout_secs is not in range [1, 600]
    fn validate(settings: &Settings) -> Result<(), String> {
        // Validate model is non-empty
        if settings.model.trim().is_empty() {
            return Err("Model name cannot be empty".to_string());
        }

        // Validate composer_mode
        let mode = settings.composer_mode.as_str();
        if mode != "freeform" && mode != "audio" {
            return Err(format!(
                "Composer mode must be 'freeform' or 'audio', got '{}'",
                mode
            ));
        }

        // Validate timeout range (1-600 seconds)
        if settings.request_timeout_secs < 1 || settings.request_timeout_secs > 600 {
            return Err(format!(
                "Request timeout must be between 1 and 600 seconds, got {}",
                settings.request_timeout_secs
            ));
        }

        Ok(())
    }

    /// Loads settings from disk
    ///
    /// If the file contains invalid JSON, logs an error and returns defaults
    /// to ensure graceful degradation.
    fn load_from_file(&self) -> Result<Settings, String> {
        let contents = std::fs::read_to_string(&self.settings_path)
            .map_err(|e| format!("Failed to read settings file: {}", e))?;

        match serde_json::from_str(&contents) {
            Ok(settings) => Ok(settings),
            Err(e) => {
                eprintln!("Failed to parse settings JSON: {}. Using defaults.", e);
                Ok(Settings::default())
            }
        }
    }

    /// Saves settings to disk atomically
    ///
    /// Uses a temporary file and atomic rename to prevent partial writes.
    fn save_to_file(&self, settings: &Settings) -> Result<(), String> {
        let json = serde_json::to_string_pretty(settings)
            .map_err(|e| format!("Failed to serialize settings: {}", e))?;

        // Write to temporary file
        let temp_path = self.settings_path.with_extension("json.tmp");
        std::fs::write(&temp_path, json)
            .map_err(|e| format!("Failed to write temporary settings file: {}", e))?;

        // Atomic rename
        std::fs::rename(&temp_path, &self.settings_path)
            .map_err(|e| format!("Failed to rename settings file: {}", e))?;

        Ok(())
    }
}
