// KeeBook Settings Engine
// Manages the companion's settings file: loading, saving, and flag access.
// Settings are stored as a JSON file in the data directory.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use crate::types::errors::SettingsError;
use crate::types::settings::{CompanionSettings, Flag};

/// Trait defining the settings engine interface.
pub trait SettingsEngineTrait {
    fn load(&mut self) -> Result<CompanionSettings, SettingsError>;
    fn save(&self) -> Result<(), SettingsError>;
    fn get_settings(&self) -> &CompanionSettings;
    fn set_flag(&mut self, flag: Flag, value: bool) -> Result<(), SettingsError>;
    fn get_config_path(&self) -> &str;
}

/// Settings engine implementation that persists settings as JSON on disk.
pub struct SettingsEngine {
    config_path: String,
    settings: CompanionSettings,
}

/// Resolves the companion's data directory.
///
/// `KEEBOOK_DATA_DIR` wins when set; otherwise the executable's directory
/// is used, falling back to the current directory.
pub fn default_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("KEEBOOK_DATA_DIR") {
        return PathBuf::from(dir);
    }
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

impl SettingsEngine {
    /// Creates a new SettingsEngine.
    ///
    /// If `path_override` is `Some`, uses that path for the config file.
    /// Otherwise, uses `settings.json` inside the data directory.
    pub fn new(path_override: Option<String>) -> Self {
        let config_path = match path_override {
            Some(p) => p,
            None => default_data_dir()
                .join("settings.json")
                .to_string_lossy()
                .to_string(),
        };

        Self {
            config_path,
            settings: CompanionSettings::default(),
        }
    }
}

impl SettingsEngineTrait for SettingsEngine {
    /// Loads settings from the JSON config file.
    ///
    /// If the file does not exist, returns default settings.
    /// If the file exists but is malformed, returns a serialization error.
    fn load(&mut self) -> Result<CompanionSettings, SettingsError> {
        let path = Path::new(&self.config_path);

        if !path.exists() {
            self.settings = CompanionSettings::default();
            return Ok(self.settings.clone());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| SettingsError::IoError(format!("Failed to read config file: {}", e)))?;

        let settings: CompanionSettings = serde_json::from_str(&content).map_err(|e| {
            SettingsError::SerializationError(format!("Failed to parse config file: {}", e))
        })?;

        self.settings = settings;
        Ok(self.settings.clone())
    }

    /// Saves the current settings to the JSON config file.
    ///
    /// Creates parent directories if they don't exist.
    fn save(&self) -> Result<(), SettingsError> {
        let path = Path::new(&self.config_path);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                SettingsError::IoError(format!("Failed to create config directory: {}", e))
            })?;
        }

        let json = serde_json::to_string_pretty(&self.settings).map_err(|e| {
            SettingsError::SerializationError(format!("Failed to serialize settings: {}", e))
        })?;

        fs::write(path, json)
            .map_err(|e| SettingsError::IoError(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Returns a reference to the current in-memory settings.
    fn get_settings(&self) -> &CompanionSettings {
        &self.settings
    }

    /// Updates one named flag and persists immediately.
    fn set_flag(&mut self, flag: Flag, value: bool) -> Result<(), SettingsError> {
        match flag {
            Flag::ShowDebugMessages => self.settings.show_debug_messages = value,
            Flag::ShowSuccessNotification => self.settings.show_success_notification = value,
            Flag::WriteDateAsNote => self.settings.write_date_as_note = value,
            Flag::PreventDuplicateEntries => self.settings.prevent_duplicate_entries = value,
        }
        self.save()
    }

    /// Returns the path to the config file.
    fn get_config_path(&self) -> &str {
        &self.config_path
    }
}

/// Live flag access for pipeline decision points.
///
/// Flags are read through this interface at every decision point rather
/// than snapshotted per request, so a toggle in the host UI takes effect
/// on the very next check.
pub trait FlagSource: Send + Sync {
    fn get_flag(&self, flag: Flag) -> bool;
}

/// Shared, thread-safe handle over a [`SettingsEngine`].
#[derive(Clone)]
pub struct SharedSettings {
    inner: Arc<RwLock<SettingsEngine>>,
}

impl SharedSettings {
    pub fn new(engine: SettingsEngine) -> Self {
        Self {
            inner: Arc::new(RwLock::new(engine)),
        }
    }

    /// Clones the current settings.
    pub fn snapshot(&self) -> CompanionSettings {
        match self.inner.read() {
            Ok(guard) => guard.get_settings().clone(),
            Err(poisoned) => poisoned.into_inner().get_settings().clone(),
        }
    }

    /// Updates one flag and persists it.
    pub fn set_flag(&self, flag: Flag, value: bool) -> Result<(), SettingsError> {
        match self.inner.write() {
            Ok(mut guard) => guard.set_flag(flag, value),
            Err(poisoned) => poisoned.into_inner().set_flag(flag, value),
        }
    }

    /// Persists the current settings.
    pub fn save(&self) -> Result<(), SettingsError> {
        match self.inner.read() {
            Ok(guard) => guard.save(),
            Err(poisoned) => poisoned.into_inner().save(),
        }
    }
}

impl FlagSource for SharedSettings {
    fn get_flag(&self, flag: Flag) -> bool {
        match self.inner.read() {
            Ok(guard) => guard.get_settings().flag(flag),
            Err(poisoned) => poisoned.into_inner().get_settings().flag(flag),
        }
    }
}
