//! App Core for the KeeBook companion.
//!
//! Central struct wiring the vault store, settings, icon resolver and the
//! loopback listener, with an explicit start/shutdown lifecycle.

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::database::Database;
use crate::listener::BookmarkListener;
use crate::services::icon_resolver::IconResolver;
use crate::services::notifier::{LogNotifier, UiNotifier};
use crate::services::payload_decoder::PayloadDecoder;
use crate::services::settings_engine::{
    FlagSource, SettingsEngine, SettingsEngineTrait, SharedSettings,
};
use crate::store::{self, SharedVault, SqliteVault};
use crate::types::errors::ListenerError;

/// Central application struct owning all services.
pub struct App {
    pub settings: SharedSettings,
    pub vault: SharedVault,
    listener: BookmarkListener,
}

impl App {
    /// Creates a new App rooted at the given data directory.
    ///
    /// Opens (or creates) the vault database and the settings file there,
    /// then wires the listener. Nothing is bound until [`App::start`].
    pub fn new(data_dir: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let settings_path = data_dir.join("settings.json").to_string_lossy().to_string();
        let mut engine = SettingsEngine::new(Some(settings_path));
        engine
            .load()
            .map_err(|e| format!("settings load failed: {}", e))?;
        let settings = SharedSettings::new(engine);
        let snapshot = settings.snapshot();

        let db = Database::open(data_dir.join("keebook.db"))
            .map_err(|e| format!("vault database open failed: {}", e))?;
        let vault = store::shared(SqliteVault::new(db));

        let decoder = PayloadDecoder::new(snapshot.decode_mode);
        let resolver = IconResolver::new(Duration::from_secs(snapshot.fetch_timeout_secs))
            .map_err(|e| format!("icon resolver init failed: {}", e))?;

        let flags: Arc<dyn FlagSource> = Arc::new(settings.clone());
        let notifier: Arc<dyn UiNotifier> = Arc::new(LogNotifier);

        let listener = BookmarkListener::new(
            snapshot.listen_port,
            vault.clone(),
            decoder,
            resolver,
            flags,
            notifier,
        );

        Ok(Self {
            settings,
            vault,
            listener,
        })
    }

    /// Starts accepting save requests. Fatal if the port is unavailable.
    pub fn start(&mut self) -> Result<SocketAddr, ListenerError> {
        self.listener.start()
    }

    /// Shutdown sequence: stop the listener, then persist settings.
    pub fn shutdown(&mut self) {
        self.listener.stop();
        if let Err(e) = self.settings.save() {
            log::warn!("failed to save settings on shutdown: {}", e);
        }
    }

    /// One-line status summary for diagnostics.
    pub fn status(&self) -> String {
        match self.listener.local_addr() {
            Some(addr) => format!(
                "listening on http://{} (last request: {})",
                addr,
                self.listener.last_request_uri().unwrap_or_else(|| "none".to_string())
            ),
            None => "stopped".to_string(),
        }
    }
}
