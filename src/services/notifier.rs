//! UI notification hooks.
//!
//! The host application owns the actual UI; the pipeline only signals it
//! through this capability interface after a successful write.

use log::info;

use crate::types::record::Group;

/// Collaborator interface for host-UI refresh and success toasts.
pub trait UiNotifier: Send + Sync {
    /// Asks the host to refresh its view of the group.
    fn refresh_ui(&self, group: &Group);

    /// Shows a transient success indicator for the saved title.
    ///
    /// Only invoked when the success-notification flag is set.
    fn show_success(&self, title: &str);
}

/// Default notifier that reports through the log instead of a host UI.
pub struct LogNotifier;

impl UiNotifier for LogNotifier {
    fn refresh_ui(&self, group: &Group) {
        info!("ui refresh requested for group '{}'", group.name);
    }

    fn show_success(&self, title: &str) {
        info!("saved bookmark '{}'", title);
    }
}
