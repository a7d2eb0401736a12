//! Transient user notifications raised by the inventory controller.

use serde::Serialize;

/// How a notification should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    /// Non-blocking notice about a degraded or substituted result.
    Warning,
    Error,
}

/// Receiver of terminal operation outcomes.
pub trait Notifier {
    fn notify(&self, severity: Severity, message: &str);
}

/// Notifier that writes to the application log. Used outside of a request.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, severity: Severity, message: &str) {
        match severity {
            Severity::Success => log::info!("{message}"),
            Severity::Warning => log::warn!("{message}"),
            Severity::Error => log::error!("{message}"),
        }
    }
}
