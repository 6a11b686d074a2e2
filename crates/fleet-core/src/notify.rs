//! Notification seam for delivery updates.
//!
//! The backend has no email, chat or push integration. Handlers talk to a
//! [`Notifier`], and the default [`LogNotifier`] writes the notification
//! to the log so the call sites exist when a real channel is added.

use tracing::info;

/// Sends human-facing delivery notifications.
pub trait Notifier: Send + Sync {
    /// Tell `recipient` about a delivery change.
    fn delivery_update(&self, recipient: &str, message: &str);
}

/// Notifier that only logs.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn delivery_update(&self, recipient: &str, message: &str) {
        info!(recipient, body = message, "Delivery notification");
    }
}
