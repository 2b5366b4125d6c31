//! User-visible outcome notifications

/// Receives one message per finished mutation
///
/// The terminal implementation lives in `ui`; tests record messages.
pub trait Notifier: Send + Sync {
    fn success(&self, message: &str);

    fn error(&self, message: &str);
}
