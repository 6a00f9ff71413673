// Notifier — fire-and-forget user-visible messages
//
// The host surfaces these as toast-style notices. The protocol only needs
// "show this string"; no return value, no acknowledgement.

/// User-notification sink.
pub trait Notifier: Send + Sync {
    /// Show a message to the user. Fire-and-forget.
    fn notify(&self, message: &str);
}

/// Notifier that writes notices to stderr (and thereby to the log file).
pub struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn notify(&self, message: &str) {
        eprintln!("Notice: {}", message);
    }
}
