use std::io::Write;

/// Transient success/error notifications shown to the administrator.
pub trait Notifier: Send + Sync {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
}

/// Writes notifications to the terminal and mirrors them into the log.
#[derive(Debug, Clone, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn success(&self, message: &str) {
        tracing::info!(kind = "success", "{}", message);
        let mut out = std::io::stdout().lock();
        let _ = writeln!(out, "[ok] {}", message);
    }

    fn error(&self, message: &str) {
        tracing::warn!(kind = "error", "{}", message);
        let mut out = std::io::stdout().lock();
        let _ = writeln!(out, "[error] {}", message);
    }
}
