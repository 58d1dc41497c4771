//! Injected diagnostics and status output
//!
//! Both are passed into the engine at construction. Tests use the no-op
//! variants; the player logs through the `log` facade.

/// Navigation state captured after each change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateSnapshot {
    pub enabled: bool,
    pub category: Option<String>,
    pub category_index: usize,
    pub sub_index: usize,
    pub page_index: usize,
    pub num_pages: usize,
}

/// Receives state checkpoints for inspection
pub trait Diagnostics {
    fn checkpoint(&self, label: &str, snapshot: &StateSnapshot);
}

pub struct NoopDiagnostics;

impl Diagnostics for NoopDiagnostics {
    fn checkpoint(&self, _label: &str, _snapshot: &StateSnapshot) {}
}

/// Logs every checkpoint at debug level
pub struct LogDiagnostics;

impl Diagnostics for LogDiagnostics {
    fn checkpoint(&self, label: &str, snapshot: &StateSnapshot) {
        log::debug!(
            "[{}] enabled={} category={:?} ({}) sub={} page={}/{}",
            label,
            snapshot.enabled,
            snapshot.category,
            snapshot.category_index,
            snapshot.sub_index,
            snapshot.page_index,
            snapshot.num_pages
        );
    }
}

/// Short user-facing messages (the host's status bar)
pub trait StatusDisplay {
    fn show_message(&self, message: &str);
}

pub struct LogStatus;

impl StatusDisplay for LogStatus {
    fn show_message(&self, message: &str) {
        log::info!("{}", message);
    }
}
