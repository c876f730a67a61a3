//! INotificationSink — fire-and-forget notification hook.

/// A notification the core asks the transport to deliver. Delivery
/// mechanics (sockets, queues, push) live outside this system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub user_id: String,
    pub role: String,
    pub title: String,
    pub message: String,
    pub category: String,
    pub icon: String,
}

/// Fire-and-forget delivery hook. A failing sink must never fail the
/// operation that triggered it; callers log the error and move on.
pub trait INotificationSink: Send + Sync {
    fn notify(&self, note: Notification) -> anyhow::Result<()>;
}
