mod catalog;
mod clock;
mod entitlement_resolver;
mod notify;
mod progress_engine;

pub use catalog::ICatalog;
pub use clock::{IClock, SystemClock};
pub use entitlement_resolver::IEntitlementResolver;
pub use notify::{INotificationSink, Notification};
pub use progress_engine::IProgressEngine;
