//! Domain events and notification fan-out (mechanics only).
//!
//! Workflows emit typed domain events after a successful mutation; the
//! notification layer turns them into best-effort alerts for branches and
//! users. Nothing in here can fail a committed operation.

pub mod bus;
pub mod event;
pub mod in_memory_bus;
pub mod notification;

pub use bus::{EventBus, Subscription};
pub use event::Event;
pub use in_memory_bus::{InMemoryBusError, InMemoryEventBus};
pub use notification::{
    BusNotificationSink, Notification, NotificationIcon, NotificationKind, NotificationSink,
    NotifyError, TracingNotificationSink,
};
