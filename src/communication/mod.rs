pub mod event_system;
pub mod host_interface;

pub use event_system::{EventError, PrintEvent};
pub use host_interface::{CommandSink, HostError, Notifier, ParkHost, PrintControl};
