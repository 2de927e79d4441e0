// src/communication/host_interface.rs - Narrow interfaces the park controller uses to talk to the printer host

use crate::profile::ProfileSource;

/// Error type for anything the host does on the controller's behalf.
pub type HostError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Executes motion directives in order.
pub trait CommandSink {
    fn issue_commands(&mut self, commands: &[String]) -> Result<(), HostError>;
}

pub trait PrintControl {
    fn cancel_print(&mut self) -> Result<(), HostError>;
}

/// Operator-visible alerts. Must not block.
pub trait Notifier {
    fn raise_error(&mut self, message: &str);
}

/// Everything the controller needs from the host.
pub trait ParkHost: ProfileSource + CommandSink + PrintControl + Notifier {}

impl<T> ParkHost for T where T: ProfileSource + CommandSink + PrintControl + Notifier {}
