//! Park the print head when a print pauses and bring it back on resume.
//!
//! [`park::ParkController`] is the core: a synchronous reducer that turns
//! pause/resume events into ordered G-code. [`printer::Printer`] is the async
//! host task that serializes events into it, one print job at a time.

pub mod communication;
pub mod config;
pub mod gcode;
pub mod park;
pub mod print_job;
pub mod printer;
pub mod profile;
pub mod simulator;

pub use communication::{CommandSink, HostError, Notifier, ParkHost, PrintControl, PrintEvent};
pub use config::{load_config, ConfigError, HostConfig, ParkConfig, ParkLocation, ProfileScope, SpeedPolicy};
pub use gcode::{FeedRate, GCodeCommand};
pub use park::{EventOutcome, ParkController, PauseState, Position};
pub use print_job::PrintJobSession;
pub use printer::{Printer, PrinterHandle, PrinterRequest, RuntimeError};
pub use profile::{PrinterProfile, ProfileSource};
pub use simulator::{SimToolhead, SimulatedHost};
