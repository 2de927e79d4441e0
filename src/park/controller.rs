// src/park/controller.rs - Pause/resume state machine
use crate::communication::{HostError, ParkHost, PrintEvent};
use crate::config::{ConfigError, ParkConfig};
use crate::park::pause_state::{PauseState, Position, SavedPosition};
use crate::park::resolver::{self, ParkTarget};
use crate::park::sequencer;
use crate::profile::PrinterProfile;

/// What the controller did with an event. Advisory; used for logging.
#[derive(Debug, Clone, PartialEq)]
pub enum EventOutcome {
    /// Not a pause or resume event.
    Ignored,
    /// Parking is disabled, globally or for the current profile.
    Gated,
    Parked { saved: Position, target: ParkTarget },
    Unparked { restored: Position },
    /// Resume with nothing saved, e.g. the pause was gated off.
    NothingToRestore,
    /// Saved position was incomplete; the print was cancelled.
    Cancelled,
}

impl EventOutcome {
    pub fn handled(&self) -> bool {
        matches!(self, Self::Parked { .. } | Self::Unparked { .. } | Self::Cancelled)
    }
}

/// Parks the toolhead on pause and brings it back on resume.
///
/// The controller only holds configuration. Pause state belongs to the print
/// job and is passed in with each event.
#[derive(Debug, Clone)]
pub struct ParkController {
    config: ParkConfig,
}

impl ParkController {
    pub fn new(config: ParkConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ParkConfig {
        &self.config
    }

    /// Swap in new settings. Pause state is not affected.
    pub fn reload(&mut self, config: ParkConfig) -> Result<(), ConfigError> {
        config.validate()?;
        tracing::info!("Park settings reloaded");
        self.config = config;
        Ok(())
    }

    pub fn is_active_for(&self, profile: Option<&PrinterProfile>) -> bool {
        self.config.enable_park_on_pause && resolver::is_enabled_for_profile(&self.config, profile)
    }

    pub fn handle_event<H>(
        &self,
        state: &mut PauseState,
        event: &PrintEvent,
        host: &mut H,
    ) -> Result<EventOutcome, HostError>
    where
        H: ParkHost + ?Sized,
    {
        if matches!(event, PrintEvent::Other(_)) {
            return Ok(EventOutcome::Ignored);
        }
        let profile = host.current_profile();
        if !self.is_active_for(profile.as_ref()) {
            tracing::debug!("Park on pause inactive for this printer, passing {} through", event.name());
            // The head now pauses where it is; an older saved position no longer applies.
            if matches!(event, PrintEvent::Paused(_)) && !state.is_empty() {
                tracing::warn!("Discarding stale saved position {:?} for an unparked pause", state.parts());
                state.clear();
            }
            return Ok(EventOutcome::Gated);
        }
        match event {
            PrintEvent::Paused(position) => self.park(state, *position, profile.as_ref(), host),
            PrintEvent::Resumed => self.unpark(state, profile.as_ref(), host),
            PrintEvent::Other(_) => Ok(EventOutcome::Ignored),
        }
    }

    fn park<H>(
        &self,
        state: &mut PauseState,
        position: Position,
        profile: Option<&PrinterProfile>,
        host: &mut H,
    ) -> Result<EventOutcome, HostError>
    where
        H: ParkHost + ?Sized,
    {
        if !state.is_empty() {
            tracing::warn!("Print paused again before resuming; replacing saved position {:?}", state.parts());
        }
        state.save(position);

        let target = resolver::park_target_or_origin(&self.config, profile);
        let speeds = resolver::speeds_or_custom(&self.config, profile);
        tracing::info!(
            "Parking print head at X{} Y{} (saved X{} Y{} Z{}), XY {}, Z {}",
            target.x, target.y, position.x, position.y, position.z, speeds.xy, speeds.z
        );

        let commands = sequencer::render(&sequencer::park_sequence(target, self.config.lift_z, speeds));
        for line in &commands {
            tracing::debug!("park: {}", line);
        }
        host.issue_commands(&commands)?;
        Ok(EventOutcome::Parked { saved: position, target })
    }

    fn unpark<H>(
        &self,
        state: &mut PauseState,
        profile: Option<&PrinterProfile>,
        host: &mut H,
    ) -> Result<EventOutcome, HostError>
    where
        H: ParkHost + ?Sized,
    {
        let saved = match state.saved() {
            Ok(SavedPosition::Parked(position)) => position,
            Ok(SavedPosition::Idle) => {
                tracing::debug!("Print resumed with no saved position, nothing to unpark");
                return Ok(EventOutcome::NothingToRestore);
            }
            Err(e) => {
                tracing::error!("Cannot resume print safely: {}", e);
                host.raise_error("Park on pause cannot resume the print: the stored pause position is incomplete.");
                host.cancel_print()?;
                return Ok(EventOutcome::Cancelled);
            }
        };

        let speeds = resolver::speeds_or_custom(&self.config, profile);
        tracing::info!("Unparking print head to X{} Y{} Z{}", saved.x, saved.y, saved.z);
        let commands = sequencer::render(&sequencer::unpark_sequence(
            saved,
            speeds,
            self.config.home_before_unpark,
        ));
        for line in &commands {
            tracing::debug!("unpark: {}", line);
        }
        host.issue_commands(&commands)?;
        state.clear();
        Ok(EventOutcome::Unparked { restored: saved })
    }
}
