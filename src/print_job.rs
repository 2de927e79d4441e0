// src/print_job.rs - Per-job pause state
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::communication::{HostError, ParkHost, PrintEvent};
use crate::park::{EventOutcome, ParkController, PauseState};

/// One print job's view of parking. Each job owns its own [`PauseState`];
/// sessions are never shared between jobs.
#[derive(Debug, Clone)]
pub struct PrintJobSession {
    id: Uuid,
    started_at: DateTime<Utc>,
    parked_at: Option<DateTime<Utc>>,
    pause_state: PauseState,
}

impl PrintJobSession {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            parked_at: None,
            pause_state: PauseState::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn parked_at(&self) -> Option<DateTime<Utc>> {
        self.parked_at
    }

    pub fn pause_state(&self) -> &PauseState {
        &self.pause_state
    }

    /// Replace the pause state, e.g. when restoring a session held by the host.
    pub fn restore_pause_state(&mut self, state: PauseState) {
        self.pause_state = state;
    }

    pub fn handle_event<H>(
        &mut self,
        controller: &ParkController,
        event: &PrintEvent,
        host: &mut H,
    ) -> Result<EventOutcome, HostError>
    where
        H: ParkHost + ?Sized,
    {
        let outcome = controller.handle_event(&mut self.pause_state, event, host)?;
        match &outcome {
            EventOutcome::Parked { .. } => {
                self.parked_at = Some(Utc::now());
            }
            EventOutcome::Unparked { .. } => {
                if let Some(parked_at) = self.parked_at.take() {
                    let parked_for = Utc::now() - parked_at;
                    tracing::info!(
                        "Job {} resumed after {}s parked",
                        self.id,
                        parked_for.num_seconds()
                    );
                }
            }
            _ => {}
        }
        Ok(outcome)
    }
}

impl Default for PrintJobSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ParkConfig;
    use crate::park::Position;
    use crate::profile::PrinterProfile;
    use crate::simulator::SimulatedHost;

    #[test]
    fn test_sessions_have_distinct_ids() {
        assert_ne!(PrintJobSession::new().id(), PrintJobSession::new().id());
    }

    #[test]
    fn test_park_timestamp_lifecycle() {
        let controller = ParkController::new(ParkConfig::default()).unwrap();
        let mut host = SimulatedHost::new(Some(PrinterProfile::new("p", 200.0, 200.0)));
        let mut session = PrintJobSession::new();
        assert!(session.parked_at().is_none());

        session
            .handle_event(&controller, &PrintEvent::Paused(Position::new(1.0, 2.0, 3.0)), &mut host)
            .unwrap();
        let parked_at = session.parked_at().unwrap();
        assert!(parked_at >= session.started_at());
        assert!(!session.pause_state().is_empty());

        session.handle_event(&controller, &PrintEvent::Resumed, &mut host).unwrap();
        assert!(session.parked_at().is_none());
        assert!(session.pause_state().is_empty());
    }
}
