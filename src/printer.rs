// src/printer.rs - Host-side task that serializes print events into the park controller
use serde_json::Value;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use uuid::Uuid;

use crate::communication::{ParkHost, PrintEvent};
use crate::config::ParkConfig;
use crate::park::{EventOutcome, ParkController};
use crate::print_job::PrintJobSession;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("printer task is no longer running")]
    ChannelClosed,
    #[error("printer task dropped the response")]
    ResponseDropped,
    #[error("event rejected: {0}")]
    Event(String),
    #[error("printer rejected G-code: {0}")]
    Gcode(String),
    #[error("settings rejected: {0}")]
    Settings(String),
}

/// A request sent to the printer task.
#[derive(Debug)]
pub enum PrinterRequest {
    /// A new print job started; replaces any job still tracked.
    StartJob {
        respond_to: oneshot::Sender<Uuid>,
    },
    /// A host event with its raw JSON payload.
    HostEvent {
        name: String,
        payload: Value,
        respond_to: oneshot::Sender<Result<EventOutcome, String>>,
    },
    /// G-code from the running print, sent straight to the printer.
    Gcode {
        lines: Vec<String>,
        respond_to: oneshot::Sender<Result<(), String>>,
    },
    /// The job finished or was cancelled; its pause state is discarded.
    FinishJob,
    ReloadSettings {
        config: ParkConfig,
        respond_to: oneshot::Sender<Result<(), String>>,
    },
}

/// Cloneable handle used to talk to the printer task.
#[derive(Debug, Clone)]
pub struct PrinterHandle {
    tx: mpsc::Sender<PrinterRequest>,
}

impl PrinterHandle {
    pub async fn start_job(&self) -> Result<Uuid, RuntimeError> {
        let (respond_to, rx) = oneshot::channel();
        self.send(PrinterRequest::StartJob { respond_to }).await?;
        rx.await.map_err(|_| RuntimeError::ResponseDropped)
    }

    pub async fn send_event(&self, name: &str, payload: Value) -> Result<EventOutcome, RuntimeError> {
        let (respond_to, rx) = oneshot::channel();
        self.send(PrinterRequest::HostEvent { name: name.to_string(), payload, respond_to })
            .await?;
        rx.await
            .map_err(|_| RuntimeError::ResponseDropped)?
            .map_err(RuntimeError::Event)
    }

    pub async fn send_gcode(&self, lines: Vec<String>) -> Result<(), RuntimeError> {
        let (respond_to, rx) = oneshot::channel();
        self.send(PrinterRequest::Gcode { lines, respond_to }).await?;
        rx.await
            .map_err(|_| RuntimeError::ResponseDropped)?
            .map_err(RuntimeError::Gcode)
    }

    pub async fn finish_job(&self) -> Result<(), RuntimeError> {
        self.send(PrinterRequest::FinishJob).await
    }

    pub async fn reload_settings(&self, config: ParkConfig) -> Result<(), RuntimeError> {
        let (respond_to, rx) = oneshot::channel();
        self.send(PrinterRequest::ReloadSettings { config, respond_to }).await?;
        rx.await
            .map_err(|_| RuntimeError::ResponseDropped)?
            .map_err(RuntimeError::Settings)
    }

    async fn send(&self, request: PrinterRequest) -> Result<(), RuntimeError> {
        self.tx.send(request).await.map_err(|_| RuntimeError::ChannelClosed)
    }
}

/// Owns the controller, the host collaborators and the active job.
///
/// Requests are handled one at a time, which is what keeps the pause state
/// free of locks.
pub struct Printer<H> {
    controller: ParkController,
    host: H,
    job: Option<PrintJobSession>,
}

impl<H: ParkHost> Printer<H> {
    pub fn new(controller: ParkController, host: H) -> Self {
        Self { controller, host, job: None }
    }

    /// Create the request channel and its handle.
    pub fn channel(capacity: usize) -> (PrinterHandle, mpsc::Receiver<PrinterRequest>) {
        let (tx, rx) = mpsc::channel(capacity);
        (PrinterHandle { tx }, rx)
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn current_job(&self) -> Option<&PrintJobSession> {
        self.job.as_ref()
    }

    /// Process requests until every handle is dropped, then hand the host back.
    pub async fn run(mut self, mut rx: mpsc::Receiver<PrinterRequest>) -> H {
        tracing::info!("Printer task started");
        while let Some(request) = rx.recv().await {
            self.handle_request(request);
        }
        tracing::info!("Printer task shutting down");
        self.host
    }

    pub fn handle_request(&mut self, request: PrinterRequest) {
        match request {
            PrinterRequest::StartJob { respond_to } => {
                let id = self.start_job();
                let _ = respond_to.send(id);
            }
            PrinterRequest::HostEvent { name, payload, respond_to } => {
                let result = self.dispatch_event(&name, &payload);
                let _ = respond_to.send(result);
            }
            PrinterRequest::Gcode { lines, respond_to } => {
                let result = self.host.issue_commands(&lines).map_err(|e| e.to_string());
                let _ = respond_to.send(result);
            }
            PrinterRequest::FinishJob => {
                if let Some(job) = self.job.take() {
                    if !job.pause_state().is_empty() {
                        tracing::warn!("Job {} finished while parked; discarding saved position", job.id());
                    }
                    tracing::info!("Job {} finished", job.id());
                }
            }
            PrinterRequest::ReloadSettings { config, respond_to } => {
                let result = self.controller.reload(config).map_err(|e| e.to_string());
                if let Err(e) = &result {
                    tracing::error!("Rejected park settings: {}", e);
                }
                let _ = respond_to.send(result);
            }
        }
    }

    fn start_job(&mut self) -> Uuid {
        let job = PrintJobSession::new();
        let id = job.id();
        if let Some(old) = self.job.replace(job) {
            tracing::warn!("Job {} replaced by {} before finishing", old.id(), id);
        }
        tracing::info!("Job {} started", id);
        id
    }

    fn dispatch_event(&mut self, name: &str, payload: &Value) -> Result<EventOutcome, String> {
        let event = PrintEvent::from_host(name, payload).map_err(|e| {
            tracing::error!("Not parking: {}", e);
            e.to_string()
        })?;
        if matches!(event, PrintEvent::Other(_)) {
            return Ok(EventOutcome::Ignored);
        }
        let job = self.job.get_or_insert_with(|| {
            let job = PrintJobSession::new();
            tracing::warn!("{} received without a tracked job; started job {}", event.name(), job.id());
            job
        });
        let outcome = job
            .handle_event(&self.controller, &event, &mut self.host)
            .map_err(|e| {
                tracing::error!("Host failed while handling {}: {}", event.name(), e);
                e.to_string()
            })?;
        tracing::debug!("{} -> {:?}", event.name(), outcome);
        Ok(outcome)
    }
}
