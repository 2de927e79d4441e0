//! A toy printer that tracks toolhead position from emitted G-code.
//!
//! Enough of G90/G91/G1/G28/M400 to check that park and unpark sequences end
//! up where they should. Feed rates are recorded but no timing is simulated.

use thiserror::Error;

use crate::communication::{CommandSink, HostError, Notifier, PrintControl};
use crate::park::Position;
use crate::profile::{PrinterProfile, ProfileSource};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimError {
    #[error("unsupported command '{0}'")]
    Unsupported(String),
    #[error("bad parameter '{word}' in '{line}'")]
    BadParameter { word: String, line: String },
    #[error("print was cancelled; refusing '{0}'")]
    Cancelled(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimToolhead {
    pub position: Position,
    pub relative: bool,
    /// Feed rate of the last move, mm/min.
    pub last_feed: Option<f64>,
    pub history: Vec<String>,
}

impl Default for SimToolhead {
    fn default() -> Self {
        Self {
            position: Position::new(0.0, 0.0, 0.0),
            relative: false,
            last_feed: None,
            history: Vec::new(),
        }
    }
}

impl SimToolhead {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn execute(&mut self, line: &str) -> Result<(), SimError> {
        // strip comments
        let code = line.split(';').next().unwrap_or("").trim();
        if code.is_empty() {
            return Ok(());
        }
        let mut words = code.split_whitespace();
        let command = words.next().unwrap_or("").to_ascii_uppercase();
        let params: Vec<&str> = words.collect();
        match command.as_str() {
            "G90" => self.relative = false,
            "G91" => self.relative = true,
            "M400" => {}
            "G0" | "G1" => self.linear_move(&params, line)?,
            "G28" => self.home(&params),
            _ => return Err(SimError::Unsupported(code.to_string())),
        }
        self.history.push(code.to_string());
        Ok(())
    }

    fn linear_move(&mut self, params: &[&str], line: &str) -> Result<(), SimError> {
        let mut target = self.position;
        for word in params {
            let letter = word.chars().next().unwrap_or(' ').to_ascii_uppercase();
            let value: f64 = word[letter.len_utf8()..].parse().map_err(|_| SimError::BadParameter {
                word: word.to_string(),
                line: line.to_string(),
            })?;
            match (letter, self.relative) {
                ('X', false) => target.x = value,
                ('Y', false) => target.y = value,
                ('Z', false) => target.z = value,
                ('X', true) => target.x += value,
                ('Y', true) => target.y += value,
                ('Z', true) => target.z += value,
                ('F', _) => self.last_feed = Some(value),
                _ => tracing::warn!("Ignoring parameter '{}' in '{}'", word, line),
            }
        }
        self.position = target;
        Ok(())
    }

    fn home(&mut self, params: &[&str]) {
        let axes: Vec<char> = params
            .iter()
            .filter_map(|p| p.chars().next())
            .map(|c| c.to_ascii_uppercase())
            .collect();
        let all = axes.is_empty();
        if all || axes.contains(&'X') {
            self.position.x = 0.0;
        }
        if all || axes.contains(&'Y') {
            self.position.y = 0.0;
        }
        if all || axes.contains(&'Z') {
            self.position.z = 0.0;
        }
    }
}

/// In-process host: a fixed profile, a simulated toolhead, and recorded
/// alerts and cancellations.
#[derive(Debug, Clone, Default)]
pub struct SimulatedHost {
    pub profile: Option<PrinterProfile>,
    pub toolhead: SimToolhead,
    /// Every batch passed to `issue_commands`, in order.
    pub batches: Vec<Vec<String>>,
    pub errors: Vec<String>,
    pub cancelled: bool,
}

impl SimulatedHost {
    pub fn new(profile: Option<PrinterProfile>) -> Self {
        Self { profile, ..Self::default() }
    }

    pub fn position(&self) -> Position {
        self.toolhead.position
    }

    /// All directives issued so far, flattened.
    pub fn issued(&self) -> Vec<String> {
        self.batches.iter().flatten().cloned().collect()
    }
}

impl ProfileSource for SimulatedHost {
    fn current_profile(&self) -> Option<PrinterProfile> {
        self.profile.clone()
    }
}

impl CommandSink for SimulatedHost {
    fn issue_commands(&mut self, commands: &[String]) -> Result<(), HostError> {
        if self.cancelled {
            let first = commands.first().cloned().unwrap_or_default();
            return Err(Box::new(SimError::Cancelled(first)));
        }
        self.batches.push(commands.to_vec());
        for line in commands {
            self.toolhead.execute(line)?;
        }
        Ok(())
    }
}

impl PrintControl for SimulatedHost {
    fn cancel_print(&mut self) -> Result<(), HostError> {
        tracing::warn!("Print cancelled");
        self.cancelled = true;
        Ok(())
    }
}

impl Notifier for SimulatedHost {
    fn raise_error(&mut self, message: &str) {
        tracing::error!("Operator alert: {}", message);
        self.errors.push(message.to_string());
    }
}
