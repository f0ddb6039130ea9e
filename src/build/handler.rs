//! Progress and error sinks for a build

use log::{error, info};

/// Receives human-readable progress and error messages from a build
pub trait BuildHandler {
    fn on_event(&mut self, message: &str);

    /// Called once when the build fails, before the error is returned
    fn on_error(&mut self, message: &str);

    fn has_error(&self) -> bool;
}

/// Forwards messages to the `log` facade
#[derive(Debug, Default)]
pub struct LogHandler {
    has_error: bool,
}

impl LogHandler {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BuildHandler for LogHandler {
    fn on_event(&mut self, message: &str) {
        info!("{}", message);
    }

    fn on_error(&mut self, message: &str) {
        self.has_error = true;
        error!("{}", message);
    }

    fn has_error(&self) -> bool {
        self.has_error
    }
}

/// Keeps every message
#[derive(Debug, Default, Clone)]
pub struct CollectingHandler {
    pub events: Vec<String>,
    pub errors: Vec<String>,
}

impl CollectingHandler {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BuildHandler for CollectingHandler {
    fn on_event(&mut self, message: &str) {
        self.events.push(message.to_string());
    }

    fn on_error(&mut self, message: &str) {
        self.errors.push(message.to_string());
    }

    fn has_error(&self) -> bool {
        !self.errors.is_empty()
    }
}
