//! # Alerts
//!
//! The user-visible side channel for failures of user-initiated operations.
//!
//! The orchestrator never prints; it hands a message to an `Alerts`
//! implementation and moves on. The terminal prints it, tests record it.

/// Receives user-visible failure messages.
pub trait Alerts: Send + Sync {
    fn alert(&self, message: &str);
}

/// Prints alerts on stdout, next to the rendered screen.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalAlerts;

impl Alerts for TerminalAlerts {
    fn alert(&self, message: &str) {
        println!("! {}", message);
    }
}

/// Keeps every alert for later inspection.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingAlerts {
    messages: std::sync::Mutex<Vec<String>>,
}

#[cfg(test)]
impl RecordingAlerts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Alerts raised so far, oldest first.
    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .map(|messages| messages.clone())
            .unwrap_or_default()
    }

    pub fn count(&self) -> usize {
        self.messages.lock().map(|messages| messages.len()).unwrap_or(0)
    }
}

#[cfg(test)]
impl Alerts for RecordingAlerts {
    fn alert(&self, message: &str) {
        if let Ok(mut messages) = self.messages.lock() {
            messages.push(message.to_string());
        }
    }
}
