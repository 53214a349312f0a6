//! Error sinks
//!
//! A ruleset reports the messages of invalid rules to an [`ErrorSink`]. The
//! sinks here forward them to `tracing`, collect them in memory, or broadcast
//! them to live subscribers such as an error-message surface.

use std::sync::{Mutex, PoisonError};

use tokio::sync::broadcast;

use crate::utils::logging::{format_line, LogFormat};

/// Accepts validation error messages.
pub trait ErrorSink: Send + Sync {
    fn error(&self, message: &str);
}

impl<F> ErrorSink for F
where
    F: Fn(&str) + Send + Sync,
{
    fn error(&self, message: &str) {
        self(message)
    }
}

/// Emits every message as a `tracing` error event.
#[derive(Debug, Clone, Default)]
pub struct TracingSink {
    entity: Option<String>,
}

impl TracingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sink that tags every event with the entity type being validated.
    pub fn for_entity<E: ?Sized>() -> Self {
        Self {
            entity: Some(std::any::type_name::<E>().to_string()),
        }
    }
}

impl ErrorSink for TracingSink {
    fn error(&self, message: &str) {
        match &self.entity {
            Some(entity) => tracing::error!(entity = %entity, "{}", message),
            None => tracing::error!("{}", message),
        }
    }
}

/// Collects messages in memory.
#[derive(Debug, Default)]
pub struct CollectingSink {
    messages: Mutex<Vec<String>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the messages collected so far.
    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Drains the collected messages.
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.messages.lock().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn len(&self) -> usize {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ErrorSink for CollectingSink {
    fn error(&self, message: &str) {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message.to_string());
    }
}

/// Broadcasts validation errors to multiple subscribers.
///
/// Wraps a `tokio::sync::broadcast::Sender<String>`; each message is
/// formatted as a text or JSON log line before being sent.
#[derive(Clone)]
pub struct BroadcastSink {
    sender: broadcast::Sender<String>,
    format: LogFormat,
}

impl BroadcastSink {
    /// Creates a new `BroadcastSink` with the specified buffer capacity.
    ///
    /// The capacity is clamped to at least 1, since a zero-capacity broadcast
    /// channel panics on creation.
    ///
    /// # Examples
    ///
    /// ```
    /// use layerkit::utils::error_sink::BroadcastSink;
    ///
    /// let sink = BroadcastSink::new(1000);
    /// let sink_min = BroadcastSink::new(0);
    /// ```
    pub fn new(capacity: usize) -> Self {
        Self::with_format(capacity, LogFormat::from_env_or_default())
    }

    pub fn with_format(capacity: usize, format: LogFormat) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        BroadcastSink { sender, format }
    }

    /// Sends a raw line to all subscribers. Errors from having no active
    /// receivers are ignored.
    pub fn send(&self, line: String) {
        let _ = self.sender.send(line);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<String> {
        self.sender.subscribe()
    }

    pub fn format(&self) -> LogFormat {
        self.format
    }
}

impl ErrorSink for BroadcastSink {
    fn error(&self, message: &str) {
        self.send(format_line(
            &tracing::Level::ERROR,
            "layerkit::validation",
            message,
            self.format,
        ));
    }
}
