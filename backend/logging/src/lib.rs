//! Structured logging for callhub.
//!
//! Console output (plain or JSON), an optional daily-rotated NDJSON file, and
//! a dedicated `signal_events` target for relay and room activity.

pub mod event_logger;
pub mod logger;

pub use event_logger::{SignalEvent, SignalEventLogger, SIGNAL_EVENTS_TARGET};
pub use logger::{init_logger, LogOptions};
