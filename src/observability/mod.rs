//! Observability for moviestore
//!
//! Structured JSON logging with named lifecycle events. Used by the HTTP
//! layer and the CLI; the document store does not log.
//!
//! # Usage
//!
//! ```ignore
//! use moviestore::observability::{log_event_with_fields, Event, Logger};
//!
//! log_event_with_fields(Event::MovieCreated, &[("id", "42")]);
//! Logger::warn("SLOW_SAVE", &[("ms", "250")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};

fn severity_for(event: Event) -> Severity {
    if event.is_fatal() {
        Severity::Fatal
    } else {
        Severity::Info
    }
}

/// Log a lifecycle event
pub fn log_event(event: Event) {
    Logger::log(severity_for(event), event.as_str(), &[]);
}

/// Log a lifecycle event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(severity_for(event), event.as_str(), fields);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_for_events() {
        assert_eq!(severity_for(Event::ServerFailed), Severity::Fatal);
        assert_eq!(severity_for(Event::MovieDeleted), Severity::Info);
    }

    #[test]
    fn test_log_event_with_fields() {
        // This just verifies no panic
        log_event(Event::Serving);
        log_event_with_fields(Event::ConfigLoaded, &[("data_file", "/tmp/movies.json")]);
    }
}
