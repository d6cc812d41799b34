//! Observable events
//!
//! Events are explicit and typed so log consumers can match on stable names.

use std::fmt;

/// Observable events in moviestore
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Lifecycle
    /// Configuration loaded
    ConfigLoaded,
    /// Backing file created by `init`
    StoreInitialized,
    /// Listener bound, ready for requests
    Serving,
    /// Server failed to start or crashed
    ServerFailed,

    // Writes
    /// Record inserted
    MovieCreated,
    /// Record replaced
    MovieUpdated,
    /// Record removed
    MovieDeleted,

    // Requests
    /// Request answered with a 4xx
    RequestRejected,
    /// Request answered with a 5xx
    RequestFailed,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::StoreInitialized => "STORE_INITIALIZED",
            Event::Serving => "MOVIESTORE_SERVING",
            Event::ServerFailed => "MOVIESTORE_SERVER_FAILED",

            Event::MovieCreated => "MOVIE_CREATED",
            Event::MovieUpdated => "MOVIE_UPDATED",
            Event::MovieDeleted => "MOVIE_DELETED",

            Event::RequestRejected => "REQUEST_REJECTED",
            Event::RequestFailed => "REQUEST_FAILED",
        }
    }

    /// Returns true if this event indicates a fatal condition
    pub fn is_fatal(&self) -> bool {
        matches!(self, Event::ServerFailed)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_events_have_string_representation() {
        let events = [
            Event::ConfigLoaded,
            Event::StoreInitialized,
            Event::Serving,
            Event::ServerFailed,
            Event::MovieCreated,
            Event::MovieUpdated,
            Event::MovieDeleted,
            Event::RequestRejected,
            Event::RequestFailed,
        ];

        for event in events {
            let s = event.as_str();
            assert!(!s.is_empty());
            assert!(s.chars().all(|c| c.is_uppercase() || c == '_'));
        }
    }

    #[test]
    fn test_fatal_events() {
        assert!(Event::ServerFailed.is_fatal());
        assert!(!Event::MovieCreated.is_fatal());
    }
}
