//! Lookup failures shared by both clients
//!
//! The `Display` text of every variant is what the user sees in the error
//! notification, so it is kept short and actionable.

use std::fmt;

use reqwest::StatusCode;
use thiserror::Error;

/// Which external service a failure came from
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Service {
    Geocoding,
    Weather,
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Service::Geocoding => f.write_str("Geocoding service"),
            Service::Weather => f.write_str("Weather service"),
        }
    }
}

/// Coarse failure taxonomy used by the UI boundary
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Rejected before any request was issued
    Validation,
    /// The search succeeded but matched nothing
    NotFound,
    /// Non-success status or unparseable payload
    Service,
    /// The service could not be reached
    Transport,
}

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("Please enter a location to search.")]
    EmptyQuery,

    #[error("Location not found. Please try a different search term.")]
    NotFound,

    #[error("{}", status_message(.service, .status))]
    Status { service: Service, status: StatusCode },

    #[error("{service} returned an unexpected response: {detail}")]
    Payload { service: Service, detail: String },

    #[error("Could not reach {service}: {source}")]
    Transport {
        service: Service,
        #[source]
        source: reqwest::Error,
    },
}

impl LookupError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LookupError::EmptyQuery => ErrorKind::Validation,
            LookupError::NotFound => ErrorKind::NotFound,
            LookupError::Status { .. } | LookupError::Payload { .. } => ErrorKind::Service,
            LookupError::Transport { .. } => ErrorKind::Transport,
        }
    }

    pub(crate) fn payload(service: Service, detail: impl fmt::Display) -> Self {
        LookupError::Payload {
            service,
            detail: detail.to_string(),
        }
    }

    pub(crate) fn transport(service: Service) -> impl FnOnce(reqwest::Error) -> Self {
        move |source| LookupError::Transport { service, source }
    }
}

fn status_message(service: &Service, status: &StatusCode) -> String {
    match service {
        Service::Geocoding => format!("Geocoding failed: {}", status.as_u16()),
        Service::Weather => format!("Weather API error: {}", status.as_u16()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_are_user_facing() {
        assert_eq!(
            LookupError::EmptyQuery.to_string(),
            "Please enter a location to search."
        );
        assert_eq!(
            LookupError::NotFound.to_string(),
            "Location not found. Please try a different search term."
        );

        let err = LookupError::Status {
            service: Service::Weather,
            status: StatusCode::INTERNAL_SERVER_ERROR,
        };
        assert_eq!(err.to_string(), "Weather API error: 500");

        let err = LookupError::Status {
            service: Service::Geocoding,
            status: StatusCode::SERVICE_UNAVAILABLE,
        };
        assert_eq!(err.to_string(), "Geocoding failed: 503");
    }

    #[test]
    fn test_kind_mapping() {
        assert_eq!(LookupError::EmptyQuery.kind(), ErrorKind::Validation);
        assert_eq!(LookupError::NotFound.kind(), ErrorKind::NotFound);
        assert_eq!(
            LookupError::payload(Service::Geocoding, "bad json").kind(),
            ErrorKind::Service
        );
    }
}
