//! Contract error types for the campus events module
//!
//! These errors are transport-agnostic and used for inter-module communication.
//! Every precondition failure has its own variant; callers never see a generic failure
//! for a rule violation.

use super::model::EventStatus;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Coarse classification of [`CampusError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Referenced entity is missing
    NotFound,
    /// Duplicate, full, already checked in/out, already cancelled
    Conflict,
    /// Bad input: time ordering, rating, capacity
    Validation,
    /// Operation invalid for the current lifecycle state
    State,
    /// Storage timeout or contention; safe to retry
    Transient,
    Internal,
}

/// Campus events domain errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CampusError {
    #[error("College not found: {id}")]
    CollegeNotFound { id: i32 },

    #[error("Student not found: {id}")]
    StudentNotFound { id: i32 },

    #[error("Event not found: {id}")]
    EventNotFound { id: i32 },

    #[error("Registration not found: {id}")]
    RegistrationNotFound { id: i32 },

    #[error("Event {id} is not active (status: {status})")]
    EventNotActive { id: i32, status: EventStatus },

    #[error("Registration for event {event_id} closed when it started")]
    RegistrationClosed { event_id: i32 },

    #[error("Student {student_id} is already registered for event {event_id}")]
    DuplicateRegistration { student_id: i32, event_id: i32 },

    #[error("Event {id} is at full capacity ({max_capacity})")]
    EventFull { id: i32, max_capacity: i32 },

    #[error("Event {id} has {current_registrations} registrations; capacity {max_capacity} is too small")]
    CapacityBelowRegistrations {
        id: i32,
        max_capacity: i32,
        current_registrations: i32,
    },

    #[error("Registration {id} is already cancelled")]
    AlreadyCancelled { id: i32 },

    #[error("Registration {id} is cancelled")]
    RegistrationCancelled { id: i32 },

    #[error("Registration {registration_id} is already checked in")]
    AlreadyCheckedIn { registration_id: i32 },

    #[error("Registration {registration_id} has not checked in")]
    NotCheckedIn { registration_id: i32 },

    #[error("Registration {registration_id} is already checked out")]
    AlreadyCheckedOut { registration_id: i32 },

    #[error("Registration {registration_id} did not attend the event")]
    NotAttended { registration_id: i32 },

    #[error("Event {event_id} ends at {end_time}; feedback opens afterwards")]
    EventNotYetCompleted {
        event_id: i32,
        end_time: DateTime<Utc>,
    },

    #[error("Rating must be between 1 and 5, got {rating}")]
    InvalidRating { rating: i32 },

    #[error("Student '{student_code}' already exists in college {college_id}")]
    DuplicateStudent {
        college_id: i32,
        student_code: String,
    },

    #[error("Event cannot move from {from} to {to}")]
    InvalidStatusTransition { from: EventStatus, to: EventStatus },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Service unavailable: {message}")]
    ServiceUnavailable { message: String },

    #[error("Internal error")]
    Internal,
}

impl CampusError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable {
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::CollegeNotFound { .. }
            | Self::StudentNotFound { .. }
            | Self::EventNotFound { .. }
            | Self::RegistrationNotFound { .. } => ErrorKind::NotFound,

            Self::DuplicateRegistration { .. }
            | Self::EventFull { .. }
            | Self::CapacityBelowRegistrations { .. }
            | Self::AlreadyCancelled { .. }
            | Self::AlreadyCheckedIn { .. }
            | Self::NotCheckedIn { .. }
            | Self::AlreadyCheckedOut { .. }
            | Self::DuplicateStudent { .. } => ErrorKind::Conflict,

            Self::InvalidRating { .. } | Self::Validation { .. } => ErrorKind::Validation,

            Self::EventNotActive { .. }
            | Self::RegistrationClosed { .. }
            | Self::RegistrationCancelled { .. }
            | Self::NotAttended { .. }
            | Self::EventNotYetCompleted { .. }
            | Self::InvalidStatusTransition { .. } => ErrorKind::State,

            Self::ServiceUnavailable { .. } => ErrorKind::Transient,
            Self::Internal => ErrorKind::Internal,
        }
    }

    /// Stable machine-readable code, e.g. `EVENT_FULL`
    pub fn code(&self) -> &'static str {
        match self {
            Self::CollegeNotFound { .. } => "COLLEGE_NOT_FOUND",
            Self::StudentNotFound { .. } => "STUDENT_NOT_FOUND",
            Self::EventNotFound { .. } => "EVENT_NOT_FOUND",
            Self::RegistrationNotFound { .. } => "REGISTRATION_NOT_FOUND",
            Self::EventNotActive { .. } => "EVENT_NOT_ACTIVE",
            Self::RegistrationClosed { .. } => "REGISTRATION_CLOSED",
            Self::DuplicateRegistration { .. } => "DUPLICATE_REGISTRATION",
            Self::EventFull { .. } => "EVENT_FULL",
            Self::CapacityBelowRegistrations { .. } => "CAPACITY_BELOW_REGISTRATIONS",
            Self::AlreadyCancelled { .. } => "ALREADY_CANCELLED",
            Self::RegistrationCancelled { .. } => "REGISTRATION_CANCELLED",
            Self::AlreadyCheckedIn { .. } => "ALREADY_CHECKED_IN",
            Self::NotCheckedIn { .. } => "NOT_CHECKED_IN",
            Self::AlreadyCheckedOut { .. } => "ALREADY_CHECKED_OUT",
            Self::NotAttended { .. } => "NOT_ATTENDED",
            Self::EventNotYetCompleted { .. } => "EVENT_NOT_YET_COMPLETED",
            Self::InvalidRating { .. } => "INVALID_RATING",
            Self::DuplicateStudent { .. } => "DUPLICATE_STUDENT",
            Self::InvalidStatusTransition { .. } => "INVALID_STATUS_TRANSITION",
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::ServiceUnavailable { .. } => "SERVICE_UNAVAILABLE",
            Self::Internal => "INTERNAL_ERROR",
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::Transient
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifecycle_failures_are_classified() {
        assert_eq!(
            CampusError::EventFull { id: 1, max_capacity: 2 }.kind(),
            ErrorKind::Conflict
        );
        assert_eq!(
            CampusError::NotAttended { registration_id: 1 }.kind(),
            ErrorKind::State
        );
        assert_eq!(CampusError::InvalidRating { rating: 6 }.kind(), ErrorKind::Validation);
        assert!(CampusError::unavailable("db timeout").is_retryable());
        assert!(!CampusError::StudentNotFound { id: 4 }.is_retryable());
    }
}
