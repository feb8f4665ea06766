//! Contract models for the campus events module
//!
//! These models are transport-agnostic and used for inter-module communication.
//! NO serde derives - these are pure domain models.

use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;

/// Status string that does not name any known variant
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} status: '{value}'")]
pub struct UnknownStatus {
    pub kind: &'static str,
    pub value: String,
}

// ===== Colleges =====

/// College owning students and events
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct College {
    pub id: i32,
    pub name: String,
    pub location: Option<String>,
    pub contact_email: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Data for creating a college
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCollege {
    pub name: String,
    pub location: Option<String>,
    pub contact_email: Option<String>,
}

/// Partial update of a college; `None` keeps the current value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollegeUpdate {
    pub name: Option<String>,
    pub location: Option<String>,
    pub contact_email: Option<String>,
}

// ===== Students =====

/// Student enrolled at exactly one college
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Student {
    pub id: i32,
    pub college_id: i32,
    /// Student identifier, unique within the owning college only
    pub student_code: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Data for creating a student
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStudent {
    pub college_id: i32,
    pub student_code: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

/// Partial update of a student. The college and student code are fixed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

// ===== Events =====

/// Event lifecycle status. `Active` is the only non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventStatus {
    Active,
    Completed,
    Cancelled,
}

impl EventStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Whether `self -> next` is an allowed lifecycle transition
    pub fn can_transition_to(self, next: EventStatus) -> bool {
        matches!(
            (self, next),
            (Self::Active, Self::Completed) | (Self::Active, Self::Cancelled)
        )
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(UnknownStatus {
                kind: "event",
                value: other.to_string(),
            }),
        }
    }
}

/// Event owned by a college
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub id: i32,
    pub college_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub event_type: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub location: Option<String>,
    pub max_capacity: i32,
    /// Number of active registrations; written only by the registration commit
    pub current_registrations: i32,
    pub status: EventStatus,
    pub created_at: DateTime<Utc>,
}

impl Event {
    pub fn is_full(&self) -> bool {
        self.current_registrations >= self.max_capacity
    }

    pub fn has_ended(&self, now: DateTime<Utc>) -> bool {
        self.end_time <= now
    }
}

/// Data for creating an event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEvent {
    pub college_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub event_type: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub location: Option<String>,
    pub max_capacity: i32,
}

/// Partial update of an event's details
///
/// Status moves only through complete/cancel, and the registration counter
/// is never written here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub event_type: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub max_capacity: Option<i32>,
}

// ===== Registrations =====

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegistrationStatus {
    Registered,
    Cancelled,
}

impl RegistrationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Registered => "registered",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for RegistrationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RegistrationStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "registered" => Ok(Self::Registered),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(UnknownStatus {
                kind: "registration",
                value: other.to_string(),
            }),
        }
    }
}

/// Link between one student and one event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub id: i32,
    pub student_id: i32,
    pub event_id: i32,
    pub registered_at: DateTime<Utc>,
    pub status: RegistrationStatus,
}

impl Registration {
    pub fn is_active(&self) -> bool {
        self.status == RegistrationStatus::Registered
    }
}

// ===== Attendance =====

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttendanceStatus {
    Absent,
    Present,
    Late,
}

impl AttendanceStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Absent => "absent",
            Self::Present => "present",
            Self::Late => "late",
        }
    }

    /// Present and late both count as having attended
    pub fn is_attended(self) -> bool {
        matches!(self, Self::Present | Self::Late)
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AttendanceStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "absent" => Ok(Self::Absent),
            "present" => Ok(Self::Present),
            "late" => Ok(Self::Late),
            other => Err(UnknownStatus {
                kind: "attendance",
                value: other.to_string(),
            }),
        }
    }
}

/// Check-in/check-out record, at most one per registration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attendance {
    pub id: i32,
    pub registration_id: i32,
    pub check_in_time: Option<DateTime<Utc>>,
    pub check_out_time: Option<DateTime<Utc>>,
    pub status: AttendanceStatus,
}

/// Attendance transition requested by a caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttendanceAction {
    CheckIn,
    CheckOut,
}

// ===== Feedback =====

/// Post-event rating, one per registration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    pub id: i32,
    pub registration_id: i32,
    /// Always within 1..=5
    pub rating: i32,
    pub comment: Option<String>,
    pub submitted_at: DateTime<Utc>,
}
