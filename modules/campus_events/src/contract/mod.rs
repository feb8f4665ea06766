//! Contract layer - public API for inter-module communication
//!
//! This layer contains transport-agnostic models and the native client trait.
//! NO serde derives on models - these are pure domain types.

pub mod client;
pub mod error;
pub mod model;
pub mod report;

pub use client::CampusEventsApi;
pub use error::{CampusError, ErrorKind};
pub use model::{
    Attendance, AttendanceAction, AttendanceStatus, College, CollegeUpdate, Event, EventStatus,
    EventUpdate, Feedback, NewCollege, NewEvent, NewStudent, Registration, RegistrationStatus,
    Student, StudentUpdate, UnknownStatus,
};
pub use report::{
    AttendanceStats, CollegePerformance, EventPopularity, EventReport, EventTypeStats,
    FeedbackStats, Overview, RegistrationStats, ReportFilter, StudentRanking,
};
