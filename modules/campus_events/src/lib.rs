//! Campus Events Module
//!
//! Event registration, capacity control, attendance tracking and feedback
//! for college-run events, plus the reports built over them.

// Public exports
pub mod contract;
pub use contract::{
    client::CampusEventsApi, error::CampusError, Attendance, AttendanceAction, AttendanceStatus,
    College, ErrorKind, Event, EventStatus, Feedback, NewCollege, NewEvent, NewStudent,
    Registration, RegistrationStatus, ReportFilter, Student,
};

pub mod module;
pub use module::{Backend, CampusEventsModule};

// Internal modules (hidden from public API)
#[doc(hidden)]
pub mod api;
#[doc(hidden)]
pub mod config;
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod infra;
