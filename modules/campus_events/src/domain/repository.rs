//! Repository traits for data access
//!
//! These traits define the interface for data access operations.
//! Implementations are in infra/storage/repositories.rs (SeaORM) and
//! infra/storage/memory.rs (in-process).
//!
//! Every method that changes more than one row is atomic: either all of its
//! writes commit or none do. The `*Outcome` enums report a lost race instead of
//! an error so the service can re-read and fail with the precise domain error.

use crate::contract::{
    Attendance, AttendanceStatus, College, Event, EventStatus, Feedback, NewCollege, NewEvent,
    NewStudent, Registration, Student,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Storage-level failure
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Timeout, lost connection, busy database. Safe to retry.
    #[error("store unavailable: {0}")]
    Unavailable(String),
    /// A unique constraint rejected the write
    #[error("unique constraint violated: {0}")]
    Conflict(String),
    #[error("store failure: {0}")]
    Backend(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Seat request committed by [`RegistrationRepository::claim_seat`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeatClaim {
    pub student_id: i32,
    pub event_id: i32,
    /// `current_registrations` as read by the precondition checks
    pub observed_count: i32,
    pub registered_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeatClaimOutcome {
    /// Counter incremented and registration inserted or reactivated
    Claimed(Registration),
    /// Counter moved, event left `active`, or capacity reached since the read
    Stale,
    /// An active registration for the pair appeared since the read
    Duplicate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeatReleaseOutcome {
    /// Registration flipped to cancelled and the counter decremented once
    Released(Registration),
    /// Registration was no longer `registered`
    NotActive,
    Missing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckInOutcome {
    Recorded(Attendance),
    AlreadyCheckedIn,
    /// Registration is missing or cancelled at commit time
    RegistrationInactive,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutOutcome {
    Recorded(Attendance),
    NotCheckedIn,
    AlreadyCheckedOut,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventUpdateOutcome {
    Updated(Event),
    Missing,
    /// The new capacity is below the registration counter at commit time
    CapacityBelowRegistrations { current_registrations: i32 },
}

/// Result of [`FeedbackRepository::upsert`], re-checked at commit time
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedbackOutcome {
    Recorded(Feedback),
    /// Registration is missing or cancelled
    RegistrationInactive,
    /// No present/late check-in on the registration
    NotAttended,
}

/// Colleges, students and events: plain records keyed by id
#[async_trait]
pub trait DirectoryRepository: Send + Sync {
    async fn insert_college(&self, college: &NewCollege, at: DateTime<Utc>) -> StoreResult<College>;

    async fn find_college(&self, id: i32) -> StoreResult<Option<College>>;

    async fn list_colleges(&self) -> StoreResult<Vec<College>>;

    /// Overwrite name, location and contact email; `None` when the college is missing
    async fn update_college(&self, id: i32, college: &NewCollege) -> StoreResult<Option<College>>;

    /// Delete a college with its students, events and everything below them
    async fn delete_college(&self, id: i32) -> StoreResult<bool>;

    /// Fails with [`StoreError::Conflict`] when `(college_id, student_code)` is taken
    async fn insert_student(&self, student: &NewStudent, at: DateTime<Utc>) -> StoreResult<Student>;

    async fn find_student(&self, id: i32) -> StoreResult<Option<Student>>;

    async fn student_exists(&self, id: i32) -> StoreResult<bool>;

    async fn list_students(&self) -> StoreResult<Vec<Student>>;

    /// Overwrite name, email and phone. College and student code never change.
    async fn update_student(&self, id: i32, student: &NewStudent) -> StoreResult<Option<Student>>;

    /// Delete a student with its registrations, attendance and feedback
    async fn delete_student(&self, id: i32) -> StoreResult<bool>;

    async fn insert_event(&self, event: &NewEvent, at: DateTime<Utc>) -> StoreResult<Event>;

    async fn find_event(&self, id: i32) -> StoreResult<Option<Event>>;

    async fn list_events(&self) -> StoreResult<Vec<Event>>;

    /// Overwrite the event details in one conditional write that keeps
    /// `current_registrations <= max_capacity`. Status, college and counter stay.
    async fn update_event(&self, id: i32, event: &NewEvent) -> StoreResult<EventUpdateOutcome>;

    /// Move an `active` event to `to`; `None` when the event is not active
    async fn transition_event(&self, id: i32, to: EventStatus) -> StoreResult<Option<Event>>;

    /// Delete an event with its registrations, attendance and feedback
    async fn delete_event(&self, id: i32) -> StoreResult<bool>;
}

/// Registrations and the event registration counter
#[async_trait]
pub trait RegistrationRepository: Send + Sync {
    async fn find(&self, id: i32) -> StoreResult<Option<Registration>>;

    /// The registration row for a pair, active or cancelled
    async fn find_for_pair(&self, student_id: i32, event_id: i32)
        -> StoreResult<Option<Registration>>;

    /// Atomically increment the counter (compare-and-set on `observed_count`)
    /// and insert or reactivate the registration row. A reactivated row loses
    /// the attendance and feedback of its previous life.
    async fn claim_seat(&self, claim: SeatClaim) -> StoreResult<SeatClaimOutcome>;

    /// Atomically cancel the registration and decrement the counter
    async fn release_seat(&self, registration_id: i32) -> StoreResult<SeatReleaseOutcome>;

    async fn list_all(&self) -> StoreResult<Vec<Registration>>;
}

#[async_trait]
pub trait AttendanceRepository: Send + Sync {
    async fn find_by_registration(&self, registration_id: i32) -> StoreResult<Option<Attendance>>;

    /// Set `check_in_time` if unset, creating the row if absent
    async fn check_in(
        &self,
        registration_id: i32,
        at: DateTime<Utc>,
        status: AttendanceStatus,
    ) -> StoreResult<CheckInOutcome>;

    /// Set `check_out_time` if checked in and not yet checked out
    async fn check_out(&self, registration_id: i32, at: DateTime<Utc>) -> StoreResult<CheckOutOutcome>;

    async fn list_all(&self) -> StoreResult<Vec<Attendance>>;
}

#[async_trait]
pub trait FeedbackRepository: Send + Sync {
    async fn find_by_registration(&self, registration_id: i32) -> StoreResult<Option<Feedback>>;

    /// Insert, or replace rating/comment/submitted_at of the existing row.
    /// The registration must still be active and attended when this commits.
    async fn upsert(
        &self,
        registration_id: i32,
        rating: i32,
        comment: Option<String>,
        at: DateTime<Utc>,
    ) -> StoreResult<FeedbackOutcome>;

    async fn list_all(&self) -> StoreResult<Vec<Feedback>>;
}
