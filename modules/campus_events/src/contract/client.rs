//! Native client trait for inter-module communication
//!
//! This trait defines the API that other modules use to drive the event lifecycle.
//! NO HTTP - direct function calls for performance.

use super::error::CampusError;
use super::model::{Attendance, AttendanceAction, Feedback, Registration};
use super::report::{
    AttendanceStats, CollegePerformance, EventReport, FeedbackStats, Overview, RegistrationStats,
    ReportFilter, StudentRanking,
};
use async_trait::async_trait;

/// Campus events API for inter-module communication
#[async_trait]
pub trait CampusEventsApi: Send + Sync {
    // ===== Registration =====

    /// Register a student for an event
    async fn register(&self, student_id: i32, event_id: i32) -> Result<Registration, CampusError>;

    /// Cancel an active registration
    async fn cancel_registration(&self, registration_id: i32) -> Result<Registration, CampusError>;

    async fn get_registration(&self, registration_id: i32) -> Result<Registration, CampusError>;

    // ===== Attendance =====

    /// Apply a check-in or check-out
    async fn record_attendance(
        &self,
        registration_id: i32,
        action: AttendanceAction,
    ) -> Result<Attendance, CampusError>;

    // ===== Feedback =====

    /// Submit or replace feedback for an attended registration
    async fn submit_feedback(
        &self,
        registration_id: i32,
        rating: i32,
        comment: Option<String>,
    ) -> Result<Feedback, CampusError>;

    // ===== Reports =====

    async fn registration_report(
        &self,
        filter: ReportFilter,
    ) -> Result<Vec<RegistrationStats>, CampusError>;

    async fn attendance_report(&self, filter: ReportFilter) -> Result<Vec<AttendanceStats>, CampusError>;

    async fn feedback_report(&self, filter: ReportFilter) -> Result<Vec<FeedbackStats>, CampusError>;

    async fn top_students(
        &self,
        college_id: Option<i32>,
        limit: Option<usize>,
    ) -> Result<Vec<StudentRanking>, CampusError>;

    /// Global counts across colleges, students, events and registrations
    async fn overview(&self) -> Result<Overview, CampusError>;

    /// Popular active events and per-type totals
    async fn event_report(
        &self,
        filter: ReportFilter,
        limit: Option<usize>,
    ) -> Result<EventReport, CampusError>;

    async fn college_report(&self, college_id: i32) -> Result<CollegePerformance, CampusError>;
}
