//! Native client implementation - wraps domain service for in-process calls

use crate::contract::{
    Attendance, AttendanceAction, AttendanceStats, CampusError, CampusEventsApi,
    CollegePerformance, EventReport, Feedback, FeedbackStats, Overview, Registration,
    RegistrationStats, ReportFilter, StudentRanking,
};
use crate::domain::Service;
use async_trait::async_trait;
use std::sync::Arc;

/// Native client that calls the domain service directly
///
/// Used for in-process communication without HTTP overhead.
#[derive(Clone)]
pub struct NativeClient {
    service: Arc<Service>,
}

impl NativeClient {
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl CampusEventsApi for NativeClient {
    async fn register(&self, student_id: i32, event_id: i32) -> Result<Registration, CampusError> {
        self.service.register(student_id, event_id).await
    }

    async fn cancel_registration(&self, registration_id: i32) -> Result<Registration, CampusError> {
        self.service.cancel_registration(registration_id).await
    }

    async fn get_registration(&self, registration_id: i32) -> Result<Registration, CampusError> {
        self.service.get_registration(registration_id).await
    }

    async fn record_attendance(
        &self,
        registration_id: i32,
        action: AttendanceAction,
    ) -> Result<Attendance, CampusError> {
        self.service.record_attendance(registration_id, action).await
    }

    async fn submit_feedback(
        &self,
        registration_id: i32,
        rating: i32,
        comment: Option<String>,
    ) -> Result<Feedback, CampusError> {
        self.service
            .submit_feedback(registration_id, rating, comment)
            .await
    }

    async fn registration_report(
        &self,
        filter: ReportFilter,
    ) -> Result<Vec<RegistrationStats>, CampusError> {
        self.service.registration_report(filter).await
    }

    async fn attendance_report(&self, filter: ReportFilter) -> Result<Vec<AttendanceStats>, CampusError> {
        self.service.attendance_report(filter).await
    }

    async fn feedback_report(&self, filter: ReportFilter) -> Result<Vec<FeedbackStats>, CampusError> {
        self.service.feedback_report(filter).await
    }

    async fn top_students(
        &self,
        college_id: Option<i32>,
        limit: Option<usize>,
    ) -> Result<Vec<StudentRanking>, CampusError> {
        self.service.top_students(college_id, limit).await
    }

    async fn overview(&self) -> Result<Overview, CampusError> {
        self.service.overview().await
    }

    async fn event_report(
        &self,
        filter: ReportFilter,
        limit: Option<usize>,
    ) -> Result<EventReport, CampusError> {
        self.service.event_report(filter, limit).await
    }

    async fn college_report(&self, college_id: i32) -> Result<CollegePerformance, CampusError> {
        self.service.college_report(college_id).await
    }
}
