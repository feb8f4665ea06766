//! REST DTOs with serde derives for HTTP API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

// ===== Registration DTOs =====

/// Registration request
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub student_id: i32,
    pub event_id: i32,
}

/// Registration response DTO
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegistrationDto {
    pub id: i32,
    pub student_id: i32,
    pub event_id: i32,
    pub registered_at: DateTime<Utc>,
    /// `registered` or `cancelled`
    #[schema(example = "registered")]
    pub status: String,
}

// ===== Attendance DTOs =====

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceActionDto {
    CheckIn,
    CheckOut,
}

/// Check-in or check-out request
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AttendanceRequest {
    pub registration_id: i32,
    pub action: AttendanceActionDto,
}

/// Attendance response DTO
///
/// Before the first check-in there is no stored row: `id` is null and the
/// status reads `absent`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AttendanceDto {
    pub id: Option<i32>,
    pub registration_id: i32,
    pub check_in_time: Option<DateTime<Utc>>,
    pub check_out_time: Option<DateTime<Utc>>,
    /// `absent`, `present` or `late`
    #[schema(example = "present")]
    pub status: String,
}

// ===== Feedback DTOs =====

/// Feedback submission
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct FeedbackRequest {
    pub registration_id: i32,
    /// 1 to 5
    #[schema(example = 4)]
    pub rating: i32,
    #[serde(default)]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FeedbackDto {
    pub id: i32,
    pub registration_id: i32,
    pub rating: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub submitted_at: DateTime<Utc>,
}

// ===== College DTOs =====

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateCollegeRequest {
    #[schema(example = "Northfield Institute of Technology")]
    pub name: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub contact_email: Option<String>,
}

/// Fields left out keep their current value
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateCollegeRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub contact_email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CollegeDto {
    pub id: i32,
    pub name: String,
    pub location: Option<String>,
    pub contact_email: Option<String>,
    pub created_at: DateTime<Utc>,
}

// ===== Student DTOs =====

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateStudentRequest {
    pub college_id: i32,
    /// Unique within the college
    #[schema(example = "CS2025-014")]
    pub student_code: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
}

/// College and student code cannot change
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateStudentRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StudentDto {
    pub id: i32,
    pub college_id: i32,
    pub student_code: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

// ===== Event DTOs =====

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateEventRequest {
    pub college_id: i32,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[schema(example = "workshop")]
    pub event_type: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(default)]
    pub location: Option<String>,
    #[schema(example = 50)]
    pub max_capacity: i32,
}

/// Partial event update; status changes go through complete/cancel
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateEventRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub event_type: Option<String>,
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub location: Option<String>,
    /// Not below the current number of registrations
    #[serde(default)]
    pub max_capacity: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EventDto {
    pub id: i32,
    pub college_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub event_type: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub location: Option<String>,
    pub max_capacity: i32,
    pub current_registrations: i32,
    /// `active`, `completed` or `cancelled`
    pub status: String,
    pub created_at: DateTime<Utc>,
}

// ===== Report DTOs =====

/// Event selection for the per-event reports
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ReportQuery {
    pub college_id: Option<i32>,
    pub event_id: Option<i32>,
    pub event_type: Option<String>,
    /// Events starting at or after this instant (RFC 3339)
    pub start_date: Option<DateTime<Utc>>,
    /// Events starting at or before this instant (RFC 3339)
    pub end_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TopStudentsQuery {
    pub college_id: Option<i32>,
    /// Defaults to 3, capped by configuration
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct EventReportQuery {
    pub college_id: Option<i32>,
    pub event_type: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    /// Popular events to list; defaults to 10, capped by configuration
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegistrationStatsDto {
    pub event_id: i32,
    pub event_title: String,
    pub event_type: String,
    pub start_time: DateTime<Utc>,
    pub max_capacity: i32,
    pub current_registrations: i32,
    pub total_registrations: usize,
    pub registration_percentage: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AttendanceStatsDto {
    pub event_id: i32,
    pub event_title: String,
    pub event_type: String,
    pub start_time: DateTime<Utc>,
    pub active_registrations: usize,
    pub present_count: usize,
    pub late_count: usize,
    pub absent_count: usize,
    pub attendance_percentage: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FeedbackStatsDto {
    pub event_id: i32,
    pub event_title: String,
    pub event_type: String,
    pub start_time: DateTime<Utc>,
    pub feedback_count: usize,
    /// Null when the event has no feedback
    pub average_rating: Option<f64>,
    /// Counts for ratings 1 through 5
    pub rating_distribution: Vec<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StudentRankingDto {
    pub student_id: i32,
    pub college_id: i32,
    pub student_code: String,
    pub name: String,
    pub total_registrations: usize,
    pub events_attended: usize,
    pub attendance_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OverviewDto {
    pub total_colleges: usize,
    pub total_students: usize,
    pub total_events: usize,
    pub active_events: usize,
    pub total_registrations: i64,
    pub average_registrations_per_event: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EventPopularityDto {
    pub event_id: i32,
    pub event_title: String,
    pub event_type: String,
    pub start_time: DateTime<Utc>,
    pub max_capacity: i32,
    pub current_registrations: i32,
    pub total_registrations: usize,
    pub registration_percentage: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EventTypeStatsDto {
    pub event_type: String,
    pub total_events: usize,
    pub total_registrations: i64,
    pub average_registrations: f64,
    pub average_registration_percentage: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EventReportDto {
    pub event_popularity: Vec<EventPopularityDto>,
    pub event_type_breakdown: Vec<EventTypeStatsDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CollegePerformanceDto {
    pub college_id: i32,
    pub college_name: String,
    pub total_students: usize,
    pub total_events: usize,
    pub total_registrations: i64,
    pub average_registrations_per_event: f64,
    pub present_count: usize,
    pub late_count: usize,
    pub attendance_rate: f64,
    pub feedback_count: usize,
    /// Null when the college's events have no feedback
    pub average_rating: Option<f64>,
}
