//! Report models produced by the reporting aggregator

use chrono::{DateTime, Utc};

/// Event selection shared by all per-event reports
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportFilter {
    pub college_id: Option<i32>,
    pub event_id: Option<i32>,
    pub event_type: Option<String>,
    /// Events starting at or after this instant
    pub start_date: Option<DateTime<Utc>>,
    /// Events starting at or before this instant
    pub end_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegistrationStats {
    pub event_id: i32,
    pub event_title: String,
    pub event_type: String,
    pub start_time: DateTime<Utc>,
    pub max_capacity: i32,
    pub current_registrations: i32,
    /// All registration rows, cancelled ones included
    pub total_registrations: usize,
    pub registration_percentage: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AttendanceStats {
    pub event_id: i32,
    pub event_title: String,
    pub event_type: String,
    pub start_time: DateTime<Utc>,
    pub active_registrations: usize,
    pub present_count: usize,
    pub late_count: usize,
    /// Active registrations without a present/late record
    pub absent_count: usize,
    pub attendance_percentage: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeedbackStats {
    pub event_id: i32,
    pub event_title: String,
    pub event_type: String,
    pub start_time: DateTime<Utc>,
    pub feedback_count: usize,
    /// `None` when no feedback exists; never confused with a real rating
    pub average_rating: Option<f64>,
    /// Count of ratings 1..=5, index 0 holds rating 1
    pub rating_distribution: [usize; 5],
}

#[derive(Debug, Clone, PartialEq)]
pub struct StudentRanking {
    pub student_id: i32,
    pub college_id: i32,
    pub student_code: String,
    pub name: String,
    pub total_registrations: usize,
    pub events_attended: usize,
    pub attendance_rate: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Overview {
    pub total_colleges: usize,
    pub total_students: usize,
    pub total_events: usize,
    pub active_events: usize,
    pub total_registrations: i64,
    pub average_registrations_per_event: f64,
}

/// Active event ranked by how many registrations it drew
#[derive(Debug, Clone, PartialEq)]
pub struct EventPopularity {
    pub event_id: i32,
    pub event_title: String,
    pub event_type: String,
    pub start_time: DateTime<Utc>,
    pub max_capacity: i32,
    pub current_registrations: i32,
    /// All registration rows, cancelled ones included
    pub total_registrations: usize,
    pub registration_percentage: f64,
}

/// Active events grouped by `event_type`
#[derive(Debug, Clone, PartialEq)]
pub struct EventTypeStats {
    pub event_type: String,
    pub total_events: usize,
    /// Sum of `current_registrations`
    pub total_registrations: i64,
    pub average_registrations: f64,
    pub average_registration_percentage: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EventReport {
    pub popularity: Vec<EventPopularity>,
    pub type_breakdown: Vec<EventTypeStats>,
}

/// Totals for one college across its students and events
#[derive(Debug, Clone, PartialEq)]
pub struct CollegePerformance {
    pub college_id: i32,
    pub college_name: String,
    pub total_students: usize,
    pub total_events: usize,
    /// Active registrations on the college's events
    pub total_registrations: i64,
    pub average_registrations_per_event: f64,
    pub present_count: usize,
    pub late_count: usize,
    /// Present and late over active registrations
    pub attendance_rate: f64,
    pub feedback_count: usize,
    pub average_rating: Option<f64>,
}
