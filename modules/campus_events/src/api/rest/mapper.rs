//! Mapper implementations for converting between DTOs and contract models
//!
//! Status enums leave the contract as their lowercase strings.

use super::dto::*;
use crate::contract;

// ===== Lifecycle conversions =====

impl From<contract::Registration> for RegistrationDto {
    fn from(r: contract::Registration) -> Self {
        Self {
            id: r.id,
            student_id: r.student_id,
            event_id: r.event_id,
            registered_at: r.registered_at,
            status: r.status.to_string(),
        }
    }
}

impl From<AttendanceActionDto> for contract::AttendanceAction {
    fn from(action: AttendanceActionDto) -> Self {
        match action {
            AttendanceActionDto::CheckIn => Self::CheckIn,
            AttendanceActionDto::CheckOut => Self::CheckOut,
        }
    }
}

impl From<contract::Attendance> for AttendanceDto {
    fn from(a: contract::Attendance) -> Self {
        Self {
            id: Some(a.id),
            registration_id: a.registration_id,
            check_in_time: a.check_in_time,
            check_out_time: a.check_out_time,
            status: a.status.to_string(),
        }
    }
}

impl AttendanceDto {
    /// View of a registration that has never checked in
    pub fn not_checked_in(registration_id: i32) -> Self {
        Self {
            id: None,
            registration_id,
            check_in_time: None,
            check_out_time: None,
            status: contract::AttendanceStatus::Absent.to_string(),
        }
    }
}

impl From<contract::Feedback> for FeedbackDto {
    fn from(f: contract::Feedback) -> Self {
        Self {
            id: f.id,
            registration_id: f.registration_id,
            rating: f.rating,
            comment: f.comment,
            submitted_at: f.submitted_at,
        }
    }
}

// ===== Directory conversions =====

impl From<CreateCollegeRequest> for contract::NewCollege {
    fn from(req: CreateCollegeRequest) -> Self {
        Self {
            name: req.name,
            location: req.location,
            contact_email: req.contact_email,
        }
    }
}

impl From<contract::College> for CollegeDto {
    fn from(c: contract::College) -> Self {
        Self {
            id: c.id,
            name: c.name,
            location: c.location,
            contact_email: c.contact_email,
            created_at: c.created_at,
        }
    }
}

impl From<CreateStudentRequest> for contract::NewStudent {
    fn from(req: CreateStudentRequest) -> Self {
        Self {
            college_id: req.college_id,
            student_code: req.student_code,
            name: req.name,
            email: req.email,
            phone: req.phone,
        }
    }
}

impl From<contract::Student> for StudentDto {
    fn from(s: contract::Student) -> Self {
        Self {
            id: s.id,
            college_id: s.college_id,
            student_code: s.student_code,
            name: s.name,
            email: s.email,
            phone: s.phone,
            created_at: s.created_at,
        }
    }
}

impl From<CreateEventRequest> for contract::NewEvent {
    fn from(req: CreateEventRequest) -> Self {
        Self {
            college_id: req.college_id,
            title: req.title,
            description: req.description,
            event_type: req.event_type,
            start_time: req.start_time,
            end_time: req.end_time,
            location: req.location,
            max_capacity: req.max_capacity,
        }
    }
}

impl From<contract::Event> for EventDto {
    fn from(e: contract::Event) -> Self {
        Self {
            id: e.id,
            college_id: e.college_id,
            title: e.title,
            description: e.description,
            event_type: e.event_type,
            start_time: e.start_time,
            end_time: e.end_time,
            location: e.location,
            max_capacity: e.max_capacity,
            current_registrations: e.current_registrations,
            status: e.status.to_string(),
            created_at: e.created_at,
        }
    }
}

// ===== Report conversions =====

impl From<ReportQuery> for contract::ReportFilter {
    fn from(q: ReportQuery) -> Self {
        Self {
            college_id: q.college_id,
            event_id: q.event_id,
            event_type: q.event_type,
            start_date: q.start_date,
            end_date: q.end_date,
        }
    }
}

impl From<contract::RegistrationStats> for RegistrationStatsDto {
    fn from(s: contract::RegistrationStats) -> Self {
        Self {
            event_id: s.event_id,
            event_title: s.event_title,
            event_type: s.event_type,
            start_time: s.start_time,
            max_capacity: s.max_capacity,
            current_registrations: s.current_registrations,
            total_registrations: s.total_registrations,
            registration_percentage: s.registration_percentage,
        }
    }
}

impl From<contract::AttendanceStats> for AttendanceStatsDto {
    fn from(s: contract::AttendanceStats) -> Self {
        Self {
            event_id: s.event_id,
            event_title: s.event_title,
            event_type: s.event_type,
            start_time: s.start_time,
            active_registrations: s.active_registrations,
            present_count: s.present_count,
            late_count: s.late_count,
            absent_count: s.absent_count,
            attendance_percentage: s.attendance_percentage,
        }
    }
}

impl From<contract::FeedbackStats> for FeedbackStatsDto {
    fn from(s: contract::FeedbackStats) -> Self {
        Self {
            event_id: s.event_id,
            event_title: s.event_title,
            event_type: s.event_type,
            start_time: s.start_time,
            feedback_count: s.feedback_count,
            average_rating: s.average_rating,
            rating_distribution: s.rating_distribution.to_vec(),
        }
    }
}

impl From<contract::StudentRanking> for StudentRankingDto {
    fn from(s: contract::StudentRanking) -> Self {
        Self {
            student_id: s.student_id,
            college_id: s.college_id,
            student_code: s.student_code,
            name: s.name,
            total_registrations: s.total_registrations,
            events_attended: s.events_attended,
            attendance_rate: s.attendance_rate,
        }
    }
}

impl From<contract::Overview> for OverviewDto {
    fn from(o: contract::Overview) -> Self {
        Self {
            total_colleges: o.total_colleges,
            total_students: o.total_students,
            total_events: o.total_events,
            active_events: o.active_events,
            total_registrations: o.total_registrations,
            average_registrations_per_event: o.average_registrations_per_event,
        }
    }
}

// ===== Update requests =====

impl From<UpdateCollegeRequest> for contract::CollegeUpdate {
    fn from(req: UpdateCollegeRequest) -> Self {
        Self {
            name: req.name,
            location: req.location,
            contact_email: req.contact_email,
        }
    }
}

impl From<UpdateStudentRequest> for contract::StudentUpdate {
    fn from(req: UpdateStudentRequest) -> Self {
        Self {
            name: req.name,
            email: req.email,
            phone: req.phone,
        }
    }
}

impl From<UpdateEventRequest> for contract::EventUpdate {
    fn from(req: UpdateEventRequest) -> Self {
        Self {
            title: req.title,
            description: req.description,
            event_type: req.event_type,
            start_time: req.start_time,
            end_time: req.end_time,
            location: req.location,
            max_capacity: req.max_capacity,
        }
    }
}

// ===== Event and college reports =====

impl From<&EventReportQuery> for contract::ReportFilter {
    fn from(q: &EventReportQuery) -> Self {
        Self {
            college_id: q.college_id,
            event_id: None,
            event_type: q.event_type.clone(),
            start_date: q.start_date,
            end_date: q.end_date,
        }
    }
}

impl From<contract::EventPopularity> for EventPopularityDto {
    fn from(p: contract::EventPopularity) -> Self {
        Self {
            event_id: p.event_id,
            event_title: p.event_title,
            event_type: p.event_type,
            start_time: p.start_time,
            max_capacity: p.max_capacity,
            current_registrations: p.current_registrations,
            total_registrations: p.total_registrations,
            registration_percentage: p.registration_percentage,
        }
    }
}

impl From<contract::EventTypeStats> for EventTypeStatsDto {
    fn from(t: contract::EventTypeStats) -> Self {
        Self {
            event_type: t.event_type,
            total_events: t.total_events,
            total_registrations: t.total_registrations,
            average_registrations: t.average_registrations,
            average_registration_percentage: t.average_registration_percentage,
        }
    }
}

impl From<contract::EventReport> for EventReportDto {
    fn from(r: contract::EventReport) -> Self {
        Self {
            event_popularity: r.popularity.into_iter().map(Into::into).collect(),
            event_type_breakdown: r.type_breakdown.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<contract::CollegePerformance> for CollegePerformanceDto {
    fn from(c: contract::CollegePerformance) -> Self {
        Self {
            college_id: c.college_id,
            college_name: c.college_name,
            total_students: c.total_students,
            total_events: c.total_events,
            total_registrations: c.total_registrations,
            average_registrations_per_event: c.average_registrations_per_event,
            present_count: c.present_count,
            late_count: c.late_count,
            attendance_rate: c.attendance_rate,
            feedback_count: c.feedback_count,
            average_rating: c.average_rating,
        }
    }
}
