//! HTTP request handlers - thin layer that delegates to domain service

use super::{
    dto::*,
    error::{map_domain_error, Problem},
};
use crate::domain::Service;
use axum::{
    extract::{Path, Query},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

// ===== Registration Handlers =====

/// Register a student for an event
#[utoipa::path(
    post,
    path = "/registrations",
    tag = "registrations",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Registration created", body = RegistrationDto),
        (status = 404, description = "Student or event not found", body = Problem),
        (status = 409, description = "Duplicate, full, or event not active", body = Problem),
        (status = 503, description = "Store unavailable", body = Problem)
    )
)]
pub async fn register(
    service: Arc<Service>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegistrationDto>), Problem> {
    let registration = service
        .register(req.student_id, req.event_id)
        .await
        .map_err(map_domain_error)?;

    Ok((StatusCode::CREATED, Json(registration.into())))
}

#[utoipa::path(
    get,
    path = "/registrations/{id}",
    tag = "registrations",
    params(("id" = i32, Path, description = "Registration id")),
    responses(
        (status = 200, description = "OK", body = RegistrationDto),
        (status = 404, description = "Not found", body = Problem)
    )
)]
pub async fn get_registration(
    service: Arc<Service>,
    Path(id): Path<i32>,
) -> Result<Json<RegistrationDto>, Problem> {
    let registration = service
        .get_registration(id)
        .await
        .map_err(|e| map_domain_error(e).with_instance(format!("/registrations/{id}")))?;

    Ok(Json(registration.into()))
}

/// Cancel a registration and free its seat
#[utoipa::path(
    delete,
    path = "/registrations/{id}",
    tag = "registrations",
    params(("id" = i32, Path, description = "Registration id")),
    responses(
        (status = 200, description = "Registration cancelled", body = RegistrationDto),
        (status = 404, description = "Not found", body = Problem),
        (status = 409, description = "Already cancelled", body = Problem)
    )
)]
pub async fn cancel_registration(
    service: Arc<Service>,
    Path(id): Path<i32>,
) -> Result<Json<RegistrationDto>, Problem> {
    let registration = service
        .cancel_registration(id)
        .await
        .map_err(|e| map_domain_error(e).with_instance(format!("/registrations/{id}")))?;

    Ok(Json(registration.into()))
}

// ===== Attendance Handlers =====

/// Check in or check out
#[utoipa::path(
    post,
    path = "/attendance",
    tag = "attendance",
    request_body = AttendanceRequest,
    responses(
        (status = 200, description = "OK", body = AttendanceDto),
        (status = 404, description = "Not found", body = Problem),
        (status = 409, description = "Transition not allowed", body = Problem)
    )
)]
pub async fn record_attendance(
    service: Arc<Service>,
    Json(req): Json<AttendanceRequest>,
) -> Result<Json<AttendanceDto>, Problem> {
    let attendance = service
        .record_attendance(req.registration_id, req.action.into())
        .await
        .map_err(map_domain_error)?;

    Ok(Json(attendance.into()))
}

#[utoipa::path(
    get,
    path = "/attendance/{registration_id}",
    tag = "attendance",
    params(("registration_id" = i32, Path, description = "Registration id")),
    responses(
        (status = 200, description = "OK", body = AttendanceDto),
        (status = 404, description = "Not found", body = Problem)
    )
)]
pub async fn get_attendance(
    service: Arc<Service>,
    Path(registration_id): Path<i32>,
) -> Result<Json<AttendanceDto>, Problem> {
    let attendance = service
        .get_attendance(registration_id)
        .await
        .map_err(|e| map_domain_error(e).with_instance(format!("/attendance/{registration_id}")))?;

    Ok(Json(match attendance {
        Some(a) => a.into(),
        None => AttendanceDto::not_checked_in(registration_id),
    }))
}

// ===== Feedback Handlers =====

/// Submit or replace feedback
#[utoipa::path(
    post,
    path = "/feedback",
    tag = "feedback",
    request_body = FeedbackRequest,
    responses(
        (status = 201, description = "Created", body = FeedbackDto),
        (status = 400, description = "Rating out of range", body = Problem),
        (status = 404, description = "Not found", body = Problem),
        (status = 409, description = "Not attended or event not finished", body = Problem)
    )
)]
pub async fn submit_feedback(
    service: Arc<Service>,
    Json(req): Json<FeedbackRequest>,
) -> Result<(StatusCode, Json<FeedbackDto>), Problem> {
    let feedback = service
        .submit_feedback(req.registration_id, req.rating, req.comment)
        .await
        .map_err(map_domain_error)?;

    Ok((StatusCode::CREATED, Json(feedback.into())))
}

// ===== Report Handlers =====

#[utoipa::path(
    get,
    path = "/reports/registrations",
    tag = "reports",
    params(ReportQuery),
    responses((status = 200, description = "OK", body = [RegistrationStatsDto]))
)]
pub async fn registration_report(
    service: Arc<Service>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<Vec<RegistrationStatsDto>>, Problem> {
    let stats = service
        .registration_report(query.into())
        .await
        .map_err(map_domain_error)?;

    Ok(Json(stats.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/reports/attendance",
    tag = "reports",
    params(ReportQuery),
    responses((status = 200, description = "OK", body = [AttendanceStatsDto]))
)]
pub async fn attendance_report(
    service: Arc<Service>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<Vec<AttendanceStatsDto>>, Problem> {
    let stats = service
        .attendance_report(query.into())
        .await
        .map_err(map_domain_error)?;

    Ok(Json(stats.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/reports/feedback",
    tag = "reports",
    params(ReportQuery),
    responses((status = 200, description = "OK", body = [FeedbackStatsDto]))
)]
pub async fn feedback_report(
    service: Arc<Service>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<Vec<FeedbackStatsDto>>, Problem> {
    let stats = service
        .feedback_report(query.into())
        .await
        .map_err(map_domain_error)?;

    Ok(Json(stats.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/reports/top-students",
    tag = "reports",
    params(TopStudentsQuery),
    responses(
        (status = 200, description = "OK", body = [StudentRankingDto]),
        (status = 400, description = "Limit of zero", body = Problem)
    )
)]
pub async fn top_students(
    service: Arc<Service>,
    Query(query): Query<TopStudentsQuery>,
) -> Result<Json<Vec<StudentRankingDto>>, Problem> {
    let ranking = service
        .top_students(query.college_id, query.limit)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(ranking.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/reports/overview",
    tag = "reports",
    responses((status = 200, description = "OK", body = OverviewDto))
)]
pub async fn overview(service: Arc<Service>) -> Result<Json<OverviewDto>, Problem> {
    let overview = service.overview().await.map_err(map_domain_error)?;
    Ok(Json(overview.into()))
}

/// Popular active events and per-type totals
#[utoipa::path(
    get,
    path = "/reports/events",
    tag = "reports",
    params(EventReportQuery),
    responses(
        (status = 200, description = "OK", body = EventReportDto),
        (status = 400, description = "Limit of zero", body = Problem)
    )
)]
pub async fn event_report(
    service: Arc<Service>,
    Query(query): Query<EventReportQuery>,
) -> Result<Json<EventReportDto>, Problem> {
    let report = service
        .event_report((&query).into(), query.limit)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(report.into()))
}

#[utoipa::path(
    get,
    path = "/reports/colleges/{id}",
    tag = "reports",
    params(("id" = i32, Path, description = "College id")),
    responses(
        (status = 200, description = "OK", body = CollegePerformanceDto),
        (status = 404, description = "College not found", body = Problem)
    )
)]
pub async fn college_report(
    service: Arc<Service>,
    Path(id): Path<i32>,
) -> Result<Json<CollegePerformanceDto>, Problem> {
    let report = service
        .college_report(id)
        .await
        .map_err(|e| map_domain_error(e).with_instance(format!("/reports/colleges/{id}")))?;

    Ok(Json(report.into()))
}

// ===== College Handlers =====

#[utoipa::path(
    post,
    path = "/colleges",
    tag = "colleges",
    request_body = CreateCollegeRequest,
    responses(
        (status = 201, description = "Created", body = CollegeDto),
        (status = 400, description = "Validation error", body = Problem)
    )
)]
pub async fn create_college(
    service: Arc<Service>,
    Json(req): Json<CreateCollegeRequest>,
) -> Result<(StatusCode, Json<CollegeDto>), Problem> {
    let college = service
        .create_college(req.into())
        .await
        .map_err(map_domain_error)?;

    Ok((StatusCode::CREATED, Json(college.into())))
}

#[utoipa::path(
    get,
    path = "/colleges/{id}",
    tag = "colleges",
    params(("id" = i32, Path, description = "College id")),
    responses((status = 200, description = "OK", body = CollegeDto), (status = 404, description = "Not found", body = Problem))
)]
pub async fn get_college(service: Arc<Service>, Path(id): Path<i32>) -> Result<Json<CollegeDto>, Problem> {
    let college = service.get_college(id).await.map_err(map_domain_error)?;
    Ok(Json(college.into()))
}

#[utoipa::path(
    put,
    path = "/colleges/{id}",
    tag = "colleges",
    params(("id" = i32, Path, description = "College id")),
    request_body = UpdateCollegeRequest,
    responses(
        (status = 200, description = "Updated", body = CollegeDto),
        (status = 400, description = "Validation error", body = Problem),
        (status = 404, description = "Not found", body = Problem)
    )
)]
pub async fn update_college(
    service: Arc<Service>,
    Path(id): Path<i32>,
    Json(req): Json<UpdateCollegeRequest>,
) -> Result<Json<CollegeDto>, Problem> {
    let college = service
        .update_college(id, req.into())
        .await
        .map_err(map_domain_error)?;
    Ok(Json(college.into()))
}

/// Delete a college with its students, events and their lifecycle rows
#[utoipa::path(
    delete,
    path = "/colleges/{id}",
    tag = "colleges",
    params(("id" = i32, Path, description = "College id")),
    responses((status = 204, description = "Deleted"), (status = 404, description = "Not found", body = Problem))
)]
pub async fn delete_college(service: Arc<Service>, Path(id): Path<i32>) -> Result<StatusCode, Problem> {
    service.delete_college(id).await.map_err(map_domain_error)?;
    Ok(StatusCode::NO_CONTENT)
}

// ===== Student Handlers =====

#[utoipa::path(
    post,
    path = "/students",
    tag = "students",
    request_body = CreateStudentRequest,
    responses(
        (status = 201, description = "Created", body = StudentDto),
        (status = 400, description = "Validation error", body = Problem),
        (status = 404, description = "College not found", body = Problem),
        (status = 409, description = "Student code taken", body = Problem)
    )
)]
pub async fn create_student(
    service: Arc<Service>,
    Json(req): Json<CreateStudentRequest>,
) -> Result<(StatusCode, Json<StudentDto>), Problem> {
    let student = service
        .create_student(req.into())
        .await
        .map_err(map_domain_error)?;

    Ok((StatusCode::CREATED, Json(student.into())))
}

#[utoipa::path(
    get,
    path = "/students/{id}",
    tag = "students",
    params(("id" = i32, Path, description = "Student id")),
    responses((status = 200, description = "OK", body = StudentDto), (status = 404, description = "Not found", body = Problem))
)]
pub async fn get_student(service: Arc<Service>, Path(id): Path<i32>) -> Result<Json<StudentDto>, Problem> {
    let student = service.get_student(id).await.map_err(map_domain_error)?;
    Ok(Json(student.into()))
}

#[utoipa::path(
    put,
    path = "/students/{id}",
    tag = "students",
    params(("id" = i32, Path, description = "Student id")),
    request_body = UpdateStudentRequest,
    responses(
        (status = 200, description = "Updated", body = StudentDto),
        (status = 400, description = "Validation error", body = Problem),
        (status = 404, description = "Not found", body = Problem)
    )
)]
pub async fn update_student(
    service: Arc<Service>,
    Path(id): Path<i32>,
    Json(req): Json<UpdateStudentRequest>,
) -> Result<Json<StudentDto>, Problem> {
    let student = service
        .update_student(id, req.into())
        .await
        .map_err(map_domain_error)?;
    Ok(Json(student.into()))
}

#[utoipa::path(
    delete,
    path = "/students/{id}",
    tag = "students",
    params(("id" = i32, Path, description = "Student id")),
    responses((status = 204, description = "Deleted"), (status = 404, description = "Not found", body = Problem))
)]
pub async fn delete_student(service: Arc<Service>, Path(id): Path<i32>) -> Result<StatusCode, Problem> {
    service.delete_student(id).await.map_err(map_domain_error)?;
    Ok(StatusCode::NO_CONTENT)
}

// ===== Event Handlers =====

#[utoipa::path(
    post,
    path = "/events",
    tag = "events",
    request_body = CreateEventRequest,
    responses(
        (status = 201, description = "Created", body = EventDto),
        (status = 400, description = "Bad times or capacity", body = Problem),
        (status = 404, description = "College not found", body = Problem)
    )
)]
pub async fn create_event(
    service: Arc<Service>,
    Json(req): Json<CreateEventRequest>,
) -> Result<(StatusCode, Json<EventDto>), Problem> {
    let event = service
        .create_event(req.into())
        .await
        .map_err(map_domain_error)?;

    Ok((StatusCode::CREATED, Json(event.into())))
}

#[utoipa::path(
    get,
    path = "/events/{id}",
    tag = "events",
    params(("id" = i32, Path, description = "Event id")),
    responses((status = 200, description = "OK", body = EventDto), (status = 404, description = "Not found", body = Problem))
)]
pub async fn get_event(service: Arc<Service>, Path(id): Path<i32>) -> Result<Json<EventDto>, Problem> {
    let event = service
        .get_event(id)
        .await
        .map_err(|e| map_domain_error(e).with_instance(format!("/events/{id}")))?;

    Ok(Json(event.into()))
}

/// Edit event details; times and capacity are re-validated
#[utoipa::path(
    put,
    path = "/events/{id}",
    tag = "events",
    params(("id" = i32, Path, description = "Event id")),
    request_body = UpdateEventRequest,
    responses(
        (status = 200, description = "Updated", body = EventDto),
        (status = 400, description = "Bad times or capacity", body = Problem),
        (status = 404, description = "Not found", body = Problem),
        (status = 409, description = "Capacity below current registrations", body = Problem)
    )
)]
pub async fn update_event(
    service: Arc<Service>,
    Path(id): Path<i32>,
    Json(req): Json<UpdateEventRequest>,
) -> Result<Json<EventDto>, Problem> {
    let event = service
        .update_event(id, req.into())
        .await
        .map_err(|e| map_domain_error(e).with_instance(format!("/events/{id}")))?;

    Ok(Json(event.into()))
}

#[utoipa::path(
    post,
    path = "/events/{id}/complete",
    tag = "events",
    params(("id" = i32, Path, description = "Event id")),
    responses(
        (status = 200, description = "OK", body = EventDto),
        (status = 404, description = "Not found", body = Problem),
        (status = 409, description = "Event already completed or cancelled", body = Problem)
    )
)]
pub async fn complete_event(service: Arc<Service>, Path(id): Path<i32>) -> Result<Json<EventDto>, Problem> {
    let event = service.complete_event(id).await.map_err(map_domain_error)?;
    Ok(Json(event.into()))
}

#[utoipa::path(
    post,
    path = "/events/{id}/cancel",
    tag = "events",
    params(("id" = i32, Path, description = "Event id")),
    responses(
        (status = 200, description = "OK", body = EventDto),
        (status = 404, description = "Not found", body = Problem),
        (status = 409, description = "Event already completed or cancelled", body = Problem)
    )
)]
pub async fn cancel_event(service: Arc<Service>, Path(id): Path<i32>) -> Result<Json<EventDto>, Problem> {
    let event = service.cancel_event(id).await.map_err(map_domain_error)?;
    Ok(Json(event.into()))
}

#[utoipa::path(
    delete,
    path = "/events/{id}",
    tag = "events",
    params(("id" = i32, Path, description = "Event id")),
    responses((status = 204, description = "Deleted"), (status = 404, description = "Not found", body = Problem))
)]
pub async fn delete_event(service: Arc<Service>, Path(id): Path<i32>) -> Result<StatusCode, Problem> {
    service.delete_event(id).await.map_err(map_domain_error)?;
    Ok(StatusCode::NO_CONTENT)
}
