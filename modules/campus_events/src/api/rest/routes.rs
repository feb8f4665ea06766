//! Route registration and the OpenAPI document

use super::{dto::*, error::Problem, handlers};
use crate::domain::Service;
use axum::{
    extract::{Path, Query},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use std::sync::Arc;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(title = "Campus Events API", description = "Registration, attendance, feedback and reporting"),
    paths(
        handlers::register,
        handlers::get_registration,
        handlers::cancel_registration,
        handlers::record_attendance,
        handlers::get_attendance,
        handlers::submit_feedback,
        handlers::registration_report,
        handlers::attendance_report,
        handlers::feedback_report,
        handlers::top_students,
        handlers::overview,
        handlers::event_report,
        handlers::college_report,
        handlers::create_college,
        handlers::get_college,
        handlers::update_college,
        handlers::delete_college,
        handlers::create_student,
        handlers::get_student,
        handlers::update_student,
        handlers::delete_student,
        handlers::create_event,
        handlers::get_event,
        handlers::update_event,
        handlers::complete_event,
        handlers::cancel_event,
        handlers::delete_event,
    ),
    components(schemas(
        Problem,
        RegisterRequest,
        RegistrationDto,
        AttendanceActionDto,
        AttendanceRequest,
        AttendanceDto,
        FeedbackRequest,
        FeedbackDto,
        CreateCollegeRequest,
        UpdateCollegeRequest,
        CollegeDto,
        CreateStudentRequest,
        UpdateStudentRequest,
        StudentDto,
        CreateEventRequest,
        UpdateEventRequest,
        EventDto,
        RegistrationStatsDto,
        AttendanceStatsDto,
        FeedbackStatsDto,
        StudentRankingDto,
        OverviewDto,
        EventPopularityDto,
        EventTypeStatsDto,
        EventReportDto,
        CollegePerformanceDto,
    ))
)]
pub struct ApiDoc;

/// Register all REST routes on `router`
pub fn register_routes(router: Router, service: Arc<Service>) -> Router {
    router
        // Lifecycle endpoints
        .route("/registrations", post(register_handler))
        .route(
            "/registrations/{id}",
            get(get_registration_handler).delete(cancel_registration_handler),
        )
        .route("/attendance", post(record_attendance_handler))
        .route("/attendance/{registration_id}", get(get_attendance_handler))
        .route("/feedback", post(submit_feedback_handler))
        // Reports
        .route("/reports/registrations", get(registration_report_handler))
        .route("/reports/attendance", get(attendance_report_handler))
        .route("/reports/feedback", get(feedback_report_handler))
        .route("/reports/top-students", get(top_students_handler))
        .route("/reports/overview", get(overview_handler))
        .route("/reports/events", get(event_report_handler))
        .route("/reports/colleges/{id}", get(college_report_handler))
        // Entity store
        .route("/colleges", post(create_college_handler))
        .route(
            "/colleges/{id}",
            get(get_college_handler)
                .put(update_college_handler)
                .delete(delete_college_handler),
        )
        .route("/students", post(create_student_handler))
        .route(
            "/students/{id}",
            get(get_student_handler)
                .put(update_student_handler)
                .delete(delete_student_handler),
        )
        .route("/events", post(create_event_handler))
        .route(
            "/events/{id}",
            get(get_event_handler)
                .put(update_event_handler)
                .delete(delete_event_handler),
        )
        .route("/events/{id}/complete", post(complete_event_handler))
        .route("/events/{id}/cancel", post(cancel_event_handler))
        .route("/openapi.json", get(openapi_handler))
        .layer(Extension(service))
}

async fn openapi_handler() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

// ===== Handler wrappers that extract service from Extension =====

async fn register_handler(
    Extension(service): Extension<Arc<Service>>,
    json: Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegistrationDto>), Problem> {
    handlers::register(service, json).await
}

async fn get_registration_handler(
    Extension(service): Extension<Arc<Service>>,
    path: Path<i32>,
) -> Result<Json<RegistrationDto>, Problem> {
    handlers::get_registration(service, path).await
}

async fn cancel_registration_handler(
    Extension(service): Extension<Arc<Service>>,
    path: Path<i32>,
) -> Result<Json<RegistrationDto>, Problem> {
    handlers::cancel_registration(service, path).await
}

async fn record_attendance_handler(
    Extension(service): Extension<Arc<Service>>,
    json: Json<AttendanceRequest>,
) -> Result<Json<AttendanceDto>, Problem> {
    handlers::record_attendance(service, json).await
}

async fn get_attendance_handler(
    Extension(service): Extension<Arc<Service>>,
    path: Path<i32>,
) -> Result<Json<AttendanceDto>, Problem> {
    handlers::get_attendance(service, path).await
}

async fn submit_feedback_handler(
    Extension(service): Extension<Arc<Service>>,
    json: Json<FeedbackRequest>,
) -> Result<(StatusCode, Json<FeedbackDto>), Problem> {
    handlers::submit_feedback(service, json).await
}

async fn registration_report_handler(
    Extension(service): Extension<Arc<Service>>,
    query: Query<ReportQuery>,
) -> Result<Json<Vec<RegistrationStatsDto>>, Problem> {
    handlers::registration_report(service, query).await
}

async fn attendance_report_handler(
    Extension(service): Extension<Arc<Service>>,
    query: Query<ReportQuery>,
) -> Result<Json<Vec<AttendanceStatsDto>>, Problem> {
    handlers::attendance_report(service, query).await
}

async fn feedback_report_handler(
    Extension(service): Extension<Arc<Service>>,
    query: Query<ReportQuery>,
) -> Result<Json<Vec<FeedbackStatsDto>>, Problem> {
    handlers::feedback_report(service, query).await
}

async fn top_students_handler(
    Extension(service): Extension<Arc<Service>>,
    query: Query<TopStudentsQuery>,
) -> Result<Json<Vec<StudentRankingDto>>, Problem> {
    handlers::top_students(service, query).await
}

async fn overview_handler(
    Extension(service): Extension<Arc<Service>>,
) -> Result<Json<OverviewDto>, Problem> {
    handlers::overview(service).await
}

async fn event_report_handler(
    Extension(service): Extension<Arc<Service>>,
    query: Query<EventReportQuery>,
) -> Result<Json<EventReportDto>, Problem> {
    handlers::event_report(service, query).await
}

async fn college_report_handler(
    Extension(service): Extension<Arc<Service>>,
    path: Path<i32>,
) -> Result<Json<CollegePerformanceDto>, Problem> {
    handlers::college_report(service, path).await
}

async fn create_college_handler(
    Extension(service): Extension<Arc<Service>>,
    json: Json<CreateCollegeRequest>,
) -> Result<(StatusCode, Json<CollegeDto>), Problem> {
    handlers::create_college(service, json).await
}

async fn get_college_handler(
    Extension(service): Extension<Arc<Service>>,
    path: Path<i32>,
) -> Result<Json<CollegeDto>, Problem> {
    handlers::get_college(service, path).await
}

async fn update_college_handler(
    Extension(service): Extension<Arc<Service>>,
    path: Path<i32>,
    json: Json<UpdateCollegeRequest>,
) -> Result<Json<CollegeDto>, Problem> {
    handlers::update_college(service, path, json).await
}

async fn delete_college_handler(
    Extension(service): Extension<Arc<Service>>,
    path: Path<i32>,
) -> Result<StatusCode, Problem> {
    handlers::delete_college(service, path).await
}

async fn create_student_handler(
    Extension(service): Extension<Arc<Service>>,
    json: Json<CreateStudentRequest>,
) -> Result<(StatusCode, Json<StudentDto>), Problem> {
    handlers::create_student(service, json).await
}

async fn get_student_handler(
    Extension(service): Extension<Arc<Service>>,
    path: Path<i32>,
) -> Result<Json<StudentDto>, Problem> {
    handlers::get_student(service, path).await
}

async fn update_student_handler(
    Extension(service): Extension<Arc<Service>>,
    path: Path<i32>,
    json: Json<UpdateStudentRequest>,
) -> Result<Json<StudentDto>, Problem> {
    handlers::update_student(service, path, json).await
}

async fn delete_student_handler(
    Extension(service): Extension<Arc<Service>>,
    path: Path<i32>,
) -> Result<StatusCode, Problem> {
    handlers::delete_student(service, path).await
}

async fn create_event_handler(
    Extension(service): Extension<Arc<Service>>,
    json: Json<CreateEventRequest>,
) -> Result<(StatusCode, Json<EventDto>), Problem> {
    handlers::create_event(service, json).await
}

async fn get_event_handler(
    Extension(service): Extension<Arc<Service>>,
    path: Path<i32>,
) -> Result<Json<EventDto>, Problem> {
    handlers::get_event(service, path).await
}

async fn update_event_handler(
    Extension(service): Extension<Arc<Service>>,
    path: Path<i32>,
    json: Json<UpdateEventRequest>,
) -> Result<Json<EventDto>, Problem> {
    handlers::update_event(service, path, json).await
}

async fn complete_event_handler(
    Extension(service): Extension<Arc<Service>>,
    path: Path<i32>,
) -> Result<Json<EventDto>, Problem> {
    handlers::complete_event(service, path).await
}

async fn cancel_event_handler(
    Extension(service): Extension<Arc<Service>>,
    path: Path<i32>,
) -> Result<Json<EventDto>, Problem> {
    handlers::cancel_event(service, path).await
}

async fn delete_event_handler(
    Extension(service): Extension<Arc<Service>>,
    path: Path<i32>,
) -> Result<StatusCode, Problem> {
    handlers::delete_event(service, path).await
}
