//! Domain service - business logic orchestration

use super::attendance::AttendanceTracker;
use super::feedback::FeedbackGate;
use super::ports::Clock;
use super::registration::Registrar;
use super::reporting::Reporter;
use super::repository::{
    AttendanceRepository, DirectoryRepository, EventUpdateOutcome, FeedbackRepository,
    RegistrationRepository, StoreError,
};
use super::validation::{validate_new_college, validate_new_event, validate_new_student};
use crate::config::Config;
use crate::contract::{
    Attendance, AttendanceAction, AttendanceStats, CampusError, College, CollegePerformance,
    CollegeUpdate, Event, EventReport, EventStatus, EventUpdate, Feedback, FeedbackStats,
    NewCollege, NewEvent, NewStudent, Overview, Registration, RegistrationStats, ReportFilter,
    Student, StudentRanking, StudentUpdate,
};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

/// Translate a storage failure into the caller-facing error, logging the cause
pub(crate) fn map_store_error(err: StoreError) -> CampusError {
    match err {
        StoreError::Unavailable(message) => {
            warn!(error = %message, "Store unavailable");
            CampusError::unavailable(message)
        }
        StoreError::Conflict(message) | StoreError::Backend(message) => {
            error!(error = %message, "Store failure");
            CampusError::Internal
        }
    }
}

/// Storage ports the service is built from
#[derive(Clone)]
pub struct Repositories {
    pub directory: Arc<dyn DirectoryRepository>,
    pub registrations: Arc<dyn RegistrationRepository>,
    pub attendance: Arc<dyn AttendanceRepository>,
    pub feedback: Arc<dyn FeedbackRepository>,
}

impl Repositories {
    /// Use one store for every port
    pub fn from_store<S>(store: Arc<S>) -> Self
    where
        S: DirectoryRepository
            + RegistrationRepository
            + AttendanceRepository
            + FeedbackRepository
            + 'static,
    {
        Self {
            directory: store.clone(),
            registrations: store.clone(),
            attendance: store.clone(),
            feedback: store,
        }
    }
}

/// Domain service for the campus event lifecycle
pub struct Service {
    directory: Arc<dyn DirectoryRepository>,
    clock: Arc<dyn Clock>,
    registrar: Registrar,
    attendance: AttendanceTracker,
    feedback: FeedbackGate,
    reporter: Reporter,
}

impl Service {
    pub fn new(repos: Repositories, clock: Arc<dyn Clock>, config: &Config) -> Self {
        let registrar = Registrar::new(
            repos.directory.clone(),
            repos.registrations.clone(),
            clock.clone(),
            config,
        );
        let attendance = AttendanceTracker::new(
            repos.directory.clone(),
            repos.registrations.clone(),
            repos.attendance.clone(),
            clock.clone(),
            config,
        );
        let feedback = FeedbackGate::new(
            repos.directory.clone(),
            repos.registrations.clone(),
            repos.attendance.clone(),
            repos.feedback.clone(),
            clock.clone(),
        );
        let reporter = Reporter::new(
            repos.directory.clone(),
            repos.registrations,
            repos.attendance,
            repos.feedback,
            config.default_top_students_limit,
            config.max_top_students_limit,
        );

        Self {
            directory: repos.directory,
            clock,
            registrar,
            attendance,
            feedback,
            reporter,
        }
    }

    // ===== Registrations =====

    pub async fn register(&self, student_id: i32, event_id: i32) -> Result<Registration, CampusError> {
        self.registrar.register(student_id, event_id).await
    }

    pub async fn cancel_registration(&self, registration_id: i32) -> Result<Registration, CampusError> {
        self.registrar.cancel(registration_id).await
    }

    pub async fn get_registration(&self, registration_id: i32) -> Result<Registration, CampusError> {
        self.registrar.get(registration_id).await
    }

    // ===== Attendance =====

    pub async fn record_attendance(
        &self,
        registration_id: i32,
        action: AttendanceAction,
    ) -> Result<Attendance, CampusError> {
        self.attendance.record(registration_id, action).await
    }

    pub async fn check_in(&self, registration_id: i32) -> Result<Attendance, CampusError> {
        self.attendance.check_in(registration_id).await
    }

    pub async fn check_out(&self, registration_id: i32) -> Result<Attendance, CampusError> {
        self.attendance.check_out(registration_id).await
    }

    pub async fn get_attendance(&self, registration_id: i32) -> Result<Option<Attendance>, CampusError> {
        self.attendance.get(registration_id).await
    }

    // ===== Feedback =====

    pub async fn submit_feedback(
        &self,
        registration_id: i32,
        rating: i32,
        comment: Option<String>,
    ) -> Result<Feedback, CampusError> {
        self.feedback.submit(registration_id, rating, comment).await
    }

    pub async fn get_feedback(&self, registration_id: i32) -> Result<Option<Feedback>, CampusError> {
        self.feedback.get(registration_id).await
    }

    // ===== Reports =====

    pub async fn registration_report(
        &self,
        filter: ReportFilter,
    ) -> Result<Vec<RegistrationStats>, CampusError> {
        self.reporter.registrations(filter).await
    }

    pub async fn attendance_report(&self, filter: ReportFilter) -> Result<Vec<AttendanceStats>, CampusError> {
        self.reporter.attendance(filter).await
    }

    pub async fn feedback_report(&self, filter: ReportFilter) -> Result<Vec<FeedbackStats>, CampusError> {
        self.reporter.feedback(filter).await
    }

    pub async fn top_students(
        &self,
        college_id: Option<i32>,
        limit: Option<usize>,
    ) -> Result<Vec<StudentRanking>, CampusError> {
        self.reporter.top_students(college_id, limit).await
    }

    pub async fn overview(&self) -> Result<Overview, CampusError> {
        self.reporter.overview().await
    }

    pub async fn event_report(
        &self,
        filter: ReportFilter,
        limit: Option<usize>,
    ) -> Result<EventReport, CampusError> {
        self.reporter.events(filter, limit).await
    }

    pub async fn college_report(&self, college_id: i32) -> Result<CollegePerformance, CampusError> {
        self.reporter.college(college_id).await
    }

    // ===== Colleges =====

    #[instrument(name = "campus_events.directory.create_college", skip_all)]
    pub async fn create_college(&self, college: NewCollege) -> Result<College, CampusError> {
        validate_new_college(&college)?;
        let created = self
            .directory
            .insert_college(&college, self.clock.now())
            .await
            .map_err(map_store_error)?;
        info!(college_id = created.id, "College created");
        Ok(created)
    }

    pub async fn get_college(&self, id: i32) -> Result<College, CampusError> {
        self.directory
            .find_college(id)
            .await
            .map_err(map_store_error)?
            .ok_or(CampusError::CollegeNotFound { id })
    }

    #[instrument(name = "campus_events.directory.update_college", skip(self, changes))]
    pub async fn update_college(&self, id: i32, changes: CollegeUpdate) -> Result<College, CampusError> {
        let current = self.get_college(id).await?;
        let merged = NewCollege {
            name: changes.name.unwrap_or(current.name),
            location: changes.location.or(current.location),
            contact_email: changes.contact_email.or(current.contact_email),
        };
        validate_new_college(&merged)?;

        let updated = self
            .directory
            .update_college(id, &merged)
            .await
            .map_err(map_store_error)?
            .ok_or(CampusError::CollegeNotFound { id })?;
        info!("College updated");
        Ok(updated)
    }

    #[instrument(name = "campus_events.directory.delete_college", skip(self))]
    pub async fn delete_college(&self, id: i32) -> Result<(), CampusError> {
        if !self.directory.delete_college(id).await.map_err(map_store_error)? {
            return Err(CampusError::CollegeNotFound { id });
        }
        info!("College deleted with its students and events");
        Ok(())
    }

    // ===== Students =====

    #[instrument(
        name = "campus_events.directory.create_student",
        skip_all,
        fields(college_id = student.college_id)
    )]
    pub async fn create_student(&self, student: NewStudent) -> Result<Student, CampusError> {
        validate_new_student(&student)?;
        self.get_college(student.college_id).await?;

        let created = match self.directory.insert_student(&student, self.clock.now()).await {
            Ok(created) => created,
            Err(StoreError::Conflict(_)) => {
                return Err(CampusError::DuplicateStudent {
                    college_id: student.college_id,
                    student_code: student.student_code,
                });
            }
            Err(e) => return Err(map_store_error(e)),
        };
        info!(student_id = created.id, "Student created");
        Ok(created)
    }

    pub async fn get_student(&self, id: i32) -> Result<Student, CampusError> {
        self.directory
            .find_student(id)
            .await
            .map_err(map_store_error)?
            .ok_or(CampusError::StudentNotFound { id })
    }

    #[instrument(name = "campus_events.directory.update_student", skip(self, changes))]
    pub async fn update_student(&self, id: i32, changes: StudentUpdate) -> Result<Student, CampusError> {
        let current = self.get_student(id).await?;
        let merged = NewStudent {
            college_id: current.college_id,
            student_code: current.student_code,
            name: changes.name.unwrap_or(current.name),
            email: changes.email.unwrap_or(current.email),
            phone: changes.phone.or(current.phone),
        };
        validate_new_student(&merged)?;

        let updated = self
            .directory
            .update_student(id, &merged)
            .await
            .map_err(map_store_error)?
            .ok_or(CampusError::StudentNotFound { id })?;
        info!("Student updated");
        Ok(updated)
    }

    #[instrument(name = "campus_events.directory.delete_student", skip(self))]
    pub async fn delete_student(&self, id: i32) -> Result<(), CampusError> {
        if !self.directory.delete_student(id).await.map_err(map_store_error)? {
            return Err(CampusError::StudentNotFound { id });
        }
        info!("Student deleted");
        Ok(())
    }

    // ===== Events =====

    #[instrument(
        name = "campus_events.directory.create_event",
        skip_all,
        fields(college_id = event.college_id)
    )]
    pub async fn create_event(&self, event: NewEvent) -> Result<Event, CampusError> {
        validate_new_event(&event)?;
        self.get_college(event.college_id).await?;

        let created = self
            .directory
            .insert_event(&event, self.clock.now())
            .await
            .map_err(map_store_error)?;
        info!(event_id = created.id, "Event created");
        Ok(created)
    }

    pub async fn get_event(&self, id: i32) -> Result<Event, CampusError> {
        self.directory
            .find_event(id)
            .await
            .map_err(map_store_error)?
            .ok_or(CampusError::EventNotFound { id })
    }

    /// Apply a partial update. The merged times and capacity are validated
    /// like a new event, and capacity may not drop under the live counter.
    #[instrument(name = "campus_events.directory.update_event", skip(self, changes))]
    pub async fn update_event(&self, id: i32, changes: EventUpdate) -> Result<Event, CampusError> {
        let current = self.get_event(id).await?;
        let merged = NewEvent {
            college_id: current.college_id,
            title: changes.title.unwrap_or(current.title),
            description: changes.description.or(current.description),
            event_type: changes.event_type.unwrap_or(current.event_type),
            start_time: changes.start_time.unwrap_or(current.start_time),
            end_time: changes.end_time.unwrap_or(current.end_time),
            location: changes.location.or(current.location),
            max_capacity: changes.max_capacity.unwrap_or(current.max_capacity),
        };
        validate_new_event(&merged)?;

        match self
            .directory
            .update_event(id, &merged)
            .await
            .map_err(map_store_error)?
        {
            EventUpdateOutcome::Updated(event) => {
                info!("Event updated");
                Ok(event)
            }
            EventUpdateOutcome::Missing => Err(CampusError::EventNotFound { id }),
            EventUpdateOutcome::CapacityBelowRegistrations {
                current_registrations,
            } => Err(CampusError::CapacityBelowRegistrations {
                id,
                max_capacity: merged.max_capacity,
                current_registrations,
            }),
        }
    }

    pub async fn complete_event(&self, id: i32) -> Result<Event, CampusError> {
        self.transition_event(id, EventStatus::Completed).await
    }

    pub async fn cancel_event(&self, id: i32) -> Result<Event, CampusError> {
        self.transition_event(id, EventStatus::Cancelled).await
    }

    #[instrument(name = "campus_events.directory.transition_event", skip(self))]
    async fn transition_event(&self, id: i32, to: EventStatus) -> Result<Event, CampusError> {
        let current = self.get_event(id).await?;
        if !current.status.can_transition_to(to) {
            return Err(CampusError::InvalidStatusTransition {
                from: current.status,
                to,
            });
        }

        match self
            .directory
            .transition_event(id, to)
            .await
            .map_err(map_store_error)?
        {
            Some(event) => {
                info!(status = %event.status, "Event status changed");
                Ok(event)
            }
            None => {
                // Another transition won; report the state it left behind
                let latest = self.get_event(id).await?;
                Err(CampusError::InvalidStatusTransition {
                    from: latest.status,
                    to,
                })
            }
        }
    }

    #[instrument(name = "campus_events.directory.delete_event", skip(self))]
    pub async fn delete_event(&self, id: i32) -> Result<(), CampusError> {
        if !self.directory.delete_event(id).await.map_err(map_store_error)? {
            return Err(CampusError::EventNotFound { id });
        }
        info!("Event deleted with its registrations");
        Ok(())
    }
}
