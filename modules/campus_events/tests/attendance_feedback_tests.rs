//! Attendance state machine and feedback gating

use async_trait::async_trait;
use campus_events::config::Config;
use campus_events::contract::*;
use campus_events::domain::{
    AttendanceRepository, CheckInOutcome, CheckOutOutcome, RegistrationRepository, Repositories,
    Service, StoreResult,
};
use campus_events::infra::storage::InMemoryStore;
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;

mod common;
use common::{event_end, event_start, memory_harness, seed, Campus, ManualClock, MemoryHarness};

async fn registered(capacity: i32, students: usize) -> (MemoryHarness, Campus, Vec<Registration>) {
    let h = memory_harness(&Config::default());
    let campus = seed(&h.service, capacity, students).await;
    let mut registrations = Vec::new();
    for student in &campus.students {
        registrations.push(
            h.service
                .register(student.id, campus.event.id)
                .await
                .expect("register"),
        );
    }
    (h, campus, registrations)
}

#[tokio::test]
async fn test_check_in_on_time_is_present() {
    let (h, _, regs) = registered(5, 1).await;

    h.clock.set(event_start() + Duration::minutes(15));
    let attendance = h.service.check_in(regs[0].id).await.unwrap();

    assert_eq!(attendance.status, AttendanceStatus::Present);
    assert_eq!(attendance.check_in_time, Some(event_start() + Duration::minutes(15)));
    assert_eq!(attendance.check_out_time, None);
}

#[tokio::test]
async fn test_check_in_before_start_is_present() {
    let (h, _, regs) = registered(5, 1).await;

    h.clock.set(event_start() - Duration::minutes(20));
    let attendance = h
        .service
        .record_attendance(regs[0].id, AttendanceAction::CheckIn)
        .await
        .unwrap();
    assert_eq!(attendance.status, AttendanceStatus::Present);
}

#[tokio::test]
async fn test_check_in_past_grace_is_late() {
    let (h, _, regs) = registered(5, 1).await;

    h.clock
        .set(event_start() + Duration::minutes(15) + Duration::seconds(1));
    let attendance = h.service.check_in(regs[0].id).await.unwrap();
    assert_eq!(attendance.status, AttendanceStatus::Late);
}

#[tokio::test]
async fn test_late_threshold_is_configurable() {
    let config = Config {
        late_after_minutes: 0,
        ..Config::default()
    };
    let h = memory_harness(&config);
    let campus = seed(&h.service, 5, 1).await;
    let reg = h
        .service
        .register(campus.students[0].id, campus.event.id)
        .await
        .unwrap();

    h.clock.set(event_start() + Duration::minutes(1));
    let attendance = h.service.check_in(reg.id).await.unwrap();
    assert_eq!(attendance.status, AttendanceStatus::Late);
}

#[tokio::test]
async fn test_attendance_transitions_are_one_way() {
    let (h, _, regs) = registered(5, 1).await;
    let id = regs[0].id;

    assert_eq!(h.service.get_attendance(id).await.unwrap(), None);

    let err = h.service.check_out(id).await.unwrap_err();
    assert_eq!(err, CampusError::NotCheckedIn { registration_id: id });

    h.clock.set(event_start());
    h.service.check_in(id).await.unwrap();

    let err = h.service.check_in(id).await.unwrap_err();
    assert_eq!(err, CampusError::AlreadyCheckedIn { registration_id: id });

    h.clock.set(event_end());
    let attendance = h.service.check_out(id).await.unwrap();
    assert_eq!(attendance.check_out_time, Some(event_end()));
    // Check-out keeps the check-in classification
    assert_eq!(attendance.status, AttendanceStatus::Present);

    let err = h.service.check_out(id).await.unwrap_err();
    assert_eq!(err, CampusError::AlreadyCheckedOut { registration_id: id });

    let err = h.service.check_in(id).await.unwrap_err();
    assert_eq!(err, CampusError::AlreadyCheckedIn { registration_id: id });

    let stored = h.service.get_attendance(id).await.unwrap().unwrap();
    assert_eq!(stored, attendance);
}

#[tokio::test]
async fn test_cancelled_registration_cannot_check_in() {
    let (h, _, regs) = registered(5, 1).await;
    h.service.cancel_registration(regs[0].id).await.unwrap();

    let err = h.service.check_in(regs[0].id).await.unwrap_err();
    assert_eq!(err, CampusError::RegistrationCancelled { id: regs[0].id });
    assert_eq!(err.kind(), ErrorKind::State);
}

#[tokio::test]
async fn test_attendance_for_unknown_registration() {
    let h = memory_harness(&Config::default());
    let err = h.service.check_in(77).await.unwrap_err();
    assert_eq!(err, CampusError::RegistrationNotFound { id: 77 });
    let err = h.service.get_attendance(77).await.unwrap_err();
    assert_eq!(err, CampusError::RegistrationNotFound { id: 77 });
}

#[tokio::test]
async fn test_feedback_gating_order() {
    let (h, _, regs) = registered(5, 2).await;
    let attended = regs[0].id;
    let absent = regs[1].id;

    let err = h.service.submit_feedback(999, 5, None).await.unwrap_err();
    assert_eq!(err, CampusError::RegistrationNotFound { id: 999 });

    // Never checked in
    h.clock.set(event_end() + Duration::hours(1));
    let err = h.service.submit_feedback(absent, 5, None).await.unwrap_err();
    assert_eq!(err, CampusError::NotAttended { registration_id: absent });

    // Attended, but the event has not ended yet
    h.clock.set(event_start());
    h.service.check_in(attended).await.unwrap();
    let err = h.service.submit_feedback(attended, 9, None).await.unwrap_err();
    assert_eq!(
        err,
        CampusError::EventNotYetCompleted {
            event_id: regs[0].event_id,
            end_time: event_end()
        }
    );

    // Rating is checked last
    h.clock.set(event_end());
    let err = h.service.submit_feedback(attended, 0, None).await.unwrap_err();
    assert_eq!(err, CampusError::InvalidRating { rating: 0 });
    let err = h.service.submit_feedback(attended, 6, None).await.unwrap_err();
    assert_eq!(err, CampusError::InvalidRating { rating: 6 });
    assert_eq!(err.kind(), ErrorKind::Validation);

    let feedback = h
        .service
        .submit_feedback(attended, 5, Some("  Great session ".to_string()))
        .await
        .unwrap();
    assert_eq!(feedback.rating, 5);
    assert_eq!(feedback.comment.as_deref(), Some("Great session"));
    assert_eq!(feedback.submitted_at, event_end());
}

#[tokio::test]
async fn test_feedback_from_cancelled_registration_is_rejected() {
    let (h, _, regs) = registered(5, 1).await;
    h.clock.set(event_start());
    h.service.check_in(regs[0].id).await.unwrap();
    h.service.cancel_registration(regs[0].id).await.unwrap();

    h.clock.set(event_end() + Duration::hours(1));
    let err = h
        .service
        .submit_feedback(regs[0].id, 4, None)
        .await
        .unwrap_err();
    assert_eq!(err, CampusError::RegistrationCancelled { id: regs[0].id });
}

#[tokio::test]
async fn test_feedback_resubmission_replaces_previous() {
    let (h, campus, regs) = registered(5, 1).await;
    let id = regs[0].id;

    h.clock.set(event_start() + Duration::minutes(40));
    h.service.check_in(id).await.unwrap();
    h.clock.set(event_end() + Duration::minutes(5));

    let first = h
        .service
        .submit_feedback(id, 2, Some("Too fast".to_string()))
        .await
        .unwrap();
    h.clock.advance(Duration::minutes(10));
    let second = h.service.submit_feedback(id, 4, Some("   ".to_string())).await.unwrap();

    assert_eq!(second.id, first.id);
    assert_eq!(second.rating, 4);
    assert_eq!(second.comment, None);
    assert_eq!(second.submitted_at, event_end() + Duration::minutes(15));

    let stored = h.service.get_feedback(id).await.unwrap().unwrap();
    assert_eq!(stored, second);

    let report = h
        .service
        .feedback_report(ReportFilter {
            event_id: Some(campus.event.id),
            ..ReportFilter::default()
        })
        .await
        .unwrap();
    assert_eq!(report[0].feedback_count, 1);
    assert_eq!(report[0].average_rating, Some(4.0));
    assert_eq!(report[0].rating_distribution, [0, 0, 0, 1, 0]);
}

#[tokio::test]
async fn test_late_attendee_may_leave_feedback() {
    let (h, _, regs) = registered(5, 1).await;
    h.clock.set(event_start() + Duration::hours(1));
    let attendance = h.service.check_in(regs[0].id).await.unwrap();
    assert_eq!(attendance.status, AttendanceStatus::Late);

    h.clock.set(event_end());
    h.service
        .submit_feedback(regs[0].id, 3, None)
        .await
        .expect("late attendance counts as attended");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_check_in_records_once() {
    let (h, _, regs) = registered(5, 1).await;
    let registration_id = regs[0].id;
    h.clock.set(event_start() + Duration::minutes(3));

    let mut handles = Vec::new();
    for _ in 0..8 {
        let service = Arc::clone(&h.service);
        handles.push(tokio::spawn(async move { service.check_in(registration_id).await }));
    }

    let mut recorded = Vec::new();
    let mut rejected = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(attendance) => recorded.push(attendance),
            Err(CampusError::AlreadyCheckedIn { registration_id: id }) => {
                assert_eq!(id, registration_id);
                rejected += 1;
            }
            Err(other) => panic!("unexpected error: {other:?}"),
        }
    }

    assert_eq!(recorded.len(), 1);
    assert_eq!(rejected, 7);
    let stored = h.service.get_attendance(registration_id).await.unwrap();
    assert_eq!(stored.as_ref(), recorded.first());
}

/// Attendance port that cancels the registration right after it is read,
/// the way a concurrent cancel can land between the gate's checks and its write
struct CancelAfterRead {
    store: Arc<InMemoryStore>,
}

#[async_trait]
impl AttendanceRepository for CancelAfterRead {
    async fn find_by_registration(&self, registration_id: i32) -> StoreResult<Option<Attendance>> {
        let attendance =
            AttendanceRepository::find_by_registration(self.store.as_ref(), registration_id).await?;
        self.store.release_seat(registration_id).await?;
        Ok(attendance)
    }

    async fn check_in(
        &self,
        registration_id: i32,
        at: DateTime<Utc>,
        status: AttendanceStatus,
    ) -> StoreResult<CheckInOutcome> {
        self.store.check_in(registration_id, at, status).await
    }

    async fn check_out(&self, registration_id: i32, at: DateTime<Utc>) -> StoreResult<CheckOutOutcome> {
        self.store.check_out(registration_id, at).await
    }

    async fn list_all(&self) -> StoreResult<Vec<Attendance>> {
        AttendanceRepository::list_all(self.store.as_ref()).await
    }
}

#[tokio::test]
async fn test_feedback_loses_to_cancel_between_check_and_write() {
    let (h, _, regs) = registered(5, 1).await;
    let id = regs[0].id;
    h.clock.set(event_start());
    h.service.check_in(id).await.unwrap();

    let repos = Repositories {
        attendance: Arc::new(CancelAfterRead {
            store: h.store.clone(),
        }),
        ..Repositories::from_store(h.store.clone())
    };
    let clock = Arc::new(ManualClock::new(event_end() + Duration::minutes(30)));
    let racing = Service::new(repos, clock, &Config::default());

    let err = racing.submit_feedback(id, 5, None).await.unwrap_err();
    assert_eq!(err, CampusError::RegistrationCancelled { id });

    assert_eq!(h.service.get_feedback(id).await.unwrap(), None);
    let registration = h.service.get_registration(id).await.unwrap();
    assert_eq!(registration.status, RegistrationStatus::Cancelled);
}
