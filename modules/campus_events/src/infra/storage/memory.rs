//! In-process store
//!
//! One mutex guards every table, so each repository call is atomic exactly
//! like a database transaction. Cascades on delete are applied by hand.

use crate::contract::{
    Attendance, AttendanceStatus, College, Event, EventStatus, Feedback, NewCollege, NewEvent,
    NewStudent, Registration, RegistrationStatus, Student,
};
use crate::domain::repository::{
    AttendanceRepository, CheckInOutcome, CheckOutOutcome, DirectoryRepository,
    EventUpdateOutcome, FeedbackOutcome,
    FeedbackRepository, RegistrationRepository, SeatClaim, SeatClaimOutcome, SeatReleaseOutcome,
    StoreError, StoreResult,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::{Mutex, MutexGuard};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Default)]
struct Sequences {
    college: i32,
    student: i32,
    event: i32,
    registration: i32,
    attendance: i32,
    feedback: i32,
}

fn next_id(counter: &mut i32) -> i32 {
    *counter += 1;
    *counter
}

#[derive(Debug, Default)]
struct State {
    ids: Sequences,
    colleges: BTreeMap<i32, College>,
    students: BTreeMap<i32, Student>,
    events: BTreeMap<i32, Event>,
    registrations: BTreeMap<i32, Registration>,
    /// Keyed by registration id
    attendance: BTreeMap<i32, Attendance>,
    /// Keyed by registration id
    feedback: BTreeMap<i32, Feedback>,
}

impl State {
    fn remove_registration(&mut self, id: i32) {
        self.attendance.remove(&id);
        self.feedback.remove(&id);
        if let Some(removed) = self.registrations.remove(&id) {
            if removed.is_active() {
                if let Some(event) = self.events.get_mut(&removed.event_id) {
                    event.current_registrations = (event.current_registrations - 1).max(0);
                }
            }
        }
    }

    fn remove_student(&mut self, id: i32) -> bool {
        let owned: Vec<i32> = self
            .registrations
            .values()
            .filter(|r| r.student_id == id)
            .map(|r| r.id)
            .collect();
        for registration_id in owned {
            self.remove_registration(registration_id);
        }
        self.students.remove(&id).is_some()
    }

    fn remove_event(&mut self, id: i32) -> bool {
        let owned: Vec<i32> = self
            .registrations
            .values()
            .filter(|r| r.event_id == id)
            .map(|r| r.id)
            .collect();
        for registration_id in owned {
            self.remove_registration(registration_id);
        }
        self.events.remove(&id).is_some()
    }

    fn pair(&self, student_id: i32, event_id: i32) -> Option<&Registration> {
        self.registrations
            .values()
            .find(|r| r.student_id == student_id && r.event_id == event_id)
    }
}

/// Store keeping every table in process memory
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
    unavailable: AtomicBool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// While set, every call fails with [`StoreError::Unavailable`] and
    /// changes nothing
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn state(&self) -> StoreResult<MutexGuard<'_, State>> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("in-memory store is offline".into()));
        }
        Ok(self.state.lock())
    }
}

#[async_trait]
impl DirectoryRepository for InMemoryStore {
    async fn insert_college(&self, college: &NewCollege, at: DateTime<Utc>) -> StoreResult<College> {
        let mut state = self.state()?;
        let created = College {
            id: next_id(&mut state.ids.college),
            name: college.name.clone(),
            location: college.location.clone(),
            contact_email: college.contact_email.clone(),
            created_at: at,
        };
        state.colleges.insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_college(&self, id: i32) -> StoreResult<Option<College>> {
        Ok(self.state()?.colleges.get(&id).cloned())
    }

    async fn list_colleges(&self) -> StoreResult<Vec<College>> {
        Ok(self.state()?.colleges.values().cloned().collect())
    }

    async fn update_college(&self, id: i32, college: &NewCollege) -> StoreResult<Option<College>> {
        let mut state = self.state()?;
        Ok(state.colleges.get_mut(&id).map(|current| {
            current.name = college.name.clone();
            current.location = college.location.clone();
            current.contact_email = college.contact_email.clone();
            current.clone()
        }))
    }

    async fn delete_college(&self, id: i32) -> StoreResult<bool> {
        let mut state = self.state()?;
        let students: Vec<i32> = state
            .students
            .values()
            .filter(|s| s.college_id == id)
            .map(|s| s.id)
            .collect();
        let events: Vec<i32> = state
            .events
            .values()
            .filter(|e| e.college_id == id)
            .map(|e| e.id)
            .collect();
        for student_id in students {
            state.remove_student(student_id);
        }
        for event_id in events {
            state.remove_event(event_id);
        }
        Ok(state.colleges.remove(&id).is_some())
    }

    async fn insert_student(&self, student: &NewStudent, at: DateTime<Utc>) -> StoreResult<Student> {
        let mut state = self.state()?;
        if !state.colleges.contains_key(&student.college_id) {
            return Err(StoreError::Backend(format!(
                "college {} does not exist",
                student.college_id
            )));
        }
        let taken = state
            .students
            .values()
            .any(|s| s.college_id == student.college_id && s.student_code == student.student_code);
        if taken {
            return Err(StoreError::Conflict(format!(
                "student code '{}' in college {}",
                student.student_code, student.college_id
            )));
        }

        let created = Student {
            id: next_id(&mut state.ids.student),
            college_id: student.college_id,
            student_code: student.student_code.clone(),
            name: student.name.clone(),
            email: student.email.clone(),
            phone: student.phone.clone(),
            created_at: at,
        };
        state.students.insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_student(&self, id: i32) -> StoreResult<Option<Student>> {
        Ok(self.state()?.students.get(&id).cloned())
    }

    async fn student_exists(&self, id: i32) -> StoreResult<bool> {
        Ok(self.state()?.students.contains_key(&id))
    }

    async fn list_students(&self) -> StoreResult<Vec<Student>> {
        Ok(self.state()?.students.values().cloned().collect())
    }

    async fn update_student(&self, id: i32, student: &NewStudent) -> StoreResult<Option<Student>> {
        let mut state = self.state()?;
        Ok(state.students.get_mut(&id).map(|current| {
            current.name = student.name.clone();
            current.email = student.email.clone();
            current.phone = student.phone.clone();
            current.clone()
        }))
    }

    async fn delete_student(&self, id: i32) -> StoreResult<bool> {
        Ok(self.state()?.remove_student(id))
    }

    async fn insert_event(&self, event: &NewEvent, at: DateTime<Utc>) -> StoreResult<Event> {
        let mut state = self.state()?;
        if !state.colleges.contains_key(&event.college_id) {
            return Err(StoreError::Backend(format!(
                "college {} does not exist",
                event.college_id
            )));
        }
        let created = Event {
            id: next_id(&mut state.ids.event),
            college_id: event.college_id,
            title: event.title.clone(),
            description: event.description.clone(),
            event_type: event.event_type.clone(),
            start_time: event.start_time,
            end_time: event.end_time,
            location: event.location.clone(),
            max_capacity: event.max_capacity,
            current_registrations: 0,
            status: EventStatus::Active,
            created_at: at,
        };
        state.events.insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_event(&self, id: i32) -> StoreResult<Option<Event>> {
        Ok(self.state()?.events.get(&id).cloned())
    }

    async fn list_events(&self) -> StoreResult<Vec<Event>> {
        Ok(self.state()?.events.values().cloned().collect())
    }

    async fn update_event(&self, id: i32, event: &NewEvent) -> StoreResult<EventUpdateOutcome> {
        let mut state = self.state()?;
        let Some(current) = state.events.get_mut(&id) else {
            return Ok(EventUpdateOutcome::Missing);
        };
        if current.current_registrations > event.max_capacity {
            return Ok(EventUpdateOutcome::CapacityBelowRegistrations {
                current_registrations: current.current_registrations,
            });
        }
        current.title = event.title.clone();
        current.description = event.description.clone();
        current.event_type = event.event_type.clone();
        current.start_time = event.start_time;
        current.end_time = event.end_time;
        current.location = event.location.clone();
        current.max_capacity = event.max_capacity;
        Ok(EventUpdateOutcome::Updated(current.clone()))
    }

    async fn transition_event(&self, id: i32, to: EventStatus) -> StoreResult<Option<Event>> {
        let mut state = self.state()?;
        Ok(match state.events.get_mut(&id) {
            Some(event) if event.status == EventStatus::Active => {
                event.status = to;
                Some(event.clone())
            }
            _ => None,
        })
    }

    async fn delete_event(&self, id: i32) -> StoreResult<bool> {
        Ok(self.state()?.remove_event(id))
    }
}

#[async_trait]
impl RegistrationRepository for InMemoryStore {
    async fn find(&self, id: i32) -> StoreResult<Option<Registration>> {
        Ok(self.state()?.registrations.get(&id).cloned())
    }

    async fn find_for_pair(&self, student_id: i32, event_id: i32) -> StoreResult<Option<Registration>> {
        Ok(self.state()?.pair(student_id, event_id).cloned())
    }

    async fn claim_seat(&self, claim: SeatClaim) -> StoreResult<SeatClaimOutcome> {
        let mut state = self.state()?;

        let counter_matches = state.events.get(&claim.event_id).is_some_and(|e| {
            e.status == EventStatus::Active
                && e.current_registrations == claim.observed_count
                && e.current_registrations < e.max_capacity
        });
        if !counter_matches {
            return Ok(SeatClaimOutcome::Stale);
        }

        let registration = match state.pair(claim.student_id, claim.event_id).cloned() {
            Some(existing) if existing.is_active() => return Ok(SeatClaimOutcome::Duplicate),
            Some(cancelled) => {
                // A reactivated registration starts over: not checked in, no feedback
                state.attendance.remove(&cancelled.id);
                state.feedback.remove(&cancelled.id);
                Registration {
                    registered_at: claim.registered_at,
                    status: RegistrationStatus::Registered,
                    ..cancelled
                }
            }
            None => Registration {
                id: next_id(&mut state.ids.registration),
                student_id: claim.student_id,
                event_id: claim.event_id,
                registered_at: claim.registered_at,
                status: RegistrationStatus::Registered,
            },
        };

        if let Some(event) = state.events.get_mut(&claim.event_id) {
            event.current_registrations += 1;
        }
        state
            .registrations
            .insert(registration.id, registration.clone());
        Ok(SeatClaimOutcome::Claimed(registration))
    }

    async fn release_seat(&self, registration_id: i32) -> StoreResult<SeatReleaseOutcome> {
        let mut state = self.state()?;

        let Some(registration) = state.registrations.get_mut(&registration_id) else {
            return Ok(SeatReleaseOutcome::Missing);
        };
        if !registration.is_active() {
            return Ok(SeatReleaseOutcome::NotActive);
        }
        registration.status = RegistrationStatus::Cancelled;
        let cancelled = registration.clone();

        if let Some(event) = state.events.get_mut(&cancelled.event_id) {
            event.current_registrations = (event.current_registrations - 1).max(0);
        }
        Ok(SeatReleaseOutcome::Released(cancelled))
    }

    async fn list_all(&self) -> StoreResult<Vec<Registration>> {
        Ok(self.state()?.registrations.values().cloned().collect())
    }
}

#[async_trait]
impl AttendanceRepository for InMemoryStore {
    async fn find_by_registration(&self, registration_id: i32) -> StoreResult<Option<Attendance>> {
        Ok(self.state()?.attendance.get(&registration_id).cloned())
    }

    async fn check_in(
        &self,
        registration_id: i32,
        at: DateTime<Utc>,
        status: AttendanceStatus,
    ) -> StoreResult<CheckInOutcome> {
        let mut state = self.state()?;

        let active = state
            .registrations
            .get(&registration_id)
            .is_some_and(Registration::is_active);
        if !active {
            return Ok(CheckInOutcome::RegistrationInactive);
        }

        let record = match state.attendance.get(&registration_id) {
            Some(existing) if existing.check_in_time.is_some() => {
                return Ok(CheckInOutcome::AlreadyCheckedIn);
            }
            Some(existing) => Attendance {
                check_in_time: Some(at),
                status,
                ..existing.clone()
            },
            None => Attendance {
                id: next_id(&mut state.ids.attendance),
                registration_id,
                check_in_time: Some(at),
                check_out_time: None,
                status,
            },
        };
        state.attendance.insert(registration_id, record.clone());
        Ok(CheckInOutcome::Recorded(record))
    }

    async fn check_out(&self, registration_id: i32, at: DateTime<Utc>) -> StoreResult<CheckOutOutcome> {
        let mut state = self.state()?;
        Ok(match state.attendance.get_mut(&registration_id) {
            Some(record) if record.check_in_time.is_none() => CheckOutOutcome::NotCheckedIn,
            Some(record) if record.check_out_time.is_some() => CheckOutOutcome::AlreadyCheckedOut,
            Some(record) => {
                record.check_out_time = Some(at);
                CheckOutOutcome::Recorded(record.clone())
            }
            None => CheckOutOutcome::NotCheckedIn,
        })
    }

    async fn list_all(&self) -> StoreResult<Vec<Attendance>> {
        let mut rows: Vec<Attendance> = self.state()?.attendance.values().cloned().collect();
        rows.sort_by_key(|a| a.id);
        Ok(rows)
    }
}

#[async_trait]
impl FeedbackRepository for InMemoryStore {
    async fn find_by_registration(&self, registration_id: i32) -> StoreResult<Option<Feedback>> {
        Ok(self.state()?.feedback.get(&registration_id).cloned())
    }

    async fn upsert(
        &self,
        registration_id: i32,
        rating: i32,
        comment: Option<String>,
        at: DateTime<Utc>,
    ) -> StoreResult<FeedbackOutcome> {
        let mut state = self.state()?;

        let active = state
            .registrations
            .get(&registration_id)
            .is_some_and(Registration::is_active);
        if !active {
            return Ok(FeedbackOutcome::RegistrationInactive);
        }
        let attended = state
            .attendance
            .get(&registration_id)
            .is_some_and(|a| a.check_in_time.is_some() && a.status.is_attended());
        if !attended {
            return Ok(FeedbackOutcome::NotAttended);
        }

        let id = match state.feedback.get(&registration_id) {
            Some(existing) => existing.id,
            None => next_id(&mut state.ids.feedback),
        };
        let record = Feedback {
            id,
            registration_id,
            rating,
            comment,
            submitted_at: at,
        };
        state.feedback.insert(registration_id, record.clone());
        Ok(FeedbackOutcome::Recorded(record))
    }

    async fn list_all(&self) -> StoreResult<Vec<Feedback>> {
        let mut rows: Vec<Feedback> = self.state()?.feedback.values().cloned().collect();
        rows.sort_by_key(|f| f.id);
        Ok(rows)
    }
}
