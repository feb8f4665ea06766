//! SeaORM repository implementations
//!
//! Multi-row writes run inside one transaction. Races are resolved by
//! conditional UPDATEs: the row count tells whether this caller won.

use super::entity::{attendance, college, event, feedback, registration, student};
use crate::contract::{
    Attendance, AttendanceStatus, College, Event, EventStatus, Feedback, NewCollege, NewEvent,
    NewStudent, Registration, RegistrationStatus, Student, UnknownStatus,
};
use crate::domain::repository::{
    AttendanceRepository, CheckInOutcome, CheckOutOutcome, DirectoryRepository,
    EventUpdateOutcome, FeedbackOutcome,
    FeedbackRepository, RegistrationRepository, SeatClaim, SeatClaimOutcome, SeatReleaseOutcome,
    StoreError, StoreResult,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, SqlErr, TransactionTrait,
};
use std::sync::Arc;
use tracing::debug;

const REGISTERED: &str = "registered";
const CANCELLED: &str = "cancelled";

impl From<DbErr> for StoreError {
    fn from(err: DbErr) -> Self {
        if let Some(SqlErr::UniqueConstraintViolation(message)) = err.sql_err() {
            return StoreError::Conflict(message);
        }
        match &err {
            DbErr::ConnectionAcquire(_) | DbErr::Conn(_) => StoreError::Unavailable(err.to_string()),
            _ => {
                let message = err.to_string();
                // SQLite reports write contention as a plain execution error
                let lowered = message.to_lowercase();
                if lowered.contains("database is locked") || lowered.contains("database is busy") {
                    StoreError::Unavailable(message)
                } else {
                    StoreError::Backend(message)
                }
            }
        }
    }
}

fn decode<M, T>(model: M) -> StoreResult<T>
where
    T: TryFrom<M, Error = UnknownStatus>,
{
    T::try_from(model).map_err(|e| StoreError::Backend(e.to_string()))
}

fn decode_all<M, T>(models: Vec<M>) -> StoreResult<Vec<T>>
where
    T: TryFrom<M, Error = UnknownStatus>,
{
    models.into_iter().map(decode).collect()
}

/// Undo the counter increments of every active registration about to vanish
async fn release_counters<C: ConnectionTrait>(
    conn: &C,
    registrations: &[registration::Model],
) -> StoreResult<()> {
    for r in registrations.iter().filter(|r| r.status == REGISTERED) {
        event::Entity::update_many()
            .col_expr(
                event::Column::CurrentRegistrations,
                Expr::col(event::Column::CurrentRegistrations).sub(1),
            )
            .filter(event::Column::Id.eq(r.event_id))
            .filter(event::Column::CurrentRegistrations.gt(0))
            .exec(conn)
            .await?;
    }
    Ok(())
}

// ===== Directory Repository =====

pub struct SeaOrmDirectoryRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmDirectoryRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl DirectoryRepository for SeaOrmDirectoryRepository {
    async fn insert_college(&self, college: &NewCollege, at: DateTime<Utc>) -> StoreResult<College> {
        let active = college::ActiveModel {
            name: Set(college.name.clone()),
            location: Set(college.location.clone()),
            contact_email: Set(college.contact_email.clone()),
            created_at: Set(at),
            ..Default::default()
        };
        Ok(active.insert(&*self.db).await?.into())
    }

    async fn find_college(&self, id: i32) -> StoreResult<Option<College>> {
        let row = college::Entity::find_by_id(id).one(&*self.db).await?;
        Ok(row.map(Into::into))
    }

    async fn list_colleges(&self) -> StoreResult<Vec<College>> {
        let rows = college::Entity::find()
            .order_by_asc(college::Column::Id)
            .all(&*self.db)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn update_college(&self, id: i32, college: &NewCollege) -> StoreResult<Option<College>> {
        let result = college::Entity::update_many()
            .col_expr(college::Column::Name, Expr::value(college.name.clone()))
            .col_expr(college::Column::Location, Expr::value(college.location.clone()))
            .col_expr(
                college::Column::ContactEmail,
                Expr::value(college.contact_email.clone()),
            )
            .filter(college::Column::Id.eq(id))
            .exec(&*self.db)
            .await?;
        if result.rows_affected == 0 {
            return Ok(None);
        }
        self.find_college(id).await
    }

    async fn delete_college(&self, id: i32) -> StoreResult<bool> {
        // Events of the college go with it, so only counters of other
        // colleges' events can be affected by its students' registrations.
        let txn = self.db.begin().await?;
        let student_ids: Vec<i32> = student::Entity::find()
            .filter(student::Column::CollegeId.eq(id))
            .all(&txn)
            .await?
            .into_iter()
            .map(|s| s.id)
            .collect();
        let registrations = registration::Entity::find()
            .filter(registration::Column::StudentId.is_in(student_ids))
            .all(&txn)
            .await?;
        release_counters(&txn, &registrations).await?;

        let deleted = college::Entity::delete_by_id(id).exec(&txn).await?.rows_affected > 0;
        txn.commit().await?;
        Ok(deleted)
    }

    async fn insert_student(&self, student: &NewStudent, at: DateTime<Utc>) -> StoreResult<Student> {
        let active = student::ActiveModel {
            college_id: Set(student.college_id),
            student_code: Set(student.student_code.clone()),
            name: Set(student.name.clone()),
            email: Set(student.email.clone()),
            phone: Set(student.phone.clone()),
            created_at: Set(at),
            ..Default::default()
        };
        Ok(active.insert(&*self.db).await?.into())
    }

    async fn find_student(&self, id: i32) -> StoreResult<Option<Student>> {
        let row = student::Entity::find_by_id(id).one(&*self.db).await?;
        Ok(row.map(Into::into))
    }

    async fn student_exists(&self, id: i32) -> StoreResult<bool> {
        let count = student::Entity::find()
            .filter(student::Column::Id.eq(id))
            .count(&*self.db)
            .await?;
        Ok(count > 0)
    }

    async fn list_students(&self) -> StoreResult<Vec<Student>> {
        let rows = student::Entity::find()
            .order_by_asc(student::Column::Id)
            .all(&*self.db)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn update_student(&self, id: i32, student: &NewStudent) -> StoreResult<Option<Student>> {
        let result = student::Entity::update_many()
            .col_expr(student::Column::Name, Expr::value(student.name.clone()))
            .col_expr(student::Column::Email, Expr::value(student.email.clone()))
            .col_expr(student::Column::Phone, Expr::value(student.phone.clone()))
            .filter(student::Column::Id.eq(id))
            .exec(&*self.db)
            .await?;
        if result.rows_affected == 0 {
            return Ok(None);
        }
        self.find_student(id).await
    }

    async fn delete_student(&self, id: i32) -> StoreResult<bool> {
        let txn = self.db.begin().await?;
        let registrations = registration::Entity::find()
            .filter(registration::Column::StudentId.eq(id))
            .all(&txn)
            .await?;
        release_counters(&txn, &registrations).await?;

        let deleted = student::Entity::delete_by_id(id).exec(&txn).await?.rows_affected > 0;
        txn.commit().await?;
        Ok(deleted)
    }

    async fn insert_event(&self, event: &NewEvent, at: DateTime<Utc>) -> StoreResult<Event> {
        let active = event::ActiveModel {
            college_id: Set(event.college_id),
            title: Set(event.title.clone()),
            description: Set(event.description.clone()),
            event_type: Set(event.event_type.clone()),
            start_time: Set(event.start_time),
            end_time: Set(event.end_time),
            location: Set(event.location.clone()),
            max_capacity: Set(event.max_capacity),
            current_registrations: Set(0),
            status: Set(EventStatus::Active.as_str().to_string()),
            created_at: Set(at),
            ..Default::default()
        };
        decode(active.insert(&*self.db).await?)
    }

    async fn find_event(&self, id: i32) -> StoreResult<Option<Event>> {
        event::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .map(decode)
            .transpose()
    }

    async fn list_events(&self) -> StoreResult<Vec<Event>> {
        let rows = event::Entity::find()
            .order_by_asc(event::Column::Id)
            .all(&*self.db)
            .await?;
        decode_all(rows)
    }

    async fn update_event(&self, id: i32, event: &NewEvent) -> StoreResult<EventUpdateOutcome> {
        let result = event::Entity::update_many()
            .col_expr(event::Column::Title, Expr::value(event.title.clone()))
            .col_expr(event::Column::Description, Expr::value(event.description.clone()))
            .col_expr(event::Column::EventType, Expr::value(event.event_type.clone()))
            .col_expr(event::Column::StartTime, Expr::value(event.start_time))
            .col_expr(event::Column::EndTime, Expr::value(event.end_time))
            .col_expr(event::Column::Location, Expr::value(event.location.clone()))
            .col_expr(event::Column::MaxCapacity, Expr::value(event.max_capacity))
            .filter(event::Column::Id.eq(id))
            .filter(event::Column::CurrentRegistrations.lte(event.max_capacity))
            .exec(&*self.db)
            .await?;

        let current = self.find_event(id).await?;
        Ok(match current {
            None => EventUpdateOutcome::Missing,
            Some(updated) if result.rows_affected > 0 => EventUpdateOutcome::Updated(updated),
            Some(unchanged) => EventUpdateOutcome::CapacityBelowRegistrations {
                current_registrations: unchanged.current_registrations,
            },
        })
    }

    async fn transition_event(&self, id: i32, to: EventStatus) -> StoreResult<Option<Event>> {
        let result = event::Entity::update_many()
            .col_expr(event::Column::Status, Expr::value(to.as_str()))
            .filter(event::Column::Id.eq(id))
            .filter(event::Column::Status.eq(EventStatus::Active.as_str()))
            .exec(&*self.db)
            .await?;
        if result.rows_affected == 0 {
            return Ok(None);
        }
        self.find_event(id).await
    }

    async fn delete_event(&self, id: i32) -> StoreResult<bool> {
        let result = event::Entity::delete_by_id(id).exec(&*self.db).await?;
        Ok(result.rows_affected > 0)
    }
}

// ===== Registration Repository =====

pub struct SeaOrmRegistrationRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmRegistrationRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RegistrationRepository for SeaOrmRegistrationRepository {
    async fn find(&self, id: i32) -> StoreResult<Option<Registration>> {
        registration::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .map(decode)
            .transpose()
    }

    async fn find_for_pair(&self, student_id: i32, event_id: i32) -> StoreResult<Option<Registration>> {
        registration::Entity::find()
            .filter(registration::Column::StudentId.eq(student_id))
            .filter(registration::Column::EventId.eq(event_id))
            .one(&*self.db)
            .await?
            .map(decode)
            .transpose()
    }

    async fn claim_seat(&self, claim: SeatClaim) -> StoreResult<SeatClaimOutcome> {
        let txn = self.db.begin().await?;

        let bumped = event::Entity::update_many()
            .col_expr(
                event::Column::CurrentRegistrations,
                Expr::col(event::Column::CurrentRegistrations).add(1),
            )
            .filter(event::Column::Id.eq(claim.event_id))
            .filter(event::Column::Status.eq(EventStatus::Active.as_str()))
            .filter(event::Column::CurrentRegistrations.eq(claim.observed_count))
            .filter(
                Expr::col(event::Column::CurrentRegistrations)
                    .lt(Expr::col(event::Column::MaxCapacity)),
            )
            .exec(&txn)
            .await?;
        if bumped.rows_affected == 0 {
            txn.rollback().await?;
            debug!(event_id = claim.event_id, "Seat claim lost the counter race");
            return Ok(SeatClaimOutcome::Stale);
        }

        let existing = registration::Entity::find()
            .filter(registration::Column::StudentId.eq(claim.student_id))
            .filter(registration::Column::EventId.eq(claim.event_id))
            .one(&txn)
            .await?;

        let row = match existing {
            Some(row) if row.status == REGISTERED => {
                txn.rollback().await?;
                return Ok(SeatClaimOutcome::Duplicate);
            }
            Some(row) => {
                // A reactivated registration starts over: not checked in, no feedback
                attendance::Entity::delete_many()
                    .filter(attendance::Column::RegistrationId.eq(row.id))
                    .exec(&txn)
                    .await?;
                feedback::Entity::delete_many()
                    .filter(feedback::Column::RegistrationId.eq(row.id))
                    .exec(&txn)
                    .await?;
                let mut reactivated: registration::ActiveModel = row.into();
                reactivated.status = Set(REGISTERED.to_string());
                reactivated.registered_at = Set(claim.registered_at);
                reactivated.update(&txn).await?
            }
            None => {
                let inserted = registration::ActiveModel {
                    student_id: Set(claim.student_id),
                    event_id: Set(claim.event_id),
                    registered_at: Set(claim.registered_at),
                    status: Set(REGISTERED.to_string()),
                    ..Default::default()
                }
                .insert(&txn)
                .await;
                match inserted.map_err(StoreError::from) {
                    Ok(row) => row,
                    Err(StoreError::Conflict(_)) => {
                        txn.rollback().await?;
                        return Ok(SeatClaimOutcome::Duplicate);
                    }
                    Err(e) => {
                        txn.rollback().await?;
                        return Err(e);
                    }
                }
            }
        };

        txn.commit().await?;
        Ok(SeatClaimOutcome::Claimed(decode(row)?))
    }

    async fn release_seat(&self, registration_id: i32) -> StoreResult<SeatReleaseOutcome> {
        let txn = self.db.begin().await?;

        let Some(row) = registration::Entity::find_by_id(registration_id)
            .one(&txn)
            .await?
        else {
            txn.rollback().await?;
            return Ok(SeatReleaseOutcome::Missing);
        };

        let flipped = registration::Entity::update_many()
            .col_expr(registration::Column::Status, Expr::value(CANCELLED))
            .filter(registration::Column::Id.eq(registration_id))
            .filter(registration::Column::Status.eq(REGISTERED))
            .exec(&txn)
            .await?;
        if flipped.rows_affected == 0 {
            txn.rollback().await?;
            return Ok(SeatReleaseOutcome::NotActive);
        }

        event::Entity::update_many()
            .col_expr(
                event::Column::CurrentRegistrations,
                Expr::col(event::Column::CurrentRegistrations).sub(1),
            )
            .filter(event::Column::Id.eq(row.event_id))
            .filter(event::Column::CurrentRegistrations.gt(0))
            .exec(&txn)
            .await?;

        txn.commit().await?;

        let mut cancelled: Registration = decode(row)?;
        cancelled.status = RegistrationStatus::Cancelled;
        Ok(SeatReleaseOutcome::Released(cancelled))
    }

    async fn list_all(&self) -> StoreResult<Vec<Registration>> {
        let rows = registration::Entity::find()
            .order_by_asc(registration::Column::Id)
            .all(&*self.db)
            .await?;
        decode_all(rows)
    }
}

// ===== Attendance Repository =====

pub struct SeaOrmAttendanceRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmAttendanceRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AttendanceRepository for SeaOrmAttendanceRepository {
    async fn find_by_registration(&self, registration_id: i32) -> StoreResult<Option<Attendance>> {
        attendance::Entity::find()
            .filter(attendance::Column::RegistrationId.eq(registration_id))
            .one(&*self.db)
            .await?
            .map(decode)
            .transpose()
    }

    async fn check_in(
        &self,
        registration_id: i32,
        at: DateTime<Utc>,
        status: AttendanceStatus,
    ) -> StoreResult<CheckInOutcome> {
        let txn = self.db.begin().await?;

        let active = registration::Entity::find_by_id(registration_id)
            .filter(registration::Column::Status.eq(REGISTERED))
            .one(&txn)
            .await?
            .is_some();
        if !active {
            txn.rollback().await?;
            return Ok(CheckInOutcome::RegistrationInactive);
        }

        let existing = attendance::Entity::find()
            .filter(attendance::Column::RegistrationId.eq(registration_id))
            .one(&txn)
            .await?;

        let row = match existing {
            None => {
                let inserted = attendance::ActiveModel {
                    registration_id: Set(registration_id),
                    check_in_time: Set(Some(at)),
                    check_out_time: Set(None),
                    status: Set(status.as_str().to_string()),
                    ..Default::default()
                }
                .insert(&txn)
                .await;
                match inserted.map_err(StoreError::from) {
                    Ok(row) => row,
                    Err(StoreError::Conflict(_)) => {
                        txn.rollback().await?;
                        return Ok(CheckInOutcome::AlreadyCheckedIn);
                    }
                    Err(e) => {
                        txn.rollback().await?;
                        return Err(e);
                    }
                }
            }
            Some(row) => {
                let updated = attendance::Entity::update_many()
                    .col_expr(attendance::Column::CheckInTime, Expr::value(at))
                    .col_expr(attendance::Column::Status, Expr::value(status.as_str()))
                    .filter(attendance::Column::Id.eq(row.id))
                    .filter(attendance::Column::CheckInTime.is_null())
                    .exec(&txn)
                    .await?;
                if updated.rows_affected == 0 {
                    txn.rollback().await?;
                    return Ok(CheckInOutcome::AlreadyCheckedIn);
                }
                attendance::Model {
                    check_in_time: Some(at),
                    status: status.as_str().to_string(),
                    ..row
                }
            }
        };

        txn.commit().await?;
        Ok(CheckInOutcome::Recorded(decode(row)?))
    }

    async fn check_out(&self, registration_id: i32, at: DateTime<Utc>) -> StoreResult<CheckOutOutcome> {
        let updated = attendance::Entity::update_many()
            .col_expr(attendance::Column::CheckOutTime, Expr::value(at))
            .filter(attendance::Column::RegistrationId.eq(registration_id))
            .filter(attendance::Column::CheckInTime.is_not_null())
            .filter(attendance::Column::CheckOutTime.is_null())
            .exec(&*self.db)
            .await?;

        let current = self.find_by_registration(registration_id).await?;
        if updated.rows_affected == 0 {
            return Ok(match current {
                Some(a) if a.check_in_time.is_some() => CheckOutOutcome::AlreadyCheckedOut,
                _ => CheckOutOutcome::NotCheckedIn,
            });
        }

        current
            .map(CheckOutOutcome::Recorded)
            .ok_or_else(|| StoreError::Backend("attendance row vanished after check-out".into()))
    }

    async fn list_all(&self) -> StoreResult<Vec<Attendance>> {
        let rows = attendance::Entity::find()
            .order_by_asc(attendance::Column::Id)
            .all(&*self.db)
            .await?;
        decode_all(rows)
    }
}

// ===== Feedback Repository =====

pub struct SeaOrmFeedbackRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmFeedbackRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl FeedbackRepository for SeaOrmFeedbackRepository {
    async fn find_by_registration(&self, registration_id: i32) -> StoreResult<Option<Feedback>> {
        let row = feedback::Entity::find()
            .filter(feedback::Column::RegistrationId.eq(registration_id))
            .one(&*self.db)
            .await?;
        Ok(row.map(Into::into))
    }

    async fn upsert(
        &self,
        registration_id: i32,
        rating: i32,
        comment: Option<String>,
        at: DateTime<Utc>,
    ) -> StoreResult<FeedbackOutcome> {
        let txn = self.db.begin().await?;

        // Row lock holds off a concurrent cancel until the upsert commits (no-op on SQLite)
        let active = registration::Entity::find_by_id(registration_id)
            .filter(registration::Column::Status.eq(REGISTERED))
            .lock_exclusive()
            .one(&txn)
            .await?
            .is_some();
        if !active {
            txn.rollback().await?;
            return Ok(FeedbackOutcome::RegistrationInactive);
        }

        let attended = attendance::Entity::find()
            .filter(attendance::Column::RegistrationId.eq(registration_id))
            .filter(attendance::Column::CheckInTime.is_not_null())
            .filter(attendance::Column::Status.is_in([
                AttendanceStatus::Present.as_str(),
                AttendanceStatus::Late.as_str(),
            ]))
            .count(&txn)
            .await?
            > 0;
        if !attended {
            txn.rollback().await?;
            return Ok(FeedbackOutcome::NotAttended);
        }

        let active = feedback::ActiveModel {
            registration_id: Set(registration_id),
            rating: Set(rating),
            comment: Set(comment),
            submitted_at: Set(at),
            ..Default::default()
        };
        feedback::Entity::insert(active)
            .on_conflict(
                OnConflict::column(feedback::Column::RegistrationId)
                    .update_columns([
                        feedback::Column::Rating,
                        feedback::Column::Comment,
                        feedback::Column::SubmittedAt,
                    ])
                    .to_owned(),
            )
            .exec(&txn)
            .await?;

        let row = feedback::Entity::find()
            .filter(feedback::Column::RegistrationId.eq(registration_id))
            .one(&txn)
            .await?;
        txn.commit().await?;

        row.map(|r| FeedbackOutcome::Recorded(r.into()))
            .ok_or_else(|| StoreError::Backend("feedback row missing after upsert".into()))
    }

    async fn list_all(&self) -> StoreResult<Vec<Feedback>> {
        let rows = feedback::Entity::find()
            .order_by_asc(feedback::Column::Id)
            .all(&*self.db)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}
