//! Attendance state machine
//!
//! `NotCheckedIn -> CheckedIn(present | late) -> CheckedOut`. There are no
//! reverse transitions and repeating a transition is an error, not a no-op.

use super::ports::Clock;
use super::repository::{
    AttendanceRepository, CheckInOutcome, CheckOutOutcome, DirectoryRepository,
    RegistrationRepository,
};
use super::service::map_store_error;
use crate::config::Config;
use crate::contract::{Attendance, AttendanceAction, AttendanceStatus, CampusError, Registration};
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tracing::{info, instrument};

/// Position of a registration in the attendance lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttendanceState {
    NotCheckedIn,
    CheckedIn(AttendanceStatus),
    CheckedOut(AttendanceStatus),
}

impl AttendanceState {
    pub fn of(record: Option<&Attendance>) -> Self {
        match record {
            Some(a) if a.check_in_time.is_some() && a.check_out_time.is_some() => {
                Self::CheckedOut(a.status)
            }
            Some(a) if a.check_in_time.is_some() => Self::CheckedIn(a.status),
            _ => Self::NotCheckedIn,
        }
    }

    pub fn ensure_can_check_in(self, registration_id: i32) -> Result<(), CampusError> {
        match self {
            Self::NotCheckedIn => Ok(()),
            Self::CheckedIn(_) | Self::CheckedOut(_) => {
                Err(CampusError::AlreadyCheckedIn { registration_id })
            }
        }
    }

    pub fn ensure_can_check_out(self, registration_id: i32) -> Result<(), CampusError> {
        match self {
            Self::CheckedIn(_) => Ok(()),
            Self::NotCheckedIn => Err(CampusError::NotCheckedIn { registration_id }),
            Self::CheckedOut(_) => Err(CampusError::AlreadyCheckedOut { registration_id }),
        }
    }
}

/// `late` only when strictly past the grace period after start
pub fn classify_check_in(
    at: DateTime<Utc>,
    start_time: DateTime<Utc>,
    grace: Duration,
) -> AttendanceStatus {
    if at > start_time + grace {
        AttendanceStatus::Late
    } else {
        AttendanceStatus::Present
    }
}

pub struct AttendanceTracker {
    directory: Arc<dyn DirectoryRepository>,
    registrations: Arc<dyn RegistrationRepository>,
    attendance: Arc<dyn AttendanceRepository>,
    clock: Arc<dyn Clock>,
    grace: Duration,
}

impl AttendanceTracker {
    pub fn new(
        directory: Arc<dyn DirectoryRepository>,
        registrations: Arc<dyn RegistrationRepository>,
        attendance: Arc<dyn AttendanceRepository>,
        clock: Arc<dyn Clock>,
        config: &Config,
    ) -> Self {
        Self {
            directory,
            registrations,
            attendance,
            clock,
            grace: config.late_grace(),
        }
    }

    pub async fn record(
        &self,
        registration_id: i32,
        action: AttendanceAction,
    ) -> Result<Attendance, CampusError> {
        match action {
            AttendanceAction::CheckIn => self.check_in(registration_id).await,
            AttendanceAction::CheckOut => self.check_out(registration_id).await,
        }
    }

    #[instrument(
        name = "campus_events.attendance.check_in",
        skip(self),
        fields(registration_id = registration_id)
    )]
    pub async fn check_in(&self, registration_id: i32) -> Result<Attendance, CampusError> {
        let registration = self.find_registration(registration_id).await?;
        if !registration.is_active() {
            return Err(CampusError::RegistrationCancelled {
                id: registration_id,
            });
        }

        let current = self.current(registration_id).await?;
        AttendanceState::of(current.as_ref()).ensure_can_check_in(registration_id)?;

        let event = self
            .directory
            .find_event(registration.event_id)
            .await
            .map_err(map_store_error)?
            .ok_or(CampusError::EventNotFound {
                id: registration.event_id,
            })?;

        let now = self.clock.now();
        let status = classify_check_in(now, event.start_time, self.grace);

        match self
            .attendance
            .check_in(registration_id, now, status)
            .await
            .map_err(map_store_error)?
        {
            CheckInOutcome::Recorded(attendance) => {
                info!(status = %attendance.status, "Checked in");
                Ok(attendance)
            }
            CheckInOutcome::AlreadyCheckedIn => Err(CampusError::AlreadyCheckedIn { registration_id }),
            CheckInOutcome::RegistrationInactive => {
                // Cancelled or deleted between the read and the write
                self.find_registration(registration_id).await?;
                Err(CampusError::RegistrationCancelled {
                    id: registration_id,
                })
            }
        }
    }

    #[instrument(
        name = "campus_events.attendance.check_out",
        skip(self),
        fields(registration_id = registration_id)
    )]
    pub async fn check_out(&self, registration_id: i32) -> Result<Attendance, CampusError> {
        self.find_registration(registration_id).await?;

        let current = self.current(registration_id).await?;
        AttendanceState::of(current.as_ref()).ensure_can_check_out(registration_id)?;

        match self
            .attendance
            .check_out(registration_id, self.clock.now())
            .await
            .map_err(map_store_error)?
        {
            CheckOutOutcome::Recorded(attendance) => {
                info!("Checked out");
                Ok(attendance)
            }
            CheckOutOutcome::NotCheckedIn => Err(CampusError::NotCheckedIn { registration_id }),
            CheckOutOutcome::AlreadyCheckedOut => {
                Err(CampusError::AlreadyCheckedOut { registration_id })
            }
        }
    }

    /// Attendance row for a registration, `None` before the first check-in
    pub async fn get(&self, registration_id: i32) -> Result<Option<Attendance>, CampusError> {
        self.find_registration(registration_id).await?;
        self.current(registration_id).await
    }

    async fn current(&self, registration_id: i32) -> Result<Option<Attendance>, CampusError> {
        self.attendance
            .find_by_registration(registration_id)
            .await
            .map_err(map_store_error)
    }

    async fn find_registration(&self, registration_id: i32) -> Result<Registration, CampusError> {
        self.registrations
            .find(registration_id)
            .await
            .map_err(map_store_error)?
            .ok_or(CampusError::RegistrationNotFound {
                id: registration_id,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(check_in: bool, check_out: bool, status: AttendanceStatus) -> Attendance {
        let t = Utc.with_ymd_and_hms(2025, 3, 1, 10, 0, 0).unwrap();
        Attendance {
            id: 1,
            registration_id: 7,
            check_in_time: check_in.then_some(t),
            check_out_time: check_out.then_some(t),
            status,
        }
    }

    #[test]
    fn state_is_derived_from_timestamps() {
        assert_eq!(AttendanceState::of(None), AttendanceState::NotCheckedIn);
        assert_eq!(
            AttendanceState::of(Some(&record(false, false, AttendanceStatus::Absent))),
            AttendanceState::NotCheckedIn
        );
        assert_eq!(
            AttendanceState::of(Some(&record(true, false, AttendanceStatus::Late))),
            AttendanceState::CheckedIn(AttendanceStatus::Late)
        );
        assert_eq!(
            AttendanceState::of(Some(&record(true, true, AttendanceStatus::Present))),
            AttendanceState::CheckedOut(AttendanceStatus::Present)
        );
    }

    #[test]
    fn transitions_never_skip_or_reverse() {
        let fresh = AttendanceState::NotCheckedIn;
        assert!(fresh.ensure_can_check_in(7).is_ok());
        assert_eq!(
            fresh.ensure_can_check_out(7),
            Err(CampusError::NotCheckedIn { registration_id: 7 })
        );

        let inside = AttendanceState::CheckedIn(AttendanceStatus::Present);
        assert_eq!(
            inside.ensure_can_check_in(7),
            Err(CampusError::AlreadyCheckedIn { registration_id: 7 })
        );
        assert!(inside.ensure_can_check_out(7).is_ok());

        let done = AttendanceState::CheckedOut(AttendanceStatus::Present);
        assert_eq!(
            done.ensure_can_check_in(7),
            Err(CampusError::AlreadyCheckedIn { registration_id: 7 })
        );
        assert_eq!(
            done.ensure_can_check_out(7),
            Err(CampusError::AlreadyCheckedOut { registration_id: 7 })
        );
    }

    #[test]
    fn late_starts_strictly_after_grace() {
        let start = Utc.with_ymd_and_hms(2025, 3, 1, 10, 0, 0).unwrap();
        let grace = Duration::minutes(15);
        assert_eq!(
            classify_check_in(start - Duration::minutes(30), start, grace),
            AttendanceStatus::Present
        );
        assert_eq!(classify_check_in(start + grace, start, grace), AttendanceStatus::Present);
        assert_eq!(
            classify_check_in(start + grace + Duration::seconds(1), start, grace),
            AttendanceStatus::Late
        );
    }
}
