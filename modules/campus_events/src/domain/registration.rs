//! Registration service: the only writer of registrations and of the event counter
//!
//! Preconditions are read first and fail fast. The write itself is a
//! compare-and-set on `current_registrations` inside one store transaction;
//! when another caller moved the counter in between, the preconditions are
//! re-read and re-checked, so a losing racer gets the same error a sequential
//! caller would.

use super::ports::Clock;
use super::repository::{
    DirectoryRepository, RegistrationRepository, SeatClaim, SeatClaimOutcome, SeatReleaseOutcome,
};
use super::service::map_store_error;
use crate::config::Config;
use crate::contract::{CampusError, Event, EventStatus, Registration};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

pub struct Registrar {
    directory: Arc<dyn DirectoryRepository>,
    registrations: Arc<dyn RegistrationRepository>,
    clock: Arc<dyn Clock>,
    max_attempts: u32,
    closes_at_start: bool,
}

impl Registrar {
    pub fn new(
        directory: Arc<dyn DirectoryRepository>,
        registrations: Arc<dyn RegistrationRepository>,
        clock: Arc<dyn Clock>,
        config: &Config,
    ) -> Self {
        Self {
            directory,
            registrations,
            clock,
            max_attempts: config.max_register_attempts.max(1),
            closes_at_start: config.registration_closes_at_start,
        }
    }

    #[instrument(
        name = "campus_events.registration.register",
        skip(self),
        fields(student_id = student_id, event_id = event_id)
    )]
    pub async fn register(&self, student_id: i32, event_id: i32) -> Result<Registration, CampusError> {
        for attempt in 1..=self.max_attempts {
            let event = self.check_preconditions(student_id, event_id).await?;

            let claim = SeatClaim {
                student_id,
                event_id,
                observed_count: event.current_registrations,
                registered_at: self.clock.now(),
            };

            match self
                .registrations
                .claim_seat(claim)
                .await
                .map_err(map_store_error)?
            {
                SeatClaimOutcome::Claimed(registration) => {
                    info!(
                        registration_id = registration.id,
                        attempt, "Registration committed"
                    );
                    return Ok(registration);
                }
                SeatClaimOutcome::Duplicate => {
                    return Err(CampusError::DuplicateRegistration {
                        student_id,
                        event_id,
                    });
                }
                SeatClaimOutcome::Stale => {
                    debug!(attempt, "Registration counter moved, re-checking");
                }
            }
        }

        warn!(attempts = self.max_attempts, "Registration abandoned under contention");
        Err(CampusError::unavailable(format!(
            "event {event_id} is under heavy registration contention"
        )))
    }

    /// Checks run in a fixed order; the first failure wins
    async fn check_preconditions(&self, student_id: i32, event_id: i32) -> Result<Event, CampusError> {
        if !self
            .directory
            .student_exists(student_id)
            .await
            .map_err(map_store_error)?
        {
            return Err(CampusError::StudentNotFound { id: student_id });
        }

        let event = self
            .directory
            .find_event(event_id)
            .await
            .map_err(map_store_error)?
            .ok_or(CampusError::EventNotFound { id: event_id })?;

        if event.status != EventStatus::Active {
            return Err(CampusError::EventNotActive {
                id: event.id,
                status: event.status,
            });
        }

        if self.closes_at_start && self.clock.now() >= event.start_time {
            return Err(CampusError::RegistrationClosed { event_id });
        }

        let existing = self
            .registrations
            .find_for_pair(student_id, event_id)
            .await
            .map_err(map_store_error)?;
        if existing.is_some_and(|r| r.is_active()) {
            return Err(CampusError::DuplicateRegistration {
                student_id,
                event_id,
            });
        }

        if event.is_full() {
            return Err(CampusError::EventFull {
                id: event.id,
                max_capacity: event.max_capacity,
            });
        }

        Ok(event)
    }

    #[instrument(
        name = "campus_events.registration.cancel",
        skip(self),
        fields(registration_id = registration_id)
    )]
    pub async fn cancel(&self, registration_id: i32) -> Result<Registration, CampusError> {
        let registration = self.get(registration_id).await?;
        if !registration.is_active() {
            return Err(CampusError::AlreadyCancelled {
                id: registration_id,
            });
        }

        match self
            .registrations
            .release_seat(registration_id)
            .await
            .map_err(map_store_error)?
        {
            SeatReleaseOutcome::Released(cancelled) => {
                info!(event_id = cancelled.event_id, "Registration cancelled");
                Ok(cancelled)
            }
            SeatReleaseOutcome::NotActive => Err(CampusError::AlreadyCancelled {
                id: registration_id,
            }),
            SeatReleaseOutcome::Missing => Err(CampusError::RegistrationNotFound {
                id: registration_id,
            }),
        }
    }

    pub async fn get(&self, registration_id: i32) -> Result<Registration, CampusError> {
        self.registrations
            .find(registration_id)
            .await
            .map_err(map_store_error)?
            .ok_or(CampusError::RegistrationNotFound {
                id: registration_id,
            })
    }
}
