//! Feedback gate: only attendees of a finished event may rate it

use super::ports::Clock;
use super::repository::{
    AttendanceRepository, DirectoryRepository, FeedbackOutcome, FeedbackRepository,
    RegistrationRepository,
};
use super::service::map_store_error;
use crate::contract::{CampusError, Feedback};
use std::sync::Arc;
use tracing::{debug, info, instrument};

pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;

pub fn validate_rating(rating: i32) -> Result<(), CampusError> {
    if (MIN_RATING..=MAX_RATING).contains(&rating) {
        Ok(())
    } else {
        Err(CampusError::InvalidRating { rating })
    }
}

/// Blank comments are stored as absent
pub fn normalize_comment(comment: Option<String>) -> Option<String> {
    comment
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
}

pub struct FeedbackGate {
    directory: Arc<dyn DirectoryRepository>,
    registrations: Arc<dyn RegistrationRepository>,
    attendance: Arc<dyn AttendanceRepository>,
    feedback: Arc<dyn FeedbackRepository>,
    clock: Arc<dyn Clock>,
}

impl FeedbackGate {
    pub fn new(
        directory: Arc<dyn DirectoryRepository>,
        registrations: Arc<dyn RegistrationRepository>,
        attendance: Arc<dyn AttendanceRepository>,
        feedback: Arc<dyn FeedbackRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            directory,
            registrations,
            attendance,
            feedback,
            clock,
        }
    }

    #[instrument(
        name = "campus_events.feedback.submit",
        skip(self, comment),
        fields(registration_id = registration_id, rating = rating)
    )]
    pub async fn submit(
        &self,
        registration_id: i32,
        rating: i32,
        comment: Option<String>,
    ) -> Result<Feedback, CampusError> {
        let registration = self
            .registrations
            .find(registration_id)
            .await
            .map_err(map_store_error)?
            .ok_or(CampusError::RegistrationNotFound {
                id: registration_id,
            })?;
        if !registration.is_active() {
            return Err(CampusError::RegistrationCancelled {
                id: registration_id,
            });
        }

        let attended = self
            .attendance
            .find_by_registration(registration_id)
            .await
            .map_err(map_store_error)?
            .is_some_and(|a| a.check_in_time.is_some() && a.status.is_attended());
        if !attended {
            return Err(CampusError::NotAttended { registration_id });
        }

        let event = self
            .directory
            .find_event(registration.event_id)
            .await
            .map_err(map_store_error)?
            .ok_or(CampusError::EventNotFound {
                id: registration.event_id,
            })?;
        let now = self.clock.now();
        if !event.has_ended(now) {
            debug!(end_time = %event.end_time, "Feedback before event end");
            return Err(CampusError::EventNotYetCompleted {
                event_id: event.id,
                end_time: event.end_time,
            });
        }

        validate_rating(rating)?;

        // Eligibility is re-checked by the store at commit time
        match self
            .feedback
            .upsert(registration_id, rating, normalize_comment(comment), now)
            .await
            .map_err(map_store_error)?
        {
            FeedbackOutcome::Recorded(feedback) => {
                info!(feedback_id = feedback.id, "Feedback recorded");
                Ok(feedback)
            }
            FeedbackOutcome::RegistrationInactive => {
                debug!("Registration cancelled while feedback was submitted");
                Err(CampusError::RegistrationCancelled {
                    id: registration_id,
                })
            }
            FeedbackOutcome::NotAttended => Err(CampusError::NotAttended { registration_id }),
        }
    }

    pub async fn get(&self, registration_id: i32) -> Result<Option<Feedback>, CampusError> {
        self.feedback
            .find_by_registration(registration_id)
            .await
            .map_err(map_store_error)
    }
}
