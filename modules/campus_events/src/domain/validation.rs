//! Input validation for colleges, students and events

use crate::contract::{CampusError, NewCollege, NewEvent, NewStudent};

fn require_non_blank(field: &str, value: &str) -> Result<(), CampusError> {
    if value.trim().is_empty() {
        return Err(CampusError::Validation {
            message: format!("{field} cannot be empty"),
        });
    }
    Ok(())
}

/// Same rule as the storage check constraint: an `@` somewhere in the address
fn validate_email(field: &str, email: &str) -> Result<(), CampusError> {
    if !email.contains('@') {
        return Err(CampusError::Validation {
            message: format!("{field} '{email}' is not a valid email address"),
        });
    }
    Ok(())
}

pub fn validate_new_college(college: &NewCollege) -> Result<(), CampusError> {
    require_non_blank("name", &college.name)?;
    if let Some(email) = &college.contact_email {
        validate_email("contact_email", email)?;
    }
    Ok(())
}

pub fn validate_new_student(student: &NewStudent) -> Result<(), CampusError> {
    require_non_blank("student_code", &student.student_code)?;
    require_non_blank("name", &student.name)?;
    validate_email("email", &student.email)
}

/// Validate event times and capacity
///
/// `start_time` must be strictly before `end_time` and capacity must be
/// positive; the registration counter always starts at zero.
pub fn validate_new_event(event: &NewEvent) -> Result<(), CampusError> {
    require_non_blank("title", &event.title)?;
    require_non_blank("event_type", &event.event_type)?;

    if event.start_time >= event.end_time {
        return Err(CampusError::Validation {
            message: format!(
                "start_time {} must be before end_time {}",
                event.start_time, event.end_time
            ),
        });
    }

    if event.max_capacity <= 0 {
        return Err(CampusError::Validation {
            message: format!("max_capacity must be positive, got {}", event.max_capacity),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn event() -> NewEvent {
        let start = Utc.with_ymd_and_hms(2025, 5, 2, 14, 0, 0).unwrap();
        NewEvent {
            college_id: 1,
            title: "Rust meetup".into(),
            description: None,
            event_type: "workshop".into(),
            start_time: start,
            end_time: start + Duration::hours(2),
            location: Some("Hall B".into()),
            max_capacity: 40,
        }
    }

    #[test]
    fn event_times_must_be_ordered() {
        assert!(validate_new_event(&event()).is_ok());

        let mut same = event();
        same.end_time = same.start_time;
        assert!(matches!(
            validate_new_event(&same),
            Err(CampusError::Validation { .. })
        ));
    }

    #[test]
    fn event_capacity_must_be_positive() {
        let mut empty = event();
        empty.max_capacity = 0;
        assert!(validate_new_event(&empty).is_err());
    }

    #[test]
    fn student_email_needs_at_sign() {
        let student = NewStudent {
            college_id: 1,
            student_code: "CS-001".into(),
            name: "Ada".into(),
            email: "ada.campus.edu".into(),
            phone: None,
        };
        assert!(validate_new_student(&student).is_err());

        let fixed = NewStudent {
            email: "ada@campus.edu".into(),
            ..student
        };
        assert!(validate_new_student(&fixed).is_ok());
    }
}
