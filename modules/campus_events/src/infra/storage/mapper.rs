//! Entity to model mappers
//!
//! Conversions between SeaORM entities and contract models. Status columns
//! that hold an unknown string fail the conversion instead of defaulting.

use super::entity;
use crate::contract::{
    Attendance, College, Event, Feedback, Registration, Student, UnknownStatus,
};

impl From<entity::college::Model> for College {
    fn from(entity: entity::college::Model) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            location: entity.location,
            contact_email: entity.contact_email,
            created_at: entity.created_at,
        }
    }
}

impl From<entity::student::Model> for Student {
    fn from(entity: entity::student::Model) -> Self {
        Self {
            id: entity.id,
            college_id: entity.college_id,
            student_code: entity.student_code,
            name: entity.name,
            email: entity.email,
            phone: entity.phone,
            created_at: entity.created_at,
        }
    }
}

impl TryFrom<entity::event::Model> for Event {
    type Error = UnknownStatus;

    fn try_from(entity: entity::event::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: entity.id,
            college_id: entity.college_id,
            title: entity.title,
            description: entity.description,
            event_type: entity.event_type,
            start_time: entity.start_time,
            end_time: entity.end_time,
            location: entity.location,
            max_capacity: entity.max_capacity,
            current_registrations: entity.current_registrations,
            status: entity.status.parse()?,
            created_at: entity.created_at,
        })
    }
}

impl TryFrom<entity::registration::Model> for Registration {
    type Error = UnknownStatus;

    fn try_from(entity: entity::registration::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: entity.id,
            student_id: entity.student_id,
            event_id: entity.event_id,
            registered_at: entity.registered_at,
            status: entity.status.parse()?,
        })
    }
}

impl TryFrom<entity::attendance::Model> for Attendance {
    type Error = UnknownStatus;

    fn try_from(entity: entity::attendance::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: entity.id,
            registration_id: entity.registration_id,
            check_in_time: entity.check_in_time,
            check_out_time: entity.check_out_time,
            status: entity.status.parse()?,
        })
    }
}

impl From<entity::feedback::Model> for Feedback {
    fn from(entity: entity::feedback::Model) -> Self {
        Self {
            id: entity.id,
            registration_id: entity.registration_id,
            rating: entity.rating,
            comment: entity.comment,
            submitted_at: entity.submitted_at,
        }
    }
}
