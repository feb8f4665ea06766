//! Domain layer - lifecycle engine, reporting and the ports they depend on

pub mod attendance;
pub mod feedback;
pub mod ports;
pub mod registration;
pub mod reporting;
pub mod repository;
pub mod service;
pub mod validation;

pub use ports::{Clock, SystemClock};
pub use repository::{
    AttendanceRepository, CheckInOutcome, CheckOutOutcome, DirectoryRepository, EventUpdateOutcome,
    FeedbackOutcome, FeedbackRepository, RegistrationRepository, SeatClaim, SeatClaimOutcome,
    SeatReleaseOutcome, StoreError, StoreResult,
};
pub use service::{Repositories, Service};
