//! Tour Context - Errors

use thiserror::Error;

use super::MAX_COURSES;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TourError {
    #[error("number of courses must be at most {MAX_COURSES}, got {0}")]
    TooManyCourses(usize),

    #[error("{0} must not be empty")]
    EmptyField(&'static str),

    #[error("end date must not be before start date")]
    InvalidSchedule,

    #[error("invalid member range: min {min}, max {max}")]
    InvalidMemberRange { min: u32, max: u32 },

    #[error("max member {max} is below current reservations {reserved}")]
    CapacityBelowReservations { max: u32, reserved: usize },

    #[error("only the author may modify this tour")]
    NotAuthor,

    #[error("the author cannot reserve or wish their own tour")]
    OwnTour,

    #[error("tour is already reserved by this user")]
    AlreadyReserved,

    #[error("tour is fully booked")]
    Full,

    #[error("tour has been terminated")]
    Terminated,

    #[error("no wish to cancel on this tour")]
    WishNotFound,
}
