//! Database entities

pub mod absence_request;
pub mod account;
pub mod event;
pub mod event_attendee;
pub mod event_request;
pub mod google_authorization;
pub mod mentorship;
pub mod mentorship_technology;
pub mod season;
pub mod technology;
pub mod user;
