//! Entity-to-DTO mapping layer
//!
//! Explicit, hand-written transformation functions per aggregate:
//! `to_model` (creation DTO to new entity), `to_response` (entity to
//! wire shape, relations flattened to ids or summaries) and
//! `apply_update` (partial update, null means "no change"). Derived
//! fields are computed here; relationship resolution and password
//! hashing are delegated to injected collaborators.

pub mod absence_request;
pub mod collaborators;
pub mod duration;
pub mod event;
pub mod event_request;
pub mod mentorship;
pub mod technology;
pub mod user;

pub use collaborators::{PasswordEncoder, UserResolver};
