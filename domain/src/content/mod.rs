//! Content subdomain: generated content history.
//!
//! - [`entities::ContentRecord`]: a stored prompt / generated-content pair
//! - [`entities::NewContent`]: the insert payload for a fresh generation
//! - [`value_objects::Prompt`]: a validated, non-blank prompt
//! - [`value_objects::UserId`]: opaque id from the auth collaborator
//! - [`change::ContentChange`]: change notification for live history views

pub mod change;
pub mod entities;
pub mod value_objects;
