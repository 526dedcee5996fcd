//! Feedback shown while commands run

pub mod reporter;
