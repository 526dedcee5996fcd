//! Application layer for content-forge
//!
//! This crate contains use cases and port definitions.
//! It depends only on the domain layer.

pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use ports::{
    auth::{AuthError, AuthProvider},
    content_repository::{ChangeStream, ContentRepository, RepositoryError, user_change_stream},
    feedback::{FeedbackNotifier, NoFeedback},
    generation_gateway::{GatewayError, GenerationGateway},
};
pub use use_cases::content_history::{ContentHistoryUseCase, HistoryError, HistorySnapshot};
pub use use_cases::generate_content::{
    GenerateContentInput, GenerateContentUseCase, GenerateError,
};
