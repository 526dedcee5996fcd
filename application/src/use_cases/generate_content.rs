//! Generate Content use case.
//!
//! Sends the user's prompt to the generation webhook, normalizes whatever
//! comes back into plain text and stores the prompt / content pair.
//!
//! Nothing is written unless every earlier step succeeded: a rejected prompt,
//! missing session, transport error, unparseable response or empty content
//! all end the flow before the repository is touched.

use crate::ports::auth::{AuthError, AuthProvider};
use crate::ports::content_repository::{ContentRepository, RepositoryError};
use crate::ports::feedback::FeedbackNotifier;
use crate::ports::generation_gateway::{GatewayError, GenerationGateway};
use chrono::Utc;
use forge_domain::util::preview;
use forge_domain::{
    ContentRecord, DomainError, GenerationRequest, NewContent, ParseError, Prompt,
    ResponseNormalizer,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur while generating content.
#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("Please enter a prompt")]
    EmptyPrompt,

    #[error("You must be logged in")]
    NotAuthenticated,

    #[error("{0}")]
    Auth(#[from] AuthError),

    #[error("{0}")]
    Gateway(#[from] GatewayError),

    #[error("{0}")]
    Parse(#[from] ParseError),

    #[error("No content received from the API")]
    EmptyContent,

    #[error("{0}")]
    Repository(#[from] RepositoryError),
}

impl GenerateError {
    /// Message suitable for a transient notification
    pub fn user_message(&self) -> String {
        match self {
            GenerateError::EmptyPrompt | GenerateError::NotAuthenticated => self.to_string(),
            other => format!("Error: {other}"),
        }
    }
}

impl From<DomainError> for GenerateError {
    fn from(error: DomainError) -> Self {
        match error {
            DomainError::EmptyPrompt => GenerateError::EmptyPrompt,
            DomainError::EmptyContent => GenerateError::EmptyContent,
            // A session holding an unusable id is no session at all
            DomainError::InvalidUserId(_) => GenerateError::NotAuthenticated,
        }
    }
}

/// Input for the [`GenerateContentUseCase`].
#[derive(Debug, Clone)]
pub struct GenerateContentInput {
    /// The prompt exactly as the user typed it
    pub prompt: String,
}

impl GenerateContentInput {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
        }
    }
}

/// Use case for a single generation round trip.
pub struct GenerateContentUseCase {
    auth: Arc<dyn AuthProvider>,
    gateway: Arc<dyn GenerationGateway>,
    normalizer: ResponseNormalizer,
    repository: Arc<dyn ContentRepository>,
}

impl Clone for GenerateContentUseCase {
    fn clone(&self) -> Self {
        Self {
            auth: self.auth.clone(),
            gateway: self.gateway.clone(),
            normalizer: self.normalizer.clone(),
            repository: self.repository.clone(),
        }
    }
}

impl GenerateContentUseCase {
    pub fn new(
        auth: Arc<dyn AuthProvider>,
        gateway: Arc<dyn GenerationGateway>,
        normalizer: ResponseNormalizer,
        repository: Arc<dyn ContentRepository>,
    ) -> Self {
        Self {
            auth,
            gateway,
            normalizer,
            repository,
        }
    }

    /// Run the generation and report the outcome through `feedback`.
    pub async fn execute(
        &self,
        input: GenerateContentInput,
        feedback: &dyn FeedbackNotifier,
    ) -> Result<ContentRecord, GenerateError> {
        let result = self.run(input, feedback).await;
        match &result {
            Ok(record) => {
                info!(id = %record.id, "Content generated");
                feedback.success("Content generated successfully!");
            }
            Err(e) => {
                warn!(error = %e, "Generation failed");
                feedback.error(&e.user_message());
            }
        }
        result
    }

    async fn run(
        &self,
        input: GenerateContentInput,
        feedback: &dyn FeedbackNotifier,
    ) -> Result<ContentRecord, GenerateError> {
        let prompt = Prompt::new(input.prompt)?;
        let user = self
            .auth
            .current_user()
            .await?
            .ok_or(GenerateError::NotAuthenticated)?;

        let request = GenerationRequest::new(&prompt, &user, Utc::now());
        info!(
            user = %user,
            prompt = %preview(prompt.as_str(), 80),
            "Requesting generation"
        );

        feedback.on_generation_start(prompt.as_str());
        let content = self.fetch_content(&request).await;
        feedback.on_generation_end();
        let content = content?;

        if content.is_empty() {
            return Err(DomainError::EmptyContent.into());
        }
        debug!(bytes = content.len(), "Normalized generated content");

        let record = self
            .repository
            .insert(NewContent::new(&prompt, content, user, Utc::now()))
            .await?;
        Ok(record)
    }

    async fn fetch_content(&self, request: &GenerationRequest) -> Result<String, GenerateError> {
        let response = self.gateway.send(request).await?;
        Ok(self.normalizer.normalize(response).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::test_support::{
        FlatMarkup, MockAuth, MockGateway, MockRepository, RecordingFeedback, user,
    };
    use forge_domain::BufferedResponse;

    fn use_case(
        auth: MockAuth,
        gateway: Arc<MockGateway>,
        repository: Arc<MockRepository>,
    ) -> GenerateContentUseCase {
        GenerateContentUseCase::new(
            Arc::new(auth),
            gateway,
            ResponseNormalizer::new(Arc::new(FlatMarkup)),
            repository,
        )
    }

    #[tokio::test]
    async fn test_generates_and_stores_content() {
        let gateway = Arc::new(MockGateway::new(vec![Ok(BufferedResponse::json(
            r#"{"content":"A short poem","format":"text"}"#,
        ))]));
        let repository = Arc::new(MockRepository::new());
        let feedback = RecordingFeedback::default();

        let record = use_case(MockAuth::signed_in("u1"), gateway.clone(), repository.clone())
            .execute(GenerateContentInput::new("write a poem"), &feedback)
            .await
            .unwrap();

        assert_eq!(record.prompt, "write a poem");
        assert_eq!(record.generated_content, "A short poem");
        assert_eq!(record.user_id, user("u1"));
        assert_eq!(repository.len(), 1);

        let requests = gateway.requests.lock().unwrap();
        assert_eq!(requests[0].prompt, "write a poem");
        assert_eq!(requests[0].user_id, "u1");

        assert_eq!(
            feedback.events(),
            vec!["start", "end", "ok: Content generated successfully!"]
        );
    }

    #[tokio::test]
    async fn test_blank_prompt_never_reaches_gateway() {
        let gateway = Arc::new(MockGateway::new(vec![]));
        let repository = Arc::new(MockRepository::new());
        let feedback = RecordingFeedback::default();

        let err = use_case(MockAuth::signed_in("u1"), gateway.clone(), repository.clone())
            .execute(GenerateContentInput::new("   "), &feedback)
            .await
            .unwrap_err();

        assert!(matches!(err, GenerateError::EmptyPrompt));
        assert_eq!(gateway.request_count(), 0);
        assert_eq!(feedback.events(), vec!["err: Please enter a prompt"]);
    }

    #[tokio::test]
    async fn test_requires_session() {
        let gateway = Arc::new(MockGateway::new(vec![]));
        let repository = Arc::new(MockRepository::new());

        let err = use_case(MockAuth::signed_out(), gateway.clone(), repository.clone())
            .execute(GenerateContentInput::new("hello"), &RecordingFeedback::default())
            .await
            .unwrap_err();

        assert!(matches!(err, GenerateError::NotAuthenticated));
        assert_eq!(gateway.request_count(), 0);
    }

    #[test]
    fn test_domain_errors_map_to_their_own_variants() {
        assert!(matches!(
            GenerateError::from(DomainError::EmptyPrompt),
            GenerateError::EmptyPrompt
        ));
        assert!(matches!(
            GenerateError::from(DomainError::EmptyContent),
            GenerateError::EmptyContent
        ));
        let err = GenerateError::from(DomainError::InvalidUserId(" ".to_string()));
        assert!(matches!(err, GenerateError::NotAuthenticated));
        assert_eq!(err.user_message(), "You must be logged in");
    }

    #[tokio::test]
    async fn test_http_error_writes_nothing() {
        let gateway = Arc::new(MockGateway::new(vec![Err(GatewayError::HttpStatus(502))]));
        let repository = Arc::new(MockRepository::new());
        let feedback = RecordingFeedback::default();

        let err = use_case(MockAuth::signed_in("u1"), gateway, repository.clone())
            .execute(GenerateContentInput::new("hello"), &feedback)
            .await
            .unwrap_err();

        assert!(matches!(err, GenerateError::Gateway(GatewayError::HttpStatus(502))));
        assert_eq!(repository.len(), 0);
        assert_eq!(
            feedback.events(),
            vec!["start", "end", "err: Error: HTTP error! status: 502"]
        );
    }

    #[tokio::test]
    async fn test_parse_error_writes_nothing() {
        let gateway = Arc::new(MockGateway::new(vec![Ok(BufferedResponse::json(
            r#"{"foo":"bar"}"#,
        ))]));
        let repository = Arc::new(MockRepository::new());

        let err = use_case(MockAuth::signed_in("u1"), gateway, repository.clone())
            .execute(GenerateContentInput::new("hello"), &RecordingFeedback::default())
            .await
            .unwrap_err();

        assert!(matches!(err, GenerateError::Parse(ParseError::InvalidJsonFormat)));
        assert_eq!(err.user_message(), "Error: invalid JSON response format");
        assert_eq!(repository.len(), 0);
    }

    #[tokio::test]
    async fn test_empty_content_is_rejected() {
        let gateway = Arc::new(MockGateway::new(vec![Ok(BufferedResponse::plain(" \n\t "))]));
        let repository = Arc::new(MockRepository::new());

        let err = use_case(MockAuth::signed_in("u1"), gateway, repository.clone())
            .execute(GenerateContentInput::new("hello"), &RecordingFeedback::default())
            .await
            .unwrap_err();

        assert!(matches!(err, GenerateError::EmptyContent));
        assert_eq!(repository.len(), 0);
    }

    #[tokio::test]
    async fn test_xml_response_is_normalized() {
        let gateway = Arc::new(MockGateway::new(vec![Ok(BufferedResponse::xml(
            "<content>From XML</content>",
        ))]));
        let repository = Arc::new(MockRepository::new());

        let record = use_case(MockAuth::signed_in("u1"), gateway, repository)
            .execute(GenerateContentInput::new("hello"), &RecordingFeedback::default())
            .await
            .unwrap();

        assert_eq!(record.generated_content, "From XML");
    }

    #[tokio::test]
    async fn test_repository_failure_is_reported() {
        let gateway = Arc::new(MockGateway::new(vec![Ok(BufferedResponse::plain("text"))]));
        let repository = Arc::new(MockRepository::failing());
        let feedback = RecordingFeedback::default();

        let err = use_case(MockAuth::signed_in("u1"), gateway, repository)
            .execute(GenerateContentInput::new("hello"), &feedback)
            .await
            .unwrap_err();

        assert!(matches!(err, GenerateError::Repository(_)));
        assert_eq!(
            feedback.events().last().unwrap(),
            "err: Error: Backend error: insert rejected"
        );
    }
}
