//! Mock ports shared by the use case tests.

use crate::ports::auth::{AuthError, AuthProvider};
use crate::ports::content_repository::{
    ChangeStream, ContentRepository, RepositoryError, user_change_stream,
};
use crate::ports::feedback::FeedbackNotifier;
use crate::ports::generation_gateway::{GatewayError, GenerationGateway};
use async_trait::async_trait;
use forge_domain::{
    BufferedResponse, ChangeKind, ContentChange, ContentId, ContentRecord, GenerationRequest,
    MarkupParser, NewContent, ResponseSource, UserId,
};
use std::collections::VecDeque;
use std::sync::Mutex;
use tokio::sync::broadcast;

pub fn user(id: &str) -> UserId {
    UserId::new(id).unwrap()
}

// === Auth ===

pub struct MockAuth {
    user: Mutex<Option<UserId>>,
}

impl MockAuth {
    pub fn signed_in(id: &str) -> Self {
        Self {
            user: Mutex::new(Some(user(id))),
        }
    }

    pub fn signed_out() -> Self {
        Self {
            user: Mutex::new(None),
        }
    }
}

#[async_trait]
impl AuthProvider for MockAuth {
    async fn current_user(&self) -> Result<Option<UserId>, AuthError> {
        Ok(self.user.lock().unwrap().clone())
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        *self.user.lock().unwrap() = None;
        Ok(())
    }
}

// === Gateway ===

pub struct MockGateway {
    responses: Mutex<VecDeque<Result<BufferedResponse, GatewayError>>>,
    pub requests: Mutex<Vec<GenerationRequest>>,
}

impl MockGateway {
    pub fn new(responses: Vec<Result<BufferedResponse, GatewayError>>) -> Self {
        Self {
            responses: Mutex::new(VecDeque::from(responses)),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl GenerationGateway for MockGateway {
    async fn send(
        &self,
        request: &GenerationRequest,
    ) -> Result<Box<dyn ResponseSource>, GatewayError> {
        self.requests.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(GatewayError::Other("No more responses".to_string())))
            .map(BufferedResponse::boxed)
    }
}

// === Markup ===

/// Returns the inner text of `<tag>...</tag>` when it contains no child tags
pub struct FlatMarkup;

impl MarkupParser for FlatMarkup {
    fn element_text(&self, document: &str, tag: &str) -> Option<String> {
        let open = format!("<{tag}>");
        let close = format!("</{tag}>");
        let start = document.find(&open)? + open.len();
        let len = document[start..].find(&close)?;
        Some(document[start..start + len].to_string())
    }
}

// === Repository ===

pub struct MockRepository {
    records: Mutex<Vec<ContentRecord>>,
    next_id: Mutex<i64>,
    changes: broadcast::Sender<ContentChange>,
    pub fail_writes: bool,
}

impl MockRepository {
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(16);
        Self {
            records: Mutex::new(Vec::new()),
            next_id: Mutex::new(1),
            changes,
            fail_writes: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            fail_writes: true,
            ..Self::new()
        }
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    pub fn seed(&self, record: ContentRecord) {
        self.records.lock().unwrap().push(record);
    }

    fn notify(&self, kind: ChangeKind, id: ContentId, user: &UserId) {
        let _ = self
            .changes
            .send(ContentChange::new(kind, id, user.clone()));
    }
}

#[async_trait]
impl ContentRepository for MockRepository {
    async fn insert(&self, content: NewContent) -> Result<ContentRecord, RepositoryError> {
        if self.fail_writes {
            return Err(RepositoryError::Backend("insert rejected".to_string()));
        }
        let id = {
            let mut next = self.next_id.lock().unwrap();
            let id = ContentId(*next);
            *next += 1;
            id
        };
        let record = content.into_record(id);
        self.records.lock().unwrap().push(record.clone());
        self.notify(ChangeKind::Inserted, id, &record.user_id);
        Ok(record)
    }

    async fn list_for_user(&self, user: &UserId) -> Result<Vec<ContentRecord>, RepositoryError> {
        let mut records: Vec<_> = self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.is_owned_by(user))
            .cloned()
            .collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }

    async fn update_content(
        &self,
        user: &UserId,
        id: ContentId,
        generated_content: &str,
    ) -> Result<ContentRecord, RepositoryError> {
        if self.fail_writes {
            return Err(RepositoryError::Backend("update rejected".to_string()));
        }
        let updated = {
            let mut records = self.records.lock().unwrap();
            let record = records
                .iter_mut()
                .find(|r| r.id == id && r.is_owned_by(user))
                .ok_or(RepositoryError::NotFound(id))?;
            record.generated_content = generated_content.to_string();
            record.clone()
        };
        self.notify(ChangeKind::Updated, id, user);
        Ok(updated)
    }

    async fn delete(&self, user: &UserId, id: ContentId) -> Result<(), RepositoryError> {
        if self.fail_writes {
            return Err(RepositoryError::Backend("delete rejected".to_string()));
        }
        {
            let mut records = self.records.lock().unwrap();
            let before = records.len();
            records.retain(|r| !(r.id == id && r.is_owned_by(user)));
            if records.len() == before {
                return Err(RepositoryError::NotFound(id));
            }
        }
        self.notify(ChangeKind::Deleted, id, user);
        Ok(())
    }

    fn subscribe(&self, user: &UserId) -> ChangeStream {
        user_change_stream(self.changes.subscribe(), user.clone())
    }
}

// === Feedback ===

#[derive(Default)]
pub struct RecordingFeedback {
    pub events: Mutex<Vec<String>>,
}

impl RecordingFeedback {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

impl FeedbackNotifier for RecordingFeedback {
    fn on_generation_start(&self, _prompt: &str) {
        self.events.lock().unwrap().push("start".to_string());
    }

    fn on_generation_end(&self) {
        self.events.lock().unwrap().push("end".to_string());
    }

    fn success(&self, message: &str) {
        self.events.lock().unwrap().push(format!("ok: {message}"));
    }

    fn error(&self, message: &str) {
        self.events.lock().unwrap().push(format!("err: {message}"));
    }
}
