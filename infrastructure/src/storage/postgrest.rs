//! Content repository over the hosted backend's PostgREST interface.
//!
//! Rows live in `<base>/rest/v1/<table>`. Every request carries the project
//! API key; filters use PostgREST operators (`user_id=eq.<id>`).
//!
//! The backend's realtime channel is not used: subscribers see changes made
//! through this repository instance only.

use super::CHANGE_CHANNEL_CAPACITY;
use crate::config::FilePostgrestConfig;
use async_trait::async_trait;
use forge_application::ports::content_repository::{
    ChangeStream, ContentRepository, RepositoryError, user_change_stream,
};
use forge_domain::{ChangeKind, ContentChange, ContentId, ContentRecord, NewContent, UserId};
use reqwest::{Method, RequestBuilder, Response};
use serde::Serialize;
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::debug;

/// Request timeout for table operations
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// PostgREST-backed content repository.
pub struct PostgrestContentRepository {
    client: reqwest::Client,
    table_url: String,
    api_key: String,
    changes: broadcast::Sender<ContentChange>,
}

#[derive(Serialize)]
struct ContentPatch<'a> {
    generated_content: &'a str,
}

/// PostgREST equality filter value
fn eq_filter(value: impl std::fmt::Display) -> String {
    format!("eq.{value}")
}

impl PostgrestContentRepository {
    pub fn new(
        base_url: &str,
        api_key: impl Into<String>,
        table: &str,
    ) -> Result<Self, RepositoryError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| RepositoryError::Backend(format!("Failed to build HTTP client: {e}")))?;
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Ok(Self {
            client,
            table_url: format!("{}/rest/v1/{}", base_url.trim_end_matches('/'), table),
            api_key: api_key.into(),
            changes,
        })
    }

    pub fn from_config(config: &FilePostgrestConfig) -> Result<Self, RepositoryError> {
        let url = config
            .url
            .as_deref()
            .ok_or_else(|| RepositoryError::Backend("storage.postgrest.url is not set".into()))?;
        let api_key = config.api_key.clone().ok_or_else(|| {
            RepositoryError::Backend("storage.postgrest.api_key is not set".into())
        })?;
        Self::new(url, api_key, &config.table)
    }

    fn request(&self, method: Method) -> RequestBuilder {
        self.client
            .request(method, &self.table_url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    /// Write request asking for the affected rows back
    fn returning(&self, method: Method) -> RequestBuilder {
        self.request(method)
            .header("Prefer", "return=representation")
    }

    async fn rows(&self, request: RequestBuilder) -> Result<Vec<ContentRecord>, RepositoryError> {
        let response = request
            .send()
            .await
            .map_err(|e| RepositoryError::Backend(e.to_string()))?;
        let response = check_status(response).await?;
        response
            .json()
            .await
            .map_err(|e| RepositoryError::Backend(format!("Invalid response body: {e}")))
    }

    fn notify(&self, kind: ChangeKind, id: ContentId, user: &UserId) {
        let _ = self.changes.send(ContentChange::new(kind, id, user.clone()));
    }
}

async fn check_status(response: Response) -> Result<Response, RepositoryError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(RepositoryError::Backend(format!(
        "{} {}",
        status.as_u16(),
        body.trim()
    )))
}

#[async_trait]
impl ContentRepository for PostgrestContentRepository {
    async fn insert(&self, content: NewContent) -> Result<ContentRecord, RepositoryError> {
        let request = self.returning(Method::POST).json(&[&content]);
        let record = self
            .rows(request)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| RepositoryError::Backend("insert returned no row".to_string()))?;
        debug!(id = %record.id, "Inserted content row");
        self.notify(ChangeKind::Inserted, record.id, &record.user_id);
        Ok(record)
    }

    async fn list_for_user(&self, user: &UserId) -> Result<Vec<ContentRecord>, RepositoryError> {
        let request = self.request(Method::GET).query(&[
            ("select", "*".to_string()),
            ("user_id", eq_filter(user)),
            ("order", "created_at.desc".to_string()),
        ]);
        self.rows(request).await
    }

    async fn update_content(
        &self,
        user: &UserId,
        id: ContentId,
        generated_content: &str,
    ) -> Result<ContentRecord, RepositoryError> {
        let request = self
            .returning(Method::PATCH)
            .query(&[("id", eq_filter(id)), ("user_id", eq_filter(user))])
            .json(&ContentPatch { generated_content });
        let record = self
            .rows(request)
            .await?
            .into_iter()
            .next()
            .ok_or(RepositoryError::NotFound(id))?;
        self.notify(ChangeKind::Updated, id, user);
        Ok(record)
    }

    async fn delete(&self, user: &UserId, id: ContentId) -> Result<(), RepositoryError> {
        let request = self
            .returning(Method::DELETE)
            .query(&[("id", eq_filter(id)), ("user_id", eq_filter(user))]);
        if self.rows(request).await?.is_empty() {
            return Err(RepositoryError::NotFound(id));
        }
        self.notify(ChangeKind::Deleted, id, user);
        Ok(())
    }

    fn subscribe(&self, user: &UserId) -> ChangeStream {
        user_change_stream(self.changes.subscribe(), user.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_http::{CannedResponse, TestServer};
    use chrono::Utc;
    use forge_domain::Prompt;

    const ROW: &str = r#"[{"id":12,"created_at":"2024-02-03T04:05:06+00:00","prompt":"p","generated_content":"c","user_id":"u-1"}]"#;

    fn user() -> UserId {
        UserId::new("u-1").unwrap()
    }

    fn repo(server: &TestServer) -> PostgrestContentRepository {
        PostgrestContentRepository::new(&format!("{}/", server.base_url), "anon-key", "content")
            .unwrap()
    }

    #[tokio::test]
    async fn test_list_sends_filters_and_auth() {
        let server =
            TestServer::start(vec![CannedResponse::new(200, Some("application/json"), ROW)]).await;

        let records = repo(&server).list_for_user(&user()).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, ContentId(12));
        assert_eq!(records[0].generated_content, "c");

        let request = &server.requests()[0];
        assert_eq!(request.method, "GET");
        assert_eq!(
            request.target,
            "/rest/v1/content?select=*&user_id=eq.u-1&order=created_at.desc"
        );
        assert_eq!(request.header("apikey"), Some("anon-key"));
        assert_eq!(request.header("authorization"), Some("Bearer anon-key"));
    }

    #[tokio::test]
    async fn test_insert_posts_row_array() {
        let server =
            TestServer::start(vec![CannedResponse::new(201, Some("application/json"), ROW)]).await;

        let content = NewContent::new(&Prompt::new("p").unwrap(), "c", user(), Utc::now());
        let record = repo(&server).insert(content).await.unwrap();
        assert_eq!(record.id, ContentId(12));

        let request = &server.requests()[0];
        assert_eq!(request.method, "POST");
        assert_eq!(request.header("prefer"), Some("return=representation"));
        let body: serde_json::Value = serde_json::from_str(&request.body).unwrap();
        assert_eq!(body[0]["prompt"], "p");
        assert_eq!(body[0]["user_id"], "u-1");
    }

    #[tokio::test]
    async fn test_update_with_no_rows_is_not_found() {
        let server =
            TestServer::start(vec![CannedResponse::new(200, Some("application/json"), "[]")]).await;

        let err = repo(&server)
            .update_content(&user(), ContentId(99), "x")
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound(ContentId(99))));

        let request = &server.requests()[0];
        assert_eq!(request.method, "PATCH");
        assert_eq!(request.target, "/rest/v1/content?id=eq.99&user_id=eq.u-1");
        assert_eq!(request.body, r#"{"generated_content":"x"}"#);
    }

    #[tokio::test]
    async fn test_backend_error_status() {
        let server = TestServer::start(vec![CannedResponse::new(
            401,
            Some("application/json"),
            r#"{"message":"JWT expired"}"#,
        )])
        .await;

        let err = repo(&server).delete(&user(), ContentId(1)).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Backend(ref m) if m.starts_with("401")));
    }
}
