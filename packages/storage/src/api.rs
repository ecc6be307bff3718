// ABOUTME: Remote REST API storage for task collections
// ABOUTME: GET/PUT/DELETE against a single /tasks resource with optional bearer auth

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use std::time::Duration;
use taskforge_config::DEFAULT_HTTP_TIMEOUT_SECS;
use taskforge_core::Task;
use tracing::{debug, warn};

use crate::{StorageError, StorageResult, TaskStorage};

/// REST client storing the whole collection at `{base_url}/tasks`.
///
/// No retries and no pagination; a failed request surfaces immediately.
#[derive(Clone)]
pub struct ApiStorage {
    http_client: Client,
    tasks_url: String,
    token: Option<String>,
}

impl ApiStorage {
    pub fn new(base_url: &str, token: Option<String>) -> StorageResult<Self> {
        Self::with_timeout(
            base_url,
            token,
            Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        )
    }

    pub fn with_timeout(
        base_url: &str,
        token: Option<String>,
        timeout: Duration,
    ) -> StorageResult<Self> {
        let base_url = base_url.trim().trim_end_matches('/');
        if base_url.is_empty() {
            return Err(StorageError::Configuration(
                "API base URL cannot be empty".to_string(),
            ));
        }

        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StorageError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            tasks_url: format!("{}/tasks", base_url),
            token: token.filter(|token| !token.is_empty()),
        })
    }

    pub fn tasks_url(&self) -> &str {
        &self.tasks_url
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn http_error(&self, response: Response) -> StorageError {
        let status = response.status();
        let message = response
            .text()
            .await
            .ok()
            .filter(|body| !body.is_empty())
            .unwrap_or_else(|| status.to_string());
        warn!("Task API returned {} for {}", status, self.tasks_url);

        StorageError::Http {
            status: status.as_u16(),
            url: self.tasks_url.clone(),
            message,
        }
    }
}

#[async_trait]
impl TaskStorage for ApiStorage {
    async fn load(&self) -> StorageResult<Vec<Task>> {
        debug!("Fetching tasks from {}", self.tasks_url);
        let response = self
            .authorize(self.http_client.get(&self.tasks_url))
            .send()
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND => {
                debug!("Task collection not found at {}", self.tasks_url);
                Ok(Vec::new())
            }
            status if status.is_success() => {
                let tasks = response
                    .json::<Vec<Task>>()
                    .await
                    .map_err(|e| StorageError::Backend(format!("Invalid task payload: {}", e)))?;
                debug!("Fetched {} tasks", tasks.len());
                Ok(tasks)
            }
            _ => Err(self.http_error(response).await),
        }
    }

    async fn save(&self, tasks: &[Task]) -> StorageResult<()> {
        debug!("Uploading {} tasks to {}", tasks.len(), self.tasks_url);
        let response = self
            .authorize(self.http_client.put(&self.tasks_url))
            .json(tasks)
            .send()
            .await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(self.http_error(response).await)
        }
    }

    async fn clear(&self) -> StorageResult<()> {
        let response = self
            .authorize(self.http_client.delete(&self.tasks_url))
            .send()
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(()),
            status if status.is_success() => Ok(()),
            _ => Err(self.http_error(response).await),
        }
    }

    fn name(&self) -> &'static str {
        "api"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tasks_url_strips_trailing_slash() {
        let storage = ApiStorage::new("https://example.com/api/", None).unwrap();
        assert_eq!(storage.tasks_url(), "https://example.com/api/tasks");
    }

    #[test]
    fn test_empty_base_url_is_rejected() {
        let err = ApiStorage::new("  ", None).err().unwrap();
        assert!(matches!(err, StorageError::Configuration(_)));
    }

    #[test]
    fn test_blank_token_is_ignored() {
        let storage = ApiStorage::new("https://example.com", Some(String::new())).unwrap();
        assert!(storage.token.is_none());
    }
}
