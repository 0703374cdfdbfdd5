use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::services::cache::{CacheKey, CacheManager};
use crate::services::collaborators::{NotificationDispatcher, NotificationError, ProfileDirectory, ProfileError};

/// Errors that can occur when interacting with Appwrite
#[derive(Debug, Error)]
pub enum AppwriteError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: invalid API key or token")]
    Unauthorized,

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

impl From<AppwriteError> for ProfileError {
    fn from(e: AppwriteError) -> Self {
        match e {
            AppwriteError::NotFound(msg) => ProfileError::NotFound(msg),
            other => ProfileError::Unavailable(other.to_string()),
        }
    }
}

impl From<AppwriteError> for NotificationError {
    fn from(e: AppwriteError) -> Self {
        match e {
            AppwriteError::RequestError(e) => NotificationError::Request(e.to_string()),
            other => NotificationError::Rejected(other.to_string()),
        }
    }
}

/// Appwrite API client
///
/// Used for two things only:
/// - Looking up a user's display name from the profiles collection
/// - Executing the push-notification function when a match is created
pub struct AppwriteClient {
    base_url: String,
    api_key: String,
    project_id: String,
    database_id: String,
    client: Client,
    collections: AppwriteCollections,
}

/// Collection IDs in Appwrite
#[derive(Debug, Clone)]
pub struct AppwriteCollections {
    pub user_profiles: String,
}

impl AppwriteClient {
    /// Create a new Appwrite client
    pub fn new(
        base_url: String,
        api_key: String,
        project_id: String,
        database_id: String,
        collections: AppwriteCollections,
        timeout: Duration,
    ) -> Result<Self, AppwriteError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url,
            api_key,
            project_id,
            database_id,
            client,
            collections,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    /// Fetch the `name` attribute of a user's profile document
    pub async fn get_display_name(&self, user_id: &str) -> Result<String, AppwriteError> {
        let query = json!({
            "method": "equal",
            "attribute": "userId",
            "values": [user_id],
        })
        .to_string();

        let url = format!(
            "{}?queries[]={}",
            self.url(&format!(
                "/databases/{}/collections/{}/documents",
                self.database_id, self.collections.user_profiles
            )),
            urlencoding::encode(&query)
        );

        tracing::debug!("Fetching display name for user: {}", user_id);

        let response = self
            .client
            .get(&url)
            .header("X-Appwrite-Key", &self.api_key)
            .header("X-Appwrite-Project", &self.project_id)
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(AppwriteError::Unauthorized);
        }
        if !status.is_success() {
            return Err(AppwriteError::ApiError(format!(
                "Failed to fetch profile: {}",
                status
            )));
        }

        let json: Value = response.json().await?;

        let documents = json
            .get("documents")
            .and_then(|d| d.as_array())
            .ok_or_else(|| AppwriteError::InvalidResponse("Missing documents array".into()))?;

        let doc = documents
            .first()
            .ok_or_else(|| AppwriteError::NotFound(format!("Profile not found for user {}", user_id)))?;

        let data = doc.get("data").unwrap_or(doc);

        data.get("name")
            .and_then(|n| n.as_str())
            .filter(|n| !n.trim().is_empty())
            .map(str::to_string)
            .ok_or_else(|| AppwriteError::InvalidResponse(format!("Profile {} has no name", user_id)))
    }

    /// Queue an asynchronous execution of an Appwrite function
    pub async fn execute_function(&self, function_id: &str, body: &Value) -> Result<(), AppwriteError> {
        let url = self.url(&format!("/functions/{}/executions", function_id));

        let payload = json!({
            "body": body.to_string(),
            "async": true,
        });

        let response = self
            .client
            .post(&url)
            .header("X-Appwrite-Key", &self.api_key)
            .header("X-Appwrite-Project", &self.project_id)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(AppwriteError::Unauthorized);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|_| "Unable to read body".to_string());
            return Err(AppwriteError::ApiError(format!(
                "Failed to execute function {}: {} - {}",
                function_id, status, body
            )));
        }

        Ok(())
    }
}

#[async_trait]
impl ProfileDirectory for AppwriteClient {
    async fn display_name(&self, user_id: &str) -> Result<String, ProfileError> {
        Ok(self.get_display_name(user_id).await?)
    }
}

/// Sends match notifications through an Appwrite function
pub struct AppwriteNotifier {
    appwrite: Arc<AppwriteClient>,
    function_id: String,
}

impl AppwriteNotifier {
    pub fn new(appwrite: Arc<AppwriteClient>, function_id: String) -> Self {
        Self {
            appwrite,
            function_id,
        }
    }
}

#[async_trait]
impl NotificationDispatcher for AppwriteNotifier {
    async fn notify_match(
        &self,
        recipient_user_id: &str,
        other_user_display_name: &str,
    ) -> Result<(), NotificationError> {
        let body = json!({
            "type": "match",
            "recipientUserId": recipient_user_id,
            "title": "It's a match!",
            "message": format!("You and {} liked each other", other_user_display_name),
        });

        self.appwrite.execute_function(&self.function_id, &body).await?;
        Ok(())
    }
}

/// Display name lookups served from the two-tier cache when possible
pub struct CachedProfileDirectory {
    appwrite: Arc<AppwriteClient>,
    cache: Arc<CacheManager>,
}

impl CachedProfileDirectory {
    pub fn new(appwrite: Arc<AppwriteClient>, cache: Arc<CacheManager>) -> Self {
        Self { appwrite, cache }
    }
}

#[async_trait]
impl ProfileDirectory for CachedProfileDirectory {
    async fn display_name(&self, user_id: &str) -> Result<String, ProfileError> {
        let key = CacheKey::display_name(user_id);
        if let Ok(name) = self.cache.get::<String>(&key).await {
            return Ok(name);
        }

        let name = self.appwrite.get_display_name(user_id).await?;

        if let Err(e) = self.cache.set(&key, &name).await {
            tracing::warn!("Failed to cache display name for {}: {}", user_id, e);
        }

        Ok(name)
    }
}
