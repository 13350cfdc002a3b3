pub mod config;
pub mod error;
pub mod http_client;

use async_trait::async_trait;
use error::PromptClientError;
use prompt_shared::rest::{DECREMENT_LIKES, INCREMENT_LIKES};
use prompt_shared::{AuthSession, Like, PasswordCredentials, Prompt, RowIdArgs, SessionUser};
use std::sync::Arc;
use tokio::sync::Mutex;

pub use config::BackendConfig;
pub use prompt_shared;
pub use prompt_shared::{BackendError, PromptBackend};

/// Clonable handle over the hosted backend. Clones share the HTTP client and
/// the session token it carries.
#[derive(Debug, Clone)]
pub struct PromptClient {
    http_client: Arc<Mutex<http_client::HttpClient>>,
    base_url: String,
}

impl PromptClient {
    pub fn new(config: BackendConfig) -> Self {
        let base_url = config.url.clone();
        Self {
            http_client: Arc::new(Mutex::new(http_client::HttpClient::new(config))),
            base_url,
        }
    }

    /// Set the access token for authenticated requests
    pub async fn set_token(&self, token: String) {
        let mut http = self.http_client.lock().await;
        http.set_token(token);
    }

    /// Forget the current access token without contacting the backend
    pub async fn clear_token(&self) {
        let mut http = self.http_client.lock().await;
        http.clear_token();
    }

    /// Sign in with email and password
    pub async fn login(
        &self,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<AuthSession, PromptClientError> {
        let credentials = PasswordCredentials {
            email: email.into(),
            password: password.into(),
        };

        tracing::debug!("Login called for email: {}", credentials.email);

        let mut http = self.http_client.lock().await;
        let session = http.sign_in_with_password(&credentials).await?;
        tracing::info!("Signed in as user {}", session.user.id);

        Ok(session)
    }

    /// Exchange a refresh token for a fresh session and use its access token
    pub async fn refresh(&self, refresh_token: &str) -> Result<AuthSession, PromptClientError> {
        let mut http = self.http_client.lock().await;
        let session = http.refresh_session(refresh_token).await?;
        tracing::info!("Session refreshed for user {}", session.user.id);

        Ok(session)
    }

    /// Revoke the session on the backend and forget the token
    pub async fn logout(&self) -> Result<(), PromptClientError> {
        let result = {
            let mut http = self.http_client.lock().await;
            http.sign_out().await
        };

        self.clear_token().await;
        result
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait(?Send)]
impl PromptBackend for PromptClient {
    type Error = PromptClientError;

    async fn current_user(&self) -> Result<SessionUser, PromptClientError> {
        let http = self.http_client.lock().await;
        http.get_user().await
    }

    async fn list_prompts(&self) -> Result<Vec<Prompt>, PromptClientError> {
        let http = self.http_client.lock().await;
        http.select_prompts(None).await
    }

    async fn list_public_prompts(&self) -> Result<Vec<Prompt>, PromptClientError> {
        let http = self.http_client.lock().await;
        http.select_public_prompts().await
    }

    async fn list_user_prompts(&self, user_id: &str) -> Result<Vec<Prompt>, PromptClientError> {
        let http = self.http_client.lock().await;
        http.select_prompts(Some(user_id)).await
    }

    async fn liked_prompt_ids(&self, user_id: &str) -> Result<Vec<String>, PromptClientError> {
        let http = self.http_client.lock().await;
        http.select_liked_prompt_ids(user_id).await
    }

    async fn insert_like(&self, like: &Like) -> Result<(), PromptClientError> {
        let http = self.http_client.lock().await;
        http.insert_like(like).await
    }

    async fn delete_like(&self, like: &Like) -> Result<(), PromptClientError> {
        let http = self.http_client.lock().await;
        http.delete_like(like).await
    }

    async fn increment_likes(&self, prompt_id: &str) -> Result<(), PromptClientError> {
        let http = self.http_client.lock().await;
        let args = RowIdArgs {
            row_id: prompt_id.to_string(),
        };
        http.rpc(INCREMENT_LIKES, &args).await
    }

    async fn decrement_likes(&self, prompt_id: &str) -> Result<(), PromptClientError> {
        let http = self.http_client.lock().await;
        let args = RowIdArgs {
            row_id: prompt_id.to_string(),
        };
        http.rpc(DECREMENT_LIKES, &args).await
    }
}
