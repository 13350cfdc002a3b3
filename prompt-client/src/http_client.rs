use crate::config::BackendConfig;
use crate::error::PromptClientError;
use prompt_shared::rest::{
    like_filter, liked_ids_query, prompt_query, rpc_path, table_path, LIKES_TABLE, LOGOUT_PATH,
    PROMPTS_TABLE, TOKEN_PATH, USER_PATH,
};
use prompt_shared::{
    AuthSession, BackendErrorBody, Like, LikedPrompt, PasswordCredentials, Prompt,
    RefreshTokenArgs, SessionUser,
};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    anon_key: String,
    token: Option<String>,
}

impl HttpClient {
    pub fn new(config: BackendConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .connect_timeout(Duration::from_secs(5))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: config.url,
            anon_key: config.anon_key,
            token: None,
        }
    }

    pub fn set_token(&mut self, token: String) {
        self.token = Some(token);
    }

    pub fn clear_token(&mut self) {
        self.token = None;
    }

    // Без сессии запросы идут от имени анонимного ключа.
    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let bearer = self.token.as_deref().unwrap_or(&self.anon_key);
        request.header("apikey", &self.anon_key).bearer_auth(bearer)
    }

    fn authorize_anonymously(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
    }

    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    pub async fn select_prompts(
        &self,
        owner: Option<&str>,
    ) -> Result<Vec<Prompt>, PromptClientError> {
        let url = self.url(&table_path(PROMPTS_TABLE));
        tracing::debug!("Selecting prompts (owner: {:?})", owner);

        let response = self
            .authorize(self.client.get(&url))
            .query(&prompt_query(owner))
            .send()
            .await?;

        self.handle_json(response).await
    }

    /// Every prompt, requested under the anon key even when a token is set.
    pub async fn select_public_prompts(&self) -> Result<Vec<Prompt>, PromptClientError> {
        let url = self.url(&table_path(PROMPTS_TABLE));
        tracing::debug!("Selecting prompts anonymously");

        let response = self
            .authorize_anonymously(self.client.get(&url))
            .query(&prompt_query(None))
            .send()
            .await?;

        self.handle_json(response).await
    }

    pub async fn select_liked_prompt_ids(
        &self,
        user_id: &str,
    ) -> Result<Vec<String>, PromptClientError> {
        let url = self.url(&table_path(LIKES_TABLE));
        let response = self
            .authorize(self.client.get(&url))
            .query(&liked_ids_query(user_id))
            .send()
            .await?;

        let rows: Vec<LikedPrompt> = self.handle_json(response).await?;
        Ok(rows.into_iter().map(|row| row.prompt_id).collect())
    }

    pub async fn insert_like(&self, like: &Like) -> Result<(), PromptClientError> {
        let url = self.url(&table_path(LIKES_TABLE));
        tracing::debug!("Inserting like {} -> {}", like.user_id, like.prompt_id);

        let response = self
            .authorize(self.client.post(&url))
            .header("Prefer", "return=minimal")
            .json(&[like])
            .send()
            .await?;

        self.handle_empty(response).await
    }

    pub async fn delete_like(&self, like: &Like) -> Result<(), PromptClientError> {
        let url = self.url(&table_path(LIKES_TABLE));
        tracing::debug!("Deleting like {} -> {}", like.user_id, like.prompt_id);

        let response = self
            .authorize(self.client.delete(&url))
            .query(&like_filter(like))
            .send()
            .await?;

        self.handle_empty(response).await
    }

    pub async fn rpc<A: Serialize + ?Sized>(
        &self,
        function: &str,
        args: &A,
    ) -> Result<(), PromptClientError> {
        let url = self.url(&rpc_path(function));
        tracing::debug!("Calling remote procedure {}", function);

        let response = self
            .authorize(self.client.post(&url))
            .json(args)
            .send()
            .await?;

        self.handle_empty(response).await
    }

    pub async fn get_user(&self) -> Result<SessionUser, PromptClientError> {
        if self.token.is_none() {
            return Err(PromptClientError::Unauthorized("no active session".into()));
        }

        let url = self.url(USER_PATH);
        let response = self.authorize(self.client.get(&url)).send().await?;
        self.handle_json(response).await
    }

    pub async fn sign_in_with_password(
        &mut self,
        credentials: &PasswordCredentials,
    ) -> Result<AuthSession, PromptClientError> {
        let url = self.url(TOKEN_PATH);
        let response = self
            .client
            .post(&url)
            .header("apikey", &self.anon_key)
            .query(&[("grant_type", "password")])
            .json(credentials)
            .send()
            .await?;

        let session: AuthSession = self.handle_json(response).await?;
        self.set_token(session.access_token.clone());
        Ok(session)
    }

    /// Trades a refresh token for a new session and switches to its token.
    pub async fn refresh_session(
        &mut self,
        refresh_token: &str,
    ) -> Result<AuthSession, PromptClientError> {
        let url = self.url(TOKEN_PATH);
        let args = RefreshTokenArgs {
            refresh_token: refresh_token.to_string(),
        };
        let response = self
            .client
            .post(&url)
            .header("apikey", &self.anon_key)
            .query(&[("grant_type", "refresh_token")])
            .json(&args)
            .send()
            .await?;

        let session: AuthSession = self.handle_json(response).await?;
        self.set_token(session.access_token.clone());
        Ok(session)
    }

    pub async fn sign_out(&mut self) -> Result<(), PromptClientError> {
        if self.token.is_none() {
            return Ok(());
        }

        let url = self.url(LOGOUT_PATH);
        let response = self.authorize(self.client.post(&url)).send().await?;
        self.clear_token();
        self.handle_empty(response).await
    }

    async fn handle_json<T: DeserializeOwned>(
        &self,
        response: Response,
    ) -> Result<T, PromptClientError> {
        let status = response.status();
        if status.is_success() {
            let text = response.text().await?;
            return Ok(serde_json::from_str(&text)?);
        }

        Err(Self::error_for(status, response).await)
    }

    async fn handle_empty(&self, response: Response) -> Result<(), PromptClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        Err(Self::error_for(status, response).await)
    }

    async fn error_for(status: StatusCode, response: Response) -> PromptClientError {
        let error_text = match response.text().await {
            Ok(text) => BackendErrorBody::describe_raw(&text),
            Err(e) => return PromptClientError::HttpError(e),
        };

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                PromptClientError::Unauthorized(error_text)
            }
            StatusCode::NOT_FOUND => PromptClientError::NotFound,
            StatusCode::BAD_REQUEST | StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY => {
                PromptClientError::InvalidRequest(error_text)
            }
            _ => PromptClientError::TransportError(format!("HTTP {}: {}", status, error_text)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prompt_shared::BackendError;

    fn client(url: &str) -> HttpClient {
        HttpClient::new(BackendConfig::new(url, "anon"))
    }

    #[test]
    fn url_joins_without_double_slashes() {
        let http = client("https://abc.supabase.co/");
        assert_eq!(
            http.url("/rest/v1/prompts"),
            "https://abc.supabase.co/rest/v1/prompts"
        );
        assert_eq!(
            http.url(&rpc_path("increment_likes")),
            "https://abc.supabase.co/rest/v1/rpc/increment_likes"
        );
    }

    #[tokio::test]
    async fn get_user_without_token_fails_before_any_request() {
        // Порт 9 никто не слушает: ошибка должна прийти до сети.
        let http = client("http://127.0.0.1:9");
        let err = http.get_user().await.unwrap_err();
        assert!(err.is_unauthorized());
    }

    #[tokio::test]
    async fn failed_refresh_keeps_current_token() {
        let mut http = client("http://127.0.0.1:9");
        http.set_token("old".to_string());

        assert!(http.refresh_session("refresh").await.is_err());
        assert_eq!(http.token.as_deref(), Some("old"));
    }

    #[tokio::test]
    async fn sign_out_without_token_is_noop() {
        let mut http = client("http://127.0.0.1:9");
        assert!(http.sign_out().await.is_ok());
        assert!(http.token.is_none());
    }
}
