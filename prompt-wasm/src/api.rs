use async_trait::async_trait;
use gloo_net::http::{Request, RequestBuilder, Response};
use gloo_storage::{LocalStorage, Storage};
use prompt_shared::rest::{
    like_filter, liked_ids_query, prompt_query, rpc_path, table_path, DECREMENT_LIKES,
    INCREMENT_LIKES, LIKES_TABLE, LOGOUT_PATH, PROMPTS_TABLE, TOKEN_PATH, USER_PATH,
};
use prompt_shared::{
    AuthSession, BackendError, BackendErrorBody, Like, LikedPrompt, PasswordCredentials, Prompt,
    PromptBackend, RowIdArgs, SessionUser,
};
use serde::de::DeserializeOwned;
use thiserror::Error;

const SUPABASE_URL: &str = match option_env!("SUPABASE_URL") {
    Some(url) => url,
    None => "http://localhost:54321",
};
const SUPABASE_ANON_KEY: &str = match option_env!("SUPABASE_ANON_KEY") {
    Some(key) => key,
    None => "",
};
const TOKEN_KEY: &str = "prompt_access_token";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(#[from] gloo_net::Error),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },
}

impl BackendError for ApiError {
    fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiClient {
    base_url: String,
    anon_key: String,
}

impl ApiClient {
    pub fn new() -> Self {
        Self {
            base_url: SUPABASE_URL.trim_end_matches('/').to_string(),
            anon_key: SUPABASE_ANON_KEY.to_string(),
        }
    }

    pub fn save_token(token: &str) {
        if let Err(e) = LocalStorage::set(TOKEN_KEY, token) {
            log::error!("Failed to save token: {:?}", e);
        }
    }

    pub fn get_token() -> Option<String> {
        LocalStorage::get(TOKEN_KEY).ok()
    }

    pub fn clear_token() {
        LocalStorage::delete(TOKEN_KEY);
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    // Без сохранённой сессии запрос идёт под анонимным ключом.
    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        let bearer = Self::get_token().unwrap_or_else(|| self.anon_key.clone());
        self.with_bearer(builder, &bearer)
    }

    fn with_bearer(&self, builder: RequestBuilder, bearer: &str) -> RequestBuilder {
        builder
            .header("apikey", &self.anon_key)
            .header("Authorization", &format!("Bearer {}", bearer))
    }

    async fn check(response: Response) -> Result<Response, ApiError> {
        if response.ok() {
            return Ok(response);
        }

        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        let message = BackendErrorBody::describe_raw(&text);

        match status {
            401 | 403 => Err(ApiError::Unauthorized(message)),
            _ => Err(ApiError::Status { status, message }),
        }
    }

    async fn fetch_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        let response = Self::check(builder.send().await?).await?;
        Ok(response.json::<T>().await?)
    }

    async fn rpc(&self, function: &str, prompt_id: &str) -> Result<(), ApiError> {
        let args = RowIdArgs {
            row_id: prompt_id.to_string(),
        };
        let request = self
            .authorize(Request::post(&self.url(&rpc_path(function))))
            .json(&args)?;

        Self::check(request.send().await?).await?;
        Ok(())
    }

    pub async fn sign_in(&self, credentials: &PasswordCredentials) -> Result<AuthSession, ApiError> {
        let request = Request::post(&self.url(TOKEN_PATH))
            .query([("grant_type", "password")])
            .header("apikey", &self.anon_key)
            .json(credentials)?;

        let response = Self::check(request.send().await?).await?;
        let session = response.json::<AuthSession>().await?;
        Self::save_token(&session.access_token);
        Ok(session)
    }

    pub async fn sign_out(&self) -> Result<(), ApiError> {
        let result = match Self::get_token() {
            Some(_) => {
                let builder = self.authorize(Request::post(&self.url(LOGOUT_PATH)));
                match builder.send().await {
                    Ok(response) => Self::check(response).await.map(|_| ()),
                    Err(e) => Err(e.into()),
                }
            }
            None => Ok(()),
        };

        Self::clear_token();
        result
    }
}

#[async_trait(?Send)]
impl PromptBackend for ApiClient {
    type Error = ApiError;

    async fn current_user(&self) -> Result<SessionUser, ApiError> {
        if Self::get_token().is_none() {
            return Err(ApiError::Unauthorized("no active session".to_string()));
        }

        self.fetch_json(self.authorize(Request::get(&self.url(USER_PATH))))
            .await
    }

    async fn list_prompts(&self) -> Result<Vec<Prompt>, ApiError> {
        let builder = Request::get(&self.url(&table_path(PROMPTS_TABLE))).query(prompt_query(None));
        self.fetch_json(self.authorize(builder)).await
    }

    async fn list_public_prompts(&self) -> Result<Vec<Prompt>, ApiError> {
        let builder = Request::get(&self.url(&table_path(PROMPTS_TABLE))).query(prompt_query(None));
        self.fetch_json(self.with_bearer(builder, &self.anon_key)).await
    }

    async fn list_user_prompts(&self, user_id: &str) -> Result<Vec<Prompt>, ApiError> {
        let builder =
            Request::get(&self.url(&table_path(PROMPTS_TABLE))).query(prompt_query(Some(user_id)));
        self.fetch_json(self.authorize(builder)).await
    }

    async fn liked_prompt_ids(&self, user_id: &str) -> Result<Vec<String>, ApiError> {
        let builder =
            Request::get(&self.url(&table_path(LIKES_TABLE))).query(liked_ids_query(user_id));
        let rows: Vec<LikedPrompt> = self.fetch_json(self.authorize(builder)).await?;
        Ok(rows.into_iter().map(|row| row.prompt_id).collect())
    }

    async fn insert_like(&self, like: &Like) -> Result<(), ApiError> {
        let request = self
            .authorize(Request::post(&self.url(&table_path(LIKES_TABLE))))
            .header("Prefer", "return=minimal")
            .json(&[like])?;

        Self::check(request.send().await?).await?;
        Ok(())
    }

    async fn delete_like(&self, like: &Like) -> Result<(), ApiError> {
        let builder = self
            .authorize(Request::delete(&self.url(&table_path(LIKES_TABLE))))
            .query(like_filter(like));

        Self::check(builder.send().await?).await?;
        Ok(())
    }

    async fn increment_likes(&self, prompt_id: &str) -> Result<(), ApiError> {
        self.rpc(INCREMENT_LIKES, prompt_id).await
    }

    async fn decrement_likes(&self, prompt_id: &str) -> Result<(), ApiError> {
        self.rpc(DECREMENT_LIKES, prompt_id).await
    }
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new()
    }
}
