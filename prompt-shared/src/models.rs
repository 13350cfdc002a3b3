use serde::{Deserialize, Deserializer, Serialize};

// ==================== Модели промптов ====================

/// A row of the prompts table. Columns added after a row was written come
/// back as `null`, so the optional text and counter columns accept both a
/// missing key and an explicit null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prompt {
    pub id: String,
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: String,
    pub user_id: String,
    pub created_at: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub views: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub likes: i64,
    #[serde(default)]
    pub image_url: Option<String>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ==================== Модели лайков ====================

/// A (user, prompt) favourite marker. Used both as the insert body and as the
/// equality filter when the like is removed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Like {
    pub user_id: String,
    pub prompt_id: String,
}

impl Like {
    pub fn new(user_id: impl Into<String>, prompt_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            prompt_id: prompt_id.into(),
        }
    }
}

/// Row shape of `select=prompt_id` on the likes table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LikedPrompt {
    pub prompt_id: String,
}

/// Argument object of the `increment_likes` / `decrement_likes` procedures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowIdArgs {
    pub row_id: String,
}

// ==================== Модели сессии ====================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Session returned by the password and refresh grants. It is also the shape
/// the CLI keeps on disk between runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
    /// Unix seconds after which the access token is rejected.
    #[serde(default)]
    pub expires_at: Option<i64>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub user: SessionUser,
}

impl AuthSession {
    /// Fills `expires_at` from `expires_in` when the backend sent only the
    /// relative lifetime.
    pub fn stamp_expiry(&mut self, now: i64) {
        if self.expires_at.is_none() {
            self.expires_at = self.expires_in.map(|secs| now + secs);
        }
    }

    /// Whether the access token expires within `leeway` seconds of `now`.
    /// A session without a known expiry never counts as expiring.
    pub fn expires_within(&self, now: i64, leeway: i64) -> bool {
        self.expires_at.is_some_and(|at| at - leeway <= now)
    }
}

/// Body of the refresh grant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshTokenArgs {
    pub refresh_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordCredentials {
    pub email: String,
    pub password: String,
}

// ==================== Общие ошибки ====================

/// Error payload of the backend. The REST layer answers with `message`, the
/// auth layer with `msg` or `error_description`, older deployments with
/// `error`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BackendErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default)]
    pub error_description: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl BackendErrorBody {
    pub fn describe(&self) -> Option<&str> {
        self.message
            .as_deref()
            .or(self.msg.as_deref())
            .or(self.error_description.as_deref())
            .or(self.error.as_deref())
    }

    /// Best-effort readable message for a non-2xx response body.
    pub fn describe_raw(body: &str) -> String {
        serde_json::from_str::<BackendErrorBody>(body)
            .ok()
            .and_then(|err| err.describe().map(str::to_owned))
            .unwrap_or_else(|| body.to_string())
    }
}
