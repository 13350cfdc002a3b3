use crate::{Like, Prompt, SessionUser};
use async_trait::async_trait;
use std::fmt::Display;

/// What the screen flows need to know about a failed backend call.
pub trait BackendError: Display {
    /// The backend rejected the credentials the request carried.
    fn is_unauthorized(&self) -> bool;
}

/// Backend operations the feed and profile screens consume.
///
/// Futures are not required to be `Send`, so the browser client (whose
/// futures are tied to the JS event loop) implements the same trait as the
/// native one.
#[async_trait(?Send)]
pub trait PromptBackend {
    type Error: BackendError;

    /// User behind the current session. Fails when there is none.
    async fn current_user(&self) -> Result<SessionUser, Self::Error>;

    /// Every prompt, newest first, sent with the session token when one is set.
    async fn list_prompts(&self) -> Result<Vec<Prompt>, Self::Error>;

    /// Every prompt, newest first, sent with the public key only.
    async fn list_public_prompts(&self) -> Result<Vec<Prompt>, Self::Error>;

    /// Prompts owned by `user_id`, newest first.
    async fn list_user_prompts(&self, user_id: &str) -> Result<Vec<Prompt>, Self::Error>;

    async fn liked_prompt_ids(&self, user_id: &str) -> Result<Vec<String>, Self::Error>;

    async fn insert_like(&self, like: &Like) -> Result<(), Self::Error>;

    async fn delete_like(&self, like: &Like) -> Result<(), Self::Error>;

    async fn increment_likes(&self, prompt_id: &str) -> Result<(), Self::Error>;

    async fn decrement_likes(&self, prompt_id: &str) -> Result<(), Self::Error>;
}
