//! Screen flows over a [`PromptBackend`]. Both front ends run these, so the
//! order of remote calls is the same in the terminal and in the browser.

use crate::backend::{BackendError, PromptBackend};
use crate::{FeedState, Like, LikeToggle, ProfileState, Prompt};

/// Outcome of opening the profile screen.
#[derive(Debug, Clone, PartialEq)]
pub enum ProfileLoad {
    /// No usable session; the caller navigates to the login screen.
    RedirectToLogin,
    Ready(ProfileState),
}

/// Fetches the feed list. A stored session that the backend no longer
/// accepts does not blank the feed: the list is requested again with the
/// public key. Any other failure yields an empty list.
pub async fn fetch_feed<B>(backend: &B) -> Vec<Prompt>
where
    B: PromptBackend + ?Sized,
{
    let prompts = match backend.list_prompts().await {
        Err(e) if e.is_unauthorized() => {
            log::info!("Session rejected for feed, retrying anonymously: {}", e);
            backend.list_public_prompts().await
        }
        other => other,
    };

    match prompts {
        Ok(prompts) => {
            log::debug!("Feed loaded with {} prompts", prompts.len());
            prompts
        }
        Err(e) => {
            log::warn!("Failed to load feed: {}", e);
            Vec::new()
        }
    }
}

/// Loads the public feed once, with no search and every category.
pub async fn load_feed<B>(backend: &B) -> FeedState
where
    B: PromptBackend + ?Sized,
{
    FeedState::new(fetch_feed(backend).await)
}

/// Resolves the session, then fetches the user's prompts and liked ids.
///
/// Nothing but the session lookup is issued for an anonymous visitor. Each
/// record fetch that fails leaves its part of the state empty.
pub async fn load_profile<B>(backend: &B) -> ProfileLoad
where
    B: PromptBackend + ?Sized,
{
    let user = match backend.current_user().await {
        Ok(user) => user,
        Err(e) => {
            log::info!("No session for profile, redirecting to login: {}", e);
            return ProfileLoad::RedirectToLogin;
        }
    };

    let prompts = backend
        .list_user_prompts(&user.id)
        .await
        .unwrap_or_else(|e| {
            log::warn!("Failed to load prompts of {}: {}", user.id, e);
            Vec::new()
        });

    let liked = backend
        .liked_prompt_ids(&user.id)
        .await
        .unwrap_or_else(|e| {
            log::warn!("Failed to load likes of {}: {}", user.id, e);
            Vec::new()
        });

    ProfileLoad::Ready(
        ProfileState::new(user)
            .with_prompts(prompts)
            .with_liked(liked),
    )
}

/// Sends one toggle to the backend: the like record mutation, then the
/// counter procedure, each awaited. Failures are logged, never retried.
pub async fn send_toggle<B>(backend: &B, like: &Like, toggle: LikeToggle)
where
    B: PromptBackend + ?Sized,
{
    let (record, counter) = match toggle {
        LikeToggle::Unlike => (
            backend.delete_like(like).await,
            backend.decrement_likes(&like.prompt_id).await,
        ),
        LikeToggle::Like => (
            backend.insert_like(like).await,
            backend.increment_likes(&like.prompt_id).await,
        ),
    };

    if let Err(e) = record {
        log::warn!("Like record update for {} failed: {}", like.prompt_id, e);
    }
    if let Err(e) = counter {
        log::warn!("Like counter update for {} failed: {}", like.prompt_id, e);
    }
}

/// Flips the like on `prompt_id` for the profile's user.
///
/// Local state is updated after both remote calls return, whatever their
/// outcome, so local and backend state may drift.
pub async fn toggle_like<B>(backend: &B, state: &mut ProfileState, prompt_id: &str) -> LikeToggle
where
    B: PromptBackend + ?Sized,
{
    let toggle = state.next_toggle(prompt_id);
    let like = Like::new(state.user().id.clone(), prompt_id);

    send_toggle(backend, &like, toggle).await;

    state.apply(toggle, prompt_id);
    toggle
}
