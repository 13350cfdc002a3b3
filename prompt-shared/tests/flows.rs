//! Feed and profile flows against an in-memory backend that records every
//! call it receives.

use async_trait::async_trait;
use prompt_shared::flow::{load_feed, load_profile, send_toggle, toggle_like, ProfileLoad};
use prompt_shared::{
    BackendError, Category, Like, LikeToggle, Prompt, PromptBackend, ProfileState, SessionUser,
};
use std::collections::HashSet;
use std::sync::Mutex;
use thiserror::Error;

#[derive(Debug, Error)]
enum FakeError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("HTTP {0}")]
    Status(u16),
}

impl BackendError for FakeError {
    fn is_unauthorized(&self) -> bool {
        matches!(self, FakeError::Unauthorized(_))
    }
}

#[derive(Default)]
struct FakeBackend {
    user: Option<SessionUser>,
    prompts: Vec<Prompt>,
    likes: Mutex<HashSet<Like>>,
    fail_reads: bool,
    fail_counter: bool,
    /// The stored session token has expired: token-bearing reads answer 401.
    stale_token: bool,
    calls: Mutex<Vec<String>>,
}

impl FakeBackend {
    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn read_error() -> FakeError {
        FakeError::Status(503)
    }
}

#[async_trait(?Send)]
impl PromptBackend for FakeBackend {
    type Error = FakeError;

    async fn current_user(&self) -> Result<SessionUser, FakeError> {
        self.record("current_user");
        self.user
            .clone()
            .ok_or_else(|| FakeError::Unauthorized("no active session".into()))
    }

    async fn list_prompts(&self) -> Result<Vec<Prompt>, FakeError> {
        self.record("list_prompts");
        if self.stale_token {
            return Err(FakeError::Unauthorized("JWT expired".into()));
        }
        if self.fail_reads {
            return Err(Self::read_error());
        }
        Ok(self.prompts.clone())
    }

    async fn list_public_prompts(&self) -> Result<Vec<Prompt>, FakeError> {
        self.record("list_public_prompts");
        if self.fail_reads {
            return Err(Self::read_error());
        }
        Ok(self.prompts.clone())
    }

    async fn list_user_prompts(&self, user_id: &str) -> Result<Vec<Prompt>, FakeError> {
        self.record(format!("list_user_prompts:{}", user_id));
        if self.fail_reads {
            return Err(Self::read_error());
        }
        Ok(self
            .prompts
            .iter()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn liked_prompt_ids(&self, user_id: &str) -> Result<Vec<String>, FakeError> {
        self.record(format!("liked_prompt_ids:{}", user_id));
        if self.fail_reads {
            return Err(Self::read_error());
        }
        Ok(self
            .likes
            .lock()
            .unwrap()
            .iter()
            .filter(|l| l.user_id == user_id)
            .map(|l| l.prompt_id.clone())
            .collect())
    }

    async fn insert_like(&self, like: &Like) -> Result<(), FakeError> {
        self.record(format!("insert_like:{}", like.prompt_id));
        self.likes.lock().unwrap().insert(like.clone());
        Ok(())
    }

    async fn delete_like(&self, like: &Like) -> Result<(), FakeError> {
        self.record(format!("delete_like:{}", like.prompt_id));
        self.likes.lock().unwrap().remove(like);
        Ok(())
    }

    async fn increment_likes(&self, prompt_id: &str) -> Result<(), FakeError> {
        self.record(format!("increment_likes:{}", prompt_id));
        if self.fail_counter {
            return Err(FakeError::Status(404));
        }
        Ok(())
    }

    async fn decrement_likes(&self, prompt_id: &str) -> Result<(), FakeError> {
        self.record(format!("decrement_likes:{}", prompt_id));
        if self.fail_counter {
            return Err(FakeError::Status(404));
        }
        Ok(())
    }
}

fn prompt(id: &str, owner: &str, title: &str, category: &str, likes: i64) -> Prompt {
    Prompt {
        id: id.to_string(),
        title: title.to_string(),
        description: format!("description of {}", title),
        category: category.to_string(),
        user_id: owner.to_string(),
        created_at: "2024-05-01T12:00:00+00:00".to_string(),
        views: 5,
        likes,
        image_url: None,
    }
}

fn me() -> SessionUser {
    SessionUser {
        id: "me".to_string(),
        email: Some("me@example.com".to_string()),
    }
}

fn backend_with_user() -> FakeBackend {
    let backend = FakeBackend {
        user: Some(me()),
        prompts: vec![
            prompt("p1", "me", "GPT 마케팅", "마케팅", 2),
            prompt("p2", "me", "코드 리뷰", "코드 생성", 0),
            prompt("p3", "other", "남의 프롬프트", "교육", 7),
        ],
        ..FakeBackend::default()
    };
    backend.likes.lock().unwrap().insert(Like::new("me", "p1"));
    backend
}

fn ready(load: ProfileLoad) -> ProfileState {
    match load {
        ProfileLoad::Ready(state) => state,
        ProfileLoad::RedirectToLogin => panic!("expected a loaded profile"),
    }
}

fn likes_of(state: &ProfileState, id: &str) -> i64 {
    state.prompts().iter().find(|p| p.id == id).unwrap().likes
}

#[tokio::test]
async fn feed_keeps_backend_order_and_filters_locally() {
    let backend = backend_with_user();
    let mut feed = load_feed(&backend).await;

    assert_eq!(backend.calls(), vec!["list_prompts"]);
    assert_eq!(feed.prompts().len(), 3);

    feed.set_search("gpt");
    feed.set_category(Category::Marketing);
    let ids: Vec<&str> = feed.filtered().iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["p1"]);

    // Фильтрация не обращается к бэкенду.
    assert_eq!(backend.calls().len(), 1);
}

#[tokio::test]
async fn failed_feed_fetch_leaves_empty_list() {
    let backend = FakeBackend {
        fail_reads: true,
        ..backend_with_user()
    };

    let feed = load_feed(&backend).await;
    assert!(feed.prompts().is_empty());
    assert!(feed.filtered().is_empty());
}

#[tokio::test]
async fn rejected_session_falls_back_to_public_feed() {
    let backend = FakeBackend {
        stale_token: true,
        ..backend_with_user()
    };

    let feed = load_feed(&backend).await;

    assert_eq!(backend.calls(), vec!["list_prompts", "list_public_prompts"]);
    let ids: Vec<&str> = feed.prompts().iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["p1", "p2", "p3"]);
}

#[tokio::test]
async fn other_feed_failures_are_not_retried() {
    let backend = FakeBackend {
        fail_reads: true,
        ..backend_with_user()
    };

    load_feed(&backend).await;
    assert_eq!(backend.calls(), vec!["list_prompts"]);
}

#[tokio::test]
async fn anonymous_retry_failure_leaves_empty_list() {
    let backend = FakeBackend {
        stale_token: true,
        fail_reads: true,
        ..backend_with_user()
    };

    let feed = load_feed(&backend).await;
    assert!(feed.prompts().is_empty());
    assert_eq!(backend.calls(), vec!["list_prompts", "list_public_prompts"]);
}

#[tokio::test]
async fn anonymous_profile_redirects_before_any_fetch() {
    let backend = FakeBackend {
        user: None,
        ..backend_with_user()
    };

    assert_eq!(load_profile(&backend).await, ProfileLoad::RedirectToLogin);
    assert_eq!(backend.calls(), vec!["current_user"]);
}

#[tokio::test]
async fn profile_loads_own_prompts_and_liked_ids() {
    let backend = backend_with_user();
    let state = ready(load_profile(&backend).await);

    assert_eq!(
        backend.calls(),
        vec!["current_user", "list_user_prompts:me", "liked_prompt_ids:me"]
    );
    let ids: Vec<&str> = state.prompts().iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["p1", "p2"]);
    assert!(state.is_liked("p1"));
    assert!(!state.is_liked("p2"));
    assert_eq!(state.email_label(), "me@example.com");
}

#[tokio::test]
async fn profile_fetch_failures_degrade_to_empty_state() {
    let backend = FakeBackend {
        fail_reads: true,
        ..backend_with_user()
    };

    let state = ready(load_profile(&backend).await);
    assert!(state.prompts().is_empty());
    assert!(state.liked().is_empty());
}

#[tokio::test]
async fn like_inserts_record_then_increments_counter() {
    let backend = backend_with_user();
    let mut state = ready(load_profile(&backend).await);

    let toggle = toggle_like(&backend, &mut state, "p2").await;

    assert_eq!(toggle, LikeToggle::Like);
    assert_eq!(
        &backend.calls()[3..],
        &["insert_like:p2".to_string(), "increment_likes:p2".to_string()]
    );
    assert!(state.is_liked("p2"));
    assert_eq!(likes_of(&state, "p2"), 1);
}

#[tokio::test]
async fn unlike_deletes_record_then_decrements_counter() {
    let backend = backend_with_user();
    let mut state = ready(load_profile(&backend).await);

    let toggle = toggle_like(&backend, &mut state, "p1").await;

    assert_eq!(toggle, LikeToggle::Unlike);
    assert_eq!(
        &backend.calls()[3..],
        &["delete_like:p1".to_string(), "decrement_likes:p1".to_string()]
    );
    assert!(!state.is_liked("p1"));
    assert_eq!(likes_of(&state, "p1"), 1);
    assert!(backend.likes.lock().unwrap().is_empty());
}

#[tokio::test]
async fn sent_toggle_leaves_local_state_to_the_caller() {
    let backend = backend_with_user();
    let state = ready(load_profile(&backend).await);

    let toggle = state.next_toggle("p2");
    send_toggle(&backend, &Like::new("me", "p2"), toggle).await;

    assert_eq!(
        &backend.calls()[3..],
        &["insert_like:p2".to_string(), "increment_likes:p2".to_string()]
    );
    assert!(!state.is_liked("p2"));
    assert!(backend
        .likes
        .lock()
        .unwrap()
        .contains(&Like::new("me", "p2")));
}

#[tokio::test]
async fn toggling_twice_restores_liked_set_and_counter() {
    let backend = backend_with_user();
    let original = ready(load_profile(&backend).await);

    for id in ["p1", "p2"] {
        let mut state = original.clone();
        toggle_like(&backend, &mut state, id).await;
        toggle_like(&backend, &mut state, id).await;
        assert_eq!(state, original);
    }
}

#[tokio::test]
async fn counter_failure_does_not_roll_back_local_state() {
    let backend = FakeBackend {
        fail_counter: true,
        ..backend_with_user()
    };
    let mut state = ready(load_profile(&backend).await);

    toggle_like(&backend, &mut state, "p2").await;

    assert!(state.is_liked("p2"));
    assert_eq!(likes_of(&state, "p2"), 1);
    assert!(backend
        .likes
        .lock()
        .unwrap()
        .contains(&Like::new("me", "p2")));
}
