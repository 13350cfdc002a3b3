use crate::models::{Prompt, SessionUser};
use std::collections::HashSet;

pub const NO_EMAIL: &str = "로그인 정보 없음";
pub const LOADING: &str = "불러오는 중...";
pub const NO_PROMPTS: &str = "등록한 프롬프트가 없습니다.";
pub const COMMENTS_PLACEHOLDER: &str = "아직 댓글 기능은 구현되지 않았습니다.";

/// Which remote mutation a click on the like button issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeToggle {
    Like,
    Unlike,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProfileTab {
    #[default]
    Prompts,
    Comments,
}

impl ProfileTab {
    pub fn label(self) -> &'static str {
        match self {
            ProfileTab::Prompts => "나의 프롬포트",
            ProfileTab::Comments => "댓글",
        }
    }
}

/// Local state of the profile screen for an authenticated user.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileState {
    user: SessionUser,
    prompts: Vec<Prompt>,
    liked: HashSet<String>,
}

impl ProfileState {
    pub fn new(user: SessionUser) -> Self {
        Self {
            user,
            prompts: Vec::new(),
            liked: HashSet::new(),
        }
    }

    pub fn with_prompts(mut self, prompts: Vec<Prompt>) -> Self {
        self.prompts = prompts;
        self
    }

    pub fn with_liked<I>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        self.liked = ids.into_iter().collect();
        self
    }

    pub fn user(&self) -> &SessionUser {
        &self.user
    }

    pub fn prompts(&self) -> &[Prompt] {
        &self.prompts
    }

    pub fn liked(&self) -> &HashSet<String> {
        &self.liked
    }

    pub fn email_label(&self) -> &str {
        self.user.email.as_deref().unwrap_or(NO_EMAIL)
    }

    pub fn is_liked(&self, prompt_id: &str) -> bool {
        self.liked.contains(prompt_id)
    }

    pub fn next_toggle(&self, prompt_id: &str) -> LikeToggle {
        if self.is_liked(prompt_id) {
            LikeToggle::Unlike
        } else {
            LikeToggle::Like
        }
    }

    pub fn record_like(&mut self, prompt_id: &str) {
        self.adjust_likes(prompt_id, 1);
        self.liked.insert(prompt_id.to_string());
    }

    pub fn record_unlike(&mut self, prompt_id: &str) {
        self.adjust_likes(prompt_id, -1);
        self.liked.remove(prompt_id);
    }

    /// Applies the local half of a toggle.
    pub fn apply(&mut self, toggle: LikeToggle, prompt_id: &str) {
        match toggle {
            LikeToggle::Like => self.record_like(prompt_id),
            LikeToggle::Unlike => self.record_unlike(prompt_id),
        }
    }

    // Счётчик не ограничивается снизу: бэкенд остаётся источником истины.
    fn adjust_likes(&mut self, prompt_id: &str, delta: i64) {
        for prompt in self.prompts.iter_mut().filter(|p| p.id == prompt_id) {
            prompt.likes += delta;
        }
    }
}
