use crate::category::Category;
use crate::models::Prompt;

pub const EXCERPT_CHARS: usize = 100;
pub const EMPTY_RESULT: &str = "조건에 맞는 프롬프트가 없습니다.";
pub const SEARCH_PLACEHOLDER: &str = "프롬프트 검색 (예: GPT-4, 마케팅, 이미지)";

/// Local state of the feed screen: everything the backend returned plus the
/// current search text and category selection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedState {
    prompts: Vec<Prompt>,
    search: String,
    category: Category,
}

impl FeedState {
    pub fn new(prompts: Vec<Prompt>) -> Self {
        Self {
            prompts,
            ..Self::default()
        }
    }

    pub fn replace_prompts(&mut self, prompts: Vec<Prompt>) {
        self.prompts = prompts;
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
    }

    pub fn set_category(&mut self, category: Category) {
        self.category = category;
    }

    pub fn prompts(&self) -> &[Prompt] {
        &self.prompts
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn matches(&self, prompt: &Prompt) -> bool {
        let needle = self.search.to_lowercase();
        let matches_search = prompt.title.to_lowercase().contains(&needle)
            || prompt.description.to_lowercase().contains(&needle);

        matches_search && self.category.admits(&prompt.category)
    }

    /// Filtered view in backend order. Recomputed on every call.
    pub fn filtered(&self) -> Vec<&Prompt> {
        self.prompts.iter().filter(|p| self.matches(p)).collect()
    }
}

/// Card text for a description: at most [`EXCERPT_CHARS`] characters, with an
/// ellipsis when something was cut.
pub fn excerpt(description: &str) -> String {
    match description.char_indices().nth(EXCERPT_CHARS) {
        Some((cut, _)) => format!("{}...", &description[..cut]),
        None => description.to_string(),
    }
}
