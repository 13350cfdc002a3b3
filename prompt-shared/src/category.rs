use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Category selector of the feed. `All` is the sentinel that admits every
/// prompt; the rest is the fixed vocabulary offered to authors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[default]
    All,
    TextGeneration,
    ImageGeneration,
    CodeGeneration,
    AnalysisAndSummary,
    Marketing,
    Education,
    Emotional,
    Experimental,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "Unknown category: {0} (expected one of: {expected})",
    expected = Category::labels().collect::<Vec<_>>().join(", ")
)]
pub struct UnknownCategory(pub String);

impl Category {
    /// Display order of the selector.
    pub const ALL: [Category; 9] = [
        Category::All,
        Category::TextGeneration,
        Category::ImageGeneration,
        Category::CodeGeneration,
        Category::AnalysisAndSummary,
        Category::Marketing,
        Category::Education,
        Category::Emotional,
        Category::Experimental,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::All => "전체",
            Category::TextGeneration => "텍스트 생성",
            Category::ImageGeneration => "이미지 생성",
            Category::CodeGeneration => "코드 생성",
            Category::AnalysisAndSummary => "분석 및 요약",
            Category::Marketing => "마케팅",
            Category::Education => "교육",
            Category::Emotional => "감성",
            Category::Experimental => "실험용",
        }
    }

    /// Whether a prompt labelled `label` passes this selector.
    pub fn admits(self, label: &str) -> bool {
        self == Category::All || self.label() == label
    }

    pub fn labels() -> impl Iterator<Item = &'static str> {
        Self::ALL.iter().map(|c| c.label())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.label() == s)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}
