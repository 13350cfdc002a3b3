use crate::error::PromptClientError;

const URL_VARS: [&str; 2] = ["SUPABASE_URL", "NEXT_PUBLIC_SUPABASE_URL"];
const KEY_VARS: [&str; 2] = ["SUPABASE_ANON_KEY", "NEXT_PUBLIC_SUPABASE_ANON_KEY"];

/// Where the hosted backend lives and the public key every request carries.
#[derive(Debug, Clone, PartialEq)]
pub struct BackendConfig {
    pub url: String,
    pub anon_key: String,
}

impl BackendConfig {
    pub fn new(url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            anon_key: anon_key.into(),
        }
    }

    /// Reads the backend location from the process environment.
    pub fn from_env() -> Result<Self, PromptClientError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, PromptClientError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let first = |names: &[&str]| {
            names
                .iter()
                .filter_map(|name| lookup(*name))
                .map(|value| value.trim().to_string())
                .find(|value| !value.is_empty())
        };

        let url = first(&URL_VARS[..]).ok_or_else(|| {
            PromptClientError::Config(format!("{} must be set", URL_VARS.join(" or ")))
        })?;
        let anon_key = first(&KEY_VARS[..]).ok_or_else(|| {
            PromptClientError::Config(format!("{} must be set", KEY_VARS.join(" or ")))
        })?;

        Ok(Self { url, anon_key })
    }
}
