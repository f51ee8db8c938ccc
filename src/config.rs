use std::path::PathBuf;

/// Runtime settings shared by the handlers.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Directory that admin imports may read source files from.
    pub import_dir: PathBuf,
    /// Bearer token for the admin routes. When unset those routes are forbidden.
    pub admin_token: Option<String>,
    pub llm: Option<LlmConfig>,
}

/// An OpenAI-compatible chat completions endpoint.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
}

impl LlmConfig {
    /// Builds the endpoint settings when both the base URL and the key are
    /// present and non-empty.
    pub fn from_parts(
        base_url: Option<String>,
        api_key: Option<String>,
        model: String,
    ) -> Option<Self> {
        let base_url = base_url.filter(|s| !s.trim().is_empty())?;
        let api_key = api_key.filter(|s| !s.trim().is_empty())?;
        Some(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            model,
        })
    }

    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn llm_needs_url_and_key() {
        assert!(LlmConfig::from_parts(None, Some("k".into()), "m".into()).is_none());
        assert!(LlmConfig::from_parts(Some("http://x".into()), Some(" ".into()), "m".into()).is_none());

        let llm = LlmConfig::from_parts(Some("http://x/v1/".into()), Some("k".into()), "m".into())
            .expect("configured");
        assert_eq!(llm.completions_url(), "http://x/v1/chat/completions");
    }
}
