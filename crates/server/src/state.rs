//! Shared application state, built once at startup.

use std::sync::Arc;

use anyhow::{Context, Result};
use wwjs_client::{Analyzer, OpenAiClient, OpenAiConfig};
use wwjs_core::{AnalysisCache, AppConfig, Error, Language};

use crate::error::ApiError;

#[derive(Clone)]
pub struct AppState {
    pub analyzer: Analyzer,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(analyzer: Analyzer, config: AppConfig) -> Self {
        Self { analyzer, config: Arc::new(config) }
    }

    /// Wire the upstream client and cache from configuration.
    ///
    /// Fails when the API key is absent; the server must not start without it.
    pub fn from_config(config: AppConfig) -> Result<Self> {
        config.require_openai_api_key()?;

        let client = OpenAiClient::new(OpenAiConfig::from(&config)).context("building OpenAI client")?;
        let analyzer = Analyzer::new(Arc::new(client), Arc::new(AnalysisCache::new()));

        Ok(Self::new(analyzer, config))
    }

    /// Wrap a request failure for the response envelope.
    pub fn error(&self, error: Error, language: Language) -> ApiError {
        ApiError { error, language, expose_details: !self.config.is_production() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wwjs_core::Environment;

    #[test]
    fn test_from_config_requires_api_key() {
        let result = AppState::from_config(AppConfig::default());
        let err = result.err().unwrap();
        assert!(err.to_string().contains("openai_api_key"));
    }

    #[test]
    fn test_from_config_with_key() {
        let config = AppConfig { openai_api_key: Some("sk-test".into()), ..Default::default() };
        let state = AppState::from_config(config).unwrap();
        assert_eq!(state.analyzer.model(), "gpt-4o-mini");
        assert!(state.analyzer.cache().is_empty());
    }

    #[test]
    fn test_error_details_follow_environment() {
        let config = AppConfig { openai_api_key: Some("sk-test".into()), ..Default::default() };
        let state = AppState::from_config(config.clone()).unwrap();
        assert!(state.error(Error::UpstreamEmptyResponse, Language::En).expose_details);

        let config = AppConfig { environment: Environment::Production, ..config };
        let state = AppState::from_config(config).unwrap();
        assert!(!state.error(Error::UpstreamEmptyResponse, Language::En).expose_details);
    }
}
