//! Analysis cache-and-dispatch unit.
//!
//! Serves a cached analysis when one is live for the page's language and
//! URL; otherwise builds the language's prompts, calls the generator once,
//! and caches the text. Concurrent misses for the same key each call
//! upstream and the last write wins.

use std::sync::Arc;

use wwjs_core::{AnalysisCache, AnalyzeResponse, Error, Language, SanitizedPageDescription, cache_key};

use crate::TextGenerator;

/// Owns the generator and the shared cache.
#[derive(Clone)]
pub struct Analyzer {
    generator: Arc<dyn TextGenerator>,
    cache: Arc<AnalysisCache>,
}

impl Analyzer {
    pub fn new(generator: Arc<dyn TextGenerator>, cache: Arc<AnalysisCache>) -> Self {
        Self { generator, cache }
    }

    pub fn model(&self) -> &str {
        self.generator.model()
    }

    pub fn cache(&self) -> &AnalysisCache {
        &self.cache
    }

    pub fn clear_cache(&self) {
        self.cache.flush();
    }

    /// Analyze a sanitized page in the given language.
    ///
    /// # Errors
    ///
    /// - `Error::UpstreamEmptyResponse` if the model returned no text
    /// - `Error::Upstream` if the call failed
    ///
    /// Neither outcome is cached.
    pub async fn analyze(&self, page: &SanitizedPageDescription, language: Language) -> Result<AnalyzeResponse, Error> {
        let key = cache_key(language, &page.url);

        if let Some(text) = self.cache.get(&key) {
            tracing::debug!(url = %page.url, %language, "cache hit");
            return Ok(AnalyzeResponse::from_cache(text, self.model()));
        }
        tracing::debug!(url = %page.url, %language, "cache miss");

        let user_prompt = language.render_user_prompt(page);
        let generation = self
            .generator
            .generate(language.system_prompt(), &user_prompt)
            .await
            .map_err(|e| {
                tracing::error!(status = ?e.status(), error = %e, "upstream generation failed");
                Error::from(e)
            })?;

        let text = generation
            .text
            .filter(|t| !t.trim().is_empty())
            .ok_or(Error::UpstreamEmptyResponse)?;

        self.cache.insert(key, text.clone());

        Ok(AnalyzeResponse::generated(text, self.model(), generation.tokens_used))
    }
}
