//! Supported response languages and their prompt table.
//!
//! Russian requests are answered with the Ukrainian prompts.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::page::{SanitizedPageDescription, truncate_chars};

/// Characters of page content quoted in the user prompt.
pub const CONTENT_PREVIEW_CHARS: usize = 1000;

/// Response language requested by the extension.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Uk,
    Ru,
}

/// Prompt wording for one language.
#[derive(Debug, Clone, Copy)]
pub struct Prompts {
    pub system: &'static str,
    pub website_label: &'static str,
    pub url_label: &'static str,
    pub description_label: &'static str,
    pub content_label: &'static str,
    pub no_description: &'static str,
    pub question: &'static str,
}

/// User-facing error strings for one language.
#[derive(Debug, Clone, Copy)]
pub struct Messages {
    pub no_text: &'static str,
    pub api_error: &'static str,
    pub server_error: &'static str,
    /// Rate-limit rejection; `{minutes}` is replaced with the wait.
    pub rate_limited: &'static str,
    /// Human-readable wait; `{minutes}` is replaced with the wait.
    pub retry_after: &'static str,
}

const EN_PROMPTS: Prompts = Prompts {
    system: "You are responding as Jesus Christ from the Christian tradition. Based on the teachings in the Gospels \
and Christian scripture, provide a brief response (2-3 sentences) about this webpage content.
Criticize content of the page if it goes against Christian teachings even if a little. Try to find at least \
something in this content that goes against Christian teachings and criticize it.
You can express righteous rage if needed, not sparing anyone's feelings.
Emphasize the role of the devil in temptation and sin of the content you are given.
What would you say about this content? Respond in first person as Jesus, with wisdom, and reference to relevant \
Biblical principles where appropriate.",
    website_label: "Website",
    url_label: "URL",
    description_label: "Description",
    content_label: "Content preview",
    no_description: "No description",
    question: "What would you say about this content? Respond in first person as Jesus in 2-3 sentences.",
};

const UK_PROMPTS: Prompts = Prompts {
    system: "Ви відповідаєте як Ісус Христос з християнської традиції. Ґрунтуючись на вченнях Євангелій та \
християнських писань, дайте коротку відповідь (2-3 речення) щодо вмісту цієї веб-сторінки.
Розкритикуйте вміст сторінки, якщо він, хай навіть трохи, суперечить християнським вченням. Спробуйте знайти в \
цьому контенті хоча б щось, що суперечить християнським вченням, і розкритикуйте це.
Ви можете висловити праведний гнів, якщо потрібно, не шкодуючи нічиїх почуттів.
Підкресліть роль диявола у спокусі та гріху наданого вам контенту.
Що б ви сказали про цей контент? Відповідайте від першої особи як Ісус, з мудрістю та посиланням на відповідні \
біблійні принципи, де це доречно.",
    website_label: "Веб-сайт",
    url_label: "URL",
    description_label: "Опис",
    content_label: "Фрагмент вмісту",
    no_description: "Немає опису",
    question: "Що б ви сказали про цей контент? Відповідайте від першої особи як Ісус у 2-3 реченнях.",
};

const EN_MESSAGES: Messages = Messages {
    no_text: "No text provided for analysis",
    api_error: "Failed to analyze text. Please try again.",
    server_error: "Internal server error",
    rate_limited: "Too many requests from this IP, please try again in {minutes} minutes.",
    retry_after: "{minutes} minutes",
};

const UK_MESSAGES: Messages = Messages {
    no_text: "Текст для аналізу не надано",
    api_error: "Не вдалося проаналізувати текст. Спробуйте ще раз.",
    server_error: "Внутрішня помилка сервера",
    rate_limited: "Забагато запитів з цієї IP-адреси, спробуйте ще раз через {minutes} хв.",
    retry_after: "{minutes} хв",
};

impl Language {
    /// Parse a language tag, falling back to English for anything unsupported.
    ///
    /// Case-insensitive; region subtags are ignored (`uk-UA` is Ukrainian).
    pub fn parse(tag: &str) -> Self {
        let primary = tag.trim().split(['-', '_']).next().unwrap_or_default().to_ascii_lowercase();
        match primary.as_str() {
            "uk" => Language::Uk,
            "ru" => Language::Ru,
            _ => Language::En,
        }
    }

    /// Pick a language from an `Accept-Language` header.
    ///
    /// Ukrainian and Russian speakers both get Ukrainian.
    pub fn detect(accept_language: Option<&str>) -> Self {
        let Some(header) = accept_language else {
            return Language::En;
        };
        let header = header.to_lowercase();

        if header.contains("uk") || header.contains("ua") || header.contains("ru") {
            Language::Uk
        } else {
            Language::En
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Uk => "uk",
            Language::Ru => "ru",
        }
    }

    pub fn prompts(self) -> &'static Prompts {
        match self {
            Language::En => &EN_PROMPTS,
            Language::Uk | Language::Ru => &UK_PROMPTS,
        }
    }

    pub fn messages(self) -> &'static Messages {
        match self {
            Language::En => &EN_MESSAGES,
            Language::Uk | Language::Ru => &UK_MESSAGES,
        }
    }

    pub fn system_prompt(self) -> &'static str {
        self.prompts().system
    }

    /// Fill the user prompt template with the page's metadata.
    pub fn render_user_prompt(self, page: &SanitizedPageDescription) -> String {
        let p = self.prompts();
        let description = if page.description.is_empty() { p.no_description } else { page.description.as_str() };

        format!(
            "{website}: {title}\n{url_label}: {url}\n{description_label}: {description}\n{content_label}: {content}\n\n{question}",
            website = p.website_label,
            title = page.title,
            url_label = p.url_label,
            url = page.url,
            description_label = p.description_label,
            content_label = p.content_label,
            content = truncate_chars(&page.main_content, CONTENT_PREVIEW_CHARS),
            question = p.question,
        )
    }
}

impl Messages {
    pub fn rate_limited(&self, minutes: u64) -> String {
        self.rate_limited.replace("{minutes}", &minutes.to_string())
    }

    pub fn retry_after(&self, minutes: u64) -> String {
        self.retry_after.replace("{minutes}", &minutes.to_string())
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> SanitizedPageDescription {
        SanitizedPageDescription {
            url: "https://a.com".into(),
            title: "Gambling tips".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_parse_supported() {
        assert_eq!(Language::parse("en"), Language::En);
        assert_eq!(Language::parse("uk"), Language::Uk);
        assert_eq!(Language::parse("ru"), Language::Ru);
        assert_eq!(Language::parse(" UK-ua "), Language::Uk);
        assert_eq!(Language::parse("ru_RU"), Language::Ru);
    }

    #[test]
    fn test_parse_unsupported_falls_back() {
        assert_eq!(Language::parse("fr"), Language::En);
        assert_eq!(Language::parse(""), Language::En);
        assert_eq!(Language::parse("klingon"), Language::En);
    }

    #[test]
    fn test_detect() {
        assert_eq!(Language::detect(None), Language::En);
        assert_eq!(Language::detect(Some("en-US,en;q=0.9")), Language::En);
        assert_eq!(Language::detect(Some("uk-UA,uk;q=0.9")), Language::Uk);
        assert_eq!(Language::detect(Some("ru-RU")), Language::Uk);
        assert_eq!(Language::detect(Some("fr-FR")), Language::En);
    }

    #[test]
    fn test_russian_uses_ukrainian_prompts() {
        assert_eq!(Language::Ru.system_prompt(), Language::Uk.system_prompt());
        assert_ne!(Language::En.system_prompt(), Language::Uk.system_prompt());
        assert_eq!(Language::Ru.messages().api_error, Language::Uk.messages().api_error);
    }

    #[test]
    fn test_unsupported_tag_uses_default_templates() {
        let fr = Language::parse("fr");
        assert_eq!(fr.system_prompt(), Language::default().system_prompt());
        assert_eq!(fr.render_user_prompt(&page()), Language::En.render_user_prompt(&page()));
    }

    #[test]
    fn test_render_user_prompt_placeholder() {
        let prompt = Language::En.render_user_prompt(&page());
        assert!(prompt.contains("Website: Gambling tips"));
        assert!(prompt.contains("URL: https://a.com"));
        assert!(prompt.contains("Description: No description"));

        let prompt = Language::Uk.render_user_prompt(&page());
        assert!(prompt.contains("Опис: Немає опису"));
    }

    #[test]
    fn test_render_user_prompt_description_and_preview() {
        let page = SanitizedPageDescription {
            description: "Tips for winning".into(),
            main_content: format!("{}{}", "a".repeat(1000), "b".repeat(500)),
            ..page()
        };
        let prompt = Language::En.render_user_prompt(&page);
        assert!(prompt.contains("Description: Tips for winning"));
        assert!(prompt.contains(&"a".repeat(1000)));
        assert!(!prompt.contains("bb"));
    }

    #[test]
    fn test_rate_limit_messages() {
        let en = Language::En.messages();
        assert_eq!(en.rate_limited(15), "Too many requests from this IP, please try again in 15 minutes.");
        assert_eq!(en.retry_after(15), "15 minutes");
        assert!(Language::Uk.messages().rate_limited(3).contains("через 3 хв"));
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Language::Uk).unwrap(), "\"uk\"");
        let lang: Language = serde_json::from_str("\"ru\"").unwrap();
        assert_eq!(lang, Language::Ru);
        assert_eq!(Language::Ru.to_string(), "ru");
    }
}
