//! Page descriptions received from the browser extension and their sanitizer.
//!
//! Everything in a [`PageDescription`] is untrusted. [`sanitize`] bounds every
//! field before it reaches a prompt or a cache key.

use serde::{Deserialize, Serialize};

use crate::Error;

pub const MAX_URL_CHARS: usize = 500;
pub const MAX_TITLE_CHARS: usize = 200;
pub const MAX_META_CHARS: usize = 500;
pub const MAX_MAIN_CONTENT_CHARS: usize = 5000;
pub const MAX_HEADINGS: usize = 50;
pub const MAX_HEADING_CHARS: usize = 200;
pub const MAX_IMAGES: usize = 20;
pub const MAX_IMAGE_CHARS: usize = 500;

/// Page metadata as sent by the extension.
///
/// All fields are optional on the wire so that the request boundary can
/// tell a missing `url`/`title` apart from a malformed body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageDescription {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub og_description: Option<String>,
    #[serde(default)]
    pub keywords: Option<String>,
    #[serde(default)]
    pub main_content: Option<String>,
    #[serde(default)]
    pub headings: Option<Vec<String>>,
    #[serde(default)]
    pub images: Option<Vec<String>>,
}

/// A page description with every field present and length-bounded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SanitizedPageDescription {
    pub url: String,
    pub title: String,
    pub description: String,
    pub og_description: String,
    pub keywords: String,
    pub main_content: String,
    pub headings: Vec<String>,
    pub images: Vec<String>,
}

impl PageDescription {
    /// Check the fields the analysis cannot run without.
    ///
    /// Empty strings count as missing.
    pub fn validate(&self) -> Result<(), Error> {
        let present = |field: &Option<String>| field.as_deref().is_some_and(|s| !s.is_empty());

        if present(&self.url) && present(&self.title) {
            Ok(())
        } else {
            Err(Error::MissingField("pageData must include url and title".into()))
        }
    }
}

/// Bound every field of an untrusted page description.
///
/// Never fails: strings are truncated to their character limit, absent
/// fields become empty, sequences are cut to their entry limit and each
/// entry is truncated in turn.
pub fn sanitize(raw: &PageDescription) -> SanitizedPageDescription {
    SanitizedPageDescription {
        url: clamp(raw.url.as_deref(), MAX_URL_CHARS),
        title: clamp(raw.title.as_deref(), MAX_TITLE_CHARS),
        description: clamp(raw.description.as_deref(), MAX_META_CHARS),
        og_description: clamp(raw.og_description.as_deref(), MAX_META_CHARS),
        keywords: clamp(raw.keywords.as_deref(), MAX_META_CHARS),
        main_content: clamp(raw.main_content.as_deref(), MAX_MAIN_CONTENT_CHARS),
        headings: clamp_list(raw.headings.as_deref(), MAX_HEADINGS, MAX_HEADING_CHARS),
        images: clamp_list(raw.images.as_deref(), MAX_IMAGES, MAX_IMAGE_CHARS),
    }
}

fn clamp(value: Option<&str>, max_chars: usize) -> String {
    truncate_chars(value.unwrap_or_default(), max_chars).to_string()
}

fn clamp_list(values: Option<&[String]>, max_len: usize, max_chars: usize) -> Vec<String> {
    values
        .unwrap_or_default()
        .iter()
        .take(max_len)
        .map(|v| truncate_chars(v, max_chars).to_string())
        .collect()
}

/// Longest prefix of `s` holding at most `max_chars` characters.
pub fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(url: &str, title: &str) -> PageDescription {
        PageDescription { url: Some(url.into()), title: Some(title.into()), ..Default::default() }
    }

    #[test]
    fn test_validate_requires_url_and_title() {
        assert!(page("https://a.com", "Gambling tips").validate().is_ok());

        let missing_url = PageDescription { title: Some("t".into()), ..Default::default() };
        assert!(matches!(missing_url.validate(), Err(Error::MissingField(_))));

        let missing_title = PageDescription { url: Some("https://a.com".into()), ..Default::default() };
        assert!(matches!(missing_title.validate(), Err(Error::MissingField(_))));

        assert!(matches!(page("", "t").validate(), Err(Error::MissingField(_))));
        assert!(matches!(page("https://a.com", "").validate(), Err(Error::MissingField(_))));
    }

    #[test]
    fn test_sanitize_defaults_absent_fields() {
        let sanitized = sanitize(&page("https://a.com", "Gambling tips"));
        assert_eq!(sanitized.url, "https://a.com");
        assert_eq!(sanitized.title, "Gambling tips");
        assert_eq!(sanitized.description, "");
        assert_eq!(sanitized.og_description, "");
        assert_eq!(sanitized.keywords, "");
        assert_eq!(sanitized.main_content, "");
        assert!(sanitized.headings.is_empty());
        assert!(sanitized.images.is_empty());
    }

    #[test]
    fn test_sanitize_truncates_main_content() {
        let raw = PageDescription { main_content: Some("x".repeat(20_000)), ..page("https://a.com", "t") };
        let sanitized = sanitize(&raw);
        assert_eq!(sanitized.main_content.chars().count(), 5000);
    }

    #[test]
    fn test_sanitize_truncates_headings() {
        let headings = (0..80).map(|i| format!("{i}-{}", "h".repeat(300))).collect();
        let raw = PageDescription { headings: Some(headings), ..page("https://a.com", "t") };
        let sanitized = sanitize(&raw);

        assert_eq!(sanitized.headings.len(), 50);
        assert!(sanitized.headings.iter().all(|h| h.chars().count() <= 200));
        assert!(sanitized.headings[49].starts_with("49-"));
    }

    #[test]
    fn test_sanitize_bounds_every_field() {
        let long = "y".repeat(10_000);
        let raw = PageDescription {
            url: Some(long.clone()),
            title: Some(long.clone()),
            description: Some(long.clone()),
            og_description: Some(long.clone()),
            keywords: Some(long.clone()),
            main_content: Some(long.clone()),
            headings: Some(vec![long.clone(); 100]),
            images: Some(vec![long; 100]),
        };
        let s = sanitize(&raw);

        assert_eq!(s.url.chars().count(), MAX_URL_CHARS);
        assert_eq!(s.title.chars().count(), MAX_TITLE_CHARS);
        assert_eq!(s.description.chars().count(), MAX_META_CHARS);
        assert_eq!(s.og_description.chars().count(), MAX_META_CHARS);
        assert_eq!(s.keywords.chars().count(), MAX_META_CHARS);
        assert_eq!(s.main_content.chars().count(), MAX_MAIN_CONTENT_CHARS);
        assert_eq!(s.headings.len(), MAX_HEADINGS);
        assert_eq!(s.images.len(), MAX_IMAGES);
        assert!(s.images.iter().all(|i| i.chars().count() == MAX_IMAGE_CHARS));
    }

    #[test]
    fn test_sanitize_counts_characters_not_bytes() {
        let raw = PageDescription { title: Some("Ї".repeat(300)), ..page("https://a.com", "t") };
        let sanitized = sanitize(&raw);
        assert_eq!(sanitized.title.chars().count(), 200);
        assert_eq!(sanitized.title.len(), 400);
    }

    #[test]
    fn test_sanitize_keeps_short_values() {
        let raw = PageDescription {
            headings: Some(vec!["One".into(), "Two".into()]),
            images: Some(vec!["alt text".into()]),
            ..page("https://a.com", "t")
        };
        let sanitized = sanitize(&raw);
        assert_eq!(sanitized.headings, vec!["One".to_string(), "Two".to_string()]);
        assert_eq!(sanitized.images, vec!["alt text".to_string()]);
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("hello", 3), "hel");
        assert_eq!(truncate_chars("hello", 5), "hello");
        assert_eq!(truncate_chars("hello", 10), "hello");
        assert_eq!(truncate_chars("", 3), "");
        assert_eq!(truncate_chars("привіт", 2), "пр");
    }

    #[test]
    fn test_deserialize_camel_case() {
        let json = r#"{"url":"https://a.com","title":"T","ogDescription":"og","mainContent":"body","headings":["h"]}"#;
        let raw: PageDescription = serde_json::from_str(json).unwrap();
        assert_eq!(raw.og_description.as_deref(), Some("og"));
        assert_eq!(raw.main_content.as_deref(), Some("body"));
        assert!(raw.images.is_none());
    }
}
