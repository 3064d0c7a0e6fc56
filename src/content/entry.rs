//! Content entry model

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Which template a document is rendered with
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Template {
    Post,
    Page,
    /// Any other template name; such documents are loaded but never routed
    #[serde(untagged)]
    Other(String),
}

impl Template {
    pub fn parse(name: &str) -> Self {
        match name.trim() {
            "post" => Template::Post,
            "page" => Template::Page,
            other => Template::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Template::Post => "post",
            Template::Page => "page",
            Template::Other(name) => name,
        }
    }
}

/// Reading-time estimate for a rendered body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadingTime {
    pub words: usize,
    pub minutes: f64,
    pub text: String,
}

impl ReadingTime {
    pub const WORDS_PER_MINUTE: f64 = 200.0;

    pub fn from_word_count(words: usize) -> Self {
        let minutes = words as f64 / Self::WORDS_PER_MINUTE;
        let shown = minutes.ceil() as u64;
        Self {
            words,
            minutes,
            text: format!("{} min read", shown),
        }
    }
}

/// One markdown document, normalized at ingestion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentEntry {
    /// Unique path-like identifier, always starting with `/`
    pub slug: String,
    pub template: Template,
    /// May be empty; navigation falls back to the slug
    pub title: String,
    pub date: Option<NaiveDateTime>,
    pub draft: bool,
    pub tags: Vec<String>,
    pub category: Option<String>,
    pub canonical: Option<String>,
    pub description: Option<String>,
    /// Rendered HTML body
    pub html: String,
    pub reading_time: ReadingTime,
}

impl ContentEntry {
    /// Create an entry with an empty body
    pub fn new(slug: impl Into<String>, template: Template, title: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            template,
            title: title.into(),
            date: None,
            draft: false,
            tags: Vec::new(),
            category: None,
            canonical: None,
            description: None,
            html: String::new(),
            reading_time: ReadingTime::from_word_count(0),
        }
    }

    pub fn is_post(&self) -> bool {
        self.template == Template::Post
    }

    pub fn is_page(&self) -> bool {
        self.template == Template::Page
    }

    /// A post that is not a draft. Pages never count, whatever their draft flag says.
    pub fn is_published_post(&self) -> bool {
        self.is_post() && !self.draft
    }

    /// Title for links, falling back to the slug when the title is blank
    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            &self.slug
        } else {
            &self.title
        }
    }
}

/// Stable sort by date, newest first. Undated entries go last,
/// ties keep retrieval order.
pub fn sort_by_date_desc(entries: &mut [ContentEntry]) {
    entries.sort_by(|a, b| match (&a.date, &b.date) {
        (Some(a), Some(b)) => b.cmp(a),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn dated(slug: &str, day: Option<u32>) -> ContentEntry {
        let mut entry = ContentEntry::new(slug, Template::Post, slug);
        entry.date = day.map(|d| {
            NaiveDate::from_ymd_opt(2024, 1, d)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
        });
        entry
    }

    #[test]
    fn test_template_parse() {
        assert_eq!(Template::parse("post"), Template::Post);
        assert_eq!(Template::parse(" page "), Template::Page);
        assert_eq!(
            Template::parse("gallery"),
            Template::Other("gallery".to_string())
        );
    }

    #[test]
    fn test_reading_time_text() {
        assert_eq!(ReadingTime::from_word_count(0).text, "0 min read");
        assert_eq!(ReadingTime::from_word_count(1).text, "1 min read");
        assert_eq!(ReadingTime::from_word_count(400).text, "2 min read");
        assert_eq!(ReadingTime::from_word_count(401).text, "3 min read");
    }

    #[test]
    fn test_display_title_falls_back_to_slug() {
        let mut entry = ContentEntry::new("/posts/a", Template::Post, "  ");
        assert_eq!(entry.display_title(), "/posts/a");
        entry.title = "A".to_string();
        assert_eq!(entry.display_title(), "A");
    }

    #[test]
    fn test_page_with_draft_flag_is_not_a_published_post() {
        let mut page = ContentEntry::new("/pages/about", Template::Page, "About");
        page.draft = true;
        assert!(!page.is_published_post());
        assert!(page.is_page());
    }

    #[test]
    fn test_sort_is_stable_and_puts_undated_last() {
        let mut entries = vec![
            dated("/undated", None),
            dated("/old", Some(1)),
            dated("/tie-first", Some(5)),
            dated("/new", Some(9)),
            dated("/tie-second", Some(5)),
        ];
        sort_by_date_desc(&mut entries);
        let slugs: Vec<_> = entries.iter().map(|e| e.slug.as_str()).collect();
        assert_eq!(
            slugs,
            vec!["/new", "/tie-first", "/tie-second", "/old", "/undated"]
        );
    }
}
