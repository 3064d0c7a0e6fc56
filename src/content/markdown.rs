//! Markdown rendering with syntax highlighting and reading-time estimation

use lazy_static::lazy_static;
use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};
use regex::Regex;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

use super::ReadingTime;

lazy_static! {
    static ref HTML_TAG: Regex = Regex::new(r"<[^>]*>").unwrap();
}

const DEFAULT_THEME: &str = "InspiredGitHub";

/// Output of rendering one document body
#[derive(Debug, Clone)]
pub struct RenderedBody {
    pub html: String,
    pub reading_time: ReadingTime,
}

/// Markdown renderer with syntax highlighting
pub struct MarkdownRenderer {
    syntax_set: SyntaxSet,
    theme: Theme,
}

impl MarkdownRenderer {
    /// Create a new markdown renderer
    pub fn new() -> Self {
        Self::with_theme(DEFAULT_THEME)
    }

    /// Create a renderer using one of syntect's bundled themes
    pub fn with_theme(theme_name: &str) -> Self {
        let mut themes = ThemeSet::load_defaults().themes;
        let theme = themes
            .remove(theme_name)
            .or_else(|| themes.remove(DEFAULT_THEME))
            .unwrap_or_default();
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme,
        }
    }

    /// Render markdown to HTML and estimate its reading time
    pub fn render(&self, markdown: &str) -> Result<RenderedBody, String> {
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_SMART_PUNCTUATION
            | Options::ENABLE_HEADING_ATTRIBUTES;
        let parser = Parser::new_ext(markdown, options);

        let mut events: Vec<Event> = Vec::new();
        let mut code_block: Option<(Option<String>, String)> = None;

        for event in parser {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    let lang = match kind {
                        CodeBlockKind::Fenced(lang) if !lang.is_empty() => Some(lang.to_string()),
                        _ => None,
                    };
                    code_block = Some((lang, String::new()));
                }
                Event::End(TagEnd::CodeBlock) => {
                    if let Some((lang, code)) = code_block.take() {
                        let highlighted = self.highlight_code(&code, lang.as_deref())?;
                        events.push(Event::Html(CowStr::from(highlighted)));
                    }
                }
                Event::Text(text) if code_block.is_some() => {
                    if let Some((_, code)) = code_block.as_mut() {
                        code.push_str(&text);
                    }
                }
                event => {
                    if code_block.is_none() {
                        events.push(event);
                    }
                }
            }
        }

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());

        let reading_time = ReadingTime::from_word_count(count_words(&html_output));
        Ok(RenderedBody {
            html: html_output,
            reading_time,
        })
    }

    /// Highlight a code block
    fn highlight_code(&self, code: &str, lang: Option<&str>) -> Result<String, String> {
        let lang = lang.unwrap_or("text");
        let syntax = self
            .syntax_set
            .find_syntax_by_token(lang)
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let highlighted = highlighted_html_for_string(code, &self.syntax_set, syntax, &self.theme)
            .map_err(|e| format!("highlighting {} block: {}", lang, e))?;
        Ok(format!(
            r#"<div class="code-block language-{}">{}</div>"#,
            lang, highlighted
        ))
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Strip HTML tags, leaving the text content
pub fn strip_html(html: &str) -> String {
    HTML_TAG.replace_all(html, " ").into_owned()
}

/// Count whitespace-separated words in the text of an HTML fragment
pub fn count_words(html: &str) -> usize {
    strip_html(html).split_whitespace().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_basic_markdown() {
        let renderer = MarkdownRenderer::new();
        let body = renderer.render("# Hello World\n\nThis is a test.").unwrap();
        assert!(body.html.contains("<h1>Hello World</h1>"));
        assert!(body.html.contains("<p>This is a test.</p>"));
        assert_eq!(body.reading_time.words, 6);
        assert_eq!(body.reading_time.text, "1 min read");
    }

    #[test]
    fn test_render_code_block() {
        let renderer = MarkdownRenderer::new();
        let body = renderer.render("```rust\nfn main() {}\n```").unwrap();
        assert!(body.html.contains("language-rust"));
        assert!(body.html.contains("<pre"));
        assert!(!body.html.contains("```"));
    }

    #[test]
    fn test_unknown_language_falls_back_to_plain_text() {
        let renderer = MarkdownRenderer::new();
        let body = renderer.render("```nosuchlang\nplain words\n```").unwrap();
        assert!(body.html.contains("plain words"));
    }

    #[test]
    fn test_count_words_ignores_tags() {
        assert_eq!(count_words("<p>one <em>two</em></p><p>three</p>"), 3);
        assert_eq!(count_words(""), 0);
    }
}
