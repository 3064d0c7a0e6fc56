//! Built-in blog templates using the Tera template engine
//!
//! Every template is embedded in the binary. Each route's `TemplateId`
//! maps to one `{id}.html` template below.

use serde::Serialize;
use std::collections::HashMap;
use tera::{Context, Tera};

use crate::routes::TemplateId;

/// Stylesheet written to `css/style.css`
pub const STYLESHEET: &str = include_str!("blog/style.css");

/// Template renderer with the embedded blog theme
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new() -> tera::Result<Self> {
        let mut tera = Tera::default();

        // Paths and URLs must come through untouched; text fields are
        // escaped explicitly in the templates
        tera.autoescape_on(vec![]);

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("blog/layout.html")),
            ("post.html", include_str!("blog/post.html")),
            ("page.html", include_str!("blog/page.html")),
            ("index.html", include_str!("blog/index.html")),
            ("tag.html", include_str!("blog/tag.html")),
            ("category.html", include_str!("blog/category.html")),
            ("tags-list.html", include_str!("blog/tags-list.html")),
            (
                "categories-list.html",
                include_str!("blog/categories-list.html"),
            ),
            ("not-found.html", include_str!("blog/not-found.html")),
            ("redirect.html", include_str!("blog/redirect.html")),
            // Partials
            (
                "partials/sidebar.html",
                include_str!("blog/partials/sidebar.html"),
            ),
            ("partials/feed.html", include_str!("blog/partials/feed.html")),
            (
                "partials/pagination.html",
                include_str!("blog/partials/pagination.html"),
            ),
            (
                "partials/post-navigation.html",
                include_str!("blog/partials/post-navigation.html"),
            ),
        ])?;

        tera.register_filter("truncate_chars", truncate_chars_filter);

        Ok(Self { tera })
    }

    /// Render the template for a route
    pub fn render_route(&self, template: TemplateId, context: &Context) -> tera::Result<String> {
        self.render(&format!("{}.html", template.as_str()), context)
    }

    /// Render a template by name
    pub fn render(&self, template_name: &str, context: &Context) -> tera::Result<String> {
        self.tera.render(template_name, context)
    }
}

/// Tera filter: truncate by character count
fn truncate_chars_filter(
    value: &tera::Value,
    args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("truncate_chars", "value", String, value);
    let length = match args.get("length") {
        Some(val) => tera::try_get_value!("truncate_chars", "length", usize, val),
        None => 160,
    };

    if s.chars().count() <= length {
        Ok(tera::Value::String(s))
    } else {
        let truncated: String = s.chars().take(length).collect();
        Ok(tera::Value::String(format!("{}…", truncated.trim_end())))
    }
}

/// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub title: String,
    pub subtitle: String,
    pub copyright: String,
    pub url: String,
    pub google_analytics_id: String,
    pub menu: Vec<MenuLink>,
    pub author: AuthorData,
}

#[derive(Debug, Clone, Serialize)]
pub struct MenuLink {
    pub label: String,
    pub path: String,
    pub external: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct AuthorData {
    pub name: String,
    pub photo: String,
    pub bio: String,
    /// Profile link for the byline under posts
    pub twitter: Option<String>,
    pub contacts: Vec<ContactLink>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ContactLink {
    pub network: String,
    pub href: String,
}

/// A post as listed in a feed
#[derive(Debug, Clone, Serialize)]
pub struct PostCard {
    pub slug: String,
    pub title: String,
    pub date: String,
    pub date_xml: String,
    pub category: Option<TermLink>,
    pub description: String,
}

/// A post or page rendered on its own
#[derive(Debug, Clone, Serialize)]
pub struct EntryView {
    pub slug: String,
    pub title: String,
    pub date: String,
    pub date_xml: String,
    pub reading_time: String,
    pub html: String,
    pub tags: Vec<TermLink>,
    pub canonical: Option<String>,
    pub url: String,
    pub share: Vec<crate::helpers::ShareLink>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TermLink {
    pub name: String,
    pub path: String,
}

/// A tag or category with its published post count
#[derive(Debug, Clone, Serialize)]
pub struct TermSummary {
    pub name: String,
    pub path: String,
    pub count: usize,
}
