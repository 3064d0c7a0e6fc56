//! Content loader - reads markdown documents from the content directory

use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::{sort_by_date_desc, ContentEntry, ContentSource, FrontMatter, MarkdownRenderer, Template};
use crate::error::ContentSourceError;
use crate::helpers::is_plain_path;
use crate::Site;

/// Loads every markdown document under the content directory
pub struct ContentLoader {
    root: PathBuf,
    renderer: MarkdownRenderer,
}

impl ContentLoader {
    /// Create a loader for the site's content directory
    pub fn new(site: &Site) -> Self {
        Self::with_root(&site.content_dir)
    }

    /// Create a loader for an arbitrary directory
    pub fn with_root<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            renderer: MarkdownRenderer::new(),
        }
    }

    /// Load all documents, newest first
    pub fn load(&self) -> Result<Vec<ContentEntry>, ContentSourceError> {
        if !self.root.is_dir() {
            return Err(ContentSourceError::MissingRoot(self.root.clone()));
        }

        let mut entries = Vec::new();
        for entry in WalkDir::new(&self.root)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = entry?;
            let path = entry.path();
            if !entry.file_type().is_file() || !is_markdown_file(path) {
                continue;
            }
            if let Some(content_entry) = self.load_entry(path)? {
                entries.push(content_entry);
            }
        }

        sort_by_date_desc(&mut entries);
        tracing::debug!("Loaded {} documents from {:?}", entries.len(), self.root);
        Ok(entries)
    }

    /// Load one document. `Ok(None)` means it lacks a template or has an unusable
    /// slug and is skipped.
    fn load_entry(&self, path: &Path) -> Result<Option<ContentEntry>, ContentSourceError> {
        let content = fs::read_to_string(path).map_err(|source| ContentSourceError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let (fm, body) = FrontMatter::parse(&content);

        let Some(template) = fm.template.as_deref().map(Template::parse) else {
            tracing::debug!("Skipping {:?}: no template in front-matter", path);
            return Ok(None);
        };

        let date = fm.parse_date();
        if fm.date.is_some() && date.is_none() {
            tracing::warn!("Unrecognized date {:?} in {:?}", fm.date, path);
        }

        let slug = match fm.slug.as_deref() {
            Some(slug) if !slug.trim().is_empty() => normalize_slug(slug),
            _ => self.slug_from_path(path),
        };
        if !is_plain_path(&slug) {
            tracing::warn!("Skipping {:?}: slug {:?} leaves the site tree", path, slug);
            return Ok(None);
        }

        let rendered = self
            .renderer
            .render(body)
            .map_err(|message| ContentSourceError::Render {
                path: path.to_path_buf(),
                message,
            })?;

        Ok(Some(ContentEntry {
            slug,
            template,
            title: fm.title.unwrap_or_default(),
            date,
            draft: fm.draft,
            tags: fm
                .tags
                .into_iter()
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect(),
            category: non_blank(fm.category),
            canonical: non_blank(fm.canonical),
            description: non_blank(fm.description),
            html: rendered.html,
            reading_time: rendered.reading_time,
        }))
    }

    /// Derive a slug from the file's location: `posts/hello.md` -> `/posts/hello`,
    /// `pages/about/index.md` -> `/pages/about`
    fn slug_from_path(&self, path: &Path) -> String {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        let mut parts: Vec<String> = relative
            .with_extension("")
            .components()
            .filter_map(|c| c.as_os_str().to_str().map(str::to_string))
            .collect();
        if parts.last().map(String::as_str) == Some("index") {
            parts.pop();
        }
        format!("/{}", parts.join("/"))
    }
}

impl ContentSource for ContentLoader {
    fn query(&self) -> Result<Vec<ContentEntry>, ContentSourceError> {
        self.load()
    }
}

/// Ensure a leading slash and drop trailing ones (except for the root)
fn normalize_slug(slug: &str) -> String {
    let trimmed = slug.trim().trim_matches('/');
    format!("/{}", trimmed)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Check if a file is a markdown file
fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "md" || e == "markdown")
        .unwrap_or(false)
}
