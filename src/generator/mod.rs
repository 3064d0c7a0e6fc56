//! Generator module - materializes planned routes as static HTML using the
//! built-in Tera templates

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Component, Path, PathBuf};

use tera::Context;
use walkdir::WalkDir;

use crate::content::ContentEntry;
use crate::error::SinkError;
use crate::helpers::{
    contact_href, date_xml, format_post_date, full_url_for, is_plain_path, share_links,
};
use crate::routes::{
    category_path, group_by_category, group_by_tag, published_posts, tag_path, BuildPlan,
    PageRoute, PageSink, PaginationWindow, Redirect, RouteContext, TemplateId, Term,
};
use crate::templates::{
    AuthorData, ContactLink, EntryView, MenuLink, PostCard, SiteData, TemplateRenderer, TermLink,
    TermSummary, STYLESHEET,
};
use crate::Site;

/// Name of the route manifest written next to the pages
pub const MANIFEST_FILE: &str = "routes.json";

/// Netlify-style redirect rules file
pub const REDIRECTS_FILE: &str = "_redirects";

/// Page sink that writes every route as `{path}/index.html` under the public dir
pub struct Generator<'a> {
    site: &'a Site,
    renderer: TemplateRenderer,
    site_data: SiteData,
    entries: HashMap<String, ContentEntry>,
    /// Published posts, newest first
    posts: Vec<ContentEntry>,
    tags: Vec<TermSummary>,
    categories: Vec<TermSummary>,
    written: HashSet<String>,
    manifest: BuildPlan,
}

impl<'a> Generator<'a> {
    /// Create a new generator
    pub fn new(site: &'a Site) -> Result<Self, SinkError> {
        let renderer = TemplateRenderer::new().map_err(SinkError::TemplateLoad)?;
        Ok(Self {
            site,
            renderer,
            site_data: build_site_data(site),
            entries: HashMap::new(),
            posts: Vec::new(),
            tags: Vec::new(),
            categories: Vec::new(),
            written: HashSet::new(),
            manifest: BuildPlan::default(),
        })
    }

    /// Common variables every template reads
    fn base_context(&self, page_title: String, description: &str, is_index: bool) -> Context {
        let mut context = Context::new();
        context.insert("site", &self.site_data);
        context.insert("page_title", &page_title);
        context.insert("description", description);
        context.insert("canonical", &Option::<String>::None);
        context.insert("is_index", &is_index);
        context
    }

    fn entry(&self, slug: &str) -> Result<&ContentEntry, SinkError> {
        self.entries
            .get(slug)
            .ok_or_else(|| SinkError::UnknownSlug(slug.to_string()))
    }

    /// Build the template context for a route
    fn route_context(&self, route: &PageRoute) -> Result<Context, SinkError> {
        let site_title = &self.site.config.title;
        let subtitle = self.site.config.default_description();

        let context = match &route.context {
            RouteContext::Post {
                slug,
                previous_post,
                next_post,
            } => {
                let entry = self.entry(slug)?;
                let mut context = self.base_context(
                    format!("{} - {}", entry.display_title(), site_title),
                    entry.description.as_deref().unwrap_or(subtitle),
                    false,
                );
                context.insert("canonical", &entry.canonical);
                context.insert("entry", &self.entry_view(entry));
                context.insert("previous_post", previous_post);
                context.insert("next_post", next_post);
                context
            }
            RouteContext::Page { slug } => {
                let entry = self.entry(slug)?;
                let mut context = self.base_context(
                    format!("{} - {}", entry.display_title(), site_title),
                    entry.description.as_deref().unwrap_or(subtitle),
                    false,
                );
                context.insert("canonical", &entry.canonical);
                context.insert("entry", &self.entry_view(entry));
                context
            }
            RouteContext::Index(window) => {
                let title = if window.current_page > 0 {
                    format!("Posts - Page {} - {}", window.current_page, site_title)
                } else {
                    site_title.clone()
                };
                let posts: Vec<&ContentEntry> = self.posts.iter().collect();
                self.feed_context(title, subtitle, &posts, window, true)
            }
            RouteContext::Tag { tag, window } => {
                let label = format!("All Posts tagged as \"{}\"", tag);
                let title = feed_title(&label, window, site_title);
                let posts = self.tag_posts(tag);
                let mut context = self.feed_context(title, subtitle, &posts, window, false);
                context.insert("tag", tag);
                context
            }
            RouteContext::Category { category, window } => {
                let title = feed_title(category, window, site_title);
                let posts = self.category_posts(category);
                let mut context = self.feed_context(title, subtitle, &posts, window, false);
                context.insert("category", category);
                context
            }
            RouteContext::Empty => {
                let (title, terms) = match route.template {
                    TemplateId::TagsList => ("Tags", Some(&self.tags)),
                    TemplateId::CategoriesList => ("Categories", Some(&self.categories)),
                    _ => ("Not Found", None),
                };
                let mut context =
                    self.base_context(format!("{} - {}", title, site_title), subtitle, false);
                if let Some(terms) = terms {
                    context.insert("terms", terms);
                }
                context
            }
        };
        Ok(context)
    }

    fn feed_context(
        &self,
        page_title: String,
        description: &str,
        posts: &[&ContentEntry],
        window: &PaginationWindow,
        is_index: bool,
    ) -> Context {
        let cards: Vec<PostCard> = posts
            .get(window.range())
            .unwrap_or_default()
            .iter()
            .map(|p| post_card(p))
            .collect();
        let mut context = self.base_context(page_title, description, is_index);
        context.insert("posts", &cards);
        context.insert("pagination", window);
        context
    }

    /// Published posts tagged `tag`, matched by slug
    fn tag_posts(&self, tag: &str) -> Vec<&ContentEntry> {
        let wanted = slug::slugify(tag);
        self.posts
            .iter()
            .filter(|p| p.tags.iter().any(|t| slug::slugify(t) == wanted))
            .collect()
    }

    /// Published posts filed under `category`, matched by slug
    fn category_posts(&self, category: &str) -> Vec<&ContentEntry> {
        let wanted = slug::slugify(category);
        self.posts
            .iter()
            .filter(|p| p.category.as_deref().is_some_and(|c| slug::slugify(c) == wanted))
            .collect()
    }

    fn entry_view(&self, entry: &ContentEntry) -> EntryView {
        let url = full_url_for(&self.site.config, &entry.slug);
        EntryView {
            slug: entry.slug.clone(),
            title: entry.display_title().to_string(),
            date: entry.date.as_ref().map(format_post_date).unwrap_or_default(),
            date_xml: entry.date.as_ref().map(date_xml).unwrap_or_default(),
            reading_time: entry.reading_time.text.clone(),
            html: entry.html.clone(),
            // Tags that slugify to nothing have no feed to link to
            tags: entry
                .tags
                .iter()
                .filter(|t| !slug::slugify(t).is_empty())
                .map(|t| TermLink {
                    name: t.clone(),
                    path: tag_path(t),
                })
                .collect(),
            canonical: entry.canonical.clone(),
            share: share_links(entry.display_title(), &url),
            url,
        }
    }

    /// Write `html` to `{public}/{path}/index.html`
    fn write_page(&self, path: &str, html: &str) -> Result<(), SinkError> {
        let output_path = self.output_path(path)?;
        write_file(&output_path, html)?;
        tracing::debug!("Generated: {:?}", output_path);
        Ok(())
    }

    /// `{public}/{path}/index.html`; paths that could climb out of the public dir are refused
    fn output_path(&self, path: &str) -> Result<PathBuf, SinkError> {
        let clean_path = path.trim_matches('/');
        let plain = is_plain_path(path)
            && Path::new(clean_path)
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        if !plain {
            return Err(SinkError::UnsafePath(path.to_string()));
        }
        Ok(self.site.public_dir.join(clean_path).join("index.html"))
    }

    /// Drop everything a previous build wrote so removed routes do not linger
    fn clear_public_dir(&self) -> Result<(), SinkError> {
        let public_dir = &self.site.public_dir;
        if !public_dir.exists() {
            return Ok(());
        }
        let sources = [&self.site.base_dir, &self.site.content_dir, &self.site.static_dir];
        if sources.iter().any(|dir| dir.starts_with(public_dir)) {
            return Err(SinkError::UnsafeOutputDir(public_dir.clone()));
        }
        fs::remove_dir_all(public_dir).map_err(|source| SinkError::Write {
            path: public_dir.clone(),
            source,
        })?;
        tracing::debug!("Cleared {:?}", public_dir);
        Ok(())
    }

    fn claim(&mut self, path: &str) -> Result<(), SinkError> {
        if !self.written.insert(path.to_string()) {
            return Err(SinkError::DuplicatePath(path.to_string()));
        }
        Ok(())
    }

    /// Copy images and other non-markdown files from the content and static dirs
    fn copy_assets(&self) -> Result<usize, SinkError> {
        let mut copied = 0;
        for dir in [&self.site.content_dir, &self.site.static_dir] {
            if !dir.is_dir() {
                continue;
            }
            for entry in WalkDir::new(dir).follow_links(true).sort_by_file_name() {
                let entry = entry.map_err(|e| SinkError::Write {
                    path: dir.to_path_buf(),
                    source: e.into(),
                })?;
                let path = entry.path();
                if !entry.file_type().is_file() {
                    continue;
                }
                if matches!(
                    path.extension().and_then(|e| e.to_str()),
                    Some("md") | Some("markdown")
                ) {
                    continue;
                }
                let relative = path.strip_prefix(dir).unwrap_or(path);
                let dest = self.site.public_dir.join(relative);
                if let Some(parent) = dest.parent() {
                    create_dir(parent)?;
                }
                fs::copy(path, &dest).map_err(|source| SinkError::Write {
                    path: dest.clone(),
                    source,
                })?;
                copied += 1;
            }
        }
        Ok(copied)
    }
}

impl PageSink for Generator<'_> {
    fn prepare(&mut self, content: &[ContentEntry]) -> Result<(), SinkError> {
        self.clear_public_dir()?;
        create_dir(&self.site.public_dir)?;

        self.entries = content
            .iter()
            .map(|e| (e.slug.clone(), e.clone()))
            .collect();
        let posts = published_posts(content);
        self.tags = summarize(group_by_tag(&posts), tag_path);
        self.categories = summarize(group_by_category(&posts), category_path);
        self.posts = posts.into_iter().cloned().collect();

        write_file(
            &self.site.public_dir.join("css").join("style.css"),
            STYLESHEET,
        )?;
        let copied = self.copy_assets()?;
        tracing::debug!("Copied {} asset files", copied);
        Ok(())
    }

    fn create_page(&mut self, route: &PageRoute) -> Result<(), SinkError> {
        self.claim(&route.path)?;
        let context = self.route_context(route)?;
        let html = self
            .renderer
            .render_route(route.template, &context)
            .map_err(|source| SinkError::Template {
                template: route.template.to_string(),
                path: route.path.clone(),
                source,
            })?;
        self.write_page(&route.path, &html)?;

        // Static hosts look for a top-level 404.html
        if route.template == TemplateId::NotFound {
            write_file(&self.site.public_dir.join("404.html"), &html)?;
        }

        self.manifest.routes.push(route.clone());
        Ok(())
    }

    fn create_redirect(&mut self, redirect: &Redirect) -> Result<(), SinkError> {
        self.claim(&redirect.from_path)?;
        let mut context = Context::new();
        context.insert("to", &redirect.to_path);
        let html = self
            .renderer
            .render("redirect.html", &context)
            .map_err(|source| SinkError::Template {
                template: "redirect".to_string(),
                path: redirect.from_path.clone(),
                source,
            })?;
        self.write_page(&redirect.from_path, &html)?;
        self.manifest.redirects.push(redirect.clone());
        Ok(())
    }

    fn finish(&mut self) -> Result<(), SinkError> {
        let public_dir = &self.site.public_dir;

        let manifest = serde_json::to_string_pretty(&self.manifest)?;
        write_file(&public_dir.join(MANIFEST_FILE), &manifest)?;

        let rules: String = self
            .manifest
            .redirects
            .iter()
            .map(|r| {
                let status = if r.is_permanent { 301 } else { 302 };
                format!("{} {} {}\n", r.from_path, r.to_path, status)
            })
            .collect();
        write_file(&public_dir.join(REDIRECTS_FILE), &rules)?;

        tracing::info!(
            "Wrote {} pages and {} redirects to {:?}",
            self.manifest.routes.len(),
            self.manifest.redirects.len(),
            public_dir
        );
        Ok(())
    }
}

fn build_site_data(site: &Site) -> SiteData {
    let config = &site.config;
    SiteData {
        title: config.title.clone(),
        subtitle: config.subtitle.clone(),
        copyright: config.copyright.clone(),
        url: config.url.clone(),
        google_analytics_id: config.google_analytics_id.clone(),
        menu: config
            .menu
            .iter()
            .map(|item| MenuLink {
                label: item.label.clone(),
                path: item.path.clone(),
                external: item.is_external(),
            })
            .collect(),
        author: AuthorData {
            name: config.author.name.clone(),
            photo: config.author.photo.clone(),
            bio: config.author.bio.clone(),
            twitter: config
                .author
                .contacts
                .get("twitter")
                .map(|handle| contact_href("twitter", handle)),
            contacts: config
                .author
                .contacts
                .iter()
                .map(|(network, handle)| ContactLink {
                    network: network.clone(),
                    href: contact_href(network, handle),
                })
                .collect(),
        },
    }
}

fn post_card(entry: &ContentEntry) -> PostCard {
    PostCard {
        slug: entry.slug.clone(),
        title: entry.display_title().to_string(),
        date: entry.date.as_ref().map(format_post_date).unwrap_or_default(),
        date_xml: entry.date.as_ref().map(date_xml).unwrap_or_default(),
        category: entry.category.as_ref().map(|c| TermLink {
            name: c.clone(),
            path: category_path(c),
        }),
        description: entry.description.clone().unwrap_or_default(),
    }
}

fn summarize(terms: Vec<Term<'_>>, path: fn(&str) -> String) -> Vec<TermSummary> {
    terms
        .into_iter()
        .map(|term| TermSummary {
            path: path(&term.name),
            count: term.posts.len(),
            name: term.name,
        })
        .collect()
}

/// Title for tag and category feeds; later windows carry their page number
fn feed_title(label: &str, window: &PaginationWindow, site_title: &str) -> String {
    if window.current_page > 0 {
        format!("{} - Page {} - {}", label, window.current_page, site_title)
    } else {
        format!("{} - {}", label, site_title)
    }
}

fn create_dir(path: &Path) -> Result<(), SinkError> {
    fs::create_dir_all(path).map_err(|source| SinkError::Write {
        path: path.to_path_buf(),
        source,
    })
}

fn write_file(path: &Path, content: &str) -> Result<(), SinkError> {
    if let Some(parent) = path.parent() {
        create_dir(parent)?;
    }
    fs::write(path, content).map_err(|source| SinkError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{MemorySource, Template};
    use crate::routes::{paginate, SiteBuilder};
    use chrono::NaiveDate;
    use std::num::NonZeroUsize;
    use tempfile::TempDir;

    fn site(dir: &TempDir) -> Site {
        let mut config = crate::config::SiteConfig::default();
        config.title = "Notes".to_string();
        config.subtitle = "Short notes".to_string();
        Site::with_config(dir.path().to_path_buf(), config)
    }

    fn post(slug: &str, day: u32, tags: &[&str]) -> ContentEntry {
        let mut entry = ContentEntry::new(slug, Template::Post, slug.trim_start_matches('/'));
        entry.date = NaiveDate::from_ymd_opt(2024, 5, day).and_then(|d| d.and_hms_opt(9, 0, 0));
        entry.tags = tags.iter().map(|t| t.to_string()).collect();
        entry.html = format!("<p>{}</p>", slug);
        entry
    }

    #[test]
    fn test_feed_title_numbers_later_windows() {
        let windows = paginate(5, NonZeroUsize::new(2).unwrap(), "/tag/rust");
        assert_eq!(feed_title("Rust", &windows[0], "Notes"), "Rust - Notes");
        assert_eq!(feed_title("Rust", &windows[2], "Notes"), "Rust - Page 2 - Notes");
    }

    #[test]
    fn test_output_paths() {
        let dir = TempDir::new().unwrap();
        let site = site(&dir);
        let generator = Generator::new(&site).unwrap();
        assert_eq!(
            generator.output_path("/").unwrap(),
            site.public_dir.join("index.html")
        );
        assert_eq!(
            generator.output_path("/posts/a/").unwrap(),
            site.public_dir.join("posts/a/index.html")
        );
        for escaping in ["/../../escaped", "/posts/../../x", "//etc"] {
            assert!(matches!(
                generator.output_path(escaping),
                Err(SinkError::UnsafePath(_))
            ));
        }
    }

    #[test]
    fn test_escaping_route_is_not_written() {
        let dir = TempDir::new().unwrap();
        let mut site = site(&dir);
        site.public_dir = dir.path().join("site/public");
        let mut generator = Generator::new(&site).unwrap();
        generator.prepare(&[]).unwrap();

        let route = PageRoute {
            path: "/../../escaped".to_string(),
            template: TemplateId::NotFound,
            context: RouteContext::Empty,
        };
        assert!(generator.create_page(&route).is_err());
        assert!(!dir.path().join("escaped").exists());
    }

    #[test]
    fn test_rebuild_drops_stale_pages() {
        let dir = TempDir::new().unwrap();
        let mut site = site(&dir);
        site.config.posts_per_page = 1;

        let two_posts = MemorySource::new(vec![post("/posts/a", 1, &[]), post("/posts/b", 2, &[])]);
        let mut generator = Generator::new(&site).unwrap();
        SiteBuilder::new(&site.config)
            .build(&two_posts, &mut generator)
            .unwrap();
        assert!(site.public_dir.join("posts/a/index.html").exists());
        assert!(site.public_dir.join("page/1/index.html").exists());

        let one_post = MemorySource::new(vec![post("/posts/b", 2, &[])]);
        let mut generator = Generator::new(&site).unwrap();
        SiteBuilder::new(&site.config)
            .build(&one_post, &mut generator)
            .unwrap();
        assert!(!site.public_dir.join("posts/a/index.html").exists());
        assert!(!site.public_dir.join("page/1").exists());
        assert!(site.public_dir.join("posts/b/index.html").exists());
    }

    #[test]
    fn test_public_dir_holding_sources_is_not_cleared() {
        let dir = TempDir::new().unwrap();
        let mut site = site(&dir);
        site.public_dir = dir.path().to_path_buf();
        let mut generator = Generator::new(&site).unwrap();
        assert!(matches!(
            generator.prepare(&[]),
            Err(SinkError::UnsafeOutputDir(_))
        ));
        assert!(dir.path().exists());
    }

    #[test]
    fn test_post_view_skips_unlinkable_tags_and_links_twitter() {
        let dir = TempDir::new().unwrap();
        let mut site = site(&dir);
        site.config
            .author
            .contacts
            .insert("twitter".to_string(), "sam".to_string());
        let source = MemorySource::new(vec![post("/posts/a", 1, &["Rust", "!!!"])]);
        let mut generator = Generator::new(&site).unwrap();
        SiteBuilder::new(&site.config)
            .build(&source, &mut generator)
            .unwrap();

        let html = fs::read_to_string(site.public_dir.join("posts/a/index.html")).unwrap();
        assert!(html.contains("href=\"/tag/rust\""));
        assert!(!html.contains("href=\"/tag/\""));
        assert!(html.contains(
            "class=\"author__bio-twitter\" href=\"https://www.twitter.com/sam\""
        ));
    }

    #[test]
    fn test_tag_feed_lists_only_tagged_posts() {
        let dir = TempDir::new().unwrap();
        let site = site(&dir);
        let source = MemorySource::new(vec![
            post("/posts/a", 1, &["Rust"]),
            post("/posts/b", 2, &[]),
            post("/posts/c", 3, &["rust"]),
        ]);
        let mut generator = Generator::new(&site).unwrap();
        SiteBuilder::new(&site.config)
            .build(&source, &mut generator)
            .unwrap();

        let feed = fs::read_to_string(site.public_dir.join("tag/rust/index.html")).unwrap();
        assert!(feed.contains("href=\"/posts/a\""));
        assert!(feed.contains("href=\"/posts/c\""));
        assert!(!feed.contains("href=\"/posts/b\""));

        let tags = fs::read_to_string(site.public_dir.join("tags/index.html")).unwrap();
        assert!(tags.contains("/tag/rust"));

        let not_found = fs::read_to_string(site.public_dir.join("404.html")).unwrap();
        assert!(not_found.contains("Not Found - Notes"));
    }

    #[test]
    fn test_unknown_slug_is_an_error() {
        let dir = TempDir::new().unwrap();
        let site = site(&dir);
        let mut generator = Generator::new(&site).unwrap();
        generator.prepare(&[]).unwrap();

        let route = PageRoute {
            path: "/posts/ghost".to_string(),
            template: TemplateId::Page,
            context: RouteContext::Page {
                slug: "/posts/ghost".to_string(),
            },
        };
        let err = generator.create_page(&route).unwrap_err();
        assert!(matches!(err, SinkError::UnknownSlug(slug) if slug == "/posts/ghost"));
    }

    #[test]
    fn test_duplicate_path_is_rejected() {
        let dir = TempDir::new().unwrap();
        let site = site(&dir);
        let mut generator = Generator::new(&site).unwrap();
        generator.prepare(&[]).unwrap();

        let route = PageRoute {
            path: "/404".to_string(),
            template: TemplateId::NotFound,
            context: RouteContext::Empty,
        };
        generator.create_page(&route).unwrap();
        assert!(matches!(
            generator.create_page(&route),
            Err(SinkError::DuplicatePath(_))
        ));
    }
}
