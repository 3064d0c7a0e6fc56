//! Route planning - turns content entries into routed pages.
//!
//! Planning is pure: [`plan_routes`] maps a content list and the site
//! configuration to route descriptors. [`SiteBuilder`] runs the content
//! query, plans, and hands the result to a [`PageSink`].

mod pagination;
mod redirect;
pub mod sink;
mod taxonomy;

use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::num::NonZeroUsize;

pub use pagination::{paginate, window_path, PaginationWindow};
pub use redirect::{redirect_table, Redirect};
pub use sink::{PageSink, RouteCollector};
pub use taxonomy::{category_path, group_by_category, group_by_tag, tag_path, Term};

use crate::config::SiteConfig;
use crate::content::{sort_by_date_desc, ContentEntry, ContentSource};
use crate::error::{BuildError, ConfigError};

pub const NOT_FOUND_PATH: &str = "/404";
pub const TAGS_LIST_PATH: &str = "/tags";
pub const CATEGORIES_LIST_PATH: &str = "/categories";

/// Template a route is rendered with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TemplateId {
    NotFound,
    TagsList,
    CategoriesList,
    Page,
    Post,
    Index,
    Tag,
    Category,
}

impl TemplateId {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateId::NotFound => "not-found",
            TemplateId::TagsList => "tags-list",
            TemplateId::CategoriesList => "categories-list",
            TemplateId::Page => "page",
            TemplateId::Post => "post",
            TemplateId::Index => "index",
            TemplateId::Tag => "tag",
            TemplateId::Category => "category",
        }
    }
}

impl std::fmt::Display for TemplateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Link to a neighbouring post
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavLink {
    pub slug: String,
    pub title: String,
}

impl NavLink {
    fn to(entry: &ContentEntry) -> Self {
        Self {
            slug: entry.slug.clone(),
            title: entry.display_title().to_string(),
        }
    }
}

/// Data a template needs, exactly the fields it declares
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged, rename_all_fields = "camelCase")]
pub enum RouteContext {
    Page {
        slug: String,
    },
    Post {
        slug: String,
        previous_post: Option<NavLink>,
        next_post: Option<NavLink>,
    },
    Tag {
        tag: String,
        #[serde(flatten)]
        window: PaginationWindow,
    },
    Category {
        category: String,
        #[serde(flatten)]
        window: PaginationWindow,
    },
    Index(PaginationWindow),
    Empty,
}

impl RouteContext {
    /// The context as the key/value map handed to templates
    pub fn to_map(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }

    /// Pagination window, for feed routes
    pub fn window(&self) -> Option<&PaginationWindow> {
        match self {
            RouteContext::Tag { window, .. }
            | RouteContext::Category { window, .. }
            | RouteContext::Index(window) => Some(window),
            _ => None,
        }
    }
}

/// A path bound to a template and its context
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageRoute {
    pub path: String,
    pub template: TemplateId,
    #[serde(serialize_with = "serialize_context")]
    pub context: RouteContext,
}

fn serialize_context<S: serde::Serializer>(
    context: &RouteContext,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    context.to_map().serialize(serializer)
}

impl PageRoute {
    fn new(path: impl Into<String>, template: TemplateId, context: RouteContext) -> Self {
        Self {
            path: path.into(),
            template,
            context,
        }
    }
}

/// Everything one build registers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildPlan {
    pub routes: Vec<PageRoute>,
    pub redirects: Vec<Redirect>,
}

/// Published posts (not drafts) in content order
pub fn published_posts(entries: &[ContentEntry]) -> Vec<&ContentEntry> {
    entries.iter().filter(|e| e.is_published_post()).collect()
}

/// Plan every route for `entries`, which must already be sorted newest first.
///
/// Order: content routes in content order, the fixed routes, then tag,
/// category and root feed windows.
pub fn plan_routes(entries: &[ContentEntry], config: &SiteConfig) -> Result<BuildPlan, BuildError> {
    let page_size = NonZeroUsize::new(config.posts_per_page)
        .ok_or(ConfigError::InvalidPageSize(config.posts_per_page))?;
    ensure_unique_slugs(entries)?;

    let posts = published_posts(entries);
    let mut routes = content_routes(entries, &posts);

    routes.push(PageRoute::new(
        NOT_FOUND_PATH,
        TemplateId::NotFound,
        RouteContext::Empty,
    ));
    routes.push(PageRoute::new(
        TAGS_LIST_PATH,
        TemplateId::TagsList,
        RouteContext::Empty,
    ));
    routes.push(PageRoute::new(
        CATEGORIES_LIST_PATH,
        TemplateId::CategoriesList,
        RouteContext::Empty,
    ));

    for term in group_by_tag(&posts) {
        let prefix = format!("/tag/{}", term.slug);
        for window in paginate(term.posts.len(), page_size, &prefix) {
            routes.push(PageRoute::new(
                window.path(&prefix),
                TemplateId::Tag,
                RouteContext::Tag {
                    tag: term.name.clone(),
                    window,
                },
            ));
        }
    }

    for term in group_by_category(&posts) {
        let prefix = format!("/category/{}", term.slug);
        for window in paginate(term.posts.len(), page_size, &prefix) {
            routes.push(PageRoute::new(
                window.path(&prefix),
                TemplateId::Category,
                RouteContext::Category {
                    category: term.name.clone(),
                    window,
                },
            ));
        }
    }

    for window in paginate(posts.len(), page_size, "/") {
        routes.push(PageRoute::new(
            window.path("/"),
            TemplateId::Index,
            RouteContext::Index(window),
        ));
    }

    Ok(BuildPlan {
        routes,
        redirects: redirect_table(config),
    })
}

/// One route per `post`/`page` entry; other templates are skipped
fn content_routes(entries: &[ContentEntry], posts: &[&ContentEntry]) -> Vec<PageRoute> {
    let mut routes = Vec::new();

    for entry in entries {
        if entry.is_page() {
            routes.push(PageRoute::new(
                entry.slug.clone(),
                TemplateId::Page,
                RouteContext::Page {
                    slug: entry.slug.clone(),
                },
            ));
        } else if entry.is_post() {
            let position = posts.iter().position(|p| p.slug == entry.slug);
            // posts[i + 1] is older, posts[i - 1] is newer; drafts have no position
            let (previous_post, next_post) = match position {
                Some(i) => (
                    posts.get(i + 1).map(|p| NavLink::to(p)),
                    i.checked_sub(1)
                        .and_then(|j| posts.get(j))
                        .map(|p| NavLink::to(p)),
                ),
                None => (None, None),
            };
            routes.push(PageRoute::new(
                entry.slug.clone(),
                TemplateId::Post,
                RouteContext::Post {
                    slug: entry.slug.clone(),
                    previous_post,
                    next_post,
                },
            ));
        } else {
            tracing::debug!(
                "Not routing {} (template `{}`)",
                entry.slug,
                entry.template.as_str()
            );
        }
    }

    routes
}

fn ensure_unique_slugs(entries: &[ContentEntry]) -> Result<(), BuildError> {
    let mut seen = HashSet::new();
    for entry in entries {
        if !seen.insert(entry.slug.as_str()) {
            return Err(BuildError::DuplicateSlug {
                slug: entry.slug.clone(),
            });
        }
    }
    Ok(())
}

/// Counts reported after a build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BuildSummary {
    pub documents: usize,
    pub pages: usize,
    pub redirects: usize,
}

/// Runs one build: query, plan, emit
pub struct SiteBuilder<'a> {
    config: &'a SiteConfig,
}

impl<'a> SiteBuilder<'a> {
    pub fn new(config: &'a SiteConfig) -> Self {
        Self { config }
    }

    /// Query `source` once and register every route with `sink`.
    ///
    /// Nothing reaches the sink unless the query and planning both succeed.
    pub fn build(
        &self,
        source: &dyn ContentSource,
        sink: &mut dyn PageSink,
    ) -> Result<BuildSummary, BuildError> {
        let mut entries = source.query()?;
        sort_by_date_desc(&mut entries);
        tracing::info!("Queried {} documents", entries.len());

        let plan = plan_routes(&entries, self.config)?;

        sink.prepare(&entries)?;
        for route in &plan.routes {
            tracing::debug!("Creating page {} ({})", route.path, route.template);
            sink.create_page(route)?;
        }
        for redirect in &plan.redirects {
            tracing::debug!("Creating redirect {} -> {}", redirect.from_path, redirect.to_path);
            sink.create_redirect(redirect)?;
        }
        sink.finish()?;

        let summary = BuildSummary {
            documents: entries.len(),
            pages: plan.routes.len(),
            redirects: plan.redirects.len(),
        };
        tracing::info!(
            "Registered {} pages and {} redirects",
            summary.pages,
            summary.redirects
        );
        Ok(summary)
    }
}
