//! Error types for the builder

use std::path::PathBuf;
use thiserror::Error;

/// The content query failed. Always fatal for the build.
#[derive(Error, Debug)]
pub enum ContentSourceError {
    #[error("content directory not found: {0:?}")]
    MissingRoot(PathBuf),

    #[error("failed to walk content directory")]
    Walk(#[from] walkdir::Error),

    #[error("failed to read {path:?}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to render markdown in {path:?}: {message}")]
    Render { path: PathBuf, message: String },
}

/// `_config.yml` could not be loaded or holds values the builder cannot work with.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path:?}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path:?}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("posts_per_page must be at least 1, got {0}")]
    InvalidPageSize(usize),
}

/// A page sink refused or failed to materialize a route.
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("route path {0:?} registered twice")]
    DuplicatePath(String),

    #[error("failed to write {path:?}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to load templates")]
    TemplateLoad(#[source] tera::Error),

    #[error("failed to render template `{template}` for {path:?}")]
    Template {
        template: String,
        path: String,
        #[source]
        source: tera::Error,
    },

    #[error("failed to serialize route manifest")]
    Manifest(#[from] serde_json::Error),

    #[error("no content entry with slug {0:?}")]
    UnknownSlug(String),

    #[error("route path {0:?} would be written outside the public directory")]
    UnsafePath(String),

    #[error("refusing to clear {0:?}: it contains site sources")]
    UnsafeOutputDir(PathBuf),
}

/// Everything that can abort a build.
#[derive(Error, Debug)]
pub enum BuildError {
    #[error("content source query failed")]
    ContentSource(#[from] ContentSourceError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("slug {slug:?} is used by more than one document")]
    DuplicateSlug { slug: String },

    #[error(transparent)]
    Sink(#[from] SinkError),
}
