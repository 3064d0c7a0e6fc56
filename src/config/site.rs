//! Site configuration (_config.yml)

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::ConfigError;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub url: String,
    pub title: String,
    pub subtitle: String,
    pub copyright: String,
    #[serde(alias = "disqusShortname")]
    pub disqus_shortname: String,
    #[serde(alias = "googleAnalyticsId")]
    pub google_analytics_id: String,

    // Pagination
    #[serde(alias = "postsPerPage")]
    pub posts_per_page: usize,

    // Navigation
    pub menu: Vec<MenuItem>,
    pub author: AuthorConfig,

    /// Legacy paths that permanently point somewhere else
    pub redirects: Vec<RedirectRule>,

    // Directory
    pub content_dir: String,
    pub public_dir: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost".to_string(),
            title: "Blog".to_string(),
            subtitle: String::new(),
            copyright: "© All rights reserved.".to_string(),
            disqus_shortname: String::new(),
            google_analytics_id: String::new(),

            posts_per_page: 4,

            menu: vec![MenuItem {
                label: "Articles".to_string(),
                path: "/".to_string(),
            }],
            author: AuthorConfig::default(),

            redirects: Vec::new(),

            content_dir: "content".to_string(),
            public_dir: "public".to_string(),
        }
    }
}

impl SiteConfig {
    /// Load and validate configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: SiteConfig =
            serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        tracing::debug!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Reject values that would make the build degenerate
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.posts_per_page == 0 {
            return Err(ConfigError::InvalidPageSize(self.posts_per_page));
        }
        Ok(())
    }

    /// Meta description used when a document has none of its own
    pub fn default_description(&self) -> &str {
        &self.subtitle
    }
}

/// Sidebar menu entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    pub label: String,
    pub path: String,
}

impl MenuItem {
    /// External links leave the site and open in a new tab
    pub fn is_external(&self) -> bool {
        self.path.starts_with("http")
    }
}

/// Author identity shown in the sidebar and under each post
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthorConfig {
    pub name: String,
    pub photo: String,
    pub bio: String,
    /// Network name -> handle, in the order written in the config file
    pub contacts: IndexMap<String, String>,
}

impl Default for AuthorConfig {
    fn default() -> Self {
        Self {
            name: "John Doe".to_string(),
            photo: "/photo.jpg".to_string(),
            bio: String::new(),
            contacts: IndexMap::new(),
        }
    }
}

/// One row of the redirect table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedirectRule {
    pub from: String,
    pub to: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.title, "Blog");
        assert_eq!(config.posts_per_page, 4);
        assert_eq!(config.content_dir, "content");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
url: https://adrianfaciu.dev
title: Blog by Adrian
postsPerPage: 7
menu:
  - label: Articles
    path: /
  - label: GitHub
    path: https://github.com/adrianfaciu
author:
  name: Adrian
  contacts:
    twitter: adrianfaciu
    email: adrian@example.com
    github: adrianfaciu
redirects:
  - from: /sharedarticles
    to: https://reederapp.net/abc
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.title, "Blog by Adrian");
        assert_eq!(config.posts_per_page, 7);
        assert_eq!(config.menu.len(), 2);
        assert!(!config.menu[0].is_external());
        assert!(config.menu[1].is_external());
        let networks: Vec<_> = config.author.contacts.keys().cloned().collect();
        assert_eq!(networks, vec!["twitter", "email", "github"]);
        assert_eq!(config.redirects[0].from, "/sharedarticles");
        // Untouched fields keep their defaults
        assert_eq!(config.public_dir, "public");
    }

    #[test]
    fn test_camel_case_keys() {
        let yaml = "disqusShortname: blog-comments\ngoogleAnalyticsId: G-12345\n";
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.disqus_shortname, "blog-comments");
        assert_eq!(config.google_analytics_id, "G-12345");
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("_config.yml");
        fs::write(&path, "posts_per_page: 0\n").unwrap();

        let err = SiteConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPageSize(0)));
    }

    #[test]
    fn test_negative_page_size_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("_config.yml");
        fs::write(&path, "posts_per_page: -3\n").unwrap();

        let err = SiteConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
