//! Redirect table

use serde::Serialize;

use crate::config::SiteConfig;
use crate::helpers::is_plain_path;

/// A legacy path that permanently points at another URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Redirect {
    pub from_path: String,
    pub to_path: String,
    pub is_permanent: bool,
}

impl Redirect {
    pub fn permanent(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from_path: from.into(),
            to_path: to.into(),
            is_permanent: true,
        }
    }
}

/// Every configured redirect, emitted on every build.
///
/// A rule for `/legacy` also covers `/legacy/`, so both spellings resolve.
pub fn redirect_table(config: &SiteConfig) -> Vec<Redirect> {
    let mut table = Vec::new();
    for rule in &config.redirects {
        let from = rule.from.trim();
        let bare = from.trim_end_matches('/');
        if bare.is_empty() {
            tracing::warn!("Ignoring redirect from the site root to {}", rule.to);
            continue;
        }
        if !is_plain_path(bare) {
            tracing::warn!("Ignoring redirect from {:?}: not a plain site path", rule.from);
            continue;
        }
        for variant in [bare.to_string(), format!("{}/", bare)] {
            if !table.iter().any(|r: &Redirect| r.from_path == variant) {
                table.push(Redirect::permanent(variant, rule.to.trim()));
            }
        }
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RedirectRule;

    #[test]
    fn test_both_slash_variants_are_redirected() {
        let mut config = SiteConfig::default();
        config.redirects = vec![RedirectRule {
            from: "/sharedarticles".to_string(),
            to: "https://reederapp.net/2mR0".to_string(),
        }];

        let table = redirect_table(&config);
        assert_eq!(
            table,
            vec![
                Redirect::permanent("/sharedarticles", "https://reederapp.net/2mR0"),
                Redirect::permanent("/sharedarticles/", "https://reederapp.net/2mR0"),
            ]
        );
        assert!(table.iter().all(|r| r.is_permanent));
    }

    #[test]
    fn test_root_redirect_is_ignored() {
        let mut config = SiteConfig::default();
        config.redirects = vec![RedirectRule {
            from: "/".to_string(),
            to: "https://elsewhere.example".to_string(),
        }];
        assert!(redirect_table(&config).is_empty());
    }

    #[test]
    fn test_escaping_redirect_is_ignored() {
        let mut config = SiteConfig::default();
        config.redirects = vec![
            RedirectRule {
                from: "/../outside".to_string(),
                to: "https://elsewhere.example".to_string(),
            },
            RedirectRule {
                from: "/kept".to_string(),
                to: "/posts/kept".to_string(),
            },
        ];
        let table = redirect_table(&config);
        assert_eq!(table.len(), 2);
        assert!(table.iter().all(|r| r.from_path.starts_with("/kept")));
    }
}
