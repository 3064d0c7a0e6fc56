//! URL helper functions

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::config::SiteConfig;

/// Characters `encodeURIComponent` leaves alone
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Normalize a site-relative path to start with exactly one `/`
///
/// # Examples
/// ```ignore
/// url_for("posts/hello") // -> "/posts/hello"
/// ```
pub fn url_for(path: &str) -> String {
    format!("/{}", path.trim_start_matches('/'))
}

/// Absolute URL of a site path
///
/// # Examples
/// ```ignore
/// full_url_for(&config, "/posts/hello") // -> "https://example.com/posts/hello"
/// ```
pub fn full_url_for(config: &SiteConfig, path: &str) -> String {
    if is_external(path) {
        return path.to_string();
    }
    format!("{}{}", config.url.trim_end_matches('/'), url_for(path))
}

/// Whether a link points off-site
pub fn is_external(path: &str) -> bool {
    path.starts_with("http")
}

/// Whether a site path stays inside the output tree: `/`-separated segments,
/// none of them empty, `.` or `..`. The root `/` qualifies.
pub fn is_plain_path(path: &str) -> bool {
    let inner = path.strip_prefix('/').unwrap_or(path);
    let inner = inner.strip_suffix('/').unwrap_or(inner);
    if inner.is_empty() {
        return true;
    }
    !inner.contains('\\')
        && inner
            .split('/')
            .all(|segment| !segment.is_empty() && segment != "." && segment != "..")
}

/// Percent-encode a string the way `encodeURIComponent` does
pub fn encode_uri_component(value: &str) -> String {
    utf8_percent_encode(value, URI_COMPONENT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> SiteConfig {
        SiteConfig {
            url: "https://adrianfaciu.dev/".to_string(),
            ..SiteConfig::default()
        }
    }

    #[test]
    fn test_url_for() {
        assert_eq!(url_for("posts/a"), "/posts/a");
        assert_eq!(url_for("//posts/a"), "/posts/a");
        assert_eq!(url_for(""), "/");
    }

    #[test]
    fn test_full_url_for() {
        let config = test_config();
        assert_eq!(
            full_url_for(&config, "/posts/a"),
            "https://adrianfaciu.dev/posts/a"
        );
        assert_eq!(
            full_url_for(&config, "https://other.example/x"),
            "https://other.example/x"
        );
    }

    #[test]
    fn test_encode_uri_component() {
        assert_eq!(
            encode_uri_component("Hello world! https://a.dev/x?y=1"),
            "Hello%20world!%20https%3A%2F%2Fa.dev%2Fx%3Fy%3D1"
        );
        assert_eq!(encode_uri_component("Fâciu"), "F%C3%A2ciu");
    }

    #[test]
    fn test_is_plain_path() {
        assert!(is_plain_path("/"));
        assert!(is_plain_path("/posts/hello"));
        assert!(is_plain_path("/legacy/"));
        assert!(!is_plain_path("/../../escaped"));
        assert!(!is_plain_path("/posts/./a"));
        assert!(!is_plain_path("/posts//a"));
        assert!(!is_plain_path("/posts\\..\\a"));
    }
}
