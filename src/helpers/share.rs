//! Share-to links shown under each post

use serde::Serialize;

use super::url::encode_uri_component;

/// One share target
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShareLink {
    pub label: &'static str,
    pub href: String,
}

/// LinkedIn's share-offsite endpoint
pub fn linkedin_share_url(url: &str) -> String {
    format!(
        "https://www.linkedin.com/sharing/share-offsite/?url={}",
        encode_uri_component(url)
    )
}

/// Bluesky compose intent prefilled with "{text} {url}"
pub fn bluesky_share_url(text: &str, url: &str) -> String {
    format!(
        "https://bsky.app/intent/compose?text={}",
        encode_uri_component(&format!("{} {}", text, url))
    )
}

/// All share links for a post, in display order
pub fn share_links(text: &str, url: &str) -> Vec<ShareLink> {
    vec![
        ShareLink {
            label: "LinkedIn",
            href: linkedin_share_url(url),
        },
        ShareLink {
            label: "Bluesky",
            href: bluesky_share_url(text, url),
        },
    ]
}
