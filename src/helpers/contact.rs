//! Contact-link resolver

/// Profile URL for a contact network and handle.
///
/// Unknown networks pass the handle through unchanged, so a config entry can
/// hold a full URL (or `#`) directly.
pub fn contact_href(network: &str, handle: &str) -> String {
    match network {
        "twitter" => format!("https://www.twitter.com/{}", handle),
        "github" => format!("https://github.com/{}", handle),
        "vkontakte" => format!("https://vk.com/{}", handle),
        "telegram" => format!("telegram:{}", handle),
        "email" => format!("mailto:{}", handle),
        "stackoverflow" => format!("https://stackoverflow.com/users/225780/{}", handle),
        "medium" => format!("https://medium.com/@{}", handle),
        "linkedin" => format!("https://www.linkedin.com/in/{}", handle),
        "bluesky" => format!("https://bsky.app/profile/{}", handle),
        _ => handle.to_string(),
    }
}
