//! Tag and category grouping

use std::collections::BTreeMap;

use crate::content::ContentEntry;

/// Path prefix of a tag's feed
pub fn tag_path(tag: &str) -> String {
    format!("/tag/{}", slug::slugify(tag))
}

/// Path prefix of a category's feed
pub fn category_path(category: &str) -> String {
    format!("/category/{}", slug::slugify(category))
}

/// Posts sharing one tag or category.
///
/// Terms are keyed by slug; the first spelling seen becomes the display name.
#[derive(Debug, Clone)]
pub struct Term<'a> {
    pub name: String,
    pub slug: String,
    pub posts: Vec<&'a ContentEntry>,
}

/// Group posts by tag, in slug order. Post order inside a term follows `posts`.
pub fn group_by_tag<'a>(posts: &[&'a ContentEntry]) -> Vec<Term<'a>> {
    group(posts, |post| post.tags.iter().map(String::as_str).collect())
}

/// Group posts by category, in slug order
pub fn group_by_category<'a>(posts: &[&'a ContentEntry]) -> Vec<Term<'a>> {
    group(posts, |post| post.category.as_deref().into_iter().collect())
}

fn group<'a>(
    posts: &[&'a ContentEntry],
    names: impl Fn(&ContentEntry) -> Vec<&str>,
) -> Vec<Term<'a>> {
    let mut terms: BTreeMap<String, Term<'a>> = BTreeMap::new();

    for &post in posts {
        for name in names(post) {
            let slug = slug::slugify(name);
            if slug.is_empty() {
                continue;
            }
            let term = terms.entry(slug.clone()).or_insert_with(|| Term {
                name: name.to_string(),
                slug,
                posts: Vec::new(),
            });
            // "Rust" and "rust" on the same post count once
            let already_listed = term
                .posts
                .last()
                .is_some_and(|last| std::ptr::eq(*last, post));
            if !already_listed {
                term.posts.push(post);
            }
        }
    }

    terms.into_values().collect()
}
