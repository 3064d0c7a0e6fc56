//! Pagination windows over ordered post lists

use serde::Serialize;
use std::num::NonZeroUsize;
use std::ops::Range;

/// One page's worth of a longer list, plus links to its neighbours.
///
/// Serialized field names are the ones feed templates read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationWindow {
    /// 0-based window number
    pub current_page: usize,
    pub posts_limit: usize,
    pub posts_offset: usize,
    /// Items actually in this window (the last one may be partial)
    pub posts_count: usize,
    pub total_pages: usize,
    pub prev_page_path: Option<String>,
    pub next_page_path: Option<String>,
    pub has_prev_page: bool,
    pub has_next_page: bool,
}

impl PaginationWindow {
    /// Index range of the windowed list covered by this window
    pub fn range(&self) -> Range<usize> {
        self.posts_offset..self.posts_offset + self.posts_count
    }

    /// Path of this window under `prefix`
    pub fn path(&self, prefix: &str) -> String {
        window_path(prefix, self.current_page)
    }
}

/// Path of window `k` under `prefix`: the prefix itself for the first window,
/// `{prefix}/page/{k}` after that. The root prefix is `/`.
pub fn window_path(prefix: &str, k: usize) -> String {
    let base = prefix.trim_end_matches('/');
    match (k, base.is_empty()) {
        (0, true) => "/".to_string(),
        (0, false) => base.to_string(),
        (k, _) => format!("{}/page/{}", base, k),
    }
}

/// Split a list of `len` items into contiguous windows of `page_size`.
///
/// An empty list still yields one empty window so "no posts yet" stays routable.
pub fn paginate(len: usize, page_size: NonZeroUsize, prefix: &str) -> Vec<PaginationWindow> {
    let page_size = page_size.get();
    let total_pages = len.div_ceil(page_size).max(1);

    (0..total_pages)
        .map(|k| {
            let offset = k * page_size;
            let end = ((k + 1) * page_size).min(len);
            let has_prev_page = k > 0;
            let has_next_page = k + 1 < total_pages;
            PaginationWindow {
                current_page: k,
                posts_limit: page_size,
                posts_offset: offset,
                posts_count: end.saturating_sub(offset),
                total_pages,
                prev_page_path: has_prev_page.then(|| window_path(prefix, k - 1)),
                next_page_path: has_next_page.then(|| window_path(prefix, k + 1)),
                has_prev_page,
                has_next_page,
            }
        })
        .collect()
}
