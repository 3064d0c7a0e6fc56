//! Date helper functions

use chrono::NaiveDateTime;

/// Date shown under a post, e.g. "1 Mar 2024"
pub fn format_post_date(date: &NaiveDateTime) -> String {
    date.format("%-d %b %Y").to_string()
}

/// Machine-readable date for `<time datetime>`
pub fn date_xml(date: &NaiveDateTime) -> String {
    date.format("%Y-%m-%dT%H:%M:%S").to_string()
}
