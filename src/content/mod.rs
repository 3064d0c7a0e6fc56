//! Content module - documents, front-matter, markdown and content sources

mod entry;
mod frontmatter;
pub mod loader;
mod markdown;
mod source;

pub use entry::{sort_by_date_desc, ContentEntry, ReadingTime, Template};
pub use frontmatter::FrontMatter;
pub use loader::ContentLoader;
pub use markdown::{count_words, strip_html, MarkdownRenderer, RenderedBody};
pub use source::{ContentSource, MemorySource};
