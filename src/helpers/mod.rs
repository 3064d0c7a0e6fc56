//! Helper functions for templates: links, dates, contacts and sharing

mod contact;
mod date;
mod share;
mod url;

pub use contact::*;
pub use date::*;
pub use share::*;
pub use url::*;
