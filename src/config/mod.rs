//! Configuration module

mod site;

pub use site::AuthorConfig;
pub use site::MenuItem;
pub use site::RedirectRule;
pub use site::SiteConfig;
