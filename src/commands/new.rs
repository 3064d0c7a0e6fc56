//! Create a new post or page

use anyhow::Result;
use std::fs;
use std::path::PathBuf;

use crate::Site;

/// Write a markdown file with front-matter for `title`.
///
/// Posts land in `content/posts/`, pages in `content/pages/`. New posts start
/// as drafts.
pub fn create_entry(site: &Site, title: &str, template: &str) -> Result<PathBuf> {
    let now = chrono::Local::now().naive_local();

    let (dir, draft) = match template {
        "post" => ("posts", true),
        "page" => ("pages", false),
        other => anyhow::bail!("Unknown template: {}. Available: post, page", other),
    };

    let name = slug::slugify(title);
    if name.is_empty() {
        anyhow::bail!("Title {:?} does not produce a usable slug", title);
    }

    let target_dir = site.content_dir.join(dir);
    fs::create_dir_all(&target_dir)?;

    let file_path = target_dir.join(format!("{}.md", name));
    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    let content = format!(
        "---\ntemplate: {}\ntitle: {}\ndate: {}\ndraft: {}\nslug: /{}/{}\ntags: []\ndescription: ''\n---\n",
        template,
        yaml_string(title),
        now.format("%Y-%m-%dT%H:%M:%S"),
        draft,
        dir,
        name
    );

    fs::write(&file_path, content)?;
    tracing::debug!("Created: {:?}", file_path);

    Ok(file_path)
}

/// Quote a scalar so titles with `:` or `#` survive YAML parsing
fn yaml_string(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}
