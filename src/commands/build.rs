//! Build the static site

use anyhow::{Context, Result};

use crate::content::ContentLoader;
use crate::generator::Generator;
use crate::routes::{BuildSummary, SiteBuilder};
use crate::Site;

/// Load content, plan every route and write the public dir
pub fn run(site: &Site) -> Result<BuildSummary> {
    let start = std::time::Instant::now();

    let loader = ContentLoader::new(site);
    let mut generator = Generator::new(site).context("Failed to set up the page generator")?;

    let summary = SiteBuilder::new(&site.config)
        .build(&loader, &mut generator)
        .with_context(|| format!("Failed to build site in {:?}", site.base_dir))?;

    let duration = start.elapsed();
    tracing::info!(
        "Built {} documents into {} pages in {:.2}s",
        summary.documents,
        summary.pages,
        duration.as_secs_f64()
    );

    Ok(summary)
}
