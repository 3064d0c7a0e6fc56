//! List the routes a build would register, without writing anything

use anyhow::{Context, Result};
use std::fmt::Write as _;

use crate::content::{ContentLoader, ContentSource};
use crate::routes::{BuildPlan, RouteCollector, SiteBuilder};
use crate::Site;

/// Plan every route for the site's content in memory
pub fn plan(site: &Site) -> Result<BuildPlan> {
    plan_source(site, &ContentLoader::new(site))
}

/// Plan routes for an arbitrary content source
pub fn plan_source(site: &Site, source: &dyn ContentSource) -> Result<BuildPlan> {
    let mut collector = RouteCollector::new();
    SiteBuilder::new(&site.config)
        .build(source, &mut collector)
        .context("Failed to plan routes")?;

    Ok(BuildPlan {
        routes: collector.routes,
        redirects: collector.redirects,
    })
}

/// Print the route table, or the JSON manifest with `json`
pub fn run(site: &Site, json: bool) -> Result<()> {
    let plan = plan(site)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    } else {
        print!("{}", format_table(&plan));
    }
    Ok(())
}

/// Plain-text route listing
pub fn format_table(plan: &BuildPlan) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Routes ({}):", plan.routes.len());
    for route in &plan.routes {
        let _ = writeln!(out, "  {:<40} {}", route.path, route.template);
    }
    if !plan.redirects.is_empty() {
        let _ = writeln!(out, "Redirects ({}):", plan.redirects.len());
        for redirect in &plan.redirects {
            let _ = writeln!(out, "  {:<40} -> {}", redirect.from_path, redirect.to_path);
        }
    }
    out
}
