//! CLI entry point for blog-builder

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use blog_builder::{commands, server, Site};

#[derive(Parser)]
#[command(name = "blog-builder")]
#[command(version)]
#[command(about = "Build a static blog from markdown posts and pages", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the site into the public directory
    #[command(alias = "b")]
    Build,

    /// List the routes a build would register
    Routes {
        /// Print the route manifest as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create a new post or page
    New {
        /// Template to use (post, page)
        #[arg(short, long, default_value = "post")]
        template: String,

        /// Title of the new document
        title: String,
    },

    /// Remove the public directory
    Clean,

    /// Build, then serve the public directory
    #[command(alias = "s")]
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,

        /// Rebuild when content or configuration changes
        #[arg(short, long)]
        watch: bool,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "blog_builder=debug,info"
    } else {
        "blog_builder=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir().context("Cannot determine the current directory")?,
    };

    if let Commands::Version = cli.command {
        println!("blog-builder version {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let site = Site::new(&base_dir)
        .with_context(|| format!("Failed to load site configuration in {:?}", base_dir))?;

    match cli.command {
        Commands::Build => {
            tracing::info!("Building site...");
            let summary = site.build()?;
            println!(
                "Built {} pages and {} redirects from {} documents",
                summary.pages, summary.redirects, summary.documents
            );
        }

        Commands::Routes { json } => {
            commands::routes::run(&site, json)?;
        }

        Commands::New { template, title } => {
            tracing::info!("Creating new {} with title: {}", template, title);
            let path = site.new_entry(&title, &template)?;
            println!("Created: {:?}", path);
        }

        Commands::Clean => {
            tracing::info!("Cleaning public folder...");
            site.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::Serve { port, ip, watch } => {
            tracing::info!("Building site...");
            site.build()?;

            tracing::info!("Starting server at http://{}:{}", ip, port);
            server::start(&site, &ip, port, watch).await?;
        }

        Commands::Version => {}
    }

    Ok(())
}
