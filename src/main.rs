//! CLI entry point for quire

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use quire::commands::list::ListOptions;

#[derive(Parser)]
#[command(name = "quire")]
#[command(version)]
#[command(about = "Front-matter content ingestion for Markdown sites", long_about = None)]
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
    /// Parse every content file and report failures
    Check {
        /// Stop at the first broken file
        #[arg(long)]
        fail_fast: bool,
    },

    /// List site content
    #[command(alias = "ls")]
    List {
        /// Type of content to list (post, tag, category, archive)
        #[arg(default_value = "post")]
        r#type: String,

        /// Include drafts
        #[arg(long)]
        drafts: bool,

        /// Include future-dated documents
        #[arg(long)]
        future: bool,

        /// Only documents with this tag
        #[arg(short, long)]
        tag: Option<String>,

        /// Only documents in this category
        #[arg(short = 'C', long)]
        category: Option<String>,
    },

    /// Show one document by its source identifier
    Show {
        /// Source identifier, e.g. posts/docker-best-practices
        source: String,

        /// Print JSON
        #[arg(long)]
        json: bool,
    },

    /// Create a new draft post
    New {
        /// Title of the new post
        title: String,

        /// Path relative to the content directory
        #[arg(short, long)]
        path: Option<String>,
    },

    /// Re-ingest whenever content changes
    #[command(alias = "w")]
    Watch,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "quire=debug,info"
    } else {
        "quire=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir().context("Cannot determine current directory")?,
    };
    let site = quire::Quire::new(&base_dir)?;

    match cli.command {
        Commands::Check { fail_fast } => {
            tracing::info!("Checking content in {:?}", site.content_dir);
            quire::commands::check::run(&site, fail_fast)?;
            println!("All content is valid.");
        }

        Commands::List {
            r#type,
            drafts,
            future,
            tag,
            category,
        } => {
            let options = ListOptions {
                drafts,
                future,
                tag,
                category,
            };
            quire::commands::list::run(&site, &r#type, &options)?;
        }

        Commands::Show { source, json } => {
            quire::commands::show::run(&site, &source, json)?;
        }

        Commands::New { title, path } => {
            tracing::info!("Creating new post with title: {}", title);
            let path = quire::commands::new::create_post(&site, &title, path.as_deref())?;
            println!("Created: {:?}", path);
        }

        Commands::Watch => {
            quire::commands::watch::run(&site).await?;
        }
    }

    Ok(())
}
