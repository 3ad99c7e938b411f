//! CLI entry point for poststore

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use poststore::commands;
use poststore::Blog;

#[derive(Parser)]
#[command(name = "poststore")]
#[command(version)]
#[command(about = "Read, list and validate the posts of a Jekyll-style blog", long_about = None)]
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
    /// Initialize a new blog
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        folder: PathBuf,
    },

    /// Create a new post
    New {
        /// Title of the new post
        title: String,

        /// Layout to record (empty for none)
        #[arg(short, long)]
        layout: Option<String>,

        /// Publish date, YYYY-MM-DD (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Slug for the filename (defaults to the slugified title)
        #[arg(short, long)]
        slug: Option<String>,

        /// Mark the post as unpublished
        #[arg(long)]
        draft: bool,
    },

    /// List posts, newest first
    #[command(alias = "ls")]
    List {
        /// Include unpublished posts
        #[arg(long)]
        drafts: bool,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Validate every post
    Check {
        /// Treat warnings as errors
        #[arg(long)]
        strict: bool,
    },

    /// Show the front matter and outline of one post
    Show {
        /// Post identifier (YYYY-MM-DD-slug) or slug
        post: String,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "poststore=debug,info"
    } else {
        "poststore=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir().context("cannot determine current directory")?,
    };

    match cli.command {
        Commands::Init { folder } => {
            let target_dir = if folder.is_absolute() {
                folder
            } else {
                base_dir.join(folder)
            };
            tracing::info!("Initializing blog in {:?}", target_dir);
            commands::init::init_site(&target_dir)?;
            println!("Initialized empty blog in {:?}", target_dir);
        }

        Commands::New {
            title,
            layout,
            date,
            slug,
            draft,
        } => {
            let blog = Blog::new(&base_dir)?;
            let options = commands::new::NewPost {
                layout,
                date,
                slug,
                draft,
            };
            let path = commands::new::create_post(&blog, &title, &options)?;
            println!("Created: {:?}", path);
        }

        Commands::List { drafts, json } => {
            let blog = Blog::new(&base_dir)?;
            commands::list::run(&blog, drafts, json)?;
        }

        Commands::Check { strict } => {
            let blog = Blog::new(&base_dir)?;
            let report = blog.check(strict)?;
            commands::check::print(&report);
            if !report.is_ok() {
                bail!("{} post(s) failed validation", report.failures().count());
            }
        }

        Commands::Show { post, json } => {
            let blog = Blog::new(&base_dir)?;
            commands::show::run(&blog, &post, json)?;
        }
    }

    Ok(())
}
