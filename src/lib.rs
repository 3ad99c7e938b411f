//! poststore: content store for Jekyll-style Markdown blogs
//!
//! Posts live as `YYYY-MM-DD-slug.md` files holding a `---` delimited YAML
//! front-matter block and a Markdown body. This crate parses and serializes
//! those records, enumerates them, and validates them; rendering is left to
//! whatever static-site generator consumes the directory.

pub mod commands;
pub mod config;
pub mod content;

use anyhow::Result;
use std::path::{Path, PathBuf};

/// The main blog handle
#[derive(Debug, Clone)]
pub struct Blog {
    /// Blog configuration
    pub config: config::BlogConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Directory holding the post records
    pub posts_dir: PathBuf,
}

impl Blog {
    /// Open a blog rooted at a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::BlogConfig::load(&config_path)?
        } else {
            config::BlogConfig::default()
        };

        let posts_dir = base_dir.join(&config.posts_dir);

        Ok(Self {
            config,
            base_dir,
            posts_dir,
        })
    }

    /// Store over this blog's posts directory
    pub fn store(&self) -> content::ContentStore {
        content::ContentStore::for_blog(self)
    }

    /// Validate every record
    pub fn check(&self, strict: bool) -> Result<commands::check::Report> {
        commands::check::run(self, strict)
    }

    /// Create a new post with today's date
    pub fn new_post(&self, title: &str, layout: Option<&str>) -> Result<PathBuf> {
        let options = commands::new::NewPost {
            layout: layout.map(str::to_string),
            ..Default::default()
        };
        commands::new::create_post(self, title, &options)
    }
}
