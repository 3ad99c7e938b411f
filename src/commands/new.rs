//! Create a new post

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use std::fs;
use std::path::PathBuf;

use crate::content::{is_slug, FrontMatter, Post, PostId};
use crate::Blog;

/// Options for a new post
#[derive(Debug, Clone, Default)]
pub struct NewPost {
    /// Layout to record; falls back to the configured default. Empty means none.
    pub layout: Option<String>,
    /// Publish date; today when absent
    pub date: Option<NaiveDate>,
    /// Slug; derived from the title when absent
    pub slug: Option<String>,
    /// Write `published: false`
    pub draft: bool,
}

/// Create a new post file and return its path
pub fn create_post(blog: &Blog, title: &str, options: &NewPost) -> Result<PathBuf> {
    let date = options.date.unwrap_or_else(|| Local::now().date_naive());

    let slug = match &options.slug {
        Some(s) => s.clone(),
        None => slug::slugify(title),
    };
    if !is_slug(&slug) {
        bail!(
            "Cannot use {:?} as a slug for {:?}; pass --slug with letters, digits, '-', '_', '.' or '~'",
            slug,
            title
        );
    }

    let filename = blog
        .config
        .new_post_name
        .replace(":title", &slug)
        .replace(":year", &date.format("%Y").to_string())
        .replace(":month", &date.format("%m").to_string())
        .replace(":day", &date.format("%d").to_string());
    let file_path = blog.posts_dir.join(&filename);

    let id = PostId::from_path(&file_path).with_context(|| {
        format!(
            "new_post_name {:?} produced {:?}, which is not a post name",
            blog.config.new_post_name, filename
        )
    })?;

    let accepted = file_path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| blog.config.extensions.iter().any(|x| x.eq_ignore_ascii_case(e)));
    if !accepted {
        tracing::warn!(
            "{:?} does not have one of the configured extensions {:?}; it will not be listed",
            file_path,
            blog.config.extensions
        );
    }

    // Check if file already exists
    if file_path.exists() {
        bail!("File already exists: {:?}", file_path);
    }

    let layout = options
        .layout
        .clone()
        .unwrap_or_else(|| blog.config.default_layout.clone());

    let mut front_matter = FrontMatter::new();
    if !layout.is_empty() {
        front_matter.insert("layout", layout);
    }
    front_matter.insert("title", title);
    if options.draft {
        front_matter.insert("published", false);
    }

    let post = Post::new(front_matter, "\n");

    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&file_path, post.to_text()?)
        .with_context(|| format!("failed to write {:?}", file_path))?;

    tracing::info!("Created {} at {:?}", id, file_path);

    Ok(file_path)
}
