//! Initialize a new blog

use anyhow::{bail, Result};
use std::fs;
use std::path::Path;

/// Initialize a new blog in the given directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    let config_path = target_dir.join("_config.yml");
    if config_path.exists() {
        bail!("{:?} already exists", config_path);
    }

    // Create directory structure
    fs::create_dir_all(target_dir.join("_posts"))?;

    let config_content = r#"# Blog configuration

# Site
title: Blog

# Directory
posts_dir: _posts
extensions: [md, markdown]

# Writing
new_post_name: ':year-:month-:day-:title.md'
default_layout: post

# Checking
strict: false
"#;

    fs::write(&config_path, config_content)?;
    tracing::info!("Wrote {:?}", config_path);

    Ok(())
}
