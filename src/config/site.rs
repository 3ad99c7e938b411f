//! Blog configuration (_config.yml)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Main blog configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BlogConfig {
    // Site
    pub title: String,

    // Directory
    pub posts_dir: String,
    /// File extensions treated as post records
    pub extensions: Vec<String>,

    // Writing
    /// Filename pattern for new posts (`:year`, `:month`, `:day`, `:title`)
    pub new_post_name: String,
    pub default_layout: String,

    // Checking
    /// Count warnings as failures in `check`
    pub strict: bool,

    // Store any additional fields the site generator reads
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for BlogConfig {
    fn default() -> Self {
        Self {
            title: "Blog".to_string(),

            posts_dir: "_posts".to_string(),
            extensions: vec!["md".to_string(), "markdown".to_string()],

            new_post_name: ":year-:month-:day-:title.md".to_string(),
            default_layout: "post".to_string(),

            strict: false,
            extra: HashMap::new(),
        }
    }
}

impl BlogConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content =
            fs::read_to_string(path).with_context(|| format!("failed to read {:?}", path))?;
        // An empty file is a valid, all-defaults config
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: BlogConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse {:?}", path))?;
        tracing::debug!("Loaded config from {:?}", path);
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BlogConfig::default();
        assert_eq!(config.posts_dir, "_posts");
        assert_eq!(config.extensions, vec!["md", "markdown"]);
        assert_eq!(config.default_layout, "post");
        assert!(!config.strict);
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
title: Notes from the shell
posts_dir: content/posts
markdown: kramdown
strict: true
"#;
        let config: BlogConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.title, "Notes from the shell");
        assert_eq!(config.posts_dir, "content/posts");
        assert!(config.strict);
        assert_eq!(config.new_post_name, ":year-:month-:day-:title.md");
        assert_eq!(
            config.extra.get("markdown"),
            Some(&serde_yaml::Value::String("kramdown".to_string()))
        );
    }

    #[test]
    fn test_load_empty_file() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let config = BlogConfig::load(tmp.path()).unwrap();
        assert_eq!(config.title, "Blog");
    }
}
