//! Show a single post

use anyhow::{anyhow, Result};
use serde::Serialize;
use std::path::PathBuf;

use crate::content::{FrontMatter, Outline, PostId, Record};
use crate::Blog;

/// Front matter and body outline of one record
#[derive(Debug, Clone, Serialize)]
pub struct Details {
    pub id: PostId,
    pub source: PathBuf,
    pub front_matter: FrontMatter,
    pub outline: Outline,
}

impl From<Record> for Details {
    fn from(record: Record) -> Self {
        let outline = Outline::of(&record.post.body);
        Self {
            id: record.id,
            source: record.source,
            front_matter: record.post.front_matter,
            outline,
        }
    }
}

/// Look up a post by identifier or slug
pub fn details(blog: &Blog, key: &str) -> Result<Details> {
    blog.store()
        .find(key)
        .map(Details::from)
        .ok_or_else(|| anyhow!("No readable post matches {:?}", key))
}

/// Print one post's front matter and outline
pub fn run(blog: &Blog, key: &str, json: bool) -> Result<()> {
    let details = details(blog, key)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&details)?);
        return Ok(());
    }

    println!("{} [{}]", details.id, details.source.display());

    if details.front_matter.is_empty() {
        println!("Front matter: (none)");
    } else {
        println!("Front matter:");
        for (key, value) in details.front_matter.iter() {
            println!("  {}: {}", key, value);
        }
    }

    let outline = &details.outline;
    if !outline.headings.is_empty() {
        println!("Headings:");
        for heading in &outline.headings {
            let indent = "  ".repeat(heading.level as usize);
            println!("{}{} (line {})", indent, heading.text, heading.line);
        }
    }
    if !outline.code_blocks.is_empty() {
        println!("Code blocks:");
        for block in &outline.code_blocks {
            println!(
                "  line {}: {}",
                block.line,
                block.language.as_deref().unwrap_or("(no language)")
            );
        }
    }
    if !outline.links.is_empty() {
        println!("Links:");
        for link in &outline.links {
            println!("  [{}]({})", link.text, link.url);
        }
    }

    Ok(())
}
