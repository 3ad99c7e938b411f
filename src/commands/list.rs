//! List posts

use anyhow::Result;
use chrono::NaiveDate;
use serde::Serialize;
use std::path::PathBuf;

use crate::content::{store, PostId};
use crate::Blog;

/// One line of the post listing
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub id: PostId,
    pub date: NaiveDate,
    pub title: String,
    pub layout: Option<String>,
    pub published: bool,
    pub source: PathBuf,
}

/// Collect readable posts, newest first. Records that fail to load are
/// logged and left out.
pub fn collect(blog: &Blog, include_drafts: bool) -> Vec<Summary> {
    let mut records = Vec::new();
    for result in blog.store().posts() {
        match result {
            Ok(record) => {
                if record.published() || include_drafts {
                    records.push(record);
                }
            }
            Err(e) => tracing::warn!("{}", e),
        }
    }

    store::newest_first(&mut records);

    records
        .into_iter()
        .map(|record| Summary {
            date: record.id.date(),
            title: record.title().to_string(),
            layout: record.post.layout().map(str::to_string),
            published: record.published(),
            source: record.source,
            id: record.id,
        })
        .collect()
}

/// Print the post listing
pub fn run(blog: &Blog, include_drafts: bool, json: bool) -> Result<()> {
    let posts = collect(blog, include_drafts);

    if json {
        println!("{}", serde_json::to_string_pretty(&posts)?);
        return Ok(());
    }

    println!("Posts ({}):", posts.len());
    for post in posts {
        println!(
            "  {} - {}{} [{}]",
            post.date.format("%Y-%m-%d"),
            post.title,
            if post.published { "" } else { " (draft)" },
            post.source.display()
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn blog_with_posts() -> (tempfile::TempDir, Blog) {
        let tmp = tempfile::tempdir().unwrap();
        let posts = tmp.path().join("_posts");
        fs::create_dir_all(&posts).unwrap();
        fs::write(
            posts.join("2013-04-01-old.md"),
            "---\nlayout: post\ntitle: Old\n---\n",
        )
        .unwrap();
        fs::write(
            posts.join("2014-04-01-draft.md"),
            "---\ntitle: Draft\npublished: false\n---\n",
        )
        .unwrap();
        fs::write(posts.join("2015-04-01-bare.md"), "# Bare\n").unwrap();
        fs::write(posts.join("2016-04-01-broken.md"), "---\ntitle: x\n").unwrap();
        let blog = Blog::new(tmp.path()).unwrap();
        (tmp, blog)
    }

    #[test]
    fn test_collect_newest_first_without_drafts() {
        let (_tmp, blog) = blog_with_posts();
        let posts = collect(&blog, false);
        let titles: Vec<_> = posts.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["bare", "Old"]);
        assert_eq!(posts[1].layout.as_deref(), Some("post"));
        assert_eq!(posts[0].layout, None);
    }

    #[test]
    fn test_collect_with_drafts() {
        let (_tmp, blog) = blog_with_posts();
        let posts = collect(&blog, true);
        assert_eq!(posts.len(), 3);
        assert!(!posts[1].published);
    }

    #[test]
    fn test_summary_json_shape() {
        let (_tmp, blog) = blog_with_posts();
        let posts = collect(&blog, false);
        let json = serde_json::to_value(&posts[1]).unwrap();
        assert_eq!(json["id"], "2013-04-01-old");
        assert_eq!(json["date"], "2013-04-01");
        assert_eq!(json["published"], true);
    }
}
