//! Post and Record models

use serde::Serialize;
use std::path::PathBuf;

use super::error::FormatError;
use super::frontmatter::{self, FrontMatter, MARKER};
use super::PostId;

/// Parsed contents of a record file: front matter plus verbatim body
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Post {
    /// Ordered front-matter fields (empty when the file has no block)
    pub front_matter: FrontMatter,

    /// Raw markup after the closing marker line
    pub body: String,
}

impl Post {
    pub fn new(front_matter: FrontMatter, body: impl Into<String>) -> Self {
        Self {
            front_matter,
            body: body.into(),
        }
    }

    /// Parse a record's text. Pure; the body is kept byte for byte.
    pub fn parse(text: &str) -> Result<Self, FormatError> {
        let (front_matter, body) = FrontMatter::parse(text)?;
        Ok(Self::new(front_matter, body))
    }

    /// Serialize back to record text.
    ///
    /// `Post::parse(&post.to_text()?)` yields `post` again. The block is left
    /// out when there is nothing to put in it, unless the body itself starts
    /// with a marker line and would otherwise be read as front matter.
    pub fn to_text(&self) -> Result<String, FormatError> {
        if self.front_matter.is_empty() && !frontmatter::starts_with_marker(&self.body) {
            return Ok(self.body.clone());
        }

        let mut out = String::with_capacity(self.body.len() + 64);
        out.push_str(MARKER);
        out.push('\n');
        if !self.front_matter.is_empty() {
            out.push_str(&self.front_matter.to_yaml()?);
        }
        out.push_str(MARKER);
        out.push('\n');
        out.push_str(&self.body);
        Ok(out)
    }

    pub fn title(&self) -> Option<&str> {
        self.front_matter.title()
    }

    pub fn layout(&self) -> Option<&str> {
        self.front_matter.layout()
    }

    pub fn published(&self) -> bool {
        self.front_matter.published()
    }
}

/// One post in the content store
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    /// Identifier from the filename
    pub id: PostId,

    /// Source file path (relative to the store root)
    pub source: PathBuf,

    #[serde(flatten)]
    pub post: Post,
}

impl Record {
    /// Title from front matter, falling back to the slug
    pub fn title(&self) -> &str {
        self.post.title().unwrap_or_else(|| self.id.slug())
    }

    pub fn published(&self) -> bool {
        self.post.published()
    }
}
