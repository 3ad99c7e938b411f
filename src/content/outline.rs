//! Structural outline of a post body
//!
//! The body is never rendered here; the outline only records what the markup
//! contains so it can be listed and checked.

use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd};
use serde::Serialize;

/// A heading in the body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Heading {
    pub level: u8,
    pub text: String,
    pub line: usize,
}

/// A code block; `language` is the hint after the opening fence
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeBlock {
    pub fenced: bool,
    pub language: Option<String>,
    pub line: usize,
}

/// An inline `[text](url)` link
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    pub text: String,
    pub url: String,
    pub line: usize,
}

/// Headings, code blocks and links of a body, in document order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Outline {
    pub headings: Vec<Heading>,
    pub code_blocks: Vec<CodeBlock>,
    pub links: Vec<Link>,
}

enum Open {
    Heading(u8, usize),
    Link(String, usize),
}

impl Outline {
    /// Build the outline of `body`. Line numbers are 1-based within the body.
    pub fn of(body: &str) -> Self {
        // YAML metadata blocks stay off; front matter is already split away
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_HEADING_ATTRIBUTES;
        let parser = Parser::new_ext(body, options).into_offset_iter();

        let mut outline = Outline::default();
        let mut open: Vec<(Open, String)> = Vec::new();

        for (event, range) in parser {
            let line = line_at(body, range.start);
            match event {
                Event::Start(Tag::Heading { level, .. }) => {
                    open.push((Open::Heading(level as u8, line), String::new()));
                }
                Event::Start(Tag::Link { dest_url, .. }) => {
                    open.push((Open::Link(dest_url.to_string(), line), String::new()));
                }
                Event::Start(Tag::CodeBlock(kind)) => {
                    let (fenced, language) = match kind {
                        CodeBlockKind::Fenced(info) => (true, language_hint(&info)),
                        CodeBlockKind::Indented => (false, None),
                    };
                    outline.code_blocks.push(CodeBlock {
                        fenced,
                        language,
                        line,
                    });
                }
                Event::Text(text) | Event::Code(text) => {
                    if let Some((_, buf)) = open.last_mut() {
                        buf.push_str(&text);
                    }
                }
                Event::SoftBreak | Event::HardBreak => {
                    if let Some((_, buf)) = open.last_mut() {
                        buf.push(' ');
                    }
                }
                Event::End(TagEnd::Heading(_)) | Event::End(TagEnd::Link) => {
                    let Some((kind, text)) = open.pop() else {
                        continue;
                    };
                    // link text also belongs to an enclosing heading
                    if let Some((_, outer)) = open.last_mut() {
                        outer.push_str(&text);
                    }
                    match kind {
                        Open::Heading(level, line) => outline.headings.push(Heading {
                            level,
                            text: text.trim().to_string(),
                            line,
                        }),
                        Open::Link(url, line) => outline.links.push(Link { text, url, line }),
                    }
                }
                _ => {}
            }
        }

        outline
    }

    /// Fenced blocks written without a language hint
    pub fn untagged_fences(&self) -> impl Iterator<Item = &CodeBlock> {
        self.code_blocks
            .iter()
            .filter(|b| b.fenced && b.language.is_none())
    }
}

/// First word of a fence info string (`rust,ignore` and `rust {.x}` both give `rust`)
fn language_hint(info: &str) -> Option<String> {
    let lang = info
        .split(|c: char| c.is_whitespace() || c == ',' || c == '{')
        .next()
        .unwrap_or_default();
    if lang.is_empty() {
        None
    } else {
        Some(lang.to_string())
    }
}

fn line_at(text: &str, offset: usize) -> usize {
    text.as_bytes()[..offset.min(text.len())]
        .iter()
        .filter(|&&b| b == b'\n')
        .count()
        + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collects_headings() {
        let outline = Outline::of("# Hello World\n\ntext\n\n## Part `two`\n");
        assert_eq!(
            outline.headings,
            vec![
                Heading {
                    level: 1,
                    text: "Hello World".to_string(),
                    line: 1
                },
                Heading {
                    level: 2,
                    text: "Part two".to_string(),
                    line: 5
                },
            ]
        );
    }

    #[test]
    fn test_collects_code_blocks() {
        let body = "```rust\nfn main() {}\n```\n\n```\nplain\n```\n\n    indented\n";
        let outline = Outline::of(body);
        assert_eq!(outline.code_blocks.len(), 3);
        assert_eq!(outline.code_blocks[0].language.as_deref(), Some("rust"));
        assert_eq!(outline.code_blocks[1].language, None);
        assert_eq!(outline.code_blocks[1].line, 5);
        assert!(!outline.code_blocks[2].fenced);

        let untagged: Vec<_> = outline.untagged_fences().collect();
        assert_eq!(untagged.len(), 1);
        assert_eq!(untagged[0].line, 5);
    }

    #[test]
    fn test_language_hint_first_word() {
        assert_eq!(language_hint("rust,ignore"), Some("rust".to_string()));
        assert_eq!(language_hint("js {.numbered}"), Some("js".to_string()));
        assert_eq!(language_hint(""), None);
    }

    #[test]
    fn test_collects_links() {
        let outline = Outline::of("Read [the book](https://doc.rust-lang.org/book/) today.\n");
        assert_eq!(
            outline.links,
            vec![Link {
                text: "the book".to_string(),
                url: "https://doc.rust-lang.org/book/".to_string(),
                line: 1
            }]
        );
    }

    #[test]
    fn test_link_inside_heading() {
        let outline = Outline::of("## See [serde](https://serde.rs)\n");
        assert_eq!(outline.headings[0].text, "See serde");
        assert_eq!(outline.links[0].url, "https://serde.rs");
    }

    #[test]
    fn test_code_block_content_is_not_a_heading() {
        let outline = Outline::of("```sh\n# not a heading\n```\n");
        assert!(outline.headings.is_empty());
    }
}
