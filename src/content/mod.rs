//! Content module - post records, their front matter and the store holding them

mod error;
mod frontmatter;
mod identifier;
mod outline;
mod post;
pub mod store;

pub use error::{FormatError, IdentifierError, StoreError};
pub use frontmatter::{FrontMatter, Value, MARKER};
pub use identifier::{is_slug, PostId};
pub use outline::{CodeBlock, Heading, Link, Outline};
pub use post::{Post, Record};
pub use store::ContentStore;
