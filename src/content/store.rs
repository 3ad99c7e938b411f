//! Content store - enumerates post records from the posts directory

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use super::error::StoreError;
use super::{Post, PostId, Record};
use crate::Blog;

/// A directory of post records
#[derive(Debug, Clone)]
pub struct ContentStore {
    root: PathBuf,
    extensions: Vec<String>,
}

impl ContentStore {
    /// Create a store over `root`, accepting files with the given extensions
    pub fn new<P: AsRef<Path>>(root: P, extensions: &[String]) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            extensions: extensions.iter().map(|e| e.to_ascii_lowercase()).collect(),
        }
    }

    /// Store for a blog's configured posts directory
    pub fn for_blog(blog: &Blog) -> Self {
        Self::new(&blog.posts_dir, &blog.config.extensions)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Enumerate every record.
    ///
    /// The sequence is lazy and finite; files are read as it advances. A
    /// failing record yields an `Err` and enumeration carries on with the
    /// next one. Call again to start over.
    pub fn posts(&self) -> Posts<'_> {
        let entries = if self.root.is_dir() {
            Some(
                WalkDir::new(&self.root)
                    .follow_links(true)
                    .sort_by_file_name()
                    .into_iter()
                    .filter_entry(is_visible as fn(&DirEntry) -> bool),
            )
        } else {
            tracing::debug!("Posts directory {:?} does not exist", self.root);
            None
        };

        Posts {
            store: self,
            entries,
            seen: HashMap::new(),
        }
    }

    /// Read and parse a single record file
    pub fn load(&self, path: &Path) -> Result<Record, StoreError> {
        let id = identify(path)?;
        self.read(path, id)
    }

    /// Read and parse a record file whose identifier is already known
    fn read(&self, path: &Path, id: PostId) -> Result<Record, StoreError> {
        let source = path.strip_prefix(&self.root).unwrap_or(path).to_path_buf();

        let content = fs::read_to_string(path).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let post = Post::parse(&content).map_err(|source| StoreError::Format {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(Record { id, source, post })
    }

    /// Find a record by full identifier (`2015-01-01-hello`) or by slug
    /// (`hello`). Malformed records are skipped.
    pub fn find(&self, key: &str) -> Option<Record> {
        self.posts()
            .filter_map(|r| r.ok())
            .find(|r| r.id.slug() == key || r.id.to_string() == key)
    }

    fn is_record_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| self.extensions.iter().any(|x| x.eq_ignore_ascii_case(e)))
            .unwrap_or(false)
    }
}

fn identify(path: &Path) -> Result<PostId, StoreError> {
    PostId::from_path(path).map_err(|source| StoreError::Identifier {
        path: path.to_path_buf(),
        source,
    })
}

/// Dot-prefixed files and directories are skipped, the root excepted
fn is_visible(entry: &DirEntry) -> bool {
    entry.depth() == 0 || !entry.file_name().to_string_lossy().starts_with('.')
}

impl<'a> IntoIterator for &'a ContentStore {
    type Item = Result<Record, StoreError>;
    type IntoIter = Posts<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.posts()
    }
}

/// Lazy iterator over the records of a [`ContentStore`]
pub struct Posts<'a> {
    store: &'a ContentStore,
    entries: Option<walkdir::FilterEntry<walkdir::IntoIter, fn(&DirEntry) -> bool>>,
    /// Identifiers handed out so far, with the file that claimed them
    seen: HashMap<PostId, PathBuf>,
}

impl Iterator for Posts<'_> {
    type Item = Result<Record, StoreError>;

    fn next(&mut self) -> Option<Self::Item> {
        let entries = self.entries.as_mut()?;

        for entry in entries.by_ref() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e
                        .path()
                        .map(Path::to_path_buf)
                        .unwrap_or_else(|| self.store.root.clone());
                    return Some(Err(StoreError::Io {
                        path,
                        source: io::Error::from(e),
                    }));
                }
            };

            let path = entry.path();
            if !entry.file_type().is_file() || !self.store.is_record_file(path) {
                continue;
            }

            let id = match identify(path) {
                Ok(id) => id,
                Err(e) => return Some(Err(e)),
            };

            // the first file to claim an identifier owns it, readable or not
            if let Some(first) = self.seen.get(&id) {
                return Some(Err(StoreError::Duplicate {
                    path: path.to_path_buf(),
                    id: id.to_string(),
                    first: first.clone(),
                }));
            }
            self.seen.insert(id.clone(), path.to_path_buf());

            let result = self.store.read(path, id);
            if let Err(e) = &result {
                tracing::debug!("Skipping {:?}: {}", path, e);
            }
            return Some(result);
        }

        None
    }
}

/// Sort records newest first, breaking ties by slug
pub fn newest_first(records: &mut [Record]) {
    records.sort_by(|a, b| b.id.cmp(&a.id));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::FormatError;
    use tempfile::TempDir;

    fn extensions() -> Vec<String> {
        vec!["md".to_string(), "markdown".to_string()]
    }

    fn write(dir: &Path, name: &str, content: &str) {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    fn sample_store() -> (TempDir, ContentStore) {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("_posts");
        write(&root, "2014-05-01-first.md", "---\nlayout: post\ntitle: First\n---\nOne\n");
        write(&root, "2014-06-01-broken.md", "---\ntitle: Broken\n\nno closing marker\n");
        write(&root, "2014-07-01-no-front-matter.md", "# Just a heading\n\ntext\n");
        write(&root, "2015/2015-01-01-nested.markdown", "---\npublished: false\n---\n");
        write(&root, "notes.txt", "not a record");
        write(&root, ".2014-01-01-hidden.md", "---\n---\n");
        let store = ContentStore::new(&root, &extensions());
        (tmp, store)
    }

    #[test]
    fn test_enumerates_records_despite_failures() {
        let (_tmp, store) = sample_store();
        let results: Vec<_> = store.posts().collect();
        assert_eq!(results.len(), 4);

        let ok: Vec<_> = results
            .iter()
            .filter_map(|r| r.as_ref().ok())
            .map(|r| r.id.to_string())
            .collect();
        assert_eq!(
            ok,
            vec![
                "2014-05-01-first",
                "2014-07-01-no-front-matter",
                "2015-01-01-nested"
            ]
        );

        let errors: Vec<_> = results.iter().filter_map(|r| r.as_ref().err()).collect();
        assert_eq!(errors.len(), 1);
        assert!(matches!(
            errors[0],
            StoreError::Format {
                source: FormatError::Unterminated { .. },
                ..
            }
        ));
        assert!(errors[0].path().ends_with("2014-06-01-broken.md"));
    }

    #[test]
    fn test_posts_is_restartable() {
        let (_tmp, store) = sample_store();
        let first: Vec<_> = store.posts().filter_map(Result::ok).collect();
        let second: Vec<_> = (&store).into_iter().filter_map(Result::ok).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_posts_is_lazy() {
        let (_tmp, store) = sample_store();
        let first = store.posts().next().unwrap().unwrap();
        assert_eq!(first.title(), "First");
        assert_eq!(first.source, PathBuf::from("2014-05-01-first.md"));
    }

    #[test]
    fn test_missing_root_is_empty() {
        let tmp = TempDir::new().unwrap();
        let store = ContentStore::new(tmp.path().join("nope"), &extensions());
        assert_eq!(store.posts().count(), 0);
    }

    #[test]
    fn test_bad_filename_reported() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "about.md", "# About\n");
        let store = ContentStore::new(tmp.path(), &extensions());
        let results: Vec<_> = store.posts().collect();
        assert_eq!(results.len(), 1);
        assert!(matches!(results[0], Err(StoreError::Identifier { .. })));
    }

    #[test]
    fn test_duplicate_identifier_reported() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "2014-01-01-same.markdown", "a");
        write(tmp.path(), "2014-01-01-same.md", "b");
        let store = ContentStore::new(tmp.path(), &extensions());
        let results: Vec<_> = store.posts().collect();
        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        match &results[1] {
            Err(StoreError::Duplicate { id, first, .. }) => {
                assert_eq!(id, "2014-01-01-same");
                assert!(first.ends_with("2014-01-01-same.markdown"));
            }
            other => panic!("expected duplicate, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_of_malformed_record_reported() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "2014-01-01-same.markdown", "---\ntitle: never closed\n");
        write(tmp.path(), "2014-01-01-same.md", "---\ntitle: fine\n---\n");
        let store = ContentStore::new(tmp.path(), &extensions());
        let results: Vec<_> = store.posts().collect();
        assert_eq!(results.len(), 2);
        assert!(matches!(results[0], Err(StoreError::Format { .. })));
        match &results[1] {
            Err(StoreError::Duplicate { path, first, .. }) => {
                assert!(path.ends_with("2014-01-01-same.md"));
                assert!(first.ends_with("2014-01-01-same.markdown"));
            }
            other => panic!("expected duplicate, got {:?}", other),
        }
    }

    #[test]
    fn test_hidden_directories_skipped() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), ".drafts/2014-01-01-secret.md", "---\n---\n");
        write(tmp.path(), ".git/2014-01-02-object.md", "---\n---\n");
        write(tmp.path(), "2014-01-03-public.md", "---\n---\n");
        let store = ContentStore::new(tmp.path(), &extensions());
        let ids: Vec<_> = store
            .posts()
            .map(|r| r.unwrap().id.to_string())
            .collect();
        assert_eq!(ids, vec!["2014-01-03-public"]);
    }

    #[test]
    fn test_find_by_slug_or_identifier() {
        let (_tmp, store) = sample_store();
        assert_eq!(store.find("first").unwrap().id.to_string(), "2014-05-01-first");
        assert!(store.find("2015-01-01-nested").is_some());
        assert!(store.find("broken").is_none());
        assert!(store.find("missing").is_none());
    }

    #[test]
    fn test_newest_first() {
        let (_tmp, store) = sample_store();
        let mut records: Vec<_> = store.posts().filter_map(Result::ok).collect();
        newest_first(&mut records);
        assert_eq!(records[0].id.slug(), "nested");
        assert_eq!(records[2].id.slug(), "first");
    }
}
