//! Record identifiers (`YYYY-MM-DD-slug`)

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Serialize, Serializer};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use super::error::IdentifierError;

lazy_static! {
    static ref ID_RE: Regex =
        Regex::new(r"^(\d{4})-(\d{2})-(\d{2})-(.+)$").expect("valid identifier regex");
    static ref SLUG_RE: Regex =
        Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._~-]*$").expect("valid slug regex");
}

/// Publish date plus slug, taken from a record's filename
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PostId {
    date: NaiveDate,
    slug: String,
}

impl PostId {
    pub fn new(date: NaiveDate, slug: &str) -> Result<Self, IdentifierError> {
        if !is_slug(slug) {
            return Err(IdentifierError::Slug(slug.to_string()));
        }
        Ok(Self {
            date,
            slug: slug.to_string(),
        })
    }

    /// Identifier of a record file, taken from its stem
    pub fn from_path(path: &Path) -> Result<Self, IdentifierError> {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy())
            .unwrap_or_default();
        stem.parse()
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }
}

/// Whether `s` is made only of URL-unreserved characters
pub fn is_slug(s: &str) -> bool {
    SLUG_RE.is_match(s)
}

impl FromStr for PostId {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = ID_RE
            .captures(s)
            .ok_or_else(|| IdentifierError::Shape(s.to_string()))?;

        let date_str = format!("{}-{}-{}", &caps[1], &caps[2], &caps[3]);
        let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")
            .map_err(|_| IdentifierError::Date(date_str))?;

        Self::new(date, &caps[4])
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.date.format("%Y-%m-%d"), self.slug)
    }
}

impl Serialize for PostId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_identifier() {
        let id: PostId = "2015-03-07-fixing-the-build".parse().unwrap();
        assert_eq!(id.date(), NaiveDate::from_ymd_opt(2015, 3, 7).unwrap());
        assert_eq!(id.slug(), "fixing-the-build");
        assert_eq!(id.to_string(), "2015-03-07-fixing-the-build");
    }

    #[test]
    fn test_slug_may_contain_dashes_and_digits() {
        let id: PostId = "2020-01-01-2020-in-review".parse().unwrap();
        assert_eq!(id.slug(), "2020-in-review");
    }

    #[test]
    fn test_from_path_uses_stem() {
        let id = PostId::from_path(Path::new("_posts/2014/2014-12-31-year-end.markdown")).unwrap();
        assert_eq!(id.to_string(), "2014-12-31-year-end");
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_stem_named_in_error() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let path = Path::new(OsStr::from_bytes(b"2015-01-01-caf\xe9.md"));
        match PostId::from_path(path) {
            Err(IdentifierError::Slug(slug)) => assert!(slug.starts_with("caf")),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_rejects_bad_shape() {
        assert_eq!(
            "about".parse::<PostId>(),
            Err(IdentifierError::Shape("about".to_string()))
        );
        assert!(matches!(
            "2015-3-7-short-date".parse::<PostId>(),
            Err(IdentifierError::Shape(_))
        ));
    }

    #[test]
    fn test_rejects_impossible_date() {
        assert_eq!(
            "2015-02-30-leap".parse::<PostId>(),
            Err(IdentifierError::Date("2015-02-30".to_string()))
        );
    }

    #[test]
    fn test_rejects_unsafe_slug() {
        assert!(matches!(
            "2015-01-01-hello world".parse::<PostId>(),
            Err(IdentifierError::Slug(_))
        ));
        assert!(matches!(
            "2015-01-01--leading-dash".parse::<PostId>(),
            Err(IdentifierError::Slug(_))
        ));
    }

    #[test]
    fn test_orders_by_date_then_slug() {
        let a: PostId = "2015-01-02-a".parse().unwrap();
        let b: PostId = "2015-01-02-b".parse().unwrap();
        let c: PostId = "2016-01-01-a".parse().unwrap();
        assert!(a < b && b < c);
    }
}
