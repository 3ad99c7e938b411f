//! Front-matter parsing

use indexmap::IndexMap;
use serde::de::{DeserializeSeed, Deserializer, MapAccess, Visitor};
use serde::Serialize;
use serde_yaml::{Mapping, Value as Yaml};
use std::fmt;

use super::error::FormatError;

/// Line that opens and closes a front-matter block
pub const MARKER: &str = "---";

/// A single front-matter value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Text(String),
    /// Flat list of scalars, e.g. `tags: [rust, web]`
    List(Vec<String>),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    fn to_yaml(&self) -> Yaml {
        match self {
            Value::Bool(b) => Yaml::Bool(*b),
            Value::Text(s) => Yaml::String(s.clone()),
            Value::List(items) => {
                Yaml::Sequence(items.iter().cloned().map(Yaml::String).collect())
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{}", b),
            Value::Text(s) => f.write_str(s),
            Value::List(items) => f.write_str(&items.join(", ")),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<Vec<String>> for Value {
    fn from(items: Vec<String>) -> Self {
        Value::List(items)
    }
}

/// Ordered front-matter mapping of a record
///
/// Keys keep the order they were written in, and two mappings are only equal
/// when they hold the same pairs in the same order.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct FrontMatter {
    fields: IndexMap<String, Value>,
}

impl PartialEq for FrontMatter {
    fn eq(&self, other: &Self) -> bool {
        self.fields.iter().eq(other.fields.iter())
    }
}

impl Eq for FrontMatter {}

impl FrontMatter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse front-matter from content string
    /// Returns (front_matter, remaining_content)
    ///
    /// Text that does not open with a marker line has no front matter; the
    /// whole input is returned as the remaining content.
    pub fn parse(content: &str) -> Result<(Self, &str), FormatError> {
        match split(content)? {
            Some((block, body)) => Ok((Self::parse_block(block, 2)?, body)),
            None => Ok((Self::default(), content)),
        }
    }

    /// Parse the text between the markers. `first_line` is the line number
    /// the block starts on, used to report errors against the whole file.
    fn parse_block(block: &str, first_line: usize) -> Result<Self, FormatError> {
        if block.trim().is_empty() {
            return Ok(Self::default());
        }

        let syntax = |e: serde_yaml::Error| FormatError::Syntax {
            line: first_line + e.location().map_or(0, |l| l.line().saturating_sub(1)),
            message: e.to_string(),
        };

        // First pass: resolved tree, used for shape checks only
        let doc: Yaml = serde_yaml::from_str(block).map_err(syntax)?;

        let mapping = match doc {
            // comment-only block
            Yaml::Null => return Ok(Self::default()),
            Yaml::Mapping(m) => m,
            _ => return Err(FormatError::NotAMapping),
        };

        let mut shapes = Vec::with_capacity(mapping.len());
        for (key, value) in &mapping {
            shapes.push(shape_of(key, value)?);
        }

        // Second pass: the same entries as written, without type resolution
        let entries = LiteralEntries(&shapes)
            .deserialize(serde_yaml::Deserializer::from_str(block))
            .map_err(syntax)?;

        let mut fm = Self::default();
        for (key, value) in entries {
            if fm.fields.insert(key.clone(), value).is_some() {
                return Err(FormatError::DuplicateKey { key });
            }
        }
        Ok(fm)
    }

    /// Serialize the mapping as YAML, one `key: value` per entry
    pub fn to_yaml(&self) -> Result<String, FormatError> {
        let mut map = Mapping::new();
        for (key, value) in &self.fields {
            map.insert(Yaml::String(key.clone()), value.to_yaml());
        }
        serde_yaml::to_string(&map).map_err(|e| FormatError::Serialize(e.to_string()))
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Insert a value, keeping the position of an existing key
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.fields.shift_remove(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn title(&self) -> Option<&str> {
        self.get("title").and_then(Value::as_str)
    }

    pub fn layout(&self) -> Option<&str> {
        self.get("layout").and_then(Value::as_str)
    }

    /// Posts are published unless they say otherwise
    pub fn published(&self) -> bool {
        self.get("published")
            .and_then(Value::as_bool)
            .unwrap_or(true)
    }
}

/// Split `text` into its front-matter block and the body following it.
///
/// Returns `None` when the first line is not a marker line.
pub(crate) fn split(text: &str) -> Result<Option<(&str, &str)>, FormatError> {
    let mut lines = text.split_inclusive('\n');
    let Some(first) = lines.next() else {
        return Ok(None);
    };
    if !is_marker(first) {
        return Ok(None);
    }

    let start = first.len();
    let mut offset = start;
    for line in lines {
        if is_marker(line) {
            return Ok(Some((&text[start..offset], &text[offset + line.len()..])));
        }
        offset += line.len();
    }

    Err(FormatError::Unterminated { line: 1 })
}

/// Whether the first line of `text` is a marker line
pub(crate) fn starts_with_marker(text: &str) -> bool {
    text.split_inclusive('\n').next().is_some_and(is_marker)
}

/// `---`, optionally followed by blanks, then a line ending or end of input.
/// Indented dashes belong to YAML content, not the delimiter.
fn is_marker(line: &str) -> bool {
    let line = line.strip_suffix('\n').unwrap_or(line);
    let line = line.strip_suffix('\r').unwrap_or(line);
    line.trim_end_matches([' ', '\t']) == MARKER
}

fn kind_of(value: &Yaml) -> &'static str {
    match value {
        Yaml::Null => "null",
        Yaml::Bool(_) => "boolean",
        Yaml::Number(_) => "number",
        Yaml::String(_) => "string",
        Yaml::Sequence(_) => "list",
        Yaml::Mapping(_) => "mapping",
        Yaml::Tagged(_) => "tagged",
    }
}

/// How an entry's value is read back as text
#[derive(Debug, Clone, Copy)]
enum Shape {
    /// Plain `true`/`false` are booleans, any other spelling stays text
    Bool,
    Scalar,
    List,
}

fn is_scalar(value: &Yaml) -> bool {
    matches!(
        value,
        Yaml::Null | Yaml::Bool(_) | Yaml::Number(_) | Yaml::String(_)
    )
}

fn shape_of(key: &Yaml, value: &Yaml) -> Result<Shape, FormatError> {
    let key = match key {
        Yaml::Bool(b) => b.to_string(),
        Yaml::Number(n) => n.to_string(),
        Yaml::String(s) => s.clone(),
        Yaml::Null => {
            return Err(FormatError::Unsupported {
                key: "~".to_string(),
                kind: "null key",
            })
        }
        other => {
            return Err(FormatError::Unsupported {
                key: format!("<{}>", kind_of(other)),
                kind: "non-scalar key",
            })
        }
    };
    let unsupported = |kind| FormatError::Unsupported {
        key: key.clone(),
        kind,
    };

    match value {
        Yaml::Bool(_) => Ok(Shape::Bool),
        Yaml::Sequence(items) if items.iter().all(is_scalar) => Ok(Shape::List),
        Yaml::Sequence(_) => Err(unsupported("nested")),
        Yaml::Mapping(_) | Yaml::Tagged(_) => Err(unsupported(kind_of(value))),
        _ => Ok(Shape::Scalar),
    }
}

/// Reads a mapping whose entry shapes are already known, taking every key
/// and scalar as its source text (`1.10`, `0x1F` and `~` stay as written).
struct LiteralEntries<'a>(&'a [Shape]);

impl<'de> DeserializeSeed<'de> for LiteralEntries<'_> {
    type Value = Vec<(String, Value)>;

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_map(self)
    }
}

impl<'de> Visitor<'de> for LiteralEntries<'_> {
    type Value = Vec<(String, Value)>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a front-matter mapping")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut entries = Vec::with_capacity(self.0.len());
        let mut shapes = self.0.iter();

        while let Some(key) = map.next_key::<String>()? {
            let value = match shapes.next() {
                Some(Shape::List) => Value::List(map.next_value::<Vec<String>>()?),
                Some(Shape::Bool) => {
                    let literal = map.next_value::<String>()?;
                    match literal.as_str() {
                        "true" => Value::Bool(true),
                        "false" => Value::Bool(false),
                        _ => Value::Text(literal),
                    }
                }
                Some(Shape::Scalar) | None => Value::Text(map.next_value::<String>()?),
            };
            entries.push((key, value));
        }

        Ok(entries)
    }
}
