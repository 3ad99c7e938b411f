//! Validate post records

use anyhow::Result;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

use crate::content::{Outline, Record};
use crate::Blog;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Failure,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => f.write_str("warning"),
            Severity::Failure => f.write_str("error"),
        }
    }
}

/// A problem found in one record
#[derive(Debug, Clone, Serialize)]
pub struct Finding {
    pub path: PathBuf,
    pub severity: Severity,
    pub message: String,
}

/// Outcome of checking the whole store
#[derive(Debug, Clone, Default, Serialize)]
pub struct Report {
    /// Record files looked at, readable or not
    pub checked: usize,
    pub findings: Vec<Finding>,
}

impl Report {
    pub fn failures(&self) -> impl Iterator<Item = &Finding> {
        self.findings
            .iter()
            .filter(|f| f.severity == Severity::Failure)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Finding> {
        self.findings
            .iter()
            .filter(|f| f.severity == Severity::Warning)
    }

    pub fn is_ok(&self) -> bool {
        self.failures().next().is_none()
    }
}

/// Check every record in the blog. Strict mode (the argument or the
/// `strict` config key) turns warnings into failures.
pub fn run(blog: &Blog, strict: bool) -> Result<Report> {
    let strict = strict || blog.config.strict;
    let store = blog.store();
    let mut report = Report::default();

    for result in store.posts() {
        report.checked += 1;
        match result {
            Ok(record) => {
                let path = store.root().join(&record.source);
                for message in inspect(&record) {
                    report.findings.push(Finding {
                        path: path.clone(),
                        severity: if strict {
                            Severity::Failure
                        } else {
                            Severity::Warning
                        },
                        message,
                    });
                }
            }
            Err(e) => report.findings.push(Finding {
                path: e.path().to_path_buf(),
                severity: Severity::Failure,
                message: e.to_string(),
            }),
        }
    }

    tracing::debug!(
        "Checked {} records, {} findings",
        report.checked,
        report.findings.len()
    );

    Ok(report)
}

/// Tolerated irregularities in a readable record
pub fn inspect(record: &Record) -> Vec<String> {
    let mut messages = Vec::new();
    let front_matter = &record.post.front_matter;

    if front_matter.is_empty() {
        messages.push("no front matter; the generator will use its defaults".to_string());
    } else if front_matter.title().is_none() {
        messages.push("front matter has no `title`".to_string());
    }

    let outline = Outline::of(&record.post.body);
    for block in outline.untagged_fences() {
        messages.push(format!(
            "fenced code block on body line {} has no language hint",
            block.line
        ));
    }

    messages
}

/// Print a report, one finding per line
pub fn print(report: &Report) {
    for finding in &report.findings {
        println!(
            "{}: {}: {}",
            finding.severity,
            finding.path.display(),
            finding.message
        );
    }
    println!(
        "Checked {} records: {} errors, {} warnings",
        report.checked,
        report.failures().count(),
        report.warnings().count()
    );
}
