// Line-level model of a requirements manifest

use std::path::PathBuf;

use serde::Serialize;

use crate::models::requirement::Requirement;

/// One line of a manifest, in file order
///
/// Comments and blanks are kept so the formatter can round-trip a file;
/// consuming operations (validation, diff, listing) only look at
/// requirement and include lines.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ManifestLine {
    /// A dependency entry
    Requirement(Requirement),
    /// Full-line comment; `text` is everything after the `#`, verbatim
    Comment { text: String, line: usize },
    /// Blank or whitespace-only line
    Blank { line: usize },
    /// Reference to another manifest (`-r other.txt`)
    Include { path: String, line: usize },
}

impl ManifestLine {
    /// 1-based source line number
    pub fn line_number(&self) -> usize {
        match self {
            ManifestLine::Requirement(req) => req.line,
            ManifestLine::Comment { line, .. } => *line,
            ManifestLine::Blank { line } => *line,
            ManifestLine::Include { line, .. } => *line,
        }
    }
}

/// A parsed manifest: source path (when read from disk) plus ordered lines
#[derive(Debug, Clone, Default, Serialize)]
pub struct Manifest {
    /// Path the manifest was read from, `None` for in-memory input
    pub source: Option<PathBuf>,
    /// All lines, in original order
    pub lines: Vec<ManifestLine>,
}

impl Manifest {
    pub fn new(source: Option<PathBuf>, lines: Vec<ManifestLine>) -> Self {
        Self { source, lines }
    }

    /// Requirement entries in file order
    pub fn requirements(&self) -> impl Iterator<Item = &Requirement> {
        self.lines.iter().filter_map(|line| match line {
            ManifestLine::Requirement(req) => Some(req),
            _ => None,
        })
    }

    /// Include entries in file order as (path, line) pairs
    pub fn includes(&self) -> impl Iterator<Item = (&str, usize)> {
        self.lines.iter().filter_map(|line| match line {
            ManifestLine::Include { path, line } => Some((path.as_str(), *line)),
            _ => None,
        })
    }

    /// All requirements whose normalized name matches
    pub fn find(&self, normalized: &str) -> Vec<&Requirement> {
        self.requirements()
            .filter(|req| req.normalized_name() == normalized)
            .collect()
    }

    /// Number of requirement entries
    pub fn len(&self) -> usize {
        self.requirements().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Human-readable source label for messages
    pub fn source_label(&self) -> String {
        match &self.source {
            Some(path) => path.display().to_string(),
            None => "<input>".to_string(),
        }
    }
}
