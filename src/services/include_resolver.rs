// Recursive resolution of -r include lines

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::models::manifest::{Manifest, ManifestLine};
use crate::models::requirement::Requirement;
use crate::services::parser::{ManifestParser, ParseIssue};
use crate::utils::error::{ReqlintError, Result};

/// A parse issue tagged with the file it came from
#[derive(Debug, Clone, PartialEq)]
pub struct FileIssue {
    pub source: Option<PathBuf>,
    pub line: usize,
    pub message: String,
}

/// A requirement tagged with the manifest it came from
#[derive(Debug, Clone)]
pub struct ResolvedEntry {
    pub requirement: Requirement,
    pub source: Option<PathBuf>,
}

/// A manifest with its include chain flattened
///
/// `entries` holds the root's requirements with each include's
/// requirements spliced in at the include's position, in file order.
/// Validation and listing operate on this view.
#[derive(Debug, Clone, Default)]
pub struct ResolvedManifest {
    pub root: Manifest,
    pub entries: Vec<ResolvedEntry>,
    pub issues: Vec<FileIssue>,
    /// Every file read, root first
    pub files: Vec<PathBuf>,
}

impl ResolvedManifest {
    /// Requirements across all files in splice order
    pub fn requirements(&self) -> impl Iterator<Item = &Requirement> {
        self.entries.iter().map(|entry| &entry.requirement)
    }
}

/// Resolver for `-r` include lines
///
/// Paths resolve relative to the including manifest's directory. A file
/// reached twice along different paths is read once; a true cycle is an
/// error naming the repeating file.
pub struct IncludeResolver {
    /// Read included manifests; when false, includes stay unread
    pub follow: bool,
    /// Abort on the first parse error instead of collecting issues
    pub strict: bool,
}

impl Default for IncludeResolver {
    fn default() -> Self {
        Self {
            follow: true,
            strict: false,
        }
    }
}

impl IncludeResolver {
    pub fn new(follow: bool, strict: bool) -> Self {
        Self { follow, strict }
    }

    /// Resolve a manifest file and its include chain
    pub fn resolve_file(&self, path: &Path) -> Result<ResolvedManifest> {
        let (manifest, issues) = self.parse_one(path)?;
        let mut resolved = ResolvedManifest {
            root: manifest,
            files: vec![path.to_path_buf()],
            ..Default::default()
        };
        resolved.issues.extend(issues.into_iter().map(|issue| FileIssue {
            source: Some(path.to_path_buf()),
            line: issue.line,
            message: issue.message,
        }));

        let mut visited = HashSet::new();
        let mut stack = Vec::new();
        if let Ok(canonical) = path.canonicalize() {
            visited.insert(canonical.clone());
            stack.push(canonical);
        }

        let root_manifest = resolved.root.clone();
        self.walk(&root_manifest, path.parent(), &mut stack, &mut visited, &mut resolved)?;
        Ok(resolved)
    }

    /// Resolve already-parsed in-memory input; includes resolve relative
    /// to `base_dir` (the current directory when `None`)
    pub fn resolve_manifest(
        &self,
        manifest: Manifest,
        issues: Vec<ParseIssue>,
        base_dir: Option<&Path>,
    ) -> Result<ResolvedManifest> {
        let mut resolved = ResolvedManifest {
            root: manifest.clone(),
            ..Default::default()
        };
        resolved.issues.extend(issues.into_iter().map(|issue| FileIssue {
            source: manifest.source.clone(),
            line: issue.line,
            message: issue.message,
        }));

        let mut visited = HashSet::new();
        let mut stack = Vec::new();
        self.walk(&manifest, base_dir, &mut stack, &mut visited, &mut resolved)?;
        Ok(resolved)
    }

    fn parse_one(&self, path: &Path) -> Result<(Manifest, Vec<ParseIssue>)> {
        if self.strict {
            Ok((ManifestParser::parse_file_strict(path)?, Vec::new()))
        } else {
            ManifestParser::parse_file(path)
        }
    }

    fn walk(
        &self,
        manifest: &Manifest,
        base_dir: Option<&Path>,
        stack: &mut Vec<PathBuf>,
        visited: &mut HashSet<PathBuf>,
        out: &mut ResolvedManifest,
    ) -> Result<()> {
        for line in &manifest.lines {
            match line {
                ManifestLine::Requirement(req) => out.entries.push(ResolvedEntry {
                    requirement: req.clone(),
                    source: manifest.source.clone(),
                }),
                ManifestLine::Include { path, .. } => {
                    if !self.follow {
                        continue;
                    }
                    self.follow_include(manifest, path, base_dir, stack, visited, out)?;
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn follow_include(
        &self,
        from: &Manifest,
        include: &str,
        base_dir: Option<&Path>,
        stack: &mut Vec<PathBuf>,
        visited: &mut HashSet<PathBuf>,
        out: &mut ResolvedManifest,
    ) -> Result<()> {
        let target = match base_dir {
            Some(dir) => dir.join(include),
            None => PathBuf::from(include),
        };

        let canonical = target.canonicalize().map_err(|err| ReqlintError::Include {
            path: target.display().to_string(),
            message: format!("included from {}: {}", from.source_label(), err),
        })?;

        if stack.contains(&canonical) {
            return Err(ReqlintError::Include {
                path: target.display().to_string(),
                message: format!("include cycle detected via {}", from.source_label()),
            });
        }
        if !visited.insert(canonical.clone()) {
            debug!(path = %target.display(), "include already read, skipping");
            return Ok(());
        }

        debug!(path = %target.display(), from = %from.source_label(), "following include");
        let (manifest, issues) = self.parse_one(&target)?;
        out.files.push(target.clone());
        out.issues.extend(issues.into_iter().map(|issue| FileIssue {
            source: Some(target.clone()),
            line: issue.line,
            message: issue.message,
        }));

        stack.push(canonical);
        self.walk(&manifest, target.parent(), stack, visited, out)?;
        stack.pop();
        Ok(())
    }
}
