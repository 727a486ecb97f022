// Comparison of two manifests by package

use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::requirement::Requirement;
use crate::services::include_resolver::ResolvedManifest;

/// A package present on only one side
#[derive(Debug, Clone, Serialize)]
pub struct DiffEntry {
    /// Normalized package name
    pub name: String,
    /// Canonical requirement text (name, extras, specifiers, marker)
    pub spec: String,
}

/// A package present on both sides with different constraints
#[derive(Debug, Clone, Serialize)]
pub struct ChangedEntry {
    pub name: String,
    pub old: String,
    pub new: String,
}

/// Result of comparing two manifests, each list sorted by name
#[derive(Debug, Clone, Default, Serialize)]
pub struct ManifestDiff {
    pub added: Vec<DiffEntry>,
    pub removed: Vec<DiffEntry>,
    pub changed: Vec<ChangedEntry>,
}

impl ManifestDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.changed.is_empty()
    }

    /// Total number of differences
    pub fn len(&self) -> usize {
        self.added.len() + self.removed.len() + self.changed.len()
    }
}

/// Compares the flattened views of two manifests
///
/// Packages are matched by normalized name; when a name appears more
/// than once on a side, the first occurrence wins (the validator flags
/// the duplicate separately).
pub struct ManifestDiffer;

impl ManifestDiffer {
    pub fn diff(old: &ResolvedManifest, new: &ResolvedManifest) -> ManifestDiff {
        let old_map = first_by_name(old);
        let new_map = first_by_name(new);
        let mut diff = ManifestDiff::default();

        for (name, req) in &new_map {
            if !old_map.contains_key(name) {
                diff.added.push(DiffEntry {
                    name: name.clone(),
                    spec: req.spec_string(),
                });
            }
        }

        for (name, req) in &old_map {
            match new_map.get(name) {
                None => diff.removed.push(DiffEntry {
                    name: name.clone(),
                    spec: req.spec_string(),
                }),
                Some(new_req) => {
                    if constraint_signature(req) != constraint_signature(new_req) {
                        diff.changed.push(ChangedEntry {
                            name: name.clone(),
                            old: req.spec_string(),
                            new: new_req.spec_string(),
                        });
                    }
                }
            }
        }

        diff
    }
}

fn first_by_name(resolved: &ResolvedManifest) -> BTreeMap<String, &Requirement> {
    let mut map = BTreeMap::new();
    for req in resolved.requirements() {
        map.entry(req.normalized_name()).or_insert(req);
    }
    map
}

/// Everything that makes two entries for the same package differ:
/// extras, canonical specifiers, and marker. Name spelling and comments
/// do not count.
fn constraint_signature(req: &Requirement) -> String {
    format!(
        "{}|{}|{}",
        req.extras.join(","),
        req.specifiers,
        req.marker.as_deref().unwrap_or("")
    )
}
