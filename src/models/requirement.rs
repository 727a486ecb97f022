// A single dependency entry from a requirements manifest

use std::fmt;

use serde::Serialize;

use crate::models::specifier::SpecifierSet;

/// One requirement line: name, optional extras, version constraints,
/// optional environment marker, optional trailing comment
///
/// The marker is kept verbatim (the validator only syntax-checks it);
/// `line` is the 1-based number of the first physical line the entry was
/// parsed from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Requirement {
    /// Package name exactly as written
    pub name: String,
    /// Extras (`name[extra1,extra2]`), empty when absent
    pub extras: Vec<String>,
    /// Version constraints; empty means unconstrained
    pub specifiers: SpecifierSet,
    /// Environment marker text after `;`, without the separator
    pub marker: Option<String>,
    /// Inline comment text after `#`, without the marker
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// 1-based source line number
    pub line: usize,
}

impl Requirement {
    /// Create a bare requirement with no extras, marker, or comment
    pub fn new(name: String, specifiers: SpecifierSet, line: usize) -> Self {
        Self {
            name,
            extras: Vec::new(),
            specifiers,
            marker: None,
            comment: None,
            line,
        }
    }

    /// Canonical package name: lowercase, runs of `-`, `_`, `.` collapsed
    /// to a single `-`
    pub fn normalized_name(&self) -> String {
        normalize_name(&self.name)
    }

    /// Whether the name is already in canonical form
    pub fn has_canonical_name(&self) -> bool {
        self.name == self.normalized_name()
    }

    /// Whether the requirement pins an exact version
    pub fn is_pinned(&self) -> bool {
        self.specifiers.is_pin()
    }

    /// Whether the requirement accepts any version at all
    pub fn is_unconstrained(&self) -> bool {
        self.specifiers.is_empty()
    }

    /// Requirement identifier (`name` or `name==1.2.3`) without marker
    /// or comment, used in diff and list output
    pub fn identifier(&self) -> String {
        if self.specifiers.is_empty() {
            self.name.clone()
        } else {
            format!("{}{}", self.name, self.specifiers)
        }
    }

    /// Canonical rendering of everything except the comment
    pub fn spec_string(&self) -> String {
        let mut out = self.name.clone();
        if !self.extras.is_empty() {
            out.push('[');
            out.push_str(&self.extras.join(","));
            out.push(']');
        }
        if !self.specifiers.is_empty() {
            out.push_str(&self.specifiers.to_string());
        }
        if let Some(marker) = &self.marker {
            out.push_str(" ; ");
            out.push_str(marker);
        }
        out
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.spec_string())?;
        if let Some(comment) = &self.comment {
            write!(f, "  # {}", comment)?;
        }
        Ok(())
    }
}

/// Canonicalize a package name the way the host ecosystem's index does
pub fn normalize_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut last_was_separator = false;
    for ch in name.chars() {
        if matches!(ch, '-' | '_' | '.') {
            last_was_separator = true;
        } else {
            if last_was_separator && !out.is_empty() {
                out.push('-');
            }
            last_was_separator = false;
            out.extend(ch.to_lowercase());
        }
    }
    out
}

/// Validate a package name: ASCII alphanumerics plus `-`, `_`, `.`,
/// starting and ending alphanumeric
pub fn validate_name(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("package name cannot be empty".to_string());
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
    {
        return Err(format!(
            "package name '{}' may only contain letters, digits, '-', '_', and '.'",
            name
        ));
    }
    let first = name.chars().next().unwrap_or(' ');
    let last = name.chars().last().unwrap_or(' ');
    if !first.is_ascii_alphanumeric() || !last.is_ascii_alphanumeric() {
        return Err(format!(
            "package name '{}' must start and end with a letter or digit",
            name
        ));
    }
    Ok(())
}
