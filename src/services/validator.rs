// Lint rules over a resolved manifest

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::models::specifier::Operator;
use crate::services::include_resolver::ResolvedManifest;
use crate::utils::config::{LintConfig, RuleLevel};

/// How serious a finding is after configuration is applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// Every lint rule the validator knows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    /// A line failed to parse
    Syntax,
    /// The same package appears more than once
    DuplicatePackage,
    /// A specifier's version does not parse
    InvalidVersion,
    /// A specifier set no version can satisfy
    ConflictingSpecifiers,
    /// No exact pin
    Unpinned,
    /// Name differs from its canonical form
    NonCanonicalName,
    /// Environment marker is empty or has no comparison
    MarkerSyntax,
}

impl Rule {
    pub fn id(&self) -> &'static str {
        match self {
            Rule::Syntax => "syntax",
            Rule::DuplicatePackage => "duplicate-package",
            Rule::InvalidVersion => "invalid-version",
            Rule::ConflictingSpecifiers => "conflicting-specifiers",
            Rule::Unpinned => "unpinned",
            Rule::NonCanonicalName => "non-canonical-name",
            Rule::MarkerSyntax => "marker-syntax",
        }
    }

    pub fn from_id(id: &str) -> Option<Rule> {
        Rule::all().iter().copied().find(|rule| rule.id() == id)
    }

    pub fn all() -> &'static [Rule] {
        &[
            Rule::Syntax,
            Rule::DuplicatePackage,
            Rule::InvalidVersion,
            Rule::ConflictingSpecifiers,
            Rule::Unpinned,
            Rule::NonCanonicalName,
            Rule::MarkerSyntax,
        ]
    }

    pub fn default_level(&self) -> RuleLevel {
        match self {
            Rule::Syntax
            | Rule::DuplicatePackage
            | Rule::InvalidVersion
            | Rule::ConflictingSpecifiers => RuleLevel::Error,
            Rule::Unpinned | Rule::NonCanonicalName | Rule::MarkerSyntax => RuleLevel::Warn,
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl Serialize for Rule {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.id())
    }
}

/// One validation result, tied to a rule and a source location
#[derive(Debug, Clone, Serialize)]
pub struct Finding {
    pub rule: Rule,
    pub severity: Severity,
    pub source: Option<PathBuf>,
    pub line: usize,
    pub message: String,
}

impl Finding {
    /// `path:line` location label for human output
    pub fn location(&self) -> String {
        location_label(&self.source, self.line)
    }
}

fn location_label(source: &Option<PathBuf>, line: usize) -> String {
    let source = source
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "<input>".to_string());
    format!("{}:{}", source, line)
}

/// Runs every enabled rule over a resolved manifest
pub struct ManifestValidator<'a> {
    config: &'a LintConfig,
}

impl<'a> ManifestValidator<'a> {
    pub fn new(config: &'a LintConfig) -> Self {
        Self { config }
    }

    /// Validate the flattened manifest, findings ordered by (file, line)
    pub fn validate(&self, resolved: &ResolvedManifest) -> Vec<Finding> {
        let mut findings = Vec::new();

        self.check_syntax(resolved, &mut findings);
        self.check_entries(resolved, &mut findings);
        self.check_duplicates(resolved, &mut findings);

        findings.sort_by(|a, b| {
            let key_a = (a.location(), a.rule.id());
            let key_b = (b.location(), b.rule.id());
            (a.source.clone(), a.line, key_a).cmp(&(b.source.clone(), b.line, key_b))
        });
        findings
    }

    fn severity_for(&self, rule: Rule) -> Option<Severity> {
        match self.config.rule_level(rule) {
            RuleLevel::Error => Some(Severity::Error),
            RuleLevel::Warn => Some(Severity::Warning),
            RuleLevel::Off => None,
        }
    }

    fn check_syntax(&self, resolved: &ResolvedManifest, findings: &mut Vec<Finding>) {
        let Some(severity) = self.severity_for(Rule::Syntax) else {
            return;
        };
        for issue in &resolved.issues {
            findings.push(Finding {
                rule: Rule::Syntax,
                severity,
                source: issue.source.clone(),
                line: issue.line,
                message: issue.message.clone(),
            });
        }
    }

    fn check_entries(&self, resolved: &ResolvedManifest, findings: &mut Vec<Finding>) {
        for entry in &resolved.entries {
            let req = &entry.requirement;
            let push = |findings: &mut Vec<Finding>, rule: Rule, severity, message: String| {
                findings.push(Finding {
                    rule,
                    severity,
                    source: entry.source.clone(),
                    line: req.line,
                    message,
                });
            };

            if let Some(severity) = self.severity_for(Rule::InvalidVersion) {
                for clause in req.specifiers.clauses() {
                    if clause.version.is_none() && clause.op != Operator::Arbitrary {
                        push(
                            findings,
                            Rule::InvalidVersion,
                            severity,
                            format!("'{}' is not a valid version for '{}'", clause.raw, req.name),
                        );
                    }
                }
            }

            if let Some(severity) = self.severity_for(Rule::ConflictingSpecifiers) {
                if let Some(reason) = req.specifiers.contradiction() {
                    push(
                        findings,
                        Rule::ConflictingSpecifiers,
                        severity,
                        format!("no version of '{}' can satisfy this: {}", req.name, reason),
                    );
                }
            }

            if let Some(severity) = self.severity_for(Rule::Unpinned) {
                if !req.is_pinned() && !self.config.is_ignored(&req.normalized_name()) {
                    push(
                        findings,
                        Rule::Unpinned,
                        severity,
                        format!("'{}' is not pinned to an exact version", req.name),
                    );
                }
            }

            if let Some(severity) = self.severity_for(Rule::NonCanonicalName) {
                if !req.has_canonical_name() {
                    push(
                        findings,
                        Rule::NonCanonicalName,
                        severity,
                        format!(
                            "name '{}' is not canonical (index form is '{}')",
                            req.name,
                            req.normalized_name()
                        ),
                    );
                }
            }

            if let Some(severity) = self.severity_for(Rule::MarkerSyntax) {
                if let Some(marker) = &req.marker {
                    if marker.trim().is_empty() {
                        push(
                            findings,
                            Rule::MarkerSyntax,
                            severity,
                            format!("'{}' has an empty environment marker", req.name),
                        );
                    } else if !has_comparison(marker) {
                        push(
                            findings,
                            Rule::MarkerSyntax,
                            severity,
                            format!(
                                "environment marker '{}' has no comparison operator",
                                marker
                            ),
                        );
                    }
                }
            }
        }
    }

    fn check_duplicates(&self, resolved: &ResolvedManifest, findings: &mut Vec<Finding>) {
        let Some(base_severity) = self.severity_for(Rule::DuplicatePackage) else {
            return;
        };

        let mut groups: HashMap<String, Vec<usize>> = HashMap::new();
        for (index, entry) in resolved.entries.iter().enumerate() {
            groups
                .entry(entry.requirement.normalized_name())
                .or_default()
                .push(index);
        }

        for (name, indexes) in groups {
            if indexes.len() < 2 || self.config.is_ignored(&name) {
                continue;
            }
            let first = &resolved.entries[indexes[0]];
            let first_location = location_label(&first.source, first.requirement.line);

            for &index in &indexes[1..] {
                let entry = &resolved.entries[index];
                // A split across different environment markers is a
                // legitimate idiom, so it only warns
                let severity = if entry.requirement.marker != first.requirement.marker {
                    Severity::Warning
                } else {
                    base_severity
                };
                findings.push(Finding {
                    rule: Rule::DuplicatePackage,
                    severity,
                    source: entry.source.clone(),
                    line: entry.requirement.line,
                    message: format!(
                        "duplicate entry for '{}' (first seen at {})",
                        name, first_location
                    ),
                });
            }
        }
    }
}

fn has_comparison(marker: &str) -> bool {
    ["==", "!=", "<=", ">=", "<", ">"]
        .iter()
        .any(|op| marker.contains(op))
        || marker.contains(" in ")
        || marker.contains(" not in ")
}
