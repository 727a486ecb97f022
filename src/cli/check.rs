use std::path::PathBuf;

use clap::Args;
use serde_json::json;

use crate::services::include_resolver::{IncludeResolver, ResolvedManifest};
use crate::services::validator::{Finding, ManifestValidator, Severity};
use crate::utils::config::LintConfig;
use crate::utils::error::{ReqlintError, Result};

/// Validate a manifest and report findings
#[derive(Debug, Args)]
pub struct CheckCommand {
    /// Manifest file to check
    pub file: PathBuf,

    /// Treat warnings as errors
    #[arg(long)]
    pub strict: bool,

    /// Do not read -r includes
    #[arg(long)]
    pub no_follow: bool,

    /// Explicit path to a reqlint.toml
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Output results in JSON format
    #[arg(long)]
    pub json: bool,
}

impl CheckCommand {
    /// Execute the check command
    pub fn run(&self) -> Result<()> {
        let config = LintConfig::load(self.config.as_deref(), self.file.parent())?;
        let resolver = IncludeResolver::new(!self.no_follow, false);
        let resolved = resolver.resolve_file(&self.file)?;
        let findings = ManifestValidator::new(&config).validate(&resolved);

        let errors = findings.iter().filter(|f| self.is_error(f)).count();
        let warnings = findings.len() - errors;

        if self.json {
            self.output_json(&resolved, &findings, errors, warnings);
        } else {
            self.output_human(&resolved, &findings, errors, warnings);
        }

        if errors > 0 {
            return Err(ReqlintError::Validation(format!(
                "{} problem(s) found in {}",
                errors,
                self.file.display()
            )));
        }
        Ok(())
    }

    /// Effective severity after --strict promotion
    fn is_error(&self, finding: &Finding) -> bool {
        finding.severity == Severity::Error || (self.strict && finding.severity == Severity::Warning)
    }

    fn output_human(
        &self,
        resolved: &ResolvedManifest,
        findings: &[Finding],
        errors: usize,
        warnings: usize,
    ) {
        for finding in findings {
            let label = if self.is_error(finding) {
                "error"
            } else {
                "warning"
            };
            println!(
                "{}: {}: {} [{}]",
                finding.location(),
                label,
                finding.message,
                finding.rule
            );
        }

        println!(
            "Checked {} requirement(s) across {} file(s)",
            resolved.entries.len(),
            resolved.files.len().max(1)
        );
        if findings.is_empty() {
            println!("No problems found");
        } else {
            println!("{} error(s), {} warning(s)", errors, warnings);
        }
    }

    fn output_json(
        &self,
        resolved: &ResolvedManifest,
        findings: &[Finding],
        errors: usize,
        warnings: usize,
    ) {
        let files: Vec<String> = resolved
            .files
            .iter()
            .map(|path| path.display().to_string())
            .collect();
        let value = json!({
            "file": self.file.display().to_string(),
            "files": files,
            "checked": resolved.entries.len(),
            "errors": errors,
            "warnings": warnings,
            "findings": findings,
        });
        println!("{}", value);
    }
}
