use std::path::PathBuf;

use clap::Args;
use serde_json::json;

use crate::models::requirement::Requirement;
use crate::services::include_resolver::IncludeResolver;
use crate::utils::error::Result;

/// List the requirements in a manifest
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Manifest file to list
    pub file: PathBuf,

    /// Only requirements pinned to an exact version
    #[arg(long, conflicts_with = "unconstrained")]
    pub pinned: bool,

    /// Only requirements with no version constraint
    #[arg(long)]
    pub unconstrained: bool,

    /// Do not read -r includes
    #[arg(long)]
    pub no_follow: bool,

    /// Output results in JSON format
    #[arg(long)]
    pub json: bool,
}

impl ListCommand {
    /// Execute the list command
    pub fn run(&self) -> Result<()> {
        let resolver = IncludeResolver::new(!self.no_follow, true);
        let resolved = resolver.resolve_file(&self.file)?;

        let entries: Vec<_> = resolved
            .entries
            .iter()
            .filter(|entry| self.matches(&entry.requirement))
            .collect();

        if self.json {
            let items: Vec<_> = entries
                .iter()
                .map(|entry| {
                    let req = &entry.requirement;
                    json!({
                        "name": req.name,
                        "normalized": req.normalized_name(),
                        "extras": req.extras,
                        "specifiers": req.specifiers,
                        "marker": req.marker,
                        "pinned": req.is_pinned(),
                        "line": req.line,
                        "source": entry.source.as_ref().map(|p| p.display().to_string()),
                    })
                })
                .collect();
            println!("{}", json!({ "requirements": items }));
        } else {
            for entry in &entries {
                let mut line = entry.requirement.spec_string();
                if entry.source != resolved.root.source {
                    if let Some(source) = &entry.source {
                        line.push_str(&format!("  (from {})", source.display()));
                    }
                }
                println!("{}", line);
            }
            println!("{} requirement(s)", entries.len());
        }

        Ok(())
    }

    fn matches(&self, req: &Requirement) -> bool {
        if self.pinned {
            req.is_pinned()
        } else if self.unconstrained {
            req.is_unconstrained()
        } else {
            true
        }
    }
}
