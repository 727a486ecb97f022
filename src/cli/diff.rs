use std::path::PathBuf;

use clap::Args;
use serde_json::json;

use crate::services::differ::ManifestDiffer;
use crate::services::include_resolver::IncludeResolver;
use crate::utils::error::{ReqlintError, Result};

/// Compare two manifests by package
#[derive(Debug, Args)]
pub struct DiffCommand {
    /// Old manifest
    pub old: PathBuf,

    /// New manifest
    pub new: PathBuf,

    /// Output results in JSON format
    #[arg(long)]
    pub json: bool,
}

impl DiffCommand {
    /// Execute the diff command
    pub fn run(&self) -> Result<()> {
        let resolver = IncludeResolver::new(true, true);
        let old = resolver.resolve_file(&self.old)?;
        let new = resolver.resolve_file(&self.new)?;
        let diff = ManifestDiffer::diff(&old, &new);

        if self.json {
            println!(
                "{}",
                json!({
                    "added": diff.added,
                    "removed": diff.removed,
                    "changed": diff.changed,
                })
            );
        } else {
            for entry in &diff.added {
                println!("+ {}", entry.spec);
            }
            for entry in &diff.removed {
                println!("- {}", entry.spec);
            }
            for entry in &diff.changed {
                println!("~ {}: {} -> {}", entry.name, entry.old, entry.new);
            }
            if diff.is_empty() {
                println!("No differences");
            } else {
                println!(
                    "{} added, {} removed, {} changed",
                    diff.added.len(),
                    diff.removed.len(),
                    diff.changed.len()
                );
            }
        }

        if diff.is_empty() {
            Ok(())
        } else {
            Err(ReqlintError::Validation(format!(
                "manifests differ ({} difference(s))",
                diff.len()
            )))
        }
    }
}
