use std::fs;
use std::path::PathBuf;

use clap::Args;

use crate::services::formatter::{FormatOptions, ManifestFormatter};
use crate::services::parser::{read_manifest, ManifestParser};
use crate::utils::error::{ReqlintError, Result};

/// Rewrite a manifest in canonical form
#[derive(Debug, Args)]
pub struct FmtCommand {
    /// Manifest file to format
    pub file: PathBuf,

    /// Rewrite the file in place instead of printing
    #[arg(long, conflicts_with = "check")]
    pub write: bool,

    /// Exit non-zero if the file is not already formatted
    #[arg(long)]
    pub check: bool,

    /// Sort requirements by name within each block
    #[arg(long)]
    pub sort: bool,
}

impl FmtCommand {
    /// Execute the fmt command
    pub fn run(&self) -> Result<()> {
        let original = read_manifest(&self.file)?;
        let manifest = ManifestParser::parse_str_strict(&original, Some(self.file.clone()))?;
        let options = FormatOptions { sort: self.sort };
        let formatted = ManifestFormatter::format(&manifest, &options);

        if self.check {
            if original == formatted {
                println!("{} is already formatted", self.file.display());
                Ok(())
            } else {
                Err(ReqlintError::Validation(format!(
                    "{} is not formatted (run 'reqlint fmt --write {}')",
                    self.file.display(),
                    self.file.display()
                )))
            }
        } else if self.write {
            if original == formatted {
                println!("{} unchanged", self.file.display());
            } else {
                fs::write(&self.file, &formatted)?;
                println!("Rewrote {}", self.file.display());
            }
            Ok(())
        } else {
            print!("{}", formatted);
            Ok(())
        }
    }
}
