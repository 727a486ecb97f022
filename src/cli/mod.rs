// CLI module for command-line interface

pub mod check;
pub mod diff;
pub mod fmt;
pub mod list;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::utils::error::Result;

use self::check::CheckCommand;
use self::diff::DiffCommand;
use self::fmt::FmtCommand;
use self::list::ListCommand;

/// Main CLI structure
#[derive(Parser)]
#[command(name = "reqlint")]
#[command(about = "A linter and formatter for requirements manifests")]
#[command(long_about = r#"reqlint parses, validates, formats, and compares line-oriented
requirements manifests.

Features:
  • Syntax checking with per-line diagnostics
  • Duplicate and conflicting-constraint detection
  • Canonical formatting with comment round-tripping
  • Recursive -r include resolution with cycle detection
  • Package-level diff between two manifests

Examples:
  reqlint check requirements.txt        Validate a manifest
  reqlint check --strict requirements.txt  Treat warnings as errors
  reqlint list --pinned requirements.txt   Show exact pins only
  reqlint fmt --write requirements.txt     Canonicalize in place
  reqlint diff old.txt new.txt             Compare two manifests"#)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// All available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Validate a manifest and report findings
    #[command(long_about = r#"Validate a manifest and report findings.

Parses the file (following -r includes by default), runs every enabled
lint rule, and prints one line per finding with its location, severity,
and rule id. The exit status is 1 when any error-level finding exists,
2 when the file itself cannot be read or parsed at all.

Rule severities come from reqlint.toml next to the manifest or in the
user config directory; --strict promotes every warning to an error.

Examples:
  reqlint check requirements.txt            Validate with default rules
  reqlint check --strict requirements.txt   Fail on warnings too
  reqlint check --no-follow requirements.txt  Skip -r includes
  reqlint check --config ci.toml requirements.txt  Explicit config
  reqlint check --json requirements.txt     Machine-readable findings"#)]
    Check {
        /// Manifest file to check
        file: PathBuf,

        /// Treat warnings as errors
        #[arg(long)]
        strict: bool,

        /// Do not read -r includes
        #[arg(long)]
        no_follow: bool,

        /// Explicit path to a reqlint.toml
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the requirements in a manifest
    #[command(long_about = r#"List the requirements in a manifest.

Prints each requirement in canonical form, one per line, with the
source file annotated for entries pulled in through -r includes.
Filters narrow the listing to exact pins or fully unconstrained
entries.

Examples:
  reqlint list requirements.txt             All requirements
  reqlint list --pinned requirements.txt    Exact pins only
  reqlint list --unconstrained requirements.txt  Entries with no constraint
  reqlint list --json requirements.txt      Structured output"#)]
    List {
        /// Manifest file to list
        file: PathBuf,

        /// Only requirements pinned to an exact version
        #[arg(long, conflicts_with = "unconstrained")]
        pinned: bool,

        /// Only requirements with no version constraint
        #[arg(long)]
        unconstrained: bool,

        /// Do not read -r includes
        #[arg(long)]
        no_follow: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Rewrite a manifest in canonical form
    #[command(long_about = r#"Rewrite a manifest in canonical form.

Requirement lines are normalized (spacing, version spellings, comment
placement), full-line comments pass through untouched, and runs of
blank lines collapse. Without flags the result is printed to stdout.

Examples:
  reqlint fmt requirements.txt              Print the formatted manifest
  reqlint fmt --write requirements.txt      Rewrite the file in place
  reqlint fmt --check requirements.txt      Exit 1 if not canonical (CI)
  reqlint fmt --write --sort requirements.txt  Also sort each block"#)]
    Fmt {
        /// Manifest file to format
        file: PathBuf,

        /// Rewrite the file in place instead of printing
        #[arg(long, conflicts_with = "check")]
        write: bool,

        /// Exit non-zero if the file is not already formatted
        #[arg(long)]
        check: bool,

        /// Sort requirements by name within each block
        #[arg(long)]
        sort: bool,
    },

    /// Compare two manifests by package
    #[command(long_about = r#"Compare two manifests by package.

Matches packages by canonical name across both files (includes are
followed) and reports additions, removals, and constraint changes.
The exit status is 1 when the manifests differ, so the command can be
used as a predicate in scripts.

Examples:
  reqlint diff old.txt new.txt              Human-readable diff
  reqlint diff --json old.txt new.txt       Structured diff"#)]
    Diff {
        /// Old manifest
        old: PathBuf,

        /// New manifest
        new: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// CLI command dispatcher
pub struct CliDispatcher;

impl CliDispatcher {
    /// Execute a CLI command
    pub fn execute(command: Commands) -> Result<()> {
        match command {
            Commands::Check {
                file,
                strict,
                no_follow,
                config,
                json,
            } => {
                let cmd = CheckCommand {
                    file,
                    strict,
                    no_follow,
                    config,
                    json,
                };
                cmd.run()
            }

            Commands::List {
                file,
                pinned,
                unconstrained,
                no_follow,
                json,
            } => {
                let cmd = ListCommand {
                    file,
                    pinned,
                    unconstrained,
                    no_follow,
                    json,
                };
                cmd.run()
            }

            Commands::Fmt {
                file,
                write,
                check,
                sort,
            } => {
                let cmd = FmtCommand {
                    file,
                    write,
                    check,
                    sort,
                };
                cmd.run()
            }

            Commands::Diff { old, new, json } => {
                let cmd = DiffCommand { old, new, json };
                cmd.run()
            }
        }
    }
}
