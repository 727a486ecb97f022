// Canonical rendering of a manifest

use crate::models::manifest::{Manifest, ManifestLine};
use crate::models::requirement::Requirement;

/// Options for `ManifestFormatter::format`
#[derive(Debug, Clone, Copy, Default)]
pub struct FormatOptions {
    /// Sort requirement lines by normalized name within each contiguous
    /// run (comments and blanks delimit runs, so grouped sections keep
    /// their headers)
    pub sort: bool,
}

/// Renders a manifest in canonical form
///
/// Requirement lines use their canonical `Display` form, full-line
/// comments pass through verbatim, and runs of blank lines collapse to
/// one. Formatting is idempotent.
pub struct ManifestFormatter;

impl ManifestFormatter {
    pub fn format(manifest: &Manifest, options: &FormatOptions) -> String {
        let mut out: Vec<String> = Vec::new();
        let mut run: Vec<&Requirement> = Vec::new();

        for line in &manifest.lines {
            match line {
                ManifestLine::Requirement(req) => run.push(req),
                ManifestLine::Comment { text, .. } => {
                    flush_run(&mut run, options, &mut out);
                    out.push(format!("#{}", text));
                }
                ManifestLine::Include { path, .. } => {
                    flush_run(&mut run, options, &mut out);
                    out.push(format!("-r {}", path));
                }
                ManifestLine::Blank { .. } => {
                    flush_run(&mut run, options, &mut out);
                    if !out.is_empty() && out.last().map(String::as_str) != Some("") {
                        out.push(String::new());
                    }
                }
            }
        }
        flush_run(&mut run, options, &mut out);

        while out.last().map(String::as_str) == Some("") {
            out.pop();
        }
        if out.is_empty() {
            return String::new();
        }
        let mut text = out.join("\n");
        text.push('\n');
        text
    }

    /// Whether `text` is already in canonical form for `manifest`
    pub fn is_formatted(manifest: &Manifest, text: &str, options: &FormatOptions) -> bool {
        Self::format(manifest, options) == text
    }
}

fn flush_run(run: &mut Vec<&Requirement>, options: &FormatOptions, out: &mut Vec<String>) {
    if options.sort {
        run.sort_by_key(|req| req.normalized_name());
    }
    out.extend(run.drain(..).map(|req| req.to_string()));
}
