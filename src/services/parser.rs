// Line-oriented parsing of requirements manifests

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use crate::models::manifest::{Manifest, ManifestLine};
use crate::models::requirement::{validate_name, Requirement};
use crate::models::specifier::SpecifierSet;
use crate::utils::error::{ReqlintError, Result};

/// A line the parser could not turn into a manifest entry
///
/// Lenient parsing collects these instead of aborting so the validator
/// can report every problem in one pass.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseIssue {
    pub line: usize,
    pub message: String,
}

/// Parser for the line-oriented manifest format
///
/// Each non-blank, non-comment line is either a requirement
/// (`name[extras]specifiers ; marker  # comment`) or an include
/// (`-r other.txt`). A trailing `\` joins the next physical line.
pub struct ManifestParser;

fn requirement_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?x)
            ^ (?P<name>[A-Za-z0-9][A-Za-z0-9._-]*)
            \s* (?: \[ (?P<extras>[^\]]*) \] )?
            \s* (?P<specs>.*) $",
        )
        .expect("requirement regex is valid")
    })
}

impl ManifestParser {
    /// Parse manifest text, collecting per-line issues
    ///
    /// Lines that fail to parse are recorded in the issue list and left
    /// out of the returned manifest.
    pub fn parse_str(text: &str, source: Option<PathBuf>) -> (Manifest, Vec<ParseIssue>) {
        let mut lines = Vec::new();
        let mut issues = Vec::new();

        for (number, content) in logical_lines(text, &mut issues) {
            match classify_line(&content, number) {
                Ok(line) => lines.push(line),
                Err(message) => issues.push(ParseIssue {
                    line: number,
                    message,
                }),
            }
        }

        debug!(
            lines = lines.len(),
            issues = issues.len(),
            source = %source.as_deref().map(|p| p.display().to_string()).unwrap_or_else(|| "<input>".into()),
            "parsed manifest"
        );
        (Manifest::new(source, lines), issues)
    }

    /// Parse manifest text, failing on the first bad line
    pub fn parse_str_strict(text: &str, source: Option<PathBuf>) -> Result<Manifest> {
        let (manifest, issues) = Self::parse_str(text, source);
        if let Some(issue) = issues.first() {
            return Err(ReqlintError::Parse {
                path: manifest.source_label(),
                line: issue.line,
                message: issue.message.clone(),
            });
        }
        Ok(manifest)
    }

    /// Read and parse a manifest file, collecting per-line issues
    pub fn parse_file(path: &Path) -> Result<(Manifest, Vec<ParseIssue>)> {
        let text = read_manifest(path)?;
        Ok(Self::parse_str(&text, Some(path.to_path_buf())))
    }

    /// Read and parse a manifest file, failing on the first bad line
    pub fn parse_file_strict(path: &Path) -> Result<Manifest> {
        let text = read_manifest(path)?;
        Self::parse_str_strict(&text, Some(path.to_path_buf()))
    }
}

/// Read a manifest file with the path in any error message
pub fn read_manifest(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|err| {
        ReqlintError::Io(std::io::Error::new(
            err.kind(),
            format!("{}: {}", path.display(), err),
        ))
    })
}

/// Join physical lines into logical lines, honoring trailing `\`
///
/// Returns (first physical line number, joined content) pairs. A
/// continuation on the final line is recorded as an issue; the text
/// gathered so far is still returned so the entry is not silently lost.
fn logical_lines(text: &str, issues: &mut Vec<ParseIssue>) -> Vec<(usize, String)> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut logical = Vec::new();
    let mut pending: Option<(usize, String)> = None;

    for (index, raw) in text.lines().enumerate() {
        let number = index + 1;
        let line = raw.strip_suffix('\r').unwrap_or(raw);
        match line.trim_end().strip_suffix('\\') {
            Some(head) => match pending.as_mut() {
                Some((_, acc)) => acc.push_str(head),
                None => pending = Some((number, head.to_string())),
            },
            None => match pending.take() {
                Some((start, mut acc)) => {
                    acc.push_str(line);
                    logical.push((start, acc));
                }
                None => logical.push((number, line.to_string())),
            },
        }
    }

    if let Some((start, acc)) = pending {
        issues.push(ParseIssue {
            line: start,
            message: "line continuation at end of file".to_string(),
        });
        logical.push((start, acc));
    }

    logical
}

fn classify_line(content: &str, number: usize) -> std::result::Result<ManifestLine, String> {
    let trimmed = content.trim();

    if trimmed.is_empty() {
        return Ok(ManifestLine::Blank { line: number });
    }

    if let Some(text) = trimmed.strip_prefix('#') {
        return Ok(ManifestLine::Comment {
            text: text.to_string(),
            line: number,
        });
    }

    if trimmed.starts_with('-') {
        return parse_option_line(trimmed, number);
    }

    parse_requirement_line(trimmed, number).map(ManifestLine::Requirement)
}

fn parse_option_line(trimmed: &str, number: usize) -> std::result::Result<ManifestLine, String> {
    let rest = strip_option(trimmed, "--requirement").or_else(|| strip_option(trimmed, "-r"));
    let Some(rest) = rest else {
        return Err(format!(
            "unsupported option line '{}' (only -r/--requirement includes are recognized)",
            trimmed
        ));
    };

    let (path_text, _) = split_comment(rest);
    let path = path_text.trim();
    if path.is_empty() {
        return Err("include is missing a path".to_string());
    }
    Ok(ManifestLine::Include {
        path: path.to_string(),
        line: number,
    })
}

/// Strip an option prefix followed by whitespace or `=`
fn strip_option<'a>(line: &'a str, option: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(option)?;
    let mut chars = rest.chars();
    match chars.next() {
        Some('=') => Some(chars.as_str()),
        Some(c) if c.is_whitespace() => Some(chars.as_str()),
        _ => None,
    }
}

fn parse_requirement_line(
    trimmed: &str,
    number: usize,
) -> std::result::Result<Requirement, String> {
    let (body, comment) = split_comment(trimmed);

    // Everything after the first ';' is an environment marker
    let (req_text, marker) = match body.split_once(';') {
        Some((head, tail)) => (head.trim_end(), Some(tail.trim().to_string())),
        None => (body.trim_end(), None),
    };

    let caps = requirement_regex()
        .captures(req_text)
        .ok_or_else(|| format!("cannot parse requirement '{}'", req_text))?;

    let name = caps["name"].to_string();
    validate_name(&name)?;

    let mut extras = Vec::new();
    if let Some(extras_text) = caps.name("extras") {
        for extra in extras_text.as_str().split(',') {
            let extra = extra.trim();
            if extra.is_empty() {
                return Err(format!("empty extra name in '{}'", req_text));
            }
            validate_name(extra).map_err(|_| format!("invalid extra name '{}'", extra))?;
            extras.push(extra.to_string());
        }
    }

    let specifiers: SpecifierSet = caps["specs"].parse()?;

    Ok(Requirement {
        name,
        extras,
        specifiers,
        marker,
        comment: comment.map(str::to_string),
        line: number,
    })
}

/// Split a line at the first `#` that starts a comment (preceded by
/// whitespace); returns (body, trimmed comment text)
fn split_comment(line: &str) -> (&str, Option<&str>) {
    let bytes = line.as_bytes();
    for (index, _) in line.match_indices('#') {
        if index == 0 || bytes[index - 1].is_ascii_whitespace() {
            return (&line[..index], Some(line[index + 1..].trim()));
        }
    }
    (line, None)
}
