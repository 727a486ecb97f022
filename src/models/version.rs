// Version model for requirements manifests (PEP 440 subset)

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Serialize, Serializer};

/// Pre-release phase of a version (`1.0.0a1`, `2.0b3`, `3.1rc2`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreKind {
    Alpha,
    Beta,
    Rc,
}

impl PreKind {
    /// Canonical spelling used when rendering
    pub fn label(&self) -> &'static str {
        match self {
            PreKind::Alpha => "a",
            PreKind::Beta => "b",
            PreKind::Rc => "rc",
        }
    }

    fn rank(&self) -> u8 {
        match self {
            PreKind::Alpha => 1,
            PreKind::Beta => 2,
            PreKind::Rc => 3,
        }
    }
}

/// Pre-release tag: kind plus number (`rc2` => Rc, 2)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreRelease {
    pub kind: PreKind,
    pub number: u64,
}

/// A package version as written in a requirements manifest
///
/// Covers the subset of the ecosystem's version scheme that shows up in
/// real manifests: epoch, dotted release segments, pre/post/dev releases
/// and a local label. Parsing normalizes the many accepted spellings
/// (`1.0-alpha.1` == `1.0a1`); `Display` renders the canonical form.
#[derive(Debug, Clone)]
pub struct Version {
    /// Version epoch (`1!2.0`), 0 when absent
    pub epoch: u32,
    /// Dotted release segments, at least one
    pub release: Vec<u64>,
    /// Optional pre-release tag
    pub pre: Option<PreRelease>,
    /// Optional post-release number
    pub post: Option<u64>,
    /// Optional dev-release number
    pub dev: Option<u64>,
    /// Optional local label (`+cpu`), kept verbatim minus the `+`
    pub local: Option<String>,
}

fn version_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?ix)
            ^ v?
            (?: (?P<epoch>\d+) ! )?
            (?P<release>\d+ (?: \.\d+ )*)
            (?: [-_.]? (?P<pre_l>a|alpha|b|beta|c|rc|pre|preview) [-_.]? (?P<pre_n>\d+)? )?
            (?: - (?P<post_n1>\d+) | [-_.]? (?P<post_l>post|rev|r) [-_.]? (?P<post_n2>\d+)? )?
            (?: [-_.]? (?P<dev_l>dev) [-_.]? (?P<dev_n>\d+)? )?
            (?: \+ (?P<local>[a-z0-9]+ (?: [-_.] [a-z0-9]+ )*) )?
            $",
        )
        .expect("version regex is valid")
    })
}

impl Version {
    /// Create a plain release version from segments
    pub fn from_release(segments: Vec<u64>) -> Self {
        Self {
            epoch: 0,
            release: segments,
            pre: None,
            post: None,
            dev: None,
            local: None,
        }
    }

    /// Whether this is a final release (no pre/post/dev tags)
    pub fn is_final(&self) -> bool {
        self.pre.is_none() && self.post.is_none() && self.dev.is_none()
    }

    /// Release segment at `index`, treating missing trailing segments as 0
    pub fn release_segment(&self, index: usize) -> u64 {
        self.release.get(index).copied().unwrap_or(0)
    }

    /// Compare only epoch plus the first `len` release segments
    ///
    /// Used for wildcard (`== 1.2.*`) and compatible-release (`~=`)
    /// matching, where only a release prefix is significant.
    pub fn matches_release_prefix(&self, other: &Version, len: usize) -> bool {
        if self.epoch != other.epoch {
            return false;
        }
        (0..len).all(|i| self.release_segment(i) == other.release_segment(i))
    }

    // Ordering keys follow the ecosystem rule:
    // dev < pre-release < final < post, local breaks remaining ties.
    fn pre_key(&self) -> (u8, u64) {
        match &self.pre {
            Some(pre) => (pre.kind.rank(), pre.number),
            None if self.post.is_none() && self.dev.is_some() => (0, 0),
            None => (4, 0),
        }
    }

    fn dev_key(&self) -> (u8, u64) {
        match self.dev {
            Some(n) => (0, n),
            None => (1, 0),
        }
    }
}

fn cmp_release(a: &[u64], b: &[u64]) -> Ordering {
    let len = a.len().max(b.len());
    for i in 0..len {
        let left = a.get(i).copied().unwrap_or(0);
        let right = b.get(i).copied().unwrap_or(0);
        match left.cmp(&right) {
            Ordering::Equal => {}
            other => return other,
        }
    }
    Ordering::Equal
}

impl FromStr for Version {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err("version cannot be empty".to_string());
        }

        let caps = version_regex()
            .captures(trimmed)
            .ok_or_else(|| format!("invalid version '{}'", trimmed))?;

        let epoch = match caps.name("epoch") {
            Some(m) => m
                .as_str()
                .parse::<u32>()
                .map_err(|_| format!("invalid epoch in '{}'", trimmed))?,
            None => 0,
        };

        let mut release = Vec::new();
        for segment in caps["release"].split('.') {
            let value = segment
                .parse::<u64>()
                .map_err(|_| format!("release segment '{}' is too large", segment))?;
            release.push(value);
        }

        let pre = caps.name("pre_l").map(|label| {
            let kind = match label.as_str().to_ascii_lowercase().as_str() {
                "a" | "alpha" => PreKind::Alpha,
                "b" | "beta" => PreKind::Beta,
                _ => PreKind::Rc,
            };
            let number = caps
                .name("pre_n")
                .and_then(|m| m.as_str().parse::<u64>().ok())
                .unwrap_or(0);
            PreRelease { kind, number }
        });

        // Bare "post" / "dev" without a number count as 0
        let post_number = caps
            .name("post_n1")
            .or_else(|| caps.name("post_n2"))
            .and_then(|m| m.as_str().parse::<u64>().ok());
        let post = match (post_number, caps.name("post_l")) {
            (Some(n), _) => Some(n),
            (None, Some(_)) => Some(0),
            (None, None) => None,
        };

        let dev = caps.name("dev_l").map(|_| {
            caps.name("dev_n")
                .and_then(|m| m.as_str().parse::<u64>().ok())
                .unwrap_or(0)
        });

        let local = caps
            .name("local")
            .map(|m| m.as_str().to_ascii_lowercase().replace(['-', '_'], "."));

        Ok(Version {
            epoch,
            release,
            pre,
            post,
            dev,
            local,
        })
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.epoch != 0 {
            write!(f, "{}!", self.epoch)?;
        }
        let release: Vec<String> = self.release.iter().map(|s| s.to_string()).collect();
        write!(f, "{}", release.join("."))?;
        if let Some(pre) = &self.pre {
            write!(f, "{}{}", pre.kind.label(), pre.number)?;
        }
        if let Some(post) = self.post {
            write!(f, ".post{}", post)?;
        }
        if let Some(dev) = self.dev {
            write!(f, ".dev{}", dev)?;
        }
        if let Some(local) = &self.local {
            write!(f, "+{}", local)?;
        }
        Ok(())
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.epoch
            .cmp(&other.epoch)
            .then_with(|| cmp_release(&self.release, &other.release))
            .then_with(|| self.pre_key().cmp(&other.pre_key()))
            .then_with(|| self.post.cmp(&other.post))
            .then_with(|| self.dev_key().cmp(&other.dev_key()))
            .then_with(|| self.local.cmp(&other.local))
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}
