// Version specifiers: operators, single clauses, and conjunction sets

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::models::version::Version;

/// Version comparison operators accepted in manifest lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// `==` exact pin (may carry a trailing `.*` wildcard)
    Eq,
    /// `!=` exclusion (may carry a trailing `.*` wildcard)
    Ne,
    /// `<=` inclusive upper bound
    Le,
    /// `>=` inclusive lower bound
    Ge,
    /// `<` strict upper bound
    Lt,
    /// `>` strict lower bound
    Gt,
    /// `~=` compatible release
    Compatible,
    /// `===` arbitrary string equality
    Arbitrary,
}

impl Operator {
    /// Source spelling of the operator
    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Eq => "==",
            Operator::Ne => "!=",
            Operator::Le => "<=",
            Operator::Ge => ">=",
            Operator::Lt => "<",
            Operator::Gt => ">",
            Operator::Compatible => "~=",
            Operator::Arbitrary => "===",
        }
    }

    /// All operators, longest spelling first so prefixes match correctly
    fn lexing_order() -> &'static [Operator] {
        &[
            Operator::Arbitrary,
            Operator::Eq,
            Operator::Ne,
            Operator::Le,
            Operator::Ge,
            Operator::Compatible,
            Operator::Lt,
            Operator::Gt,
        ]
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// One specifier clause: an operator applied to a version
///
/// The version text is kept as written. A clause whose version does not
/// parse is still representable (`version` is `None`) so the validator can
/// report it with a line number instead of the parser aborting the file.
#[derive(Debug, Clone, PartialEq)]
pub struct Specifier {
    pub op: Operator,
    /// Parsed version, `None` when `raw` is not a valid version
    pub version: Option<Version>,
    /// Trailing `.*` wildcard (only meaningful for `==` and `!=`)
    pub wildcard: bool,
    /// Version text exactly as written, without the operator
    pub raw: String,
}

impl Specifier {
    /// Whether a concrete version satisfies this clause
    ///
    /// Clauses with an unparseable version never constrain anything; the
    /// validator reports them separately.
    pub fn allows(&self, candidate: &Version) -> bool {
        if self.op == Operator::Arbitrary {
            return candidate.to_string() == self.raw;
        }
        let Some(version) = &self.version else {
            return true;
        };
        match self.op {
            Operator::Eq if self.wildcard => {
                candidate.matches_release_prefix(version, version.release.len())
            }
            Operator::Ne if self.wildcard => {
                !candidate.matches_release_prefix(version, version.release.len())
            }
            Operator::Eq => candidate == version,
            Operator::Ne => candidate != version,
            Operator::Le => candidate <= version,
            Operator::Ge => candidate >= version,
            Operator::Lt => candidate < version,
            Operator::Gt => candidate > version,
            // ~= X.Y.Z means >= X.Y.Z with the X.Y prefix fixed
            Operator::Compatible => {
                candidate >= version
                    && candidate.matches_release_prefix(version, version.release.len() - 1)
            }
            Operator::Arbitrary => unreachable!("handled above"),
        }
    }
}

impl FromStr for Specifier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        if text.is_empty() {
            return Err("empty version specifier".to_string());
        }

        let op = Operator::lexing_order()
            .iter()
            .copied()
            .find(|op| text.starts_with(op.symbol()))
            .ok_or_else(|| format!("expected a version operator in '{}'", text))?;

        let raw = text[op.symbol().len()..].trim().to_string();
        if raw.is_empty() {
            return Err(format!("operator '{}' is missing a version", op));
        }

        let (version_text, wildcard) = match raw.strip_suffix(".*") {
            Some(prefix) if matches!(op, Operator::Eq | Operator::Ne) => (prefix, true),
            Some(_) => {
                return Err(format!(
                    "wildcard versions are only valid with == and !=, not '{}'",
                    op
                ));
            }
            None => (raw.as_str(), false),
        };

        let version = if op == Operator::Arbitrary {
            None
        } else {
            version_text.parse::<Version>().ok()
        };

        if op == Operator::Compatible {
            match &version {
                Some(v) if v.release.len() < 2 => {
                    return Err(format!(
                        "'~= {}' needs at least two release segments",
                        version_text
                    ));
                }
                _ => {}
            }
        }

        Ok(Specifier {
            op,
            version,
            wildcard,
            raw,
        })
    }
}

impl fmt::Display for Specifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.version, self.wildcard) {
            (Some(version), true) => write!(f, "{}{}.*", self.op, version),
            (Some(version), false) => write!(f, "{}{}", self.op, version),
            (None, _) => write!(f, "{}{}", self.op, self.raw),
        }
    }
}

/// Comma-separated conjunction of specifier clauses
///
/// An empty set is a valid, unconstrained requirement ("latest").
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpecifierSet {
    clauses: Vec<Specifier>,
}

impl SpecifierSet {
    pub fn new(clauses: Vec<Specifier>) -> Self {
        Self { clauses }
    }

    pub fn clauses(&self) -> &[Specifier] {
        &self.clauses
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    /// Whether a concrete version satisfies every clause
    pub fn allows(&self, candidate: &Version) -> bool {
        self.clauses.iter().all(|clause| clause.allows(candidate))
    }

    /// Whether the set pins an exact version (`==` without wildcard, or `===`)
    pub fn is_pin(&self) -> bool {
        self.clauses.iter().any(|clause| {
            matches!(clause.op, Operator::Arbitrary)
                || (clause.op == Operator::Eq && !clause.wildcard)
        })
    }

    /// Detect an unsatisfiable conjunction
    ///
    /// Catches the clashes that actually occur in hand-edited manifests:
    /// two different pins, a pin excluded by `!=`, a pin outside a bound,
    /// and a lower bound above an upper bound. Clauses with unparseable
    /// versions are skipped (the validator reports those on their own).
    pub fn contradiction(&self) -> Option<String> {
        let pins: Vec<&Specifier> = self
            .clauses
            .iter()
            .filter(|c| c.op == Operator::Eq && !c.wildcard && c.version.is_some())
            .collect();

        if let [first, rest @ ..] = pins.as_slice() {
            for other in rest {
                if first.version != other.version {
                    return Some(format!(
                        "'{}' and '{}' cannot both hold",
                        first, other
                    ));
                }
            }
        }

        for pin in &pins {
            let Some(pinned) = pin.version.clone() else {
                continue;
            };
            for clause in &self.clauses {
                if std::ptr::eq(*pin, clause) {
                    continue;
                }
                if clause.version.is_some() && !clause.allows(&pinned) {
                    return Some(format!("'{}' excludes the pinned '{}'", clause, pin));
                }
            }
        }

        // Tightest lower bound vs tightest upper bound
        let mut lower: Option<(&Version, bool)> = None; // (version, inclusive)
        let mut upper: Option<(&Version, bool)> = None;
        for clause in &self.clauses {
            let Some(version) = &clause.version else {
                continue;
            };
            match clause.op {
                Operator::Ge | Operator::Gt => {
                    let inclusive = clause.op == Operator::Ge;
                    if lower.map_or(true, |(v, _)| version > v) {
                        lower = Some((version, inclusive));
                    }
                }
                Operator::Le | Operator::Lt => {
                    let inclusive = clause.op == Operator::Le;
                    if upper.map_or(true, |(v, _)| version < v) {
                        upper = Some((version, inclusive));
                    }
                }
                _ => {}
            }
        }
        if let (Some((low, low_inc)), Some((high, high_inc))) = (lower, upper) {
            if low > high || (low == high && !(low_inc && high_inc)) {
                return Some(format!(
                    "lower bound {} is not below upper bound {}",
                    low, high
                ));
            }
        }

        None
    }
}

impl FromStr for SpecifierSet {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        if text.is_empty() {
            return Ok(SpecifierSet::default());
        }
        let clauses = text
            .split(',')
            .map(|part| part.parse::<Specifier>())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(SpecifierSet::new(clauses))
    }
}

impl fmt::Display for SpecifierSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.clauses.iter().map(|c| c.to_string()).collect();
        write!(f, "{}", rendered.join(", "))
    }
}

impl Serialize for SpecifierSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}
