//! Loose version normalization and comparison
//!
//! Tags found in the wild rarely follow semver. Every tag is first
//! normalized into a canonical dotted form, then split into segments that
//! are compared pairwise:
//! - Numeric segments compare by value
//! - Stability words rank below any number (`dev` < `alpha` < `beta` < `RC`)
//! - Unknown words rank lowest, so `latest` or `edge` never win over a number

use regex::Regex;
use std::cmp::Ordering;
use std::sync::LazyLock;

/// Version assigned to branches such as `master` or `trunk`
const MASTER_LIKE_VERSION: &str = "9999999-dev";

/// Placeholder for wildcard branch segments (`1.x`, `2.*`)
const WILDCARD_SEGMENT: &str = "9999999";

/// Optional stability suffix shared by the classical and date patterns
const MODIFIER: &str = r"[._-]?(?:(stable|beta|b|RC|alpha|a|patch|pl|p)(?:[.-]?(\d+))?)?([.-]?dev)?";

/// `<name> as <alias>` constraints
static ALIAS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([^,\s]+) +as +([^,\s]+)$").unwrap());

static MASTER_LIKE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:dev-)?(?:master|trunk|default)$").unwrap());

/// Up to four numeric parts with an optional `v` prefix
static CLASSICAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)^v?(\d{{1,3}})(\.\d+)?(\.\d+)?(\.\d+)?{}$",
        MODIFIER
    ))
    .unwrap()
});

/// Date stamps such as `2023-01-15` or `20230115.1`
static DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)^v?(\d{{4}}(?:[.:-]?\d{{2}}){{1,6}}(?:[.:-]?\d{{1,3}})?){}$",
        MODIFIER
    ))
    .unwrap()
});

static DEV_SUFFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(.*?)[.-]?dev$").unwrap());

static NON_DIGIT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\D").unwrap());

static BRANCH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^v?(\d+)(\.(?:\d+|[x*]))?(\.(?:\d+|[x*]))?(\.(?:\d+|[x*]))?$").unwrap()
});

static SIGNS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[_\-+]").unwrap());

static WORDS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"([^.\d]+)").unwrap());

static MULTIPLE_DOTS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\.{2,}").unwrap());

/// Normalize a raw version or tag into its canonical form
///
/// `v1.10.0-rc.1` becomes `1.10.0.0-RC1`, `2.x-dev` becomes
/// `2.9999999.9999999.9999999-dev`. Input that matches no known shape is
/// returned unchanged.
pub fn normalize(version: &str) -> String {
    let mut version = version.trim();

    if let Some(caps) = ALIAS_RE.captures(version) {
        if let Some(m) = caps.get(1) {
            version = m.as_str();
        }
    }

    if MASTER_LIKE_RE.is_match(&version.to_lowercase()) {
        return MASTER_LIKE_VERSION.to_string();
    }

    if let Some(rest) = strip_prefix_ignore_case(version, "dev-") {
        return format!("dev-{}", rest);
    }

    if let Some(caps) = CLASSICAL_RE.captures(version) {
        let mut normalized = String::new();
        for i in 1..=4 {
            match caps.get(i) {
                Some(m) if !m.as_str().is_empty() => normalized.push_str(m.as_str()),
                _ => normalized.push_str(".0"),
            }
        }
        return apply_modifiers(normalized, &caps, 5);
    }

    if let Some(caps) = DATE_RE.captures(version) {
        let stamp = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
        let normalized = NON_DIGIT_RE.replace_all(stamp, "-").into_owned();
        return apply_modifiers(normalized, &caps, 2);
    }

    if let Some(caps) = DEV_SUFFIX_RE.captures(version) {
        let branch = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
        return normalize_branch(branch);
    }

    version.to_string()
}

fn strip_prefix_ignore_case<'a>(value: &'a str, prefix: &str) -> Option<&'a str> {
    let head = value.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        value.get(prefix.len()..)
    } else {
        None
    }
}

/// Append the stability, stability number and dev markers captured
/// starting at group `index`
fn apply_modifiers(mut version: String, caps: &regex::Captures<'_>, index: usize) -> String {
    let group = |i: usize| caps.get(i).map(|m| m.as_str()).unwrap_or_default();

    let stability = group(index);
    if !stability.is_empty() {
        if stability == "stable" {
            return version;
        }
        version.push('-');
        version.push_str(&expand_stability(stability));
        version.push_str(group(index + 1));
    }

    if !group(index + 2).is_empty() {
        version.push_str("-dev");
    }

    version
}

/// Expand shorthand stability markers (`a`, `b`, `p`, `rc`)
fn expand_stability(stability: &str) -> String {
    let lower = stability.to_lowercase();
    match lower.as_str() {
        "a" => "alpha".to_string(),
        "b" => "beta".to_string(),
        "p" | "pl" => "patch".to_string(),
        "rc" => "RC".to_string(),
        _ => lower,
    }
}

/// Normalize a branch name, expanding wildcards to a very large number
pub fn normalize_branch(name: &str) -> String {
    let name = name.trim_matches(' ');

    if matches!(name, "master" | "trunk" | "default") {
        return normalize(name);
    }

    if let Some(caps) = BRANCH_RE.captures(name) {
        let mut normalized = String::new();
        for i in 1..=4 {
            match caps.get(i) {
                Some(m) if !m.as_str().is_empty() => normalized.push_str(
                    &m.as_str()
                        .replace('*', WILDCARD_SEGMENT)
                        .replace('x', WILDCARD_SEGMENT),
                ),
                _ => {
                    normalized.push('.');
                    normalized.push_str(WILDCARD_SEGMENT);
                }
            }
        }
        return format!("{}-dev", normalized);
    }

    if name.to_lowercase().ends_with("-dev") {
        return name.to_string();
    }

    format!("dev-{}", name)
}

/// Split a normalized version into comparable segments
fn segments(version: &str) -> Vec<String> {
    if version.is_empty() {
        return vec![String::new()];
    }

    let dotted = SIGNS_RE.replace_all(version, ".");
    let spaced = WORDS_RE.replace_all(&dotted, ".${1}.");
    let collapsed = MULTIPLE_DOTS_RE.replace_all(&spaced, ".");

    collapsed.split('.').map(str::to_string).collect()
}

/// Numeric rank of a single segment
fn rank(segment: &str) -> i64 {
    if segment.is_empty() {
        return 0;
    }

    if let Ok(number) = segment.parse::<i64>() {
        return number;
    }

    match segment {
        "SNAPSHOT" | "snapshot" => -7,
        "dev" => -6,
        "alpha" | "a" => -5,
        "beta" | "b" => -4,
        "RC" | "rc" => -3,
        "#" => -2,
        "p" | "pl" => 1,
        _ => -7,
    }
}

/// Compare two raw versions
///
/// The ordering is total: any two strings compare, and the relation is
/// transitive, so it can drive a sort directly.
pub fn compare(left: &str, right: &str) -> Ordering {
    let left = segments(&normalize(left));
    let right = segments(&normalize(right));

    for i in 0..left.len().max(right.len()) {
        if let (Some(l), Some(r)) = (left.get(i), right.get(i)) {
            if l == r {
                continue;
            }
        }

        let l = left.get(i).map(|s| rank(s)).unwrap_or(0);
        let r = right.get(i).map(|s| rank(s)).unwrap_or(0);

        match l.cmp(&r) {
            Ordering::Equal => continue,
            ordering => return ordering,
        }
    }

    Ordering::Equal
}
