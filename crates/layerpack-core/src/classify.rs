//! Diagnostic classification over captured stderr text
//!
//! Dependency installers and the container engine are noisy: both write
//! informational text to stderr, so a non-empty error stream does not by
//! itself indicate failure. Exact-match detection is infeasible across
//! installer versions, so classification narrows to clearly-benign and
//! clearly-fatal cases and defers the rest to a human.
//!
//! The classifier is a small ordered rule table evaluated top-to-bottom;
//! the first matching rule wins and anything unmatched is ambiguous.

use serde::{Deserialize, Serialize};

/// Outcome of classifying one captured stderr stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    /// Known benign diagnostic (e.g. the installer fetching a
    /// version-control dependency); execution continues
    FalsePositive,

    /// Warning-only output; logged, execution continues
    Warning,

    /// The container engine itself reported a problem; the run aborts
    /// without confirmation
    Fatal,

    /// Cannot be decided automatically; the operator is asked
    Ambiguous,
}

impl Classification {
    /// Whether execution continues without operator involvement
    pub fn is_ignorable(&self) -> bool {
        matches!(self, Classification::FalsePositive | Classification::Warning)
    }
}

/// Lowercased view of the stderr text, computed once for all rules
struct Diag<'a> {
    raw: &'a str,
    lower: String,
}

type Rule = (fn(&Diag) -> bool, Classification);

/// Ordered rule table; first match wins
const RULES: &[Rule] = &[
    (is_vcs_fetch_diagnostic, Classification::FalsePositive),
    (is_warning_only, Classification::Warning),
    (is_engine_error, Classification::Fatal),
];

/// Short single-line `git clone` chatter without an `ERROR:` marker is a
/// known installer false positive when fetching a VCS-based dependency.
fn is_vcs_fetch_diagnostic(diag: &Diag) -> bool {
    diag.raw.lines().count() < 2
        && !diag.raw.contains("ERROR:")
        && diag.lower.contains("git clone")
}

fn is_warning_only(diag: &Diag) -> bool {
    diag.lower.contains("warning") && !diag.lower.contains("error")
}

fn is_engine_error(diag: &Diag) -> bool {
    diag.lower.contains("docker")
}

/// Classify captured stderr text. Pure; callers are expected to skip
/// classification entirely when stderr is empty.
pub fn classify(stderr: &str) -> Classification {
    let diag = Diag {
        raw: stderr,
        lower: stderr.to_lowercase(),
    };

    for (matches, classification) in RULES {
        if matches(&diag) {
            return *classification;
        }
    }
    Classification::Ambiguous
}
