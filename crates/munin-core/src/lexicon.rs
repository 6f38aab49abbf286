//! Canonical word lists shared by the normalizer, the fact validator, the
//! artifact rule checks, and the compliance sweep.
//!
//! The extraction prompts and the validation rules key on the same markers on
//! purpose: what the generator is told to exclude is exactly what the
//! validator rejects.

use once_cell::sync::Lazy;
use regex::Regex;

/// Conditional markers. A fact or artifact containing one of these is treated
/// as non-committed language and rejected.
pub const CONDITIONAL_MARKERS: [&str; 5] = [" if ", " might ", " may ", " could ", " would be"];

/// Commitment markers for action items ("will", "please", contractions, etc.).
pub const COMMITMENT_MARKERS: [&str; 9] = [
    "will", "going to", "please", "let's", "'ll", "must", "need to", "needs to", "have to",
];

/// Imperative / task verbs. Used both as commitment evidence in source quotes
/// and to detect task descriptions masquerading as deadlines.
pub const TASK_VERBS: [&str; 10] = [
    "run", "send", "schedule", "reach", "upload", "set up", "ensure", "complete", "review",
    "obtain",
];

/// Stock phrases too vague to act on unless confidence is high.
pub const VAGUE_PHRASES: [&str; 6] = [
    "discuss", "follow up", "look into", "think about", "work on", "check on",
];

/// Strings a generator emits instead of a true null deadline.
pub const DEADLINE_SENTINELS: [&str; 6] = ["not specified", "none", "n/a", "tbd", "null", "not available"];

/// Placeholder tokens that must never survive into a follow-up email.
pub const PLACEHOLDER_TOKENS: [&str; 5] = ["[your name]", "[recipient]", "[date]", "[name]", "[company]"];

static BRACKET_PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[[^\[\]]+\]").expect("bracket placeholder regex"));

/// True if the text contains a conditional marker. The text is padded so a
/// sentence-initial "If" is caught too.
pub fn contains_conditional(text: &str) -> bool {
    let padded = format!(" {} ", text.to_lowercase());
    CONDITIONAL_MARKERS.iter().any(|m| padded.contains(m))
}

/// True if the source quote carries commitment language or opens with an
/// imperative verb.
pub fn has_commitment(quote: &str) -> bool {
    let lower = quote.to_lowercase();
    if COMMITMENT_MARKERS.iter().any(|m| lower.contains(m)) {
        return true;
    }
    let first = lower
        .trim_start_matches(|c: char| !c.is_alphanumeric())
        .split_whitespace()
        .next()
        .unwrap_or("");
    TASK_VERBS.iter().any(|v| v.split_whitespace().next() == Some(first))
}

/// True if the string is one of the known "unspecified deadline" sentinels.
pub fn is_deadline_sentinel(s: &str) -> bool {
    let lower = s.trim().to_lowercase();
    DEADLINE_SENTINELS.iter().any(|d| *d == lower)
}

/// True if the deadline string is really a task description (contains a task verb).
pub fn deadline_looks_like_task(deadline: &str) -> bool {
    let lower = deadline.to_lowercase();
    TASK_VERBS.iter().any(|v| lower.contains(v))
}

/// True if the text contains a bracket-delimited placeholder ("[Name]", "[Date]", ...).
pub fn contains_placeholder(text: &str) -> bool {
    let lower = text.to_lowercase();
    PLACEHOLDER_TOKENS.iter().any(|p| lower.contains(p)) || BRACKET_PLACEHOLDER.is_match(text)
}

/// Conditional markers rendered for prompt text ("if, might, may, could, would be").
pub fn conditional_markers_display() -> String {
    CONDITIONAL_MARKERS
        .iter()
        .map(|m| m.trim())
        .collect::<Vec<_>>()
        .join(", ")
}
