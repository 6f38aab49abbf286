//! Artifact generators: summary, action points, to-dos, follow-up email.
//!
//! Shared shape: filter the fact set, return an empty artifact immediately if
//! nothing relevant exists, otherwise run a bounded retry-with-feedback loop
//! over generate → recovery-parse → rule score → AI judge. Exhausted retries
//! accept the last produced artifact; partial output beats no output.

pub mod action_points;
pub mod email;
pub mod summary;
pub mod todos;

pub use action_points::generate_action_points;
pub use email::generate_email;
pub use summary::generate_summary;
pub use todos::generate_todos;

use serde_json::Value;

use crate::model::ValidatedFact;

/// Minimum passing rule score.
pub const RULE_THRESHOLD: i64 = 8;

/// Deterministic rule-validation scorecard, scale 1–10.
#[derive(Debug, Clone, Default)]
pub(crate) struct RuleReport {
    penalties: i64,
    pub issues: Vec<String>,
}

impl RuleReport {
    pub fn new() -> Self {
        RuleReport::default()
    }

    pub fn flag(&mut self, penalty: i64, issue: impl Into<String>) {
        self.penalties += penalty;
        self.issues.push(issue.into());
    }

    /// Penalty without an actionable message (soft deductions).
    pub fn deduct(&mut self, penalty: i64) {
        self.penalties += penalty;
    }

    pub fn score(&self) -> i64 {
        (10 - self.penalties).max(1)
    }

    pub fn passed(&self) -> bool {
        self.score() >= RULE_THRESHOLD
    }

    pub fn feedback(&self) -> String {
        self.issues.join("\n")
    }
}

/// Deduplicate while preserving first-occurrence order.
pub(crate) fn dedup_preserving(values: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    values
        .into_iter()
        .filter(|v| seen.insert(v.clone()))
        .collect()
}

/// Resolve `source_facts` entries against the fact list the generator was
/// shown. Index-like entries ("2") are replaced by the corresponding fact
/// content; each repair and each entry that matches no fact is reported so
/// the retry prompt can demand literal text.
pub(crate) fn resolve_source_facts(
    entries: Vec<String>,
    facts: &[&ValidatedFact],
) -> (Vec<String>, Vec<String>) {
    let mut issues = Vec::new();
    let resolved = entries
        .into_iter()
        .map(|entry| {
            let trimmed = entry.trim().to_string();
            if !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_digit()) {
                issues.push(format!(
                    "source_facts contains index '{}' - use actual fact text",
                    trimmed
                ));
                if let Ok(n) = trimmed.parse::<usize>() {
                    if n >= 1 && n <= facts.len() {
                        return facts[n - 1].content.clone();
                    }
                }
                return trimmed;
            }
            if !facts.iter().any(|f| f.content == trimmed) {
                issues.push(format!(
                    "source_facts entry is not validated fact text: '{}'",
                    trimmed
                ));
            }
            trimmed
        })
        .collect();
    (resolved, issues)
}

/// "1. content" fact list for prompts.
pub(crate) fn numbered_contents(facts: &[&ValidatedFact]) -> String {
    facts
        .iter()
        .enumerate()
        .map(|(i, f)| format!("{}. {}", i + 1, f.content))
        .collect::<Vec<_>>()
        .join("\n")
}

/// "1. [CATEGORY] content" fact list for prompts.
pub(crate) fn labeled_contents(facts: &[&ValidatedFact]) -> String {
    facts
        .iter()
        .enumerate()
        .map(|(i, f)| format!("{}. [{}] {}", i + 1, f.category.label(), f.content))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Transcript excerpt for judge prompts, on a char boundary.
pub(crate) fn excerpt_chars(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Generators like to emit "high" where the schema says "High". Patch the
/// priority field case before strict deserialization.
pub(crate) fn normalize_priority(item: &mut Value) {
    if let Some(p) = item.get_mut("priority") {
        if let Some(s) = p.as_str() {
            let fixed = match s.trim().to_lowercase().as_str() {
                "high" => "High",
                "low" => "Low",
                _ => "Medium",
            };
            *p = Value::String(fixed.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Confidence, FactCategory};

    fn vf(content: &str) -> ValidatedFact {
        ValidatedFact {
            category: FactCategory::ActionItem,
            content: content.into(),
            source_quote: "a b c".into(),
            confidence: Confidence::High,
            is_valid: true,
            validation_notes: None,
        }
    }

    #[test]
    fn dedup_keeps_first_occurrence() {
        let out = dedup_preserving(vec!["a".into(), "b".into(), "a".into(), "c".into()]);
        assert_eq!(out, vec!["a", "b", "c"]);
    }

    #[test]
    fn index_entries_are_resolved_and_reported() {
        let f1 = vf("run the test");
        let f2 = vf("send the deck");
        let facts = vec![&f1, &f2];
        let (resolved, issues) = resolve_source_facts(vec!["2".into(), "run the test".into()], &facts);
        assert_eq!(resolved, vec!["send the deck", "run the test"]);
        assert_eq!(issues.len(), 1);
        assert!(issues[0].contains("index '2'"));
    }

    #[test]
    fn unknown_text_entries_are_reported_but_kept() {
        let f1 = vf("run the test");
        let facts = vec![&f1];
        let (resolved, issues) = resolve_source_facts(vec!["invented claim".into()], &facts);
        assert_eq!(resolved, vec!["invented claim"]);
        assert_eq!(issues.len(), 1);
    }

    #[test]
    fn rule_report_scores_and_clamps() {
        let mut r = RuleReport::new();
        assert_eq!(r.score(), 10);
        assert!(r.passed());
        r.flag(5, "bad");
        assert_eq!(r.score(), 5);
        assert!(!r.passed());
        r.flag(20, "worse");
        assert_eq!(r.score(), 1);
    }

    #[test]
    fn priority_case_is_normalized() {
        let mut v = serde_json::json!({"priority": "high"});
        normalize_priority(&mut v);
        assert_eq!(v["priority"], "High");
        let mut v = serde_json::json!({"priority": "urgent"});
        normalize_priority(&mut v);
        assert_eq!(v["priority"], "Medium");
    }
}
