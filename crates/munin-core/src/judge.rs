//! AI-judge validation: score an artifact for hallucination risk via a second
//! generator call.
//!
//! Judge flakiness must never deadlock the pipeline: a transport failure or an
//! unparsable verdict counts as a passing score.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::provider::TextGenerator;
use crate::repair::repair_json_object;

/// Minimum passing judge score.
pub const JUDGE_THRESHOLD: i64 = 8;

/// Judge temperature is pinned low; scoring should not be creative.
const JUDGE_TEMPERATURE: f32 = 0.1;

fn default_score() -> i64 {
    JUDGE_THRESHOLD
}

/// Parsed judge response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JudgeVerdict {
    #[serde(default = "default_score")]
    pub score: i64,
    #[serde(default)]
    pub issues: Vec<String>,
    #[serde(default)]
    pub suggestions: String,
}

impl JudgeVerdict {
    /// The fallback verdict when the judge itself misbehaves.
    pub fn pass() -> Self {
        JudgeVerdict {
            score: JUDGE_THRESHOLD,
            issues: Vec::new(),
            suggestions: String::new(),
        }
    }

    pub fn passed(&self) -> bool {
        self.score >= JUDGE_THRESHOLD
    }

    /// Issues and suggestions flattened into feedback text for the retry prompt.
    pub fn feedback(&self) -> String {
        let mut parts = self.issues.clone();
        if !self.suggestions.trim().is_empty() {
            parts.push(self.suggestions.clone());
        }
        parts.join("\n")
    }
}

/// Run one judge call. Any failure along the way degrades to a pass.
pub async fn run_judge(generator: &dyn TextGenerator, prompt: &str) -> JudgeVerdict {
    let raw = match generator.generate(prompt, JUDGE_TEMPERATURE).await {
        Ok(raw) => raw,
        Err(e) => {
            warn!("judge call failed, treating as pass: {}", e);
            return JudgeVerdict::pass();
        }
    };
    parse_verdict(&raw)
}

/// Repair-parse a judge response; unparsable responses pass.
pub fn parse_verdict(raw: &str) -> JudgeVerdict {
    let value = match repair_json_object(raw) {
        Ok(value) => value,
        Err(e) => {
            warn!("judge response unparsable, treating as pass: {}", e);
            return JudgeVerdict::pass();
        }
    };
    match serde_json::from_value::<JudgeVerdict>(value) {
        Ok(mut verdict) => {
            verdict.score = verdict.score.clamp(1, 10);
            debug!("judge verdict: score {} ({} issues)", verdict.score, verdict.issues.len());
            verdict
        }
        Err(e) => {
            warn!("judge verdict malformed, treating as pass: {}", e);
            JudgeVerdict::pass()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_verdict_parses() {
        let v = parse_verdict(r#"{"score": 4, "issues": ["invented a name"], "suggestions": "drop it"}"#);
        assert_eq!(v.score, 4);
        assert!(!v.passed());
        assert_eq!(v.feedback(), "invented a name\ndrop it");
    }

    #[test]
    fn fenced_verdict_parses() {
        let v = parse_verdict("```json\n{\"score\": 9, \"issues\": [],}\n```");
        assert_eq!(v.score, 9);
        assert!(v.passed());
    }

    #[test]
    fn unparsable_verdict_passes() {
        let v = parse_verdict("I think it looks fine overall!");
        assert!(v.passed());
        assert!(v.issues.is_empty());
    }

    #[test]
    fn score_is_clamped() {
        assert_eq!(parse_verdict(r#"{"score": 42}"#).score, 10);
        assert_eq!(parse_verdict(r#"{"score": -3}"#).score, 1);
    }
}
