//! Executive summary generator.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{info, warn};

use crate::artifact::{excerpt_chars, labeled_contents, RuleReport};
use crate::config::PipelineConfig;
use crate::judge::run_judge;
use crate::model::FactSet;
use crate::prompts::{summary_judge_prompt, summary_prompt};
use crate::provider::TextGenerator;
use crate::skills::{SkillLibrary, SKILL_GENERATE_SUMMARY};

/// Labels generators prepend despite instructions.
const SUMMARY_LABELS: [&str; 8] = [
    "summary:",
    "here is the summary:",
    "here is a summary:",
    "here is a 40-80 word summary:",
    "here is a 2-4 sentence summary:",
    "based on the facts:",
    "based on the validated facts:",
    "executive summary:",
];

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace regex"));

/// Derive the summary from the full validated fact set. Returns the summary
/// plus whether it passed both validation layers.
pub async fn generate_summary(
    facts: &FactSet,
    raw_transcript: &str,
    generator: &dyn TextGenerator,
    skills: &SkillLibrary,
    config: &PipelineConfig,
) -> (String, bool) {
    if facts.is_empty() {
        info!("no validated facts; skipping summary generation");
        return (String::new(), true);
    }

    let all: Vec<_> = facts.facts.iter().collect();
    let facts_text = labeled_contents(&all);
    let skill = skills.get(SKILL_GENERATE_SUMMARY);

    let mut feedback: Option<String> = None;
    let mut last: Option<String> = None;

    for attempt in 1..=config.max_attempts {
        let prompt = summary_prompt(&facts_text, skill, feedback.as_deref());
        let raw = match generator.generate(&prompt, config.temperature).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!("summary attempt {} failed: {}", attempt, e);
                continue;
            }
        };

        let summary = clean_summary(&raw);
        last = Some(summary.clone());

        let report = summary_rules(&summary);
        if !report.passed() {
            warn!("summary attempt {} failed rules ({}/10)", attempt, report.score());
            feedback = Some(report.feedback());
            continue;
        }

        if config.judge_enabled {
            let excerpt = excerpt_chars(raw_transcript, config.judge_excerpt_chars);
            let verdict = run_judge(generator, &summary_judge_prompt(&summary, excerpt)).await;
            if !verdict.passed() {
                warn!("summary attempt {} failed judge ({}/10)", attempt, verdict.score);
                feedback = Some(verdict.feedback());
                continue;
            }
        }

        info!("generated summary: {} words", summary.split_whitespace().count());
        return (summary, true);
    }

    // Exhausted: keep the last attempt, or fall back to joined fact contents.
    let summary = last.unwrap_or_else(|| fallback_summary(facts));
    warn!("summary retries exhausted; accepting degraded output");
    (summary, false)
}

/// Rule layer: word-count floor.
fn summary_rules(summary: &str) -> RuleReport {
    let mut report = RuleReport::new();
    let words = summary.split_whitespace().count();
    if words < 30 {
        report.flag(5, format!("Too short: {} words (need 30+ minimum)", words));
    } else if words < 50 {
        report.deduct(1);
    }
    report
}

/// Strip leading labels and normalize whitespace.
fn clean_summary(text: &str) -> String {
    let mut text = text.trim().to_string();
    let lower = text.to_lowercase();
    for label in SUMMARY_LABELS {
        if lower.starts_with(label) {
            text = text[label.len()..].trim().to_string();
            break;
        }
    }
    WHITESPACE.replace_all(&text, " ").trim().to_string()
}

/// Last-resort summary: the first few fact contents, joined.
fn fallback_summary(facts: &FactSet) -> String {
    let parts: Vec<&str> = facts.facts.iter().take(5).map(|f| f.content.as_str()).collect();
    if parts.is_empty() {
        "No summary available.".to_string()
    } else {
        parts.join(". ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Confidence, FactCategory, ValidatedFact};
    use crate::testutil::ScriptedGenerator;

    fn facts() -> FactSet {
        FactSet {
            facts: vec![ValidatedFact {
                category: FactCategory::Decision,
                content: "ship Thursday".into(),
                source_quote: "we agreed to ship Thursday".into(),
                confidence: Confidence::High,
                is_valid: true,
                validation_notes: None,
            }],
            discarded_count: 0,
            discarded_reasons: vec![],
        }
    }

    fn no_judge() -> PipelineConfig {
        PipelineConfig {
            judge_enabled: false,
            ..PipelineConfig::default()
        }
    }

    const GOOD_SUMMARY: &str = "The team agreed to ship the release on Thursday after reviewing the launch checklist. \
        Ownership of the remaining verification work was confirmed, and the group aligned on \
        communicating the date to stakeholders before the end of the week.";

    #[test]
    fn labels_are_stripped() {
        assert_eq!(clean_summary("Summary: The team met."), "The team met.");
        assert_eq!(clean_summary("  here is the summary:  Good.  "), "Good.");
    }

    #[test]
    fn short_summary_fails_rules() {
        let report = summary_rules("Too short.");
        assert!(!report.passed());
        assert!(report.feedback().contains("Too short"));
    }

    #[tokio::test]
    async fn empty_fact_set_skips_generator() {
        let generator = ScriptedGenerator::new(vec![]);
        let (summary, passed) = generate_summary(
            &FactSet::default(),
            "raw",
            &generator,
            &SkillLibrary::empty(),
            &no_judge(),
        )
        .await;
        assert!(summary.is_empty());
        assert!(passed);
        assert_eq!(generator.calls(), 0);
    }

    #[tokio::test]
    async fn short_attempt_retries_with_feedback() {
        let generator = ScriptedGenerator::new(vec!["Way too short.", GOOD_SUMMARY]);
        let (summary, passed) = generate_summary(
            &facts(),
            "raw",
            &generator,
            &SkillLibrary::empty(),
            &no_judge(),
        )
        .await;
        assert!(passed);
        assert!(summary.starts_with("The team agreed"));
        let prompts = generator.prompts();
        assert_eq!(prompts.len(), 2);
        assert!(prompts[1].contains("FIX THESE ISSUES!"));
        assert!(prompts[1].contains("Too short"));
    }

    #[tokio::test]
    async fn exhausted_retries_accept_last_attempt() {
        let generator = ScriptedGenerator::new(vec!["short one", "short two", "short three"]);
        let (summary, passed) = generate_summary(
            &facts(),
            "raw",
            &generator,
            &SkillLibrary::empty(),
            &no_judge(),
        )
        .await;
        assert!(!passed);
        assert_eq!(summary, "short three");
    }

    #[tokio::test]
    async fn transport_failures_fall_back_to_fact_join() {
        let generator = ScriptedGenerator::with_results(vec![
            Err("down"),
            Err("down"),
            Err("down"),
        ]);
        let (summary, passed) = generate_summary(
            &facts(),
            "raw",
            &generator,
            &SkillLibrary::empty(),
            &no_judge(),
        )
        .await;
        assert!(!passed);
        assert_eq!(summary, "ship Thursday");
    }

    #[tokio::test]
    async fn failing_judge_verdict_triggers_retry() {
        let generator = ScriptedGenerator::new(vec![
            GOOD_SUMMARY,
            r#"{"score": 3, "issues": ["invented a stakeholder"], "suggestions": ""}"#,
            GOOD_SUMMARY,
            r#"{"score": 9, "issues": [], "suggestions": ""}"#,
        ]);
        let config = PipelineConfig::default();
        let (_, passed) = generate_summary(
            &facts(),
            "raw transcript",
            &generator,
            &SkillLibrary::empty(),
            &config,
        )
        .await;
        assert!(passed);
        let prompts = generator.prompts();
        assert_eq!(prompts.len(), 4);
        assert!(prompts[2].contains("invented a stakeholder"));
    }
}
