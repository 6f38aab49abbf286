//! Follow-up email generator. One email drafted from decision, action-item,
//! and deadline facts, with body cleanup for the formatting mistakes small
//! models make in JSON string fields.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{info, warn};

use crate::artifact::{dedup_preserving, excerpt_chars, labeled_contents, resolve_source_facts, RuleReport};
use crate::config::PipelineConfig;
use crate::judge::run_judge;
use crate::lexicon;
use crate::model::{FactCategory, FactSet, FollowUpEmail, ValidatedFact};
use crate::prompts::{email_judge_prompt, email_prompt};
use crate::provider::TextGenerator;
use crate::repair::repair_json_object;
use crate::skills::{SkillLibrary, SKILL_GENERATE_EMAIL};

static MULTI_NEWLINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").expect("newline collapse regex"));
static RUN_OF_SPACES: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]{2,}").expect("space collapse regex"));

/// Draft the follow-up email. Returns at most one email; an empty vec with
/// `true` means there was nothing worth emailing about.
pub async fn generate_email(
    facts: &FactSet,
    raw_transcript: &str,
    generator: &dyn TextGenerator,
    skills: &SkillLibrary,
    config: &PipelineConfig,
) -> (Vec<FollowUpEmail>, bool) {
    let relevant = facts.of_categories(&[
        FactCategory::Decision,
        FactCategory::ActionItem,
        FactCategory::Deadline,
    ]);
    if relevant.is_empty() {
        info!("no decision/action/deadline facts; skipping email");
        return (Vec::new(), true);
    }

    let facts_text = labeled_contents(&relevant);
    let skill = skills.get(SKILL_GENERATE_EMAIL);
    let mut feedback: Option<String> = None;
    let mut last: Option<FollowUpEmail> = None;

    for attempt in 1..=config.max_attempts {
        let prompt = email_prompt(&facts_text, skill, feedback.as_deref());
        let raw = match generator.generate(&prompt, config.temperature).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!("email attempt {} failed: {}", attempt, e);
                continue;
            }
        };

        let (email, parse_issues) = match parse_email(&raw, &relevant) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!("email attempt {} unparsable: {}", attempt, e);
                feedback = Some(format!("JSON parsing error: {}", e));
                continue;
            }
        };
        last = Some(email.clone());

        let report = email_rules(&email, parse_issues);
        if !report.passed() {
            warn!("email attempt {} failed rules ({}/10)", attempt, report.score());
            feedback = Some(report.feedback());
            continue;
        }

        if config.judge_enabled {
            let email_text = format!("Subject: {}\n\n{}", email.subject, email.body);
            let excerpt = excerpt_chars(raw_transcript, config.judge_excerpt_chars);
            let verdict = run_judge(generator, &email_judge_prompt(&email_text, excerpt)).await;
            if !verdict.passed() {
                warn!("email attempt {} failed judge ({}/10)", attempt, verdict.score);
                feedback = Some(verdict.feedback());
                continue;
            }
        }

        info!("generated follow-up email: {}", email.subject);
        return (vec![email], true);
    }

    warn!("email retries exhausted; accepting degraded output");
    match last {
        Some(email) => (vec![email], false),
        None => (vec![fallback_email(&relevant)], false),
    }
}

fn parse_email(
    raw: &str,
    relevant: &[&ValidatedFact],
) -> Result<(FollowUpEmail, Vec<String>), String> {
    let value = repair_json_object(raw).map_err(|e| e.to_string())?;
    let mut email: FollowUpEmail = serde_json::from_value(value).map_err(|e| e.to_string())?;
    email.body = clean_body(&email.body);
    let (resolved, issues) =
        resolve_source_facts(std::mem::take(&mut email.source_facts), relevant);
    email.source_facts = dedup_preserving(resolved);
    Ok((email, issues))
}

/// Normalize a generated body: reflow dash lists and the sign-off onto their
/// own lines, then collapse runaway whitespace.
fn clean_body(body: &str) -> String {
    let mut text = body.replace(" - ", "\n- ");
    if let Some(pos) = text.find("Best regards") {
        if pos > 0 && !text[..pos].ends_with("\n\n") {
            text = format!("{}\n\nBest regards{}", text[..pos].trim_end(), &text[pos + 12..]);
        }
    }
    let text = MULTI_NEWLINE.replace_all(&text, "\n\n");
    let text = RUN_OF_SPACES.replace_all(&text, " ");
    text.trim().to_string()
}

fn email_rules(email: &FollowUpEmail, parse_issues: Vec<String>) -> RuleReport {
    let mut report = RuleReport::new();

    if lexicon::contains_placeholder(&email.subject) || lexicon::contains_placeholder(&email.body) {
        report.flag(3, "Contains placeholders like [Name] - use generic phrasing instead");
    }
    if lexicon::contains_conditional(&email.body) {
        report.flag(2, "Contains conditional language - state only confirmed items");
    }

    let words = email.body.split_whitespace().count();
    if words < 50 {
        report.flag(3, format!("Body too short ({} words) - expand to at least 50", words));
    } else if words > 300 {
        report.flag(1, format!("Body too long ({} words) - tighten to under 300", words));
    }

    if email.source_facts.is_empty() {
        report.flag(2, "No source_facts cited - copy the exact fact text used");
    }

    for issue in parse_issues {
        report.flag(2, issue);
    }

    report
}

/// Deterministic fallback when no attempt ever produced a parsable email.
fn fallback_email(relevant: &[&ValidatedFact]) -> FollowUpEmail {
    let mut body = String::from("Hi team,\n\nFollowing up on our meeting, here are the key items:\n");
    for fact in relevant.iter().take(6) {
        body.push_str(&format!("- {}\n", fact.content));
    }
    body.push_str("\nPlease review and confirm your assigned items.\n\nBest regards");
    FollowUpEmail {
        subject: "Meeting Follow-Up - Action Items".to_string(),
        body,
        source_facts: relevant.iter().map(|f| f.content.clone()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Confidence, ValidatedFact};
    use crate::testutil::ScriptedGenerator;

    fn facts() -> FactSet {
        let mk = |category, content: &str| ValidatedFact {
            category,
            content: content.into(),
            source_quote: "a b c d".into(),
            confidence: Confidence::High,
            is_valid: true,
            validation_notes: None,
        };
        FactSet {
            facts: vec![
                mk(FactCategory::Decision, "ship Thursday"),
                mk(FactCategory::ActionItem, "run manual test"),
                mk(FactCategory::Deadline, "this Thursday"),
            ],
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

    fn long_body(prefix: &str) -> String {
        format!("{} {}", prefix, "We agreed on the release plan and everyone knows their part. ".repeat(8))
    }

    #[tokio::test]
    async fn clean_email_passes() {
        let raw = format!(
            r#"{{"subject": "Release plan", "body": "{}", "source_facts": ["ship Thursday"]}}"#,
            long_body("Hi team,")
        );
        let generator = ScriptedGenerator::new(vec![&raw]);
        let (emails, passed) =
            generate_email(&facts(), "raw", &generator, &SkillLibrary::empty(), &no_judge()).await;
        assert!(passed);
        assert_eq!(emails.len(), 1);
        assert_eq!(emails[0].subject, "Release plan");
    }

    #[tokio::test]
    async fn placeholder_triggers_retry_with_feedback() {
        let bad = format!(
            r#"{{"subject": "Release plan", "body": "{}", "source_facts": ["ship Thursday"]}}"#,
            long_body("Hi [Name],")
        );
        let good = format!(
            r#"{{"subject": "Release plan", "body": "{}", "source_facts": ["ship Thursday"]}}"#,
            long_body("Hi team,")
        );
        let generator = ScriptedGenerator::new(vec![&bad, &good]);
        let (emails, passed) =
            generate_email(&facts(), "raw", &generator, &SkillLibrary::empty(), &no_judge()).await;
        assert!(passed);
        assert!(!emails[0].body.contains("[Name]"));
        let prompts = generator.prompts();
        assert!(prompts[1].contains("placeholders"));
    }

    #[test]
    fn body_is_reflowed() {
        assert_eq!(
            clean_body("Items: - first - second   done.\n\n\n\nBest regards"),
            "Items:\n- first\n- second done.\n\nBest regards"
        );
        assert_eq!(
            clean_body("All set. Best regards, Team"),
            "All set.\n\nBest regards, Team"
        );
    }

    #[tokio::test]
    async fn unparsable_attempts_fall_back_to_built_email() {
        let generator = ScriptedGenerator::new(vec!["not json", "still not", "nope"]);
        let (emails, passed) =
            generate_email(&facts(), "raw", &generator, &SkillLibrary::empty(), &no_judge()).await;
        assert!(!passed);
        assert_eq!(emails[0].subject, "Meeting Follow-Up - Action Items");
        assert!(emails[0].body.contains("- ship Thursday"));
    }

    #[tokio::test]
    async fn no_relevant_facts_skips_generator() {
        let generator = ScriptedGenerator::new(vec![]);
        let metric_only = FactSet {
            facts: vec![ValidatedFact {
                category: FactCategory::Metric,
                content: "revenue up 12%".into(),
                source_quote: "revenue is up twelve percent".into(),
                confidence: Confidence::High,
                is_valid: true,
                validation_notes: None,
            }],
            discarded_count: 0,
            discarded_reasons: vec![],
        };
        let (emails, passed) =
            generate_email(&metric_only, "raw", &generator, &SkillLibrary::empty(), &no_judge()).await;
        assert!(emails.is_empty());
        assert!(passed);
        assert_eq!(generator.calls(), 0);
    }
}
