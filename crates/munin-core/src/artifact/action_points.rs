//! Strategic action-point generator.

use serde_json::Value;
use tracing::{info, warn};

use crate::artifact::{
    dedup_preserving, excerpt_chars, normalize_priority, numbered_contents, resolve_source_facts,
    RuleReport,
};
use crate::config::PipelineConfig;
use crate::judge::run_judge;
use crate::lexicon;
use crate::model::{ActionPoint, FactCategory, FactSet, ValidatedFact};
use crate::prompts::{action_points_judge_prompt, action_points_prompt};
use crate::provider::TextGenerator;
use crate::repair::repair_json_array;
use crate::skills::{SkillLibrary, SKILL_GENERATE_ACTION_POINTS};

/// Derive action points from decision and action-item facts.
pub async fn generate_action_points(
    facts: &FactSet,
    raw_transcript: &str,
    generator: &dyn TextGenerator,
    skills: &SkillLibrary,
    config: &PipelineConfig,
) -> (Vec<ActionPoint>, bool) {
    let relevant = facts.of_categories(&[FactCategory::Decision, FactCategory::ActionItem]);
    if relevant.is_empty() {
        info!("no decision or action-item facts; skipping action points");
        return (Vec::new(), true);
    }

    let facts_text = numbered_contents(&relevant);
    let skill = skills.get(SKILL_GENERATE_ACTION_POINTS);

    let mut feedback: Option<String> = None;
    let mut last: Option<Vec<ActionPoint>> = None;

    for attempt in 1..=config.max_attempts {
        let prompt = action_points_prompt(&facts_text, skill, feedback.as_deref());
        let raw = match generator.generate(&prompt, config.temperature).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!("action points attempt {} failed: {}", attempt, e);
                continue;
            }
        };

        let (points, parse_issues) = match parse_action_points(&raw, &relevant) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!("action points attempt {} unparsable: {}", attempt, e);
                feedback = Some(format!("JSON parsing error: {}", e));
                continue;
            }
        };
        last = Some(points.clone());

        let report = action_point_rules(&points, parse_issues);
        if !report.passed() {
            warn!(
                "action points attempt {} failed rules ({}/10)",
                attempt,
                report.score()
            );
            feedback = Some(report.feedback());
            continue;
        }

        if config.judge_enabled {
            let actions_text = points
                .iter()
                .enumerate()
                .map(|(i, ap)| format!("{}. {}", i + 1, ap.description))
                .collect::<Vec<_>>()
                .join("\n");
            let excerpt = excerpt_chars(raw_transcript, config.judge_excerpt_chars);
            let verdict =
                run_judge(generator, &action_points_judge_prompt(&actions_text, excerpt)).await;
            if !verdict.passed() {
                warn!(
                    "action points attempt {} failed judge ({}/10)",
                    attempt, verdict.score
                );
                feedback = Some(verdict.feedback());
                continue;
            }
        }

        info!("generated {} action points", points.len());
        return (points, true);
    }

    warn!("action point retries exhausted; accepting degraded output");
    (last.unwrap_or_default(), false)
}

/// Recovery-parse, then normalize: priority case, source-fact dedup and
/// index resolution. Resolution issues feed the rule report.
fn parse_action_points(
    raw: &str,
    relevant: &[&ValidatedFact],
) -> Result<(Vec<ActionPoint>, Vec<String>), String> {
    let items = repair_json_array(raw).map_err(|e| e.to_string())?;
    let mut points = Vec::new();
    let mut issues = Vec::new();
    for mut item in items {
        if !item.is_object() {
            continue;
        }
        normalize_priority(&mut item);
        let mut point: ActionPoint =
            serde_json::from_value(item).map_err(|e| e.to_string())?;
        let (resolved, fact_issues) =
            resolve_source_facts(std::mem::take(&mut point.source_facts), relevant);
        point.source_facts = dedup_preserving(resolved);
        issues.extend(fact_issues);
        points.push(point);
    }
    Ok((points, issues))
}

fn action_point_rules(points: &[ActionPoint], parse_issues: Vec<String>) -> RuleReport {
    let mut report = RuleReport::new();

    if points.is_empty() {
        report.flag(5, "No action points generated");
        return report;
    }

    let descriptions: Vec<String> = points
        .iter()
        .map(|ap| ap.description.trim().to_lowercase())
        .collect();
    let unique: std::collections::HashSet<&String> = descriptions.iter().collect();
    if unique.len() != descriptions.len() {
        report.flag(3, "Contains duplicate action points - group related items");
    }

    if points
        .iter()
        .any(|ap| ap.description.split_whitespace().count() < 4)
    {
        report.flag(1, "Action descriptions too vague - be specific");
    }

    for ap in points {
        if lexicon::contains_conditional(&ap.description) {
            report.flag(
                3,
                format!("Contains conditional: '{}' - remove conditionals", ap.description),
            );
        }
        if ap
            .source_facts
            .iter()
            .any(|sf| lexicon::contains_conditional(sf))
        {
            report.flag(2, "source_facts contain conditional language");
        }
    }

    for issue in parse_issues {
        report.flag(2, issue);
    }

    report
}
