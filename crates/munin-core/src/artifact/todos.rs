//! Tactical to-do generator. Action-item facts drive the tasks; deadline
//! facts are cross-referenced so a deadline is only ever a stated time
//! expression, never a calculated date.

use serde_json::Value;
use tracing::{info, warn};

use crate::artifact::{
    dedup_preserving, excerpt_chars, normalize_priority, numbered_contents, resolve_source_facts,
    RuleReport,
};
use crate::config::PipelineConfig;
use crate::judge::run_judge;
use crate::lexicon;
use crate::model::{FactCategory, FactSet, ToDo, ValidatedFact};
use crate::prompts::{todos_judge_prompt, todos_prompt};
use crate::provider::TextGenerator;
use crate::repair::repair_json_array;
use crate::skills::{SkillLibrary, SKILL_GENERATE_TODOS};

/// Derive to-dos from action-item facts, matched against deadline facts.
pub async fn generate_todos(
    facts: &FactSet,
    raw_transcript: &str,
    generator: &dyn TextGenerator,
    skills: &SkillLibrary,
    config: &PipelineConfig,
) -> (Vec<ToDo>, bool) {
    let action_facts = facts.of_category(FactCategory::ActionItem);
    if action_facts.is_empty() {
        info!("no action-item facts; skipping todos");
        return (Vec::new(), true);
    }
    let deadline_facts = facts.of_category(FactCategory::Deadline);

    let mut facts_text = format!("ACTION ITEMS:\n{}", numbered_contents(&action_facts));
    if !deadline_facts.is_empty() {
        facts_text.push_str(&format!("\n\nDEADLINES:\n{}", numbered_contents(&deadline_facts)));
    }

    // source_facts may reference either list
    let mut referable = action_facts.clone();
    referable.extend(deadline_facts.iter().copied());

    let skill = skills.get(SKILL_GENERATE_TODOS);
    let mut feedback: Option<String> = None;
    let mut last: Option<Vec<ToDo>> = None;

    for attempt in 1..=config.max_attempts {
        let prompt = todos_prompt(&facts_text, skill, feedback.as_deref());
        let raw = match generator.generate(&prompt, config.temperature).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!("todos attempt {} failed: {}", attempt, e);
                continue;
            }
        };

        let (todos, parse_issues) = match parse_todos(&raw, &referable) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!("todos attempt {} unparsable: {}", attempt, e);
                feedback = Some(format!("JSON parsing error: {}", e));
                continue;
            }
        };
        last = Some(todos.clone());

        let report = todo_rules(&todos, &deadline_facts, parse_issues);
        if !report.passed() {
            warn!("todos attempt {} failed rules ({}/10)", attempt, report.score());
            feedback = Some(report.feedback());
            continue;
        }

        if config.judge_enabled {
            let todos_text = todos
                .iter()
                .enumerate()
                .map(|(i, td)| {
                    format!(
                        "{}. {} (deadline: {})",
                        i + 1,
                        td.task,
                        td.deadline.as_deref().unwrap_or("none")
                    )
                })
                .collect::<Vec<_>>()
                .join("\n");
            let excerpt = excerpt_chars(raw_transcript, config.judge_excerpt_chars);
            let verdict = run_judge(generator, &todos_judge_prompt(&todos_text, excerpt)).await;
            if !verdict.passed() {
                warn!("todos attempt {} failed judge ({}/10)", attempt, verdict.score);
                feedback = Some(verdict.feedback());
                continue;
            }
        }

        info!("generated {} todos", todos.len());
        return (todos, true);
    }

    warn!("todo retries exhausted; accepting degraded output");
    (last.unwrap_or_default(), false)
}

/// Recovery-parse and repair the common generator mistakes: sentinel strings
/// where null belongs, task descriptions in the deadline slot, duplicated or
/// index-shaped source facts.
fn parse_todos(
    raw: &str,
    referable: &[&ValidatedFact],
) -> Result<(Vec<ToDo>, Vec<String>), String> {
    let items = repair_json_array(raw).map_err(|e| e.to_string())?;
    let mut todos = Vec::new();
    let mut issues = Vec::new();
    for mut item in items {
        if !item.is_object() {
            continue;
        }
        normalize_priority(&mut item);
        coerce_null_deadline(&mut item);
        let mut todo: ToDo = serde_json::from_value(item).map_err(|e| e.to_string())?;

        if let Some(deadline) = todo.deadline.take() {
            if !lexicon::is_deadline_sentinel(&deadline) && !lexicon::deadline_looks_like_task(&deadline) {
                todo.deadline = Some(deadline);
            }
        }

        let (resolved, fact_issues) =
            resolve_source_facts(std::mem::take(&mut todo.source_facts), referable);
        todo.source_facts = dedup_preserving(resolved);
        issues.extend(fact_issues);
        todos.push(todo);
    }
    Ok((todos, issues))
}

/// Pre-serde coercion: the literal strings "null"/"Not specified" in the
/// deadline slot become JSON null so `Option` deserializes cleanly.
fn coerce_null_deadline(item: &mut Value) {
    if let Some(d) = item.get_mut("deadline") {
        if let Some(s) = d.as_str() {
            if lexicon::is_deadline_sentinel(s) {
                *d = Value::Null;
            }
        }
    }
}

fn todo_rules(
    todos: &[ToDo],
    deadline_facts: &[&ValidatedFact],
    parse_issues: Vec<String>,
) -> RuleReport {
    let mut report = RuleReport::new();

    if todos.is_empty() {
        report.flag(5, "No todos generated");
        return report;
    }

    let tasks: Vec<String> = todos.iter().map(|td| td.task.trim().to_lowercase()).collect();
    let unique: std::collections::HashSet<&String> = tasks.iter().collect();
    if unique.len() != tasks.len() {
        report.flag(2, "Contains duplicate todos - remove duplicates");
    }

    for td in todos {
        if lexicon::contains_conditional(&td.task) {
            report.flag(2, format!("Contains conditional: '{}' - remove conditionals", td.task));
        }
        if let Some(deadline) = &td.deadline {
            let traceable = deadline_facts.iter().any(|f| {
                f.content.to_lowercase().contains(&deadline.to_lowercase())
                    || deadline.to_lowercase().contains(&f.content.to_lowercase())
            });
            if !traceable {
                report.flag(
                    2,
                    format!(
                        "Deadline '{}' is not a stated time reference - copy it from a deadline fact or use null",
                        deadline
                    ),
                );
            }
        }
    }

    for issue in parse_issues {
        report.flag(2, issue);
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Confidence;
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

    #[tokio::test]
    async fn no_action_facts_skips_generator() {
        let generator = ScriptedGenerator::new(vec![]);
        let deadline_only = FactSet {
            facts: facts()
                .facts
                .into_iter()
                .filter(|f| f.category == FactCategory::Deadline)
                .collect(),
            discarded_count: 0,
            discarded_reasons: vec![],
        };
        let (todos, passed) = generate_todos(
            &deadline_only,
            "raw",
            &generator,
            &SkillLibrary::empty(),
            &no_judge(),
        )
        .await;
        assert!(todos.is_empty());
        assert!(passed);
        assert_eq!(generator.calls(), 0);
    }

    #[tokio::test]
    async fn deadline_copied_from_deadline_fact_passes() {
        let raw = r#"[{"task": "Run manual test", "deadline": "this Thursday", "priority": "High", "source_facts": ["run manual test", "this Thursday"]}]"#;
        let generator = ScriptedGenerator::new(vec![raw]);
        let (todos, passed) =
            generate_todos(&facts(), "raw", &generator, &SkillLibrary::empty(), &no_judge()).await;
        assert!(passed);
        assert_eq!(todos[0].deadline.as_deref(), Some("this Thursday"));
    }

    #[tokio::test]
    async fn sentinel_deadline_becomes_true_null() {
        let raw = r#"[{"task": "Run manual test", "deadline": "Not specified", "source_facts": ["run manual test"]}]"#;
        let generator = ScriptedGenerator::new(vec![raw]);
        let (todos, _) =
            generate_todos(&facts(), "raw", &generator, &SkillLibrary::empty(), &no_judge()).await;
        assert_eq!(todos[0].deadline, None);
    }

    #[tokio::test]
    async fn task_shaped_deadline_is_dropped() {
        let raw = r#"[{"task": "Prepare the demo", "deadline": "send the deck to the client", "source_facts": ["run manual test"]}]"#;
        let generator = ScriptedGenerator::new(vec![raw]);
        let (todos, _) =
            generate_todos(&facts(), "raw", &generator, &SkillLibrary::empty(), &no_judge()).await;
        assert_eq!(todos[0].deadline, None);
    }

    #[tokio::test]
    async fn untraceable_deadlines_fail_rules() {
        // neither date was ever a deadline fact; rules must flag both
        let raw = r#"[
            {"task": "Run manual test", "deadline": "next Monday", "source_facts": ["run manual test"]},
            {"task": "Draft the report", "deadline": "end of month", "source_facts": ["run manual test"]}
        ]"#;
        let generator = ScriptedGenerator::new(vec![raw, raw, raw]);
        let (todos, passed) =
            generate_todos(&facts(), "raw", &generator, &SkillLibrary::empty(), &no_judge()).await;
        assert!(!passed);
        assert_eq!(todos.len(), 2);
        let prompts = generator.prompts();
        assert!(prompts[1].contains("not a stated time reference"));
    }
}
