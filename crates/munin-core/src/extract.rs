//! Fact extraction: one generator call per category, recovery-parsed.
//!
//! Each fact is stamped with the category it was asked for — a
//! generator-claimed label is never trusted. A category that stays unparsable
//! after the retry bound yields an empty result; extraction never fails the
//! pipeline.

use serde_json::Value;
use tracing::{info, warn};

use crate::config::PipelineConfig;
use crate::error::RepairError;
use crate::model::{Confidence, ExtractedFact, ExtractedFacts, FactCategory};
use crate::prompts::extraction_prompt;
use crate::provider::TextGenerator;
use crate::repair::repair_json_array;
use crate::skills::{SkillLibrary, SKILL_EXTRACT_FACTS};

/// Extract facts for every category. Categories are independent; a failed
/// category leaves its slot empty.
pub async fn extract_facts(
    transcript: &str,
    generator: &dyn TextGenerator,
    skills: &SkillLibrary,
    config: &PipelineConfig,
) -> ExtractedFacts {
    let skill = skills.get(SKILL_EXTRACT_FACTS);
    let mut extracted = ExtractedFacts::default();

    for category in FactCategory::ALL {
        let facts = extract_category(transcript, category, generator, skill, config).await;
        *extracted.slot_mut(category) = facts;
    }

    info!(
        "extracted {} facts ({} decisions, {} action items, {} open questions, {} deadlines, {} metrics)",
        extracted.total(),
        extracted.decisions.len(),
        extracted.action_items.len(),
        extracted.open_questions.len(),
        extracted.deadlines.len(),
        extracted.metrics.len(),
    );
    extracted
}

/// One category: prompt, invoke, recovery-parse, bounded retry.
async fn extract_category(
    transcript: &str,
    category: FactCategory,
    generator: &dyn TextGenerator,
    skill: Option<&str>,
    config: &PipelineConfig,
) -> Vec<ExtractedFact> {
    let prompt = extraction_prompt(category, transcript, skill);

    for attempt in 1..=config.max_attempts {
        let raw = match generator.generate(&prompt, config.temperature).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(
                    "{} extraction attempt {} failed: {}",
                    category.as_str(),
                    attempt,
                    e
                );
                continue;
            }
        };
        match parse_fact_array(&raw, category) {
            Ok(facts) => return facts,
            Err(e) => {
                warn!(
                    "{} extraction attempt {} unparsable: {}",
                    category.as_str(),
                    attempt,
                    e
                );
            }
        }
    }

    warn!(
        "{} extraction failed after {} attempts",
        category.as_str(),
        config.max_attempts
    );
    Vec::new()
}

/// Recovery-parse a generator response into facts of the given category.
/// Non-object entries are dropped silently; the category always comes from
/// the caller.
fn parse_fact_array(raw: &str, category: FactCategory) -> Result<Vec<ExtractedFact>, RepairError> {
    let items = repair_json_array(raw)?;
    let mut facts = Vec::new();
    for item in items {
        let Value::Object(map) = item else {
            continue;
        };
        let content = string_field(&map, "content");
        let source_quote = string_field(&map, "source_quote");
        let confidence = map
            .get("confidence")
            .and_then(Value::as_str)
            .map(Confidence::parse_lenient)
            .unwrap_or(Confidence::High);
        let context = map
            .get("context")
            .and_then(Value::as_str)
            .map(str::to_string);
        facts.push(ExtractedFact {
            category,
            content,
            source_quote,
            confidence,
            context,
        });
    }
    Ok(facts)
}

fn string_field(map: &serde_json::Map<String, Value>, key: &str) -> String {
    map.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .trim()
        .to_string()
}
