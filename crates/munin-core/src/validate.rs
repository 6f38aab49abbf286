//! Deterministic fact admissibility rules.
//!
//! Rule-only by design — no generator call, so validation is reproducible and
//! auditable. Rules run in a fixed order and the first failing rule wins;
//! every rejection is recorded with a human-readable reason. Extraction order
//! is preserved in the output.

use tracing::info;

use crate::lexicon;
use crate::model::{Confidence, ExtractedFact, ExtractedFacts, FactCategory, FactSet, ValidatedFact};

/// Apply the admissibility rules to every extracted fact.
pub fn validate_facts(extracted: &ExtractedFacts) -> FactSet {
    let mut facts = Vec::new();
    let mut discarded_reasons = Vec::new();

    for fact in extracted.all() {
        match admit(fact) {
            Ok(()) => facts.push(ValidatedFact {
                category: fact.category,
                content: fact.content.clone(),
                source_quote: fact.source_quote.clone(),
                confidence: fact.confidence,
                is_valid: true,
                validation_notes: None,
            }),
            Err(reason) => discarded_reasons.push(reason),
        }
    }

    info!(
        "validated facts: {} kept, {} discarded",
        facts.len(),
        discarded_reasons.len()
    );

    FactSet {
        facts,
        discarded_count: discarded_reasons.len(),
        discarded_reasons,
    }
}

/// First failing rule wins; the Err is the ledger entry.
fn admit(fact: &ExtractedFact) -> Result<(), String> {
    let content_lower = fact.content.to_lowercase();

    // Rule 1: low confidence is unacceptable for decisions and action items.
    if fact.confidence == Confidence::Low
        && matches!(fact.category, FactCategory::Decision | FactCategory::ActionItem)
    {
        return Err(format!("Low confidence: {}", excerpt(&fact.content)));
    }

    // Rule 2: a source quote under 3 words is too short to be evidence.
    if fact.source_quote.split_whitespace().count() < 3 {
        return Err(format!("Missing source quote: {}", excerpt(&fact.content)));
    }

    // Rule 3: generic stock phrases, unless high confidence.
    if fact.confidence != Confidence::High {
        for phrase in lexicon::VAGUE_PHRASES {
            if content_lower.trim() == phrase
                || (content_lower.contains(phrase) && fact.content.len() < 20)
            {
                return Err(format!("Too vague: {}", excerpt(&fact.content)));
            }
        }
    }

    // Rule 4: action items need commitment language in the quote.
    if fact.category == FactCategory::ActionItem && !lexicon::has_commitment(&fact.source_quote) {
        return Err(format!("No clear commitment: {}", excerpt(&fact.content)));
    }

    // Rule 5: conditional language anywhere disqualifies the fact.
    if lexicon::contains_conditional(&fact.source_quote)
        || lexicon::contains_conditional(&fact.content)
    {
        return Err(format!("Conditional statement: {}", excerpt(&fact.content)));
    }

    Ok(())
}

/// First 50 characters, on a char boundary.
fn excerpt(s: &str) -> &str {
    match s.char_indices().nth(50) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
