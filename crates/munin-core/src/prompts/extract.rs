//! Per-category fact-extraction prompts.
//!
//! Each category gets its own generator call with explicit inclusion and
//! exclusion rules; conditional statements are excluded at the prompt level
//! and again by the validator.

use crate::lexicon;
use crate::model::FactCategory;
use crate::prompts::with_skill;

/// Category-specific inclusion/exclusion instructions.
fn category_instructions(category: FactCategory) -> &'static str {
    match category {
        FactCategory::Decision => {
            "Extract DECISIONS - things that were decided or agreed upon. \
             Must have finality words like 'decided', 'agreed', 'will', 'let's go with'."
        }
        FactCategory::ActionItem => {
            "Extract ACTION ITEMS - things someone committed to do. \
             Must have 'I will', 'X will', 'please', or action verbs. SKIP conditionals."
        }
        FactCategory::OpenQuestion => {
            "Extract OPEN QUESTIONS - unresolved questions raised and left unanswered. \
             Must be an actual question or an explicitly deferred topic."
        }
        FactCategory::Deadline => {
            "Extract DEADLINES - explicit time references like 'Thursday', 'by noon', \
             'next Tuesday at 2pm', 'EOD Wednesday'."
        }
        FactCategory::Metric => {
            "Extract METRICS - explicit numbers like '$3.5M', '3 hours', '12 clients', '23%'."
        }
    }
}

/// Build the extraction prompt for one category.
pub fn extraction_prompt(
    category: FactCategory,
    transcript: &str,
    skill: Option<&str>,
) -> String {
    let name = category.as_str();
    let task = format!(
        r#"# SPECIFIC TASK
{instructions}
Exclude statements containing conditional language ({conditionals}).

# TRANSCRIPT
{transcript}

# OUTPUT FORMAT
Return ONLY a valid JSON array. Each item must have:
- fact_type: "{name}"
- content: Brief description
- source_quote: EXACT quote from transcript
- confidence: "high", "medium", or "low"

Example:
[{{"fact_type": "{name}", "content": "description here", "source_quote": "exact words from transcript", "confidence": "high"}}]

If no {name}s found, return empty array: []

JSON array:"#,
        instructions = category_instructions(category),
        conditionals = lexicon::conditional_markers_display(),
        transcript = transcript,
        name = name,
    );
    with_skill(skill, &task)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_names_the_category_and_transcript() {
        let p = extraction_prompt(FactCategory::Metric, "we raised $3.5M", None);
        assert!(p.contains("\"fact_type\": \"metric\""));
        assert!(p.contains("we raised $3.5M"));
        assert!(p.contains("if, might, may, could, would be"));
    }

    #[test]
    fn skill_body_leads_the_prompt() {
        let p = extraction_prompt(FactCategory::Decision, "t", Some("No speculation."));
        assert!(p.starts_with("# SKILL INSTRUCTIONS\nNo speculation."));
    }
}
