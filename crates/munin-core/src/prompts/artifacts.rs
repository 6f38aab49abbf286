//! Prompts for the four output artifacts. Each states the validated fact list
//! verbatim plus explicit constraints: no new information, no conditionals,
//! `source_facts` copied exactly.

use crate::prompts::{with_feedback, with_skill};

/// Executive summary: plain text only, 40-80 words.
pub fn summary_prompt(facts_text: &str, skill: Option<&str>, feedback: Option<&str>) -> String {
    let task = format!(
        r#"# VALIDATED FACTS TO SUMMARIZE
{facts_text}

# CONSTRAINTS
- Use ONLY the facts above. Do not add names, numbers, or commitments that are not listed.
- No conditional language.

# OUTPUT
Generate ONLY the summary text. No labels, no formatting, no "Here is...".
Target: 40-80 words, 2-4 sentences.

Summary:"#
    );
    with_feedback(&with_skill(skill, &task), feedback)
}

/// Strategic action points, grouped, max 4.
pub fn action_points_prompt(facts_text: &str, skill: Option<&str>, feedback: Option<&str>) -> String {
    let task = format!(
        r#"# VALIDATED FACTS
{facts_text}

# OUTPUT FORMAT
Return ONLY a valid JSON array. Maximum 4 action points.
Group related facts into single action points.
source_facts entries must be the EXACT fact text copied from the list above - never an index number.
No conditional language.

[{{"description": "Strategic goal here", "priority": "High", "source_facts": ["exact fact text 1", "exact fact text 2"]}}]

JSON array:"#
    );
    with_feedback(&with_skill(skill, &task), feedback)
}

/// Tactical to-dos matched against deadline facts, max 5.
pub fn todos_prompt(facts_text: &str, skill: Option<&str>, feedback: Option<&str>) -> String {
    let task = format!(
        r#"# VALIDATED FACTS
{facts_text}

# OUTPUT FORMAT
Return ONLY a valid JSON array. Maximum 5 to-dos.
Match action items with deadlines where applicable.
Use JSON null for missing deadlines (NOT "Not specified").
Deadlines must be the time expression copied from a DEADLINE fact - never a calculated date.
source_facts entries must be the EXACT fact text - never an index number.

[{{"task": "Specific task here", "deadline": null, "priority": "High", "source_facts": ["exact fact text"]}}]

JSON array:"#
    );
    with_feedback(&with_skill(skill, &task), feedback)
}

/// Single professional follow-up email.
pub fn email_prompt(facts_text: &str, skill: Option<&str>, feedback: Option<&str>) -> String {
    let task = format!(
        r#"# VALIDATED FACTS
{facts_text}

# OUTPUT FORMAT
Return a JSON object with subject, body, and source_facts.
Keep the body simple - no special characters or line breaks.
No placeholders like [Your Name]. No conditional language.
Target body length: 50-200 words.

Example format:
{{"subject": "Meeting Follow-Up", "body": "Following up on our meeting. Key items: Item 1. Item 2. Best regards", "source_facts": ["fact 1", "fact 2"]}}

JSON:"#
    );
    with_feedback(&with_skill(skill, &task), feedback)
}
