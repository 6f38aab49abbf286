//! Prompts for AI-judge validation: a second model call that scores a prior
//! artifact for hallucination risk. The judge never produces content.

/// Shared scoring rubric and response contract.
const JUDGE_RUBRIC: &str = r#"SCORING:
- 8-10: No hallucinations, accurate
- 6-7: Has hallucinations or major inaccuracies
- 1-5: Severe problems

Return ONLY valid JSON:
{"score": 8, "issues": [], "suggestions": ""}

If score < 8, list the problems in "issues"."#;

pub fn summary_judge_prompt(summary: &str, transcript_excerpt: &str) -> String {
    format!(
        r#"Check if this summary has HALLUCINATIONS (invented information).

TRANSCRIPT:
{transcript_excerpt}

SUMMARY:
{summary}

CRITICAL CHECKS:
- Are all names in the summary actually in the transcript?
- Are all facts/numbers actually mentioned?
- Are all decisions actually made (not just discussed)?

{JUDGE_RUBRIC}"#
    )
}

pub fn action_points_judge_prompt(actions_text: &str, transcript_excerpt: &str) -> String {
    format!(
        r#"Check if these action points have HALLUCINATIONS.

TRANSCRIPT:
{transcript_excerpt}

ACTION POINTS:
{actions_text}

CRITICAL CHECKS:
- Are all actions actually discussed or committed to?
- No invented stakeholders or goals?

{JUDGE_RUBRIC}"#
    )
}

pub fn todos_judge_prompt(todos_text: &str, transcript_excerpt: &str) -> String {
    format!(
        r#"Check if these todos have HALLUCINATIONS.

TRANSCRIPT:
{transcript_excerpt}

TODOS:
{todos_text}

CRITICAL CHECKS:
- Are all tasks actually committed to?
- Are deadlines stated in the transcript, not calculated?
- No invented people or tasks?

{JUDGE_RUBRIC}"#
    )
}

pub fn email_judge_prompt(email_body: &str, transcript_excerpt: &str) -> String {
    format!(
        r#"Check if this follow-up email is ready to send and grounded in the transcript.

TRANSCRIPT:
{transcript_excerpt}

EMAIL:
{email_body}

CRITICAL CHECKS:
- No placeholders like [Your Name] or [Date]?
- Everything mentioned is actually from the meeting?
- Professional tone, clear and actionable?

{JUDGE_RUBRIC}"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn judge_prompts_carry_the_contract() {
        for p in [
            summary_judge_prompt("s", "t"),
            action_points_judge_prompt("a", "t"),
            todos_judge_prompt("td", "t"),
            email_judge_prompt("e", "t"),
        ] {
            assert!(p.contains("{\"score\": 8, \"issues\": [], \"suggestions\": \"\"}"));
            assert!(p.contains("HALLUCINATION") || p.contains("grounded"));
        }
    }
}
