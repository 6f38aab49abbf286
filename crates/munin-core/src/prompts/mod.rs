//! Prompt templates for fact extraction, artifact generation, and the AI judge.

pub mod artifacts;
pub mod extract;
pub mod judge;

pub use artifacts::{action_points_prompt, email_prompt, summary_prompt, todos_prompt};
pub use extract::extraction_prompt;
pub use judge::{
    action_points_judge_prompt, email_judge_prompt, summary_judge_prompt, todos_judge_prompt,
};

/// Splice an optional skill body ahead of the task, verbatim.
pub(crate) fn with_skill(skill: Option<&str>, task: &str) -> String {
    match skill {
        Some(body) => format!("# SKILL INSTRUCTIONS\n{}\n\n{}", body, task),
        None => task.to_string(),
    }
}

/// Append accumulated validation feedback for a retry attempt.
pub(crate) fn with_feedback(prompt: &str, feedback: Option<&str>) -> String {
    match feedback {
        Some(fb) if !fb.trim().is_empty() => {
            format!("{}\n\nPREVIOUS ATTEMPT FEEDBACK:\n{}\nFIX THESE ISSUES!", prompt, fb)
        }
        _ => prompt.to_string(),
    }
}
