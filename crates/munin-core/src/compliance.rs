//! Final compliance sweep. A deterministic audit of the assembled bundle
//! against the validated facts; failures are reported, never fatal.

use tracing::warn;

use crate::lexicon;
use crate::model::{FactSet, OutputBundle};

/// Audit the bundle. Returns the overall verdict and every issue found.
pub fn check_compliance(bundle: &OutputBundle, facts: &FactSet) -> (bool, Vec<String>) {
    let mut issues = Vec::new();
    let contents: Vec<&str> = facts.facts.iter().map(|f| f.content.as_str()).collect();

    for (i, ap) in bundle.action_points.iter().enumerate() {
        if ap.source_facts.is_empty() {
            issues.push(format!("Action point {} cites no source facts", i + 1));
        }
        if lexicon::contains_placeholder(&ap.description) {
            issues.push(format!("Action point {} contains a placeholder", i + 1));
        }
        check_traceability(&ap.source_facts, &contents, &format!("Action point {}", i + 1), &mut issues);
    }

    for (i, td) in bundle.todos.iter().enumerate() {
        if td.source_facts.is_empty() {
            issues.push(format!("Todo {} cites no source facts", i + 1));
        }
        if lexicon::contains_placeholder(&td.task) {
            issues.push(format!("Todo {} contains a placeholder", i + 1));
        }
        if let Some(deadline) = &td.deadline {
            if lexicon::is_deadline_sentinel(deadline) {
                issues.push(format!("Todo {} has sentinel deadline '{}'", i + 1, deadline));
            }
        }
        check_traceability(&td.source_facts, &contents, &format!("Todo {}", i + 1), &mut issues);
    }

    for (i, email) in bundle.follow_up_emails.iter().enumerate() {
        if email.source_facts.is_empty() {
            issues.push(format!("Email {} cites no source facts", i + 1));
        }
        if lexicon::contains_placeholder(&email.subject) || lexicon::contains_placeholder(&email.body) {
            issues.push(format!("Email {} contains a placeholder", i + 1));
        }
        check_traceability(&email.source_facts, &contents, &format!("Email {}", i + 1), &mut issues);
    }

    for issue in &issues {
        warn!("compliance: {}", issue);
    }
    (issues.is_empty(), issues)
}

/// Every cited source fact must be the text of a validated fact.
fn check_traceability(cited: &[String], contents: &[&str], label: &str, issues: &mut Vec<String>) {
    for entry in cited {
        if !contents.iter().any(|c| *c == entry) {
            issues.push(format!("{} cites unknown fact '{}'", label, entry));
        }
    }
}
