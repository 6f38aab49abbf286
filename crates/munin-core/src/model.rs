//! Typed data model for the fact-first pipeline.
//!
//! Facts are immutable once created: validation produces new records, it does
//! not mutate extracted facts. Every stage owns the `ProcessingRecord` fields
//! it produces and replaces the whole record at the stage boundary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Facts
// ---------------------------------------------------------------------------

/// Fact category. Closed enum — a generator-supplied label never reaches this
/// type; the extractor stamps the category it asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactCategory {
    Decision,
    ActionItem,
    OpenQuestion,
    Deadline,
    Metric,
}

impl FactCategory {
    /// All categories, in extraction order.
    pub const ALL: [FactCategory; 5] = [
        FactCategory::Decision,
        FactCategory::ActionItem,
        FactCategory::OpenQuestion,
        FactCategory::Deadline,
        FactCategory::Metric,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FactCategory::Decision => "decision",
            FactCategory::ActionItem => "action_item",
            FactCategory::OpenQuestion => "open_question",
            FactCategory::Deadline => "deadline",
            FactCategory::Metric => "metric",
        }
    }

    /// Uppercase label for prompt fact lists ("[DECISION] ...").
    pub fn label(&self) -> String {
        self.as_str().to_uppercase()
    }
}

/// Generator-reported confidence for an extracted fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    /// Lenient parse; anything unrecognized counts as high (the validator
    /// discards on other grounds).
    pub fn parse_lenient(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "low" => Confidence::Low,
            "medium" => Confidence::Medium,
            _ => Confidence::High,
        }
    }
}

/// A single factual claim extracted from the transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedFact {
    pub category: FactCategory,
    /// Brief description of the claim.
    pub content: String,
    /// Literal excerpt from the transcript backing the claim.
    pub source_quote: String,
    pub confidence: Confidence,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

/// All facts extracted from a transcript, grouped by category.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractedFacts {
    pub decisions: Vec<ExtractedFact>,
    pub action_items: Vec<ExtractedFact>,
    pub open_questions: Vec<ExtractedFact>,
    pub deadlines: Vec<ExtractedFact>,
    pub metrics: Vec<ExtractedFact>,
}

impl ExtractedFacts {
    pub fn total(&self) -> usize {
        self.decisions.len()
            + self.action_items.len()
            + self.open_questions.len()
            + self.deadlines.len()
            + self.metrics.len()
    }

    /// All facts in extraction order (category order, then per-category order).
    pub fn all(&self) -> impl Iterator<Item = &ExtractedFact> {
        self.decisions
            .iter()
            .chain(self.action_items.iter())
            .chain(self.open_questions.iter())
            .chain(self.deadlines.iter())
            .chain(self.metrics.iter())
    }

    pub fn slot_mut(&mut self, category: FactCategory) -> &mut Vec<ExtractedFact> {
        match category {
            FactCategory::Decision => &mut self.decisions,
            FactCategory::ActionItem => &mut self.action_items,
            FactCategory::OpenQuestion => &mut self.open_questions,
            FactCategory::Deadline => &mut self.deadlines,
            FactCategory::Metric => &mut self.metrics,
        }
    }
}

/// A fact that survived the admissibility rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidatedFact {
    pub category: FactCategory,
    pub content: String,
    pub source_quote: String,
    pub confidence: Confidence,
    pub is_valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation_notes: Option<String>,
}

/// Validated facts plus the discard ledger. Created once per run by the
/// validator; read-only afterward.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FactSet {
    pub facts: Vec<ValidatedFact>,
    pub discarded_count: usize,
    pub discarded_reasons: Vec<String>,
}

impl FactSet {
    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }

    /// Facts of one category, in validated order.
    pub fn of_category(&self, category: FactCategory) -> Vec<&ValidatedFact> {
        self.facts.iter().filter(|f| f.category == category).collect()
    }

    /// Facts of any of the given categories, in validated order.
    pub fn of_categories(&self, categories: &[FactCategory]) -> Vec<&ValidatedFact> {
        self.facts
            .iter()
            .filter(|f| categories.contains(&f.category))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Artifacts
// ---------------------------------------------------------------------------

/// Artifact priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

/// Strategic action point derived from validated facts. Each `source_facts`
/// entry is the verbatim `content` of a validated fact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionPoint {
    pub description: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub source_facts: Vec<String>,
}

/// Tactical to-do item. `deadline` is a true null when absent — never the
/// string "Not specified".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToDo {
    pub task: String,
    #[serde(default)]
    pub deadline: Option<String>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub source_facts: Vec<String>,
}

/// Follow-up email derived from validated facts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FollowUpEmail {
    pub subject: String,
    pub body: String,
    #[serde(default)]
    pub source_facts: Vec<String>,
}

/// Final assembled outputs plus provenance counters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputBundle {
    pub summary: String,
    pub action_points: Vec<ActionPoint>,
    pub todos: Vec<ToDo>,
    pub follow_up_emails: Vec<FollowUpEmail>,
    pub total_facts_extracted: usize,
    pub total_facts_validated: usize,
    pub facts_discarded: usize,
}

impl OutputBundle {
    /// True if nothing was produced at all (no summary text and no artifacts).
    pub fn is_empty(&self) -> bool {
        self.summary.trim().is_empty()
            && self.action_points.is_empty()
            && self.todos.is_empty()
            && self.follow_up_emails.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Processing record
// ---------------------------------------------------------------------------

/// The pipeline's threaded state. One named field per stage output; a stage
/// fills only its own fields and returns a new record.
#[derive(Debug, Clone)]
pub struct ProcessingRecord {
    pub raw_transcript: String,
    pub normalized_transcript: Option<String>,
    pub extracted_facts: Option<ExtractedFacts>,
    pub validated_facts: Option<FactSet>,
    pub summary: Option<String>,
    pub action_points: Option<Vec<ActionPoint>>,
    pub todos: Option<Vec<ToDo>>,
    pub follow_up_emails: Option<Vec<FollowUpEmail>>,
    pub outputs: Option<OutputBundle>,
    pub compliance_passed: bool,
    pub compliance_issues: Vec<String>,
    pub processing_started: DateTime<Utc>,
    pub processing_completed: Option<DateTime<Utc>>,
}

impl ProcessingRecord {
    pub fn new(raw_transcript: impl Into<String>) -> Self {
        ProcessingRecord {
            raw_transcript: raw_transcript.into(),
            normalized_transcript: None,
            extracted_facts: None,
            validated_facts: None,
            summary: None,
            action_points: None,
            todos: None,
            follow_up_emails: None,
            outputs: None,
            compliance_passed: false,
            compliance_issues: Vec::new(),
            processing_started: Utc::now(),
            processing_completed: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Persisted document
// ---------------------------------------------------------------------------

/// Run metadata persisted alongside the outputs. Timestamps are RFC 3339.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub total_facts_extracted: usize,
    pub total_facts_validated: usize,
    pub facts_discarded: usize,
    pub compliance_passed: bool,
    pub compliance_issues: Vec<String>,
    pub processing_started: DateTime<Utc>,
    pub processing_completed: Option<DateTime<Utc>>,
}

/// The persisted JSON document (`meeting_outputs.json`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeetingDocument {
    pub summary: String,
    pub action_points: Vec<ActionPoint>,
    pub todos: Vec<ToDo>,
    pub follow_up_emails: Vec<FollowUpEmail>,
    pub metadata: DocumentMetadata,
}

impl MeetingDocument {
    /// Build the persisted document from a completed record. An absent bundle
    /// yields an empty document rather than an error.
    pub fn from_record(record: &ProcessingRecord) -> Self {
        let bundle = record.outputs.clone().unwrap_or_default();
        MeetingDocument {
            summary: bundle.summary,
            action_points: bundle.action_points,
            todos: bundle.todos,
            follow_up_emails: bundle.follow_up_emails,
            metadata: DocumentMetadata {
                total_facts_extracted: bundle.total_facts_extracted,
                total_facts_validated: bundle.total_facts_validated,
                facts_discarded: bundle.facts_discarded,
                compliance_passed: record.compliance_passed,
                compliance_issues: record.compliance_issues.clone(),
                processing_started: record.processing_started,
                processing_completed: record.processing_completed,
            },
        }
    }
}
