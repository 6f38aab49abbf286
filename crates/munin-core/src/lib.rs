//! # Munin Core — Meeting Minutes Pipeline
//!
//! Fact-first transcript processing: extract typed facts, validate them
//! deterministically, then generate summary / action points / to-dos /
//! follow-up email from validated facts only, each behind a rule-score and
//! AI-judge gate with bounded retry.

pub mod artifact;
pub mod compliance;
pub mod config;
pub mod error;
pub mod extract;
pub mod judge;
pub mod lexicon;
pub mod model;
pub mod normalize;
pub mod pipeline;
pub mod prompts;
pub mod provider;
pub mod repair;
pub mod skills;
pub mod validate;

#[cfg(test)]
pub(crate) mod testutil;

pub use config::PipelineConfig;
pub use error::{GeneratorError, PipelineError, RepairError};
pub use model::{
    ActionPoint, ExtractedFact, ExtractedFacts, FactCategory, FactSet, FollowUpEmail,
    MeetingDocument, OutputBundle, Priority, ProcessingRecord, ToDo, ValidatedFact,
};
pub use pipeline::process_meeting;
pub use provider::{create_generator, GeneratorConfig, Provider, TextGenerator};
pub use skills::SkillLibrary;
