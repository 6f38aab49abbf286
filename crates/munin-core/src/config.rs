//! Pipeline configuration loaded from environment.
//!
//! | Env | Default | Description |
//! |-----|---------|-------------|
//! | MUNIN_TEMPERATURE | 0.7 | Sampling temperature for content generation. |
//! | MUNIN_JUDGE_ENABLED | true | Run the AI-judge second gate on artifacts. |
//! | MUNIN_TAG_HEDGES | false | Annotate hedge phrases during normalization. |
//! | MUNIN_MAX_ATTEMPTS | 3 | Retry bound per generator call site. |
//! | MUNIN_JUDGE_EXCERPT_CHARS | 2000 | Transcript excerpt length for judge prompts. |

use serde::{Deserialize, Serialize};

use crate::normalize::NormalizeOptions;

fn default_temperature() -> f32 {
    0.7
}

fn default_true() -> bool {
    true
}

fn default_max_attempts() -> usize {
    3
}

fn default_judge_excerpt_chars() -> usize {
    2000
}

/// Behavior knobs for a pipeline run. Constructed once and passed explicitly;
/// there is no process-wide configuration state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// MUNIN_TEMPERATURE: sampling temperature for content-generation calls.
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// MUNIN_JUDGE_ENABLED: run the AI-judge hallucination gate after rule checks.
    #[serde(default = "default_true")]
    pub judge_enabled: bool,
    /// MUNIN_TAG_HEDGES: rewrite hedge phrases to explicit uncertainty annotations.
    #[serde(default)]
    pub tag_hedges: bool,
    /// MUNIN_MAX_ATTEMPTS: bounded retries per generator call site.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,
    /// MUNIN_JUDGE_EXCERPT_CHARS: how much raw transcript the judge sees.
    #[serde(default = "default_judge_excerpt_chars")]
    pub judge_excerpt_chars: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            temperature: default_temperature(),
            judge_enabled: true,
            tag_hedges: false,
            max_attempts: default_max_attempts(),
            judge_excerpt_chars: default_judge_excerpt_chars(),
        }
    }
}

impl PipelineConfig {
    /// Load from `MUNIN_*` environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let mut config = PipelineConfig::default();
        if let Ok(v) = std::env::var("MUNIN_TEMPERATURE") {
            if let Ok(t) = v.trim().parse() {
                config.temperature = t;
            }
        }
        if let Ok(v) = std::env::var("MUNIN_JUDGE_ENABLED") {
            config.judge_enabled = parse_bool(&v, config.judge_enabled);
        }
        if let Ok(v) = std::env::var("MUNIN_TAG_HEDGES") {
            config.tag_hedges = parse_bool(&v, config.tag_hedges);
        }
        if let Ok(v) = std::env::var("MUNIN_MAX_ATTEMPTS") {
            if let Ok(n) = v.trim().parse::<usize>() {
                config.max_attempts = n.max(1);
            }
        }
        if let Ok(v) = std::env::var("MUNIN_JUDGE_EXCERPT_CHARS") {
            if let Ok(n) = v.trim().parse() {
                config.judge_excerpt_chars = n;
            }
        }
        config
    }

    pub fn normalize_options(&self) -> NormalizeOptions {
        NormalizeOptions {
            tag_hedges: self.tag_hedges,
        }
    }
}

fn parse_bool(value: &str, default: bool) -> bool {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = PipelineConfig::default();
        assert_eq!(config.max_attempts, 3);
        assert!(config.judge_enabled);
        assert!(!config.tag_hedges);
    }

    #[test]
    fn bool_parsing() {
        assert!(parse_bool("TRUE", false));
        assert!(!parse_bool("off", true));
        assert!(parse_bool("garbage", true));
    }
}
