//! Skill texts: external markdown instruction bodies spliced into prompts
//! verbatim.
//!
//! The library is a per-run cache built once from a directory and passed
//! explicitly into the pipeline — no process-wide loader state. A missing
//! directory or file degrades to the built-in prompt instructions.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const SKILL_EXTRACT_FACTS: &str = "EXTRACT_FACTS";
pub const SKILL_GENERATE_SUMMARY: &str = "GENERATE_SUMMARY";
pub const SKILL_GENERATE_ACTION_POINTS: &str = "GENERATE_ACTION_POINTS";
pub const SKILL_GENERATE_TODOS: &str = "GENERATE_TODOS";
pub const SKILL_GENERATE_EMAIL: &str = "GENERATE_EMAIL";

/// Cache of skill bodies keyed by skill name (file stem).
#[derive(Debug, Clone, Default)]
pub struct SkillLibrary {
    dir: Option<PathBuf>,
    cache: HashMap<String, String>,
}

impl SkillLibrary {
    /// A library with no skills; prompts fall back to built-in instructions.
    pub fn empty() -> Self {
        SkillLibrary::default()
    }

    /// Load every `*.md` file under `dir` into the cache. A missing or
    /// unreadable directory yields an empty library with a warning.
    pub fn from_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        let mut cache = HashMap::new();
        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("skills directory {} unavailable: {}", dir.display(), e);
                return SkillLibrary {
                    dir: Some(dir.to_path_buf()),
                    cache,
                };
            }
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("md") {
                continue;
            }
            let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            match std::fs::read_to_string(&path) {
                Ok(body) => {
                    debug!("loaded skill {} ({} bytes)", name, body.len());
                    cache.insert(name.to_string(), body);
                }
                Err(e) => warn!("skipping unreadable skill {}: {}", path.display(), e),
            }
        }
        SkillLibrary {
            dir: Some(dir.to_path_buf()),
            cache,
        }
    }

    /// The skill body, verbatim, if loaded.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.cache.get(name).map(String::as_str)
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.cache.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }
}
