//! Transcript normalization: strip discourse filler, collapse whitespace,
//! optionally tag hedge phrases so downstream extraction can see non-committed
//! language without losing it.
//!
//! Content-preserving by construction: only filler tokens and whitespace are
//! touched; names, numbers, and dates survive untouched.

use once_cell::sync::Lazy;
use regex::Regex;

static FILLER_WORDS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:um+|uh+|er|ah)\b,?\s*").expect("filler word regex"));
static FILLER_PHRASES: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:like|you know|basically|actually|literally),\s*").expect("filler phrase regex")
});
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace regex"));
static SPACE_BEFORE_PUNCT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r" +([.,!?;:])").expect("punct spacing regex"));

static HEDGE_UNCERTAIN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:maybe|probably|i'm not sure)\s+([^.!?]+)").expect("uncertain hedge regex")
});
static HEDGE_POSSIBLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bmight\s+([^.!?]+)").expect("possible hedge regex"));

/// Normalizer options. Hedge tagging rewrites "maybe X" to `[uncertain: X]`
/// and "might X" to `[possible: X]`; off by default because the validator
/// keys on the raw conditional markers.
#[derive(Debug, Clone, Copy, Default)]
pub struct NormalizeOptions {
    pub tag_hedges: bool,
}

/// Strip filler, collapse whitespace, optionally tag hedges. Deterministic,
/// no failure mode.
pub fn normalize(raw: &str, options: &NormalizeOptions) -> String {
    let text = FILLER_WORDS.replace_all(raw, "");
    let text = FILLER_PHRASES.replace_all(&text, "");

    let text = if options.tag_hedges {
        let text = HEDGE_UNCERTAIN.replace_all(&text, "[uncertain: $1]");
        HEDGE_POSSIBLE.replace_all(&text, "[possible: $1]").into_owned()
    } else {
        text.into_owned()
    };

    let text = WHITESPACE.replace_all(&text, " ");
    let text = SPACE_BEFORE_PUNCT.replace_all(&text, "$1");
    text.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(raw: &str) -> String {
        normalize(raw, &NormalizeOptions::default())
    }

    #[test]
    fn strips_filler_words() {
        assert_eq!(
            plain("Um, so we, uh, raised $3.5M this quarter."),
            "so we, raised $3.5M this quarter."
        );
    }

    #[test]
    fn strips_filler_phrases_with_comma() {
        assert_eq!(
            plain("Basically, we will ship Thursday."),
            "we will ship Thursday."
        );
    }

    #[test]
    fn collapses_whitespace() {
        assert_eq!(plain("one   two\n\nthree\tfour"), "one two three four");
    }

    #[test]
    fn preserves_factual_tokens() {
        let out = plain("Um, Priya will basically, send the $3.5M report by Thursday 2pm.");
        assert!(out.contains("Priya"));
        assert!(out.contains("$3.5M"));
        assert!(out.contains("Thursday 2pm"));
    }

    #[test]
    fn hedge_tagging_is_opt_in() {
        let raw = "We might push back the launch.";
        assert_eq!(plain(raw), raw);
        let tagged = normalize(raw, &NormalizeOptions { tag_hedges: true });
        assert_eq!(tagged, "We [possible: push back the launch].");
    }

    #[test]
    fn hedge_tagging_marks_uncertainty() {
        let tagged = normalize(
            "Maybe we hire two more engineers. The budget is $40k.",
            &NormalizeOptions { tag_hedges: true },
        );
        assert!(tagged.starts_with("[uncertain: we hire two more engineers]."));
        assert!(tagged.contains("The budget is $40k."));
    }

    #[test]
    fn deterministic_and_idempotent_on_clean_text() {
        let clean = "Priya will send the report by Thursday.";
        assert_eq!(plain(clean), clean);
        assert_eq!(plain(&plain(clean)), plain(clean));
    }
}
