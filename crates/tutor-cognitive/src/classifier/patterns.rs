//! Regex pattern tables for classifier layers 1 and 2 (spec §4.2).

use std::sync::OnceLock;

use regex::Regex;
use tutor_core::{DesignDimension, UserIntent};

fn compile_all(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(p).expect("static classifier pattern must compile"))
        .collect()
}

/// High-confidence (layer 1) patterns, checked in this exact order — the
/// first category with a match wins (spec §4.2).
pub fn high_confidence_patterns() -> &'static [(UserIntent, Vec<Regex>)] {
    static PATTERNS: OnceLock<Vec<(UserIntent, Vec<Regex>)>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        vec![
            (
                UserIntent::DirectAnswerRequest,
                compile_all(&[
                    r"(?i)do it for me",
                    r"(?i)just tell me",
                    r"(?i)design (this|it) for me",
                    r"(?i)give me the (exact|final|complete) (layout|design|answer|solution)",
                    r"(?i)tell me the (exact|right|correct) answer",
                ]),
            ),
            (
                UserIntent::ExampleRequest,
                compile_all(&[
                    r"(?i)show me examples",
                    r"(?i)give me precedents",
                    r"(?i)examples of",
                    r"(?i)precedents? (for|of)",
                ]),
            ),
            (
                UserIntent::KnowledgeRequest,
                compile_all(&[
                    r"(?i)tell me about",
                    r"(?i)what (is|are)\b",
                    r"(?i)^explain\b",
                    r"(?i)\bexplain\b.*\?$",
                ]),
            ),
            (
                UserIntent::FeedbackRequest,
                compile_all(&[
                    r"(?i)what do you think",
                    r"(?i)review my",
                    r"(?i)what'?s your opinion",
                    r"(?i)how does (this|it) look",
                ]),
            ),
            (
                UserIntent::ConfusionExpression,
                compile_all(&[
                    r"(?i)i'?m confused",
                    r"(?i)i don'?t understand",
                    r"(?i)i do not understand",
                    r"(?i)this doesn'?t make sense",
                ]),
            ),
            (
                UserIntent::TechnicalQuestion,
                compile_all(&[
                    r"(?i)how do i calculate",
                    r"(?i)what'?s the minimum",
                    r"(?i)what is the minimum",
                    r"(?i)how (wide|tall|deep|thick) should",
                ]),
            ),
        ]
    })
}

/// Layer 2: bare phrasing that needs context to disambiguate (spec §4.2).
/// Returns the candidate intents to hint the LLM disambiguation call with.
pub fn context_dependent_patterns() -> &'static [(Vec<Regex>, &'static [UserIntent])] {
    static PATTERNS: OnceLock<Vec<(Vec<Regex>, &'static [UserIntent])>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        vec![
            (
                compile_all(&[r"(?i)^show me\.?$", r"(?i)^show me\?$"]),
                &[UserIntent::ExampleRequest, UserIntent::KnowledgeRequest] as &'static [UserIntent],
            ),
            (
                compile_all(&[r"(?i)^tell me\.?$", r"(?i)^tell me\?$"]),
                &[UserIntent::KnowledgeRequest, UserIntent::FeedbackRequest] as &'static [UserIntent],
            ),
        ]
    })
}

/// Keyword probe for "guidance/design words" used by the
/// `is_pure_knowledge_request` rule (spec §4.2).
pub fn contains_guidance_words(text: &str) -> bool {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let re = PATTERN.get_or_init(|| {
        Regex::new(r"(?i)\b(design|guide me|help me design|my (project|building|site)|should i)\b")
            .expect("guidance-word pattern must compile")
    });
    re.is_match(text)
}

/// Deterministic keyword probe for dominant design dimensions (spec §3).
/// Computable without an LLM call so topic-transition detection and metric
/// scoring stay deterministic (spec §4.6).
pub fn detect_design_dimensions(text: &str) -> Vec<DesignDimension> {
    static TABLE: OnceLock<Vec<(DesignDimension, Regex)>> = OnceLock::new();
    let table = TABLE.get_or_init(|| {
        vec![
            (DesignDimension::Functional, Regex::new(r"(?i)\b(function|program|use|activity|circulation flow)\b").unwrap()),
            (DesignDimension::Spatial, Regex::new(r"(?i)\b(space|spatial|layout|massing|room|circulation)\b").unwrap()),
            (DesignDimension::Technical, Regex::new(r"(?i)\b(structure|structural|hvac|material|construction|beam|column|detailing)\b").unwrap()),
            (DesignDimension::Contextual, Regex::new(r"(?i)\b(site|neighborhood|context|surrounding|climate|zoning)\b").unwrap()),
            (DesignDimension::Aesthetic, Regex::new(r"(?i)\b(facade|form|style|aesthetic|appearance|proportion)\b").unwrap()),
            (DesignDimension::Sustainable, Regex::new(r"(?i)\b(sustainab|energy|passive|daylight|carbon|green roof)\b").unwrap()),
        ]
    });
    table
        .iter()
        .filter(|(_, re)| re.is_match(text))
        .map(|(dim, _)| *dim)
        .collect()
}
