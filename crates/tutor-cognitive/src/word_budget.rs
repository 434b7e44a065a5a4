//! Response-type → (min, max) word-budget table (spec §4.4, §8), the single
//! source of truth for both the Synthesizer's drafting and the Response
//! Builder's validation, replacing any per-route hard-coded length rule.

use tutor_core::ResponseType;

pub fn word_budget(response_type: ResponseType) -> (usize, usize) {
    match response_type {
        ResponseType::Socratic => (100, 200),
        ResponseType::Knowledge => (150, 350),
        ResponseType::Challenge | ResponseType::Gamified => (200, 400),
        ResponseType::Synthesis => (100, 350),
        ResponseType::Scaffolding => (100, 300),
        ResponseType::Analysis => (0, 500),
    }
}

/// `multi_agent_comprehensive` relaxes the synthesis ceiling up to 500
/// words (spec §4.4).
pub fn comprehensive_word_budget() -> (usize, usize) {
    (150, 500)
}

/// `progressive_opening` lowers the Socratic floor: the very first reply is
/// a brief acknowledgement plus one or two opening questions (spec §8
/// scenario 1), not the sustained back-and-forth the 100-word Socratic floor
/// is sized for.
pub fn progressive_opening_word_budget() -> (usize, usize) {
    (20, 200)
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

pub fn within_budget(text: &str, (min, max): (usize, usize)) -> bool {
    let count = word_count(text);
    count >= min && count <= max
}
