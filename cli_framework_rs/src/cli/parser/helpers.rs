//! Helper functions shared by the parser and the dispatcher:
//! - option-like token detection
//! - number parsing
//! - command suggestion via Levenshtein distance

use strsim::levenshtein;

/// Most suggestions attached to a "command not found" error.
pub const MAX_SUGGESTIONS: usize = 3;

/// Candidates further than this from the input are never suggested.
const SUGGESTION_MAX_DISTANCE: usize = 3;

/// Tokens starting with `-` end the command path and stop greedy array capture.
pub(crate) fn is_option_like(arg: &str) -> bool {
    arg.starts_with('-')
}

/// Numeric conversion for `number` options; non-finite or malformed input is `None`.
pub(super) fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Suggest up to three similar command names using Levenshtein distance.
///
/// Matching is case-insensitive. Results are ordered by distance, ties by
/// the candidates' order, so output is stable for a fixed candidate list.
pub fn suggest_similar_commands(input: &str, candidates: &[&str]) -> Vec<String> {
    let input_lower = input.to_lowercase();
    let mut scored: Vec<(usize, usize, &str)> = candidates
        .iter()
        .enumerate()
        .filter_map(|(position, &candidate)| {
            let distance = levenshtein(&input_lower, &candidate.to_lowercase());
            (distance <= SUGGESTION_MAX_DISTANCE).then_some((distance, position, candidate))
        })
        .collect();

    scored.sort_unstable();
    let mut suggestions: Vec<String> = Vec::with_capacity(MAX_SUGGESTIONS);
    for (_, _, candidate) in scored {
        if suggestions.iter().any(|s| s == candidate) {
            continue;
        }
        suggestions.push(candidate.to_string());
        if suggestions.len() == MAX_SUGGESTIONS {
            break;
        }
    }
    suggestions
}

// ============================================================================
// Tests
// ============================================================================
