//! Content Filter leaf.
//!
//! Classifies a text payload as disallowed under a caller-supplied
//! strictness flag. With strictness off nothing is flagged; the
//! looser-wins rule at the call site decides whose flag applies.

/// Terms blocked while the strict filter is active. Matching is
/// token-based after lowercasing, with separator characters collapsed so
/// "s.e.x" and "s e x" hit the same entry.
const DISALLOWED: &[&str] = &[
    "sex", "sexting", "nude", "nudes", "nsfw", "porn", "horny", "fetish", "kink", "onlyfans",
];

/// Returns true when `text` must be blocked under `strict`.
pub fn is_disallowed(text: &str, strict: bool) -> bool {
    if !strict {
        return false;
    }

    let lower = text.to_lowercase();
    for token in lower.split(|c: char| !c.is_alphanumeric()) {
        if !token.is_empty() && DISALLOWED.contains(&token) {
            return true;
        }
    }

    // Catch separator-padded spellings across token boundaries.
    let collapsed: String = lower.chars().filter(|c| c.is_alphanumeric()).collect();
    DISALLOWED.iter().any(|term| collapsed.contains(term))
}
