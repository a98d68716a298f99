use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // "northbound", "Manhattan-bound", "Queens-Bound"...
    static ref BOUND_TOKEN: Regex = Regex::new(r"\b([A-Za-z]+-?[Bb]ound)\b").unwrap();
}

/// Extracts a directional label ("northbound", "Manhattan-bound") from free
/// equipment text, case preserved. Empty when no `...bound` token appears.
pub fn infer_direction_label(text: &str) -> &str {
    BOUND_TOKEN.find(text).map(|m| m.as_str()).unwrap_or("")
}

/// The `serving` field is the better-curated source; the short description
/// only gets a look when `serving` yields nothing.
pub fn infer_direction<'a>(serving: &'a str, short_description: &'a str) -> &'a str {
    let label = infer_direction_label(serving);
    if label.is_empty() {
        infer_direction_label(short_description)
    } else {
        label
    }
}
