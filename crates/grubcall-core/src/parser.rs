//! Free-text order parser.
//!
//! Turns one participant's raw order text into a flat list of normalized
//! item labels, with quantities expanded by repetition. "2x burger" becomes
//! two `"burger"` labels, so the aggregator only ever counts occurrences.
//!
//! The grammar is deliberately small:
//! - quantity token: a digit run, optionally followed by a literal `x`
//! - label token: everything after the quantity up to the next digit run
//!   or newline (digit-delimited, so non-Latin scripts and punctuation
//!   inside labels work)
//! - fallback rule: if no quantity token appears anywhere, the whole
//!   trimmed input is a single label with implicit quantity 1
//!
//! Parsing never fails; the worst case is an under- or over-segmented
//! label list.

use std::sync::LazyLock;

use regex::Regex;

/// Upper bound on a single expanded quantity. Keeps a hostile
/// "999999999x rice" from ballooning the label list.
const MAX_QUANTITY: u32 = 1000;

static QUANTITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+)\s*(?:x\s*)?([^\d\n]+)").expect("quantity pattern is valid")
});

/// Parse free-text order input into normalized labels, quantity-expanded.
///
/// Labels are trimmed and lower-cased so aggregation is case-insensitive.
/// A quantity of 0 drops its label. Trailing text with no leading digit is
/// dropped when at least one quantity token matched elsewhere in the input;
/// the fallback only applies when nothing matched at all.
pub fn parse_order(raw: &str) -> Vec<String> {
    let mut items = Vec::new();
    let mut matched_any = false;

    for caps in QUANTITY_RE.captures_iter(raw) {
        matched_any = true;
        // Digit runs longer than u32 are clamped rather than rejected.
        let quantity = caps[1]
            .parse::<u32>()
            .unwrap_or(MAX_QUANTITY)
            .min(MAX_QUANTITY);
        let label = caps[2].trim().to_lowercase();
        if label.is_empty() {
            continue;
        }
        for _ in 0..quantity {
            items.push(label.clone());
        }
    }

    if !matched_any {
        let label = raw.trim().to_lowercase();
        if !label.is_empty() {
            items.push(label);
        }
    }

    items
}
