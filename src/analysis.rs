//! Text analytics computed for every recorded article.
//!
//! Both functions are pure: they look only at the strings they are given.

use once_cell::sync::Lazy;
use regex::Regex;

/// A dollar amount (`$12`, `$12.50`), the token `USD`, or `<digits> dollars`.
static MONEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\d+(\.\d{1,2})?|USD|\d+ dollars").expect("valid money regex"));

/// Count case-insensitive, non-overlapping occurrences of `phrase` in the
/// title and the description, and return the sum.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(count_occurrences("Fed raises rates", "the Fed Fed", "fed"), 3);
/// ```
pub fn count_occurrences(title: &str, description: &str, phrase: &str) -> usize {
    if phrase.is_empty() {
        return 0;
    }
    let needle = phrase.to_lowercase();
    count_in(title, &needle) + count_in(description, &needle)
}

fn count_in(haystack: &str, needle: &str) -> usize {
    haystack.to_lowercase().matches(needle).count()
}

/// True when `text` mentions an amount of money.
///
/// The literal tokens are matched case-sensitively, so `usd` or `Dollars`
/// after a number do not count.
pub fn contains_money(text: &str) -> bool {
    MONEY_RE.is_match(text)
}

/// Money check over the two list-visible fields of an article.
pub fn mentions_money(title: &str, description: &str) -> bool {
    contains_money(title) || contains_money(description)
}
