//! Author name normalization and deduplication
//!
//! Raw names arrive as `"surname, givennames"`. Formatting intentionally
//! loses resolving power so that near-duplicate records of the same person
//! merge: a spaced-initial pair like `"J A"` collapses to `"JA"`, while a
//! full given name is kept, letting the fuller spelling win at dedup time.

use bioscout_common::models::AuthorName;
use std::collections::BTreeSet;

/// Reformat one raw author name.
///
/// The given-name part collapses to first-initial + last-character when its
/// second character is a space (an initial followed by more tokens), and is
/// kept verbatim otherwise. Names without a comma (collective authors) pass
/// through unchanged.
pub fn format_author(raw: &str) -> AuthorName {
    let Some((surname, given_raw)) = raw.split_once(',') else {
        return AuthorName::new(raw);
    };
    let given = given_raw.trim_start();

    let mut chars = given.chars();
    let formatted_given = match (chars.next(), chars.next()) {
        // "J A" / "J A B": spaced initials collapse to first + last char
        (Some(first), Some(' ')) => {
            let last = given.chars().last().unwrap_or(first);
            format!("{}{}", first, last)
        }
        // Full given name is kept so it can out-rank bare initials later
        (Some(_), Some(_)) => given.to_string(),
        (Some(first), None) => first.to_string(),
        (None, _) => String::new(),
    };

    AuthorName::new(format!("{}, {}", surname, formatted_given))
}

/// Exact-string dedup, reformat, lexicographic sort.
///
/// Formatting may leave two entries identical when distinct raw spellings
/// collapse to the same key; the adjacent merge cleans those up.
pub fn normalize_population<I>(raw_names: I) -> Vec<AuthorName>
where
    I: IntoIterator<Item = String>,
{
    let unique: BTreeSet<String> = raw_names.into_iter().collect();
    let mut formatted: Vec<AuthorName> = unique.iter().map(|raw| format_author(raw)).collect();
    formatted.sort();
    formatted
}

/// Single left-to-right merge over a sorted list.
///
/// Adjacent entries sharing a surname and given-name initial collapse into
/// one, the later entry winning (fuller names sort after bare initials for
/// the same prefix). Non-adjacent near-duplicates survive; the linear scan
/// never compares across surname groups.
pub fn dedupe_adjacent(sorted: Vec<AuthorName>) -> Vec<AuthorName> {
    let mut out: Vec<AuthorName> = Vec::with_capacity(sorted.len());
    for name in sorted {
        match out.last_mut() {
            Some(prev)
                if prev.surname() == name.surname()
                    && prev.given_initial() == name.given_initial() =>
            {
                *prev = name;
            }
            _ => out.push(name),
        }
    }
    out
}

/// Full normalization path: raw multiset to the fixed candidate population.
pub fn candidate_population<I>(raw_names: I) -> Vec<AuthorName>
where
    I: IntoIterator<Item = String>,
{
    dedupe_adjacent(normalize_population(raw_names))
}
