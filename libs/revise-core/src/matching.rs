//! Fuzzy keyword matching for short-answer grading.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Normalize text for comparison.
///
/// Lowercases, strips diacritics, drops everything outside `[a-z0-9]` and
/// whitespace, then collapses and trims whitespace.
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
        .nfd()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace())
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Form used by the matcher.
///
/// Same as [`normalize`] for Latin text, but letters and digits of other
/// scripts are kept instead of dropped. Every string goes through the same
/// rule, so input and keyword always end up comparable.
pub fn comparable(text: &str) -> String {
    text.to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Edit distance between two strings, counted in chars.
///
/// Insertion, deletion, substitution and transposition of two adjacent
/// characters each cost 1.
pub fn edit_distance(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }

    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    let m = a_chars.len();
    let n = b_chars.len();

    if m == 0 {
        return n;
    }
    if n == 0 {
        return m;
    }

    // Three rolling rows; the oldest one is only read for transpositions.
    let mut before = vec![0; n + 1];
    let mut prev = (0..=n).collect::<Vec<_>>();
    let mut curr = vec![0; n + 1];

    for i in 1..=m {
        curr[0] = i;

        for j in 1..=n {
            let cost = usize::from(a_chars[i - 1] != b_chars[j - 1]);

            let mut best = (prev[j] + 1) // deletion
                .min(curr[j - 1] + 1) // insertion
                .min(prev[j - 1] + cost); // substitution

            if i > 1
                && j > 1
                && a_chars[i - 1] == b_chars[j - 2]
                && a_chars[i - 2] == b_chars[j - 1]
            {
                best = best.min(before[j - 2] + 1);
            }

            curr[j] = best;
        }

        std::mem::swap(&mut before, &mut prev);
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[n]
}

/// Similarity (0.0 to 1.0) based on [`edit_distance`].
pub fn similarity(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }

    let distance = edit_distance(a, b);
    1.0 - (distance as f64 / max_len as f64)
}

/// Whether `input` contains something close enough to `keyword`.
///
/// After normalization an exact substring always matches. Otherwise a
/// multi-word keyword is compared against every run of as many input words,
/// and the whole keyword is compared against each single input word.
pub fn keyword_matches(input: &str, keyword: &str, threshold: f64) -> bool {
    let keyword = comparable(keyword);
    if keyword.is_empty() {
        return true;
    }

    let input = comparable(input);
    if input.is_empty() {
        return false;
    }
    if input.contains(&keyword) {
        return true;
    }

    let input_words: Vec<&str> = input.split(' ').collect();
    let keyword_len = keyword.split(' ').count();

    if keyword_len > 1
        && input_words
            .windows(keyword_len)
            .any(|window| similarity(&window.join(" "), &keyword) >= threshold)
    {
        return true;
    }

    input_words
        .iter()
        .any(|word| similarity(word, &keyword) >= threshold)
}
