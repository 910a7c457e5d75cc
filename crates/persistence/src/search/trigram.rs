//! Trigram similarity.
//!
//! Mirrors PostgreSQL's `pg_trgm` `similarity()`: each word is lowercased and
//! padded with two leading blanks and one trailing blank, the set of
//! three-character windows is collected, and the score is the size of the
//! intersection over the size of the union. Used by the in-memory backend so
//! it matches what the relational store would return.

use std::collections::BTreeSet;

type Trigram = [char; 3];

/// Extracts the trigram set of a string.
pub fn trigrams(input: &str) -> BTreeSet<Trigram> {
    let mut set = BTreeSet::new();

    for word in input
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
    {
        let mut padded: Vec<char> = vec![' ', ' '];
        padded.extend(word.chars().flat_map(char::to_lowercase));
        padded.push(' ');

        for window in padded.windows(3) {
            set.insert([window[0], window[1], window[2]]);
        }
    }

    set
}

/// Returns the similarity of two strings in `[0, 1]`.
///
/// Two strings without any trigram score 0.
pub fn similarity(a: &str, b: &str) -> f32 {
    let left = trigrams(a);
    let right = trigrams(b);

    if left.is_empty() || right.is_empty() {
        return 0.0;
    }

    let shared = left.intersection(&right).count();
    let union = left.len() + right.len() - shared;

    shared as f32 / union as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_strings() {
        assert!((similarity("aspirin", "aspirin") - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_case_insensitive() {
        assert!((similarity("Aspirin", "ASPIRIN") - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_word_trigrams() {
        // "  cat " -> "  c", " ca", "cat", "at "
        let set = trigrams("cat");
        assert_eq!(set.len(), 4);
        assert!(set.contains(&[' ', ' ', 'c']));
        assert!(set.contains(&['a', 't', ' ']));
    }

    #[test]
    fn test_typo_tolerance() {
        let score = similarity("aspirin", "asprin");
        assert!(score > 0.3, "score was {score}");
    }

    #[test]
    fn test_unrelated_strings() {
        let score = similarity("aspirin", "metformine");
        assert!(score < 0.3, "score was {score}");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(similarity("", "aspirin"), 0.0);
        assert_eq!(similarity("--", "--"), 0.0);
    }

    #[test]
    fn test_multi_word_substring() {
        let score = similarity("Aspirin Forte", "aspirin");
        assert!(score > 0.3, "score was {score}");
    }
}
