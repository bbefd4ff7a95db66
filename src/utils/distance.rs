//! Edit distance between identifiers

use std::cmp::min;

/// Levenshtein distance with unit cost insertions, deletions and substitutions
///
/// Fills a `(|b| + 1) x (|a| + 1)` table, so cost is O(|a| * |b|) in both
/// time and space. Operates on chars, not bytes.
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut table = vec![vec![0usize; a.len() + 1]; b.len() + 1];
    for (i, row) in table.iter_mut().enumerate() {
        row[0] = i;
    }
    for (j, cell) in table[0].iter_mut().enumerate() {
        *cell = j;
    }

    for i in 1..=b.len() {
        for j in 1..=a.len() {
            table[i][j] = if b[i - 1] == a[j - 1] {
                table[i - 1][j - 1]
            } else {
                1 + min(
                    table[i - 1][j - 1],
                    min(table[i][j - 1], table[i - 1][j]),
                )
            };
        }
    }

    table[b.len()][a.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_strings() {
        for s in ["", "1", "1234567890", "REF12345678"] {
            assert_eq!(edit_distance(s, s), 0);
        }
    }

    #[test]
    fn test_empty_side() {
        assert_eq!(edit_distance("", "12345"), 5);
        assert_eq!(edit_distance("123", ""), 3);
    }

    #[test]
    fn test_single_edits() {
        // substitution
        assert_eq!(edit_distance("1234567890", "1234567891"), 1);
        // deletion
        assert_eq!(edit_distance("1234567890", "123456789"), 1);
        // insertion
        assert_eq!(edit_distance("1234567890", "12345678900"), 1);
        // transposition costs two
        assert_eq!(edit_distance("1234567890", "2134567890"), 2);
    }

    #[test]
    fn test_classic_pairs() {
        assert_eq!(edit_distance("kitten", "sitting"), 3);
        assert_eq!(edit_distance("flaw", "lawn"), 2);
        assert_eq!(edit_distance("9999999999", "1234567890"), 9);
    }

    #[test]
    fn test_symmetric() {
        let samples = ["", "12", "1234567890", "123456789", "0987654321", "REF5678"];
        for a in samples {
            for b in samples {
                assert_eq!(edit_distance(a, b), edit_distance(b, a));
            }
        }
    }

    #[test]
    fn test_zero_only_for_equal() {
        assert_ne!(edit_distance("ab", "ba"), 0);
        assert_ne!(edit_distance("a", "A"), 0);
    }
}
