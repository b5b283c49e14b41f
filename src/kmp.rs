//! Knuth-Morris-Pratt next-function table for the linear verifier.
//!
//! Zero-indexed form of the table from "Fast Pattern Matching in Strings"
//! (Knuth, Morris and Pratt, 1977), with two adjustments:
//!
//! 1. Entries where the border character equals the mismatching character
//!    are collapsed through (`next[i] = next[j]`), the usual optimisation.
//! 2. The table has an extra entry at position `m` so the verifier can
//!    continue scanning for overlapping matches after a full match.
//!
//! `-1` is the "advance both cursors" sentinel, so entries are `i32`.

/// Build the next-function table of length `m + 1` for `x`.
pub fn next_table(x: &[u8]) -> Vec<i32> {
    let m = x.len();
    let mut next = vec![0i32; m + 1];
    next[0] = -1;
    let mut i = 0usize;
    let mut j: i32 = -1;
    while i < m {
        while j > -1 && x[i] != x[j as usize] {
            j = next[j as usize];
        }
        i += 1;
        j += 1;
        if i < m && x[i] == x[j as usize] {
            next[i] = next[j as usize];
        } else {
            next[i] = j;
        }
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_sentinel() {
        assert_eq!(next_table(b"abc")[0], -1);
        assert_eq!(next_table(b"")[0], -1);
    }

    #[test]
    fn table_length_is_m_plus_one() {
        assert_eq!(next_table(b"abcabd").len(), 7);
    }

    #[test]
    fn periodic_pattern() {
        // "aaaa": every prefix borders the one before it, so the optimised
        // entries all collapse to -1 and only the final entry keeps the
        // border length.
        assert_eq!(next_table(b"aaaa"), vec![-1, -1, -1, -1, 3]);
    }

    #[test]
    fn alternating_pattern() {
        assert_eq!(next_table(b"abab"), vec![-1, 0, -1, 0, 2]);
    }

    #[test]
    fn entries_are_borders_with_skip() {
        // Every non-negative entry names a border of the prefix before it,
        // and (except at m, where no mismatch character exists) a border
        // whose next character differs from the mismatch position.
        for x in [
            b"abcabcab".as_slice(),
            b"aabaabaa",
            b"abacabad",
            b"hello world hello",
            b"zzzzzzzz",
        ] {
            let next = next_table(x);
            let m = x.len();
            for j in 1..=m {
                let k = next[j];
                assert!(k < j as i32, "next[{}] = {} for {:?}", j, k, x);
                if k >= 0 {
                    let k = k as usize;
                    assert_eq!(
                        &x[..k],
                        &x[j - k..j],
                        "next[{}] is not a border for {:?}",
                        j,
                        x
                    );
                    if j < m {
                        assert_ne!(x[k], x[j], "skip optimisation missed at {} for {:?}", j, x);
                    }
                }
            }
        }
    }
}
