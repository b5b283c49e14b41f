use crate::hash::{fingerprint, gram_hash, table_index};
use crate::kmp::next_table;
use crate::preprocess::preprocess;
use crate::types::Params;

/// Linear worst-case scanner.
///
/// Combines the rightmost-match guard on the filtering walk with a KMP
/// verifier that persists across candidates: the `(verified_to,
/// pattern_pos)` cursor records how far the text has been matched against
/// the pattern, and a new candidate window either resumes from it or, when
/// the window starts beyond it, restarts it.  No text byte is ever matched
/// twice in either phase, which bounds the whole search to O(n) even on
/// single-symbol inputs.
///
/// The caller guarantees `x.len() >= params.gram_len`.
pub fn search_linear(x: &[u8], y: &[u8], params: &Params) -> usize {
    let m = x.len();
    let n = y.len();
    let q = params.gram_len;
    let s = params.chain_shift;
    let mask = params.table_mask();

    let (table, _) = preprocess(x, params);
    let next = next_table(x);
    let skip = m - q + 1;

    let mut count = 0;
    let mut pos = m - 1;
    let mut rightmost_match = 0;
    // KMP cursor: y[..verified_to] has been consumed, of which the last
    // `pattern_pos` bytes match a pattern prefix.
    let mut verified_to = 0usize;
    let mut pattern_pos = 0isize;
    'scan: while pos < n {
        let h = gram_hash(y, pos, q, s);
        let mut v = table[table_index(h, mask)];
        if v != 0 {
            let end_first = pos + q - m;
            let walk_limit = end_first.max(rightmost_match) + q;
            rightmost_match = pos;
            while pos >= walk_limit {
                pos -= q;
                let link = gram_hash(y, pos, q, s);
                if v & fingerprint(link) == 0 {
                    pos += skip;
                    continue 'scan;
                }
                v = table[table_index(link, mask)];
            }

            // The filter likes this window; hand it to the verifier.
            let window_start = end_first + 1 - q;
            if window_start > verified_to {
                verified_to = window_start;
                pattern_pos = 0;
            }

            // Keep verifying while the saved cursor still covers the
            // window, i.e. while an occurrence starting in it could extend
            // past verified_to.
            while pattern_pos >= (verified_to - window_start) as isize {
                while (pattern_pos as usize) < m
                    && verified_to < n
                    && x[pattern_pos as usize] == y[verified_to]
                {
                    pattern_pos += 1;
                    verified_to += 1;
                }
                if pattern_pos as usize == m {
                    count += 1;
                }
                pattern_pos = next[pattern_pos as usize] as isize;
                if pattern_pos < 0 {
                    pattern_pos += 1;
                    verified_to += 1;
                }
            }

            // Resume filtering at the first window the cursor no longer
            // covers.
            pos = verified_to + m - 1 - pattern_pos as usize;
            continue 'scan;
        }
        pos += skip;
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Params;

    #[test]
    fn overlapping_occurrences() {
        let p = Params::linear4();
        assert_eq!(search_linear(b"aaaa", b"aaaaaaa", &p), 4);
        assert_eq!(search_linear(b"abab", b"ababababab", &p), 4);
    }

    #[test]
    fn single_symbol_worst_case() {
        // The input that blows up superlinear scanners; the count must
        // still be exact.
        let p = Params::linear4();
        let x = vec![b'a'; 10];
        let y = vec![b'a'; 1000];
        assert_eq!(search_linear(&x, &y, &p), 991);
    }

    #[test]
    fn matches_straddling_verified_prefix() {
        // Occurrences whose windows overlap previously verified text must
        // be found by resuming, not restarting, the verifier.
        let p = Params::linear4();
        let x = b"abcabc";
        let y = b"abcabcabcabcxxabcabc";
        assert_eq!(search_linear(x, y, &p), 4);
    }

    #[test]
    fn no_match() {
        let p = Params::linear4();
        assert_eq!(search_linear(b"wxyz", b"the lazy dog sleeps", &p), 0);
    }
}
