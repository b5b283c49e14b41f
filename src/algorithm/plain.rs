use crate::hash::{fingerprint, gram_hash, table_index};
use crate::preprocess::preprocess;
use crate::types::Params;

/// Base scanner.
///
/// Probes the text every `m - Q + 1` bytes; an empty table slot rejects the
/// whole window in one load.  A non-empty slot starts a backward walk in
/// strides of Q, checking at each step that the fingerprint of the next
/// hash was chained to the previous one.  A walk that survives back to the
/// second q-gram is verified: the cumulative hash must equal the
/// full-pattern gate and the window must compare equal byte for byte.
///
/// The caller guarantees `x.len() >= params.gram_len`.
pub fn search_plain(x: &[u8], y: &[u8], params: &Params) -> usize {
    let m = x.len();
    let n = y.len();
    let q = params.gram_len;
    let s = params.chain_shift;
    let mask = params.table_mask();

    let (table, gate) = preprocess(x, params);
    let skip = m - q + 1;

    let mut count = 0;
    let mut pos = m - 1;
    'scan: while pos < n {
        let mut h = gram_hash(y, pos, q, s);
        let mut v = table[table_index(h, mask)];
        if v != 0 {
            // Walk the chain left until we are inside the second q-gram.
            let end_second = pos + 2 * q - m;
            while pos >= end_second {
                pos -= q;
                h = gram_hash(y, pos, q, s);
                if v & fingerprint(h) == 0 {
                    pos += skip;
                    continue 'scan;
                }
                v = table[table_index(h, mask)];
            }

            // Chained all the way back; gate on the full-pattern hash
            // before paying for the byte comparison.
            pos = end_second - q;
            let start = pos + 1 - q;
            if h == gate && y[start..start + m] == *x {
                count += 1;
            }
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
        let p = Params::gram2();
        assert_eq!(search_plain(b"ab", b"xababab", &p), 3);
        assert_eq!(search_plain(b"aaaa", b"aaaaaaa", &p), 4);
    }

    #[test]
    fn text_shorter_than_pattern() {
        let p = Params::gram2();
        assert_eq!(search_plain(b"needle", b"nee", &p), 0);
        assert_eq!(search_plain(b"ab", b"", &p), 0);
    }

    #[test]
    fn pattern_equals_text() {
        let p = Params::gram2();
        assert_eq!(search_plain(b"same bytes", b"same bytes", &p), 1);
        assert_eq!(search_plain(b"same bytes", b"same bytez", &p), 0);
    }

    #[test]
    fn minimum_pattern_length() {
        // m == Q: the walk is skipped and verification runs off the probe.
        let p = Params::gram6();
        assert_eq!(search_plain(b"abcdef", b"xxabcdefxxabcdef", &p), 2);
    }
}
