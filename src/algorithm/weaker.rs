use crate::hash::{fingerprint, gram_hash, table_index};
use crate::preprocess::preprocess;
use crate::types::Params;

/// Rightmost-match-guard scanner.
///
/// Remembers the rightmost probe whose chain walk succeeded and never walks
/// back across it again: those bytes already chained correctly once, and
/// re-checking them is the redundant work that makes the base scanner
/// superlinear on repetitive data.  The trade-off is a weaker filter: a
/// truncated walk proves less, so there is no cumulative hash to gate on
/// and verification is a straight byte comparison of the window.
///
/// The caller guarantees `x.len() >= params.gram_len`.
pub fn search_weaker(x: &[u8], y: &[u8], params: &Params) -> usize {
    let m = x.len();
    let n = y.len();
    let q = params.gram_len;
    let s = params.chain_shift;
    let mask = params.table_mask();

    let (table, _) = preprocess(x, params);
    let skip = m - q + 1;

    let mut count = 0;
    let mut pos = m - 1;
    let mut rightmost_match = 0;
    'scan: while pos < n {
        let h = gram_hash(y, pos, q, s);
        let mut v = table[table_index(h, mask)];
        if v != 0 {
            // Stop the walk at the window's first q-gram or at the last
            // successful probe, whichever is nearer.
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

            pos = end_first;
            let start = pos + 1 - q;
            if y[start..start + m] == *x {
                count += 1;
            }
        }
        pos += skip;
    }
    count
}
