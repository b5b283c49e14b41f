use crate::hash::{fingerprint, gram_hash, table_index};
use crate::preprocess::preprocess;
use crate::types::Params;

/// Batch-verify scanner.
///
/// A chain that survives the backward walk says only that the anchor
/// q-gram's chain occurs in the pattern; any of the Q alignments placing
/// that chain inside the window could be the real occurrence.  Instead of
/// gating on the full-pattern hash and checking one alignment, this scanner
/// byte-compares all Q of them and then steps past the batch, saving the
/// filter passes the base scanner would spend rediscovering the same chain.
///
/// The caller guarantees `x.len() >= params.gram_len`.
pub fn search_qverify(x: &[u8], y: &[u8], params: &Params) -> usize {
    let m = x.len();
    let n = y.len();
    let q = params.gram_len;
    let s = params.chain_shift;
    let mask = params.table_mask();

    let (table, _) = preprocess(x, params);
    let skip = m - q + 1;

    let mut count = 0;
    let mut pos = m - 1;
    'scan: while pos < n {
        let h = gram_hash(y, pos, q, s);
        let mut v = table[table_index(h, mask)];
        if v != 0 {
            let end_second = pos + 2 * q - m;
            while pos >= end_second {
                pos -= q;
                let link = gram_hash(y, pos, q, s);
                if v & fingerprint(link) == 0 {
                    pos += skip;
                    continue 'scan;
                }
                v = table[table_index(link, mask)];
            }

            // Verify every alignment that shares the anchor chain.
            let last = end_second - q;
            for start in (last + 1 - q)..=last {
                if start <= n - m && y[start..start + m] == *x {
                    count += 1;
                }
            }
            pos = end_second - 1;
        }
        pos += skip;
    }
    count
}
