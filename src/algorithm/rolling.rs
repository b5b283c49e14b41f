use crate::hash::{fingerprint, gram_hash, roll_step, table_index};
use crate::preprocess::preprocess_rolling;
use crate::types::Params;

/// Scanner with rolling chain links.
///
/// Identical control flow to the base scanner, but each backward step folds
/// the previous running value into the new link, so a chain check depends
/// on every q-gram walked so far rather than one q-gram at a time.  That
/// widens the effective alphabet and keeps the filter selective on
/// low-alphabet data, at the cost of a heavier preprocessing step.
///
/// The probe stays in bounds throughout; no sentinel bytes are required
/// past the end of the text.
///
/// The caller guarantees `x.len() >= params.gram_len`.
pub fn search_rolling(x: &[u8], y: &[u8], params: &Params) -> usize {
    let m = x.len();
    let n = y.len();
    let q = params.gram_len;
    let anchor_s = params.anchor_shift;
    let roll_s = params.roll_shift;
    let chain_s = params.chain_shift;
    let mask = params.table_mask();

    let (table, gate) = preprocess_rolling(x, params);
    let skip = m - q + 1;

    let mut count = 0;
    let mut pos = m - 1;
    'scan: while pos < n {
        let mut h = gram_hash(y, pos, q, anchor_s);
        let mut v = table[table_index(h, mask)];
        if v != 0 {
            let end_second = pos + 2 * q - m;
            while pos >= end_second {
                pos -= q;
                h = roll_step(h, y, pos, q, roll_s, chain_s);
                if v & fingerprint(h) == 0 {
                    pos += skip;
                    continue 'scan;
                }
                v = table[table_index(h, mask)];
            }

            // The walk is unbounded, unlike the capped table chains, so the
            // running value here reproduces the full-pattern gate exactly.
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
