//! Fingerprint-table construction.
//!
//! The table encodes the pattern's q-gram chains: the slot keyed by a
//! q-gram's hash holds the one-hot fingerprints of every q-gram that
//! precedes it (one stride of Q to the left) somewhere in the pattern.  A
//! scanner can then check "does the next chain hash plausibly follow?"
//! against the value it already loaded, without a second table lookup.
//!
//! Two builders share the skeleton (zero, chain construction, leading-gram
//! fill): [`preprocess`] links plain q-gram hashes, [`preprocess_rolling`]
//! mixes a rolling hash into each link so low-alphabet data still spreads
//! over the table.  Both return the table and the full-pattern hash used to
//! gate verification.

use crate::hash::{fingerprint, gram_hash, roll_step, table_index};
use crate::types::Params;

/// Build the fingerprint table for `x` with plain chain links.
///
/// Pure function of the pattern: same input, bit-identical output.  The
/// caller guarantees `x.len() >= params.gram_len`.
pub fn preprocess(x: &[u8], params: &Params) -> (Vec<u32>, u32) {
    let m = x.len();
    let q = params.gram_len;
    let s = params.chain_shift;
    let mask = params.table_mask();
    debug_assert!(m >= q);

    let mut table = vec![0u32; params.table_size()];

    // 1. Q independent chains, one per alignment of the final q-gram,
    //    walked right to left in strides of Q.  For m < 2Q only
    //    m - (Q - 1) chain heads fit inside the pattern.
    let chains = if m < 2 * q { m - (q - 1) } else { q };
    let mut h = 0u32;
    for chain_no in (1..=chains).rev() {
        let mut pos = m - chain_no;
        h = gram_hash(x, pos, q, s);
        while pos >= 2 * q - 1 {
            pos -= q;
            let h_last = h;
            h = gram_hash(x, pos, q, s);
            table[table_index(h_last, mask)] |= fingerprint(h);
        }
    }
    // The final chain ends at the leftmost stride-aligned q-gram, so its
    // last hash doubles as the full-pattern gate.
    let hm = h;

    fill_leading_grams(&mut table, x, q, s, mask);

    if params.verbose {
        report_occupancy("plain", &table);
    }
    (table, hm)
}

/// Build the fingerprint table for `x` with rolling chain links.
///
/// Every position from the second q-gram onward anchors its own chain; each
/// chain is cut off at [`Params::chain_cap`] links, past which the rolling
/// values have converged and add nothing new.  The full-pattern hash cannot
/// be taken from a capped chain, so it is recomputed with one unbounded
/// walk from the end of the pattern.
pub fn preprocess_rolling(x: &[u8], params: &Params) -> (Vec<u32>, u32) {
    let m = x.len();
    let q = params.gram_len;
    let anchor_s = params.anchor_shift;
    let roll_s = params.roll_shift;
    let chain_s = params.chain_shift;
    let mask = params.table_mask();
    debug_assert!(m >= q);

    let mut table = vec![0u32; params.table_size()];
    let cap = params.chain_cap();

    // 1. One bounded chain per anchor position.
    for anchor in (2 * q - 1)..m {
        let mut h = gram_hash(x, anchor, q, anchor_s);
        let start_chain = anchor - q;
        let stop_chain = (q - 1).max(start_chain.saturating_sub(cap));
        let mut pos = start_chain;
        loop {
            let h_last = h;
            h = roll_step(h, x, pos, q, roll_s, chain_s);
            table[table_index(h_last, mask)] |= fingerprint(h);
            match pos.checked_sub(q) {
                Some(next) if next >= stop_chain => pos = next,
                _ => break,
            }
        }
    }

    fill_leading_grams(&mut table, x, q, anchor_s, mask);

    // 2. Full-pattern hash: the unbounded walk the scanner reproduces when
    //    a window chains all the way back.
    let mut hm = gram_hash(x, m - 1, q, anchor_s);
    let mut pos = m - 1;
    while pos >= 2 * q - 1 {
        pos -= q;
        hm = roll_step(hm, x, pos, q, roll_s, chain_s);
    }

    if params.verbose {
        report_occupancy("rolling", &table);
    }
    (table, hm)
}

/// Mark the first Q q-grams, which have no predecessor to chain from.  The
/// slot only needs to be non-zero for the scanner to keep walking, but must
/// not hold the gram's own fingerprint or the entry would assert the gram
/// follows itself; the inverted hash satisfies both.
fn fill_leading_grams(table: &mut [u32], x: &[u8], q: usize, shift: u32, mask: u32) {
    let stop = x.len().min(2 * q - 1);
    for pos in (q - 1)..stop {
        let f = gram_hash(x, pos, q, shift);
        let idx = table_index(f, mask);
        if table[idx] == 0 {
            table[idx] = fingerprint(!f);
        }
    }
}

fn report_occupancy(kind: &str, table: &[u32]) {
    let slots_used = table.iter().filter(|&&v| v != 0).count();
    let bits_set: u32 = table.iter().map(|v| v.count_ones()).sum();
    eprintln!(
        "preprocess ({}): {} slots, {} used ({:.1}%), {} fingerprint bits",
        kind,
        table.len(),
        slots_used,
        slots_used as f64 / table.len() as f64 * 100.0,
        bits_set
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Params;

    #[test]
    fn idempotent() {
        let x = b"abracadabra";
        let p = Params::gram2();
        assert_eq!(preprocess(x, &p), preprocess(x, &p));
        let p = Params::rolling3();
        assert_eq!(preprocess_rolling(x, &p), preprocess_rolling(x, &p));
    }

    #[test]
    fn plain_links_every_adjacent_pair() {
        let x = b"the quick brown fox jumps";
        for p in [Params::gram2(), Params::weaker3(), Params::qverify4()] {
            let q = p.gram_len;
            let s = p.chain_shift;
            let mask = p.table_mask();
            let (table, _) = preprocess(x, &p);
            for pos in (q - 1)..(x.len() - q) {
                let right = gram_hash(x, pos + q, q, s);
                let left = gram_hash(x, pos, q, s);
                assert_ne!(
                    table[table_index(right, mask)] & fingerprint(left),
                    0,
                    "missing link {} -> {} for q={}",
                    pos + q,
                    pos,
                    q
                );
            }
        }
    }

    #[test]
    fn plain_gate_is_last_chain_hash() {
        let x = b"abcdefgh";
        let p = Params::gram2();
        let (_, hm) = preprocess(x, &p);
        // Final chain: positions 7, 5, 3, 1; the gate is the hash at 1.
        assert_eq!(hm, gram_hash(x, 1, 2, p.chain_shift));
    }

    #[test]
    fn leading_grams_never_self_link() {
        // With m == Q only the fill writes, so the slot value is exactly
        // the inverted-hash fingerprint.
        let p = Params::qverify4();
        let x = b"wxyz";
        let (table, _) = preprocess(x, &p);
        let f = gram_hash(x, 3, 4, p.chain_shift);
        let slot = table[table_index(f, p.table_mask())];
        assert_ne!(slot, 0);
        assert_eq!(slot, fingerprint(!f));
        assert_ne!(slot, fingerprint(f));
    }

    #[test]
    fn rolling_links_first_step_from_anchor() {
        let x = b"mississippi river";
        let p = Params::rolling3();
        let q = p.gram_len;
        let (table, _) = preprocess_rolling(x, &p);
        for anchor in (2 * q - 1)..x.len() {
            let h = gram_hash(x, anchor, q, p.anchor_shift);
            let linked = roll_step(h, x, anchor - q, q, p.roll_shift, p.chain_shift);
            assert_ne!(
                table[table_index(h, p.table_mask())] & fingerprint(linked),
                0,
                "anchor {} missing first link",
                anchor
            );
        }
    }

    #[test]
    fn rolling_gate_matches_manual_walk() {
        let x = b"abcdefghijk";
        let p = Params::rolling3();
        let (_, hm) = preprocess_rolling(x, &p);
        let mut h = gram_hash(x, 10, 3, p.anchor_shift);
        let mut pos = 10;
        while pos >= 5 {
            pos -= 3;
            h = roll_step(h, x, pos, 3, p.roll_shift, p.chain_shift);
        }
        assert_eq!(hm, h);
    }

    #[test]
    fn short_pattern_fill_only() {
        // m < 2Q: chain heads are bounded to the ones that fit; every
        // leading gram still gets a non-zero slot.
        let p = Params::gram6();
        let x = b"abcdefgh"; // m = 8, Q = 6
        let (table, _) = preprocess(x, &p);
        for pos in 5..8 {
            let f = gram_hash(x, pos, 6, p.chain_shift);
            assert_ne!(table[table_index(f, p.table_mask())], 0);
        }
    }
}
