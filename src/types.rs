use std::fmt;

// ============================================================================
// Tuning parameters
//
// The fingerprint table has 1 << table_bits entries of 32 bits each.  Every
// hash is folded into the table with `& mask`, so the size must be a power
// of two; 32 entries is the floor at which the one-hot fingerprints still
// discriminate at all.
//
// Shifts:
//   chain_shift  - per-byte shift of the q-gram hash used on chain links
//   anchor_shift - per-byte shift of the probe hash (rolling scanners mix
//                  the table address space better with a wider first hash)
//   roll_shift   - shift applied to the running value on each rolling step;
//                  smaller values give longer usable chains
// ============================================================================

pub const MIN_TABLE_BITS: u32 = 5;
pub const MAX_TABLE_BITS: u32 = 26;
pub const MAX_GRAM_LEN: usize = 8;
pub const MAX_BYTE_SHIFT: u32 = 8;
pub const MAX_ROLL_SHIFT: u32 = 16;

// ============================================================================
// Scanner variants
// ============================================================================

/// Which scanner runs on top of the fingerprint table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Variant {
    /// Backward chain walk, single byte-compare verification.
    Plain,
    /// Chain links mix a rolling hash, widening the effective alphabet.
    Rolling,
    /// Verifies all Q alignments sharing the anchor q-gram at once.
    QVerify,
    /// Never re-walks text left of the rightmost successful probe.
    Weaker,
    /// Weaker guard plus a resumable KMP verifier; O(n) worst case.
    Linear,
}

impl Variant {
    pub const ALL: [Variant; 5] = [
        Variant::Plain,
        Variant::Rolling,
        Variant::QVerify,
        Variant::Weaker,
        Variant::Linear,
    ];

    /// The tuned parameter set for this variant.
    pub fn default_params(self) -> Params {
        match self {
            Variant::Plain => Params::gram2(),
            Variant::Rolling => Params::rolling3(),
            Variant::QVerify => Params::qverify4(),
            Variant::Weaker => Params::weaker3(),
            Variant::Linear => Params::linear4(),
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Variant::Plain => "plain",
            Variant::Rolling => "rolling",
            Variant::QVerify => "qverify",
            Variant::Weaker => "weaker",
            Variant::Linear => "linear",
        };
        f.write_str(name)
    }
}

// ============================================================================
// Parameter record
// ============================================================================

/// Tuning parameters for one search instance.
///
/// Shorter patterns tend to benefit from larger tables (they lean on empty
/// slots rejecting windows outright); longer patterns often do better with
/// smaller tables that stay cache-resident.
#[derive(Clone, Debug)]
pub struct Params {
    /// Bytes per q-gram.
    pub gram_len: usize,
    /// log2 of the fingerprint table size.
    pub table_bits: u32,
    /// Per-byte shift for chain-link hashes.
    pub chain_shift: u32,
    /// Per-byte shift for the probe (anchor) hash.
    pub anchor_shift: u32,
    /// Rolling-update shift; only the rolling scanner reads it.
    pub roll_shift: u32,
    /// Print preprocessing statistics to stderr.
    pub verbose: bool,
}

impl Params {
    /// A non-rolling parameter set. The probe hash and chain hash share one
    /// shift. Fails fast on out-of-range values.
    pub fn plain(gram_len: usize, table_bits: u32, chain_shift: u32) -> Result<Self, SearchError> {
        let params = Params {
            gram_len,
            table_bits,
            chain_shift,
            anchor_shift: chain_shift,
            roll_shift: 4,
            verbose: false,
        };
        params.validate()?;
        Ok(params)
    }

    /// A rolling parameter set with distinct anchor, roll, and chain shifts.
    pub fn rolling(
        gram_len: usize,
        table_bits: u32,
        anchor_shift: u32,
        roll_shift: u32,
        chain_shift: u32,
    ) -> Result<Self, SearchError> {
        let params = Params {
            gram_len,
            table_bits,
            chain_shift,
            anchor_shift,
            roll_shift,
            verbose: false,
        };
        params.validate()?;
        Ok(params)
    }

    // Tuned presets. Gram length 1 indexes the table with the raw byte, so
    // only 256 entries are ever addressable and table_bits is pinned to 8.

    pub fn gram2() -> Self {
        Params::plain(2, 11, 3).unwrap()
    }

    pub fn gram6() -> Self {
        Params::plain(6, 12, 2).unwrap()
    }

    pub fn byte_table() -> Self {
        Params::plain(1, 8, 1).unwrap()
    }

    pub fn rolling2() -> Self {
        Params::rolling(2, 11, 3, 4, 1).unwrap()
    }

    pub fn rolling3() -> Self {
        Params::rolling(3, 11, 3, 4, 1).unwrap()
    }

    pub fn rolling6() -> Self {
        Params::rolling(6, 12, 2, 4, 1).unwrap()
    }

    pub fn qverify4() -> Self {
        Params::plain(4, 12, 3).unwrap()
    }

    pub fn weaker3() -> Self {
        Params::plain(3, 11, 3).unwrap()
    }

    pub fn linear4() -> Self {
        Params::plain(4, 12, 3).unwrap()
    }

    /// Check every field is in its supported range.
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.gram_len < 1 || self.gram_len > MAX_GRAM_LEN {
            return Err(SearchError::InvalidGramLen(self.gram_len));
        }
        if self.table_bits < MIN_TABLE_BITS || self.table_bits > MAX_TABLE_BITS {
            return Err(SearchError::InvalidTableBits(self.table_bits));
        }
        if self.chain_shift < 1 || self.chain_shift > MAX_BYTE_SHIFT {
            return Err(SearchError::InvalidShift(self.chain_shift));
        }
        if self.anchor_shift < 1 || self.anchor_shift > MAX_BYTE_SHIFT {
            return Err(SearchError::InvalidShift(self.anchor_shift));
        }
        if self.roll_shift < 1 || self.roll_shift > MAX_ROLL_SHIFT {
            return Err(SearchError::InvalidRollShift(self.roll_shift));
        }
        Ok(())
    }

    /// Number of entries in the fingerprint table.
    #[inline]
    pub fn table_size(&self) -> usize {
        1 << self.table_bits
    }

    /// Mask folding a hash into the table.
    #[inline]
    pub fn table_mask(&self) -> u32 {
        (self.table_size() - 1) as u32
    }

    /// Rolling chains longer than this add no new table entries: after
    /// ceil(table_bits / roll_shift) steps the low table_bits of the running
    /// value no longer depend on the anchor, so chains from different
    /// anchors have converged.
    #[inline]
    pub(crate) fn chain_cap(&self) -> usize {
        let steps = self.table_bits.div_ceil(self.roll_shift) as usize;
        (steps + 1) * self.gram_len
    }
}

impl Default for Params {
    fn default() -> Self {
        Params::gram2()
    }
}

// ============================================================================
// Error type
// ============================================================================

#[derive(Debug)]
pub enum SearchError {
    /// The pattern is shorter than one q-gram; the caller should fall back
    /// to a different algorithm.
    PatternTooShort { len: usize, gram_len: usize },
    InvalidGramLen(usize),
    InvalidTableBits(u32),
    InvalidShift(u32),
    InvalidRollShift(u32),
    Io(std::io::Error),
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchError::PatternTooShort { len, gram_len } => write!(
                f,
                "pattern of {} bytes is shorter than the q-gram length {}",
                len, gram_len
            ),
            SearchError::InvalidGramLen(q) => {
                write!(f, "q-gram length {} not in 1..={}", q, MAX_GRAM_LEN)
            }
            SearchError::InvalidTableBits(bits) => write!(
                f,
                "table bits {} not in {}..={}",
                bits, MIN_TABLE_BITS, MAX_TABLE_BITS
            ),
            SearchError::InvalidShift(s) => {
                write!(f, "byte shift {} not in 1..={}", s, MAX_BYTE_SHIFT)
            }
            SearchError::InvalidRollShift(s) => {
                write!(f, "rolling shift {} not in 1..={}", s, MAX_ROLL_SHIFT)
            }
            SearchError::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for SearchError {}

impl From<std::io::Error> for SearchError {
    fn from(e: std::io::Error) -> Self {
        SearchError::Io(e)
    }
}
