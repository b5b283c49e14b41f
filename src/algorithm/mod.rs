pub mod linear;
pub mod plain;
pub mod qverify;
pub mod rolling;
pub mod weaker;

use crate::types::{Params, SearchError, Variant};

/// Count occurrences of `x` in `y` with the chosen scanner variant.
///
/// Validates the parameters and the pattern length up front, then runs
/// preprocessing and the scan to completion.  A text shorter than the
/// pattern simply counts zero.
pub fn search(
    variant: Variant,
    x: &[u8],
    y: &[u8],
    params: &Params,
) -> Result<usize, SearchError> {
    params.validate()?;
    if x.len() < params.gram_len {
        return Err(SearchError::PatternTooShort {
            len: x.len(),
            gram_len: params.gram_len,
        });
    }
    Ok(match variant {
        Variant::Plain => plain::search_plain(x, y, params),
        Variant::Rolling => rolling::search_rolling(x, y, params),
        Variant::QVerify => qverify::search_qverify(x, y, params),
        Variant::Weaker => weaker::search_weaker(x, y, params),
        Variant::Linear => linear::search_linear(x, y, params),
    })
}

/// Dispatch with the variant's tuned parameters.
pub fn search_default(variant: Variant, x: &[u8], y: &[u8]) -> Result<usize, SearchError> {
    search(variant, x, y, &variant.default_params())
}

/// Byte-wise reference scan.  The oracle the filtered scanners are checked
/// against; also what `m == n` and empty-input cases are defined by.
pub fn naive_count(x: &[u8], y: &[u8]) -> usize {
    if x.is_empty() || y.len() < x.len() {
        return 0;
    }
    y.windows(x.len()).filter(|w| *w == x).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn naive_counts_overlaps() {
        assert_eq!(naive_count(b"ab", b"xababab"), 3);
        assert_eq!(naive_count(b"aa", b"aaaa"), 3);
        assert_eq!(naive_count(b"", b"abc"), 0);
        assert_eq!(naive_count(b"abc", b"ab"), 0);
    }

    #[test]
    fn short_pattern_is_an_error() {
        let params = Params::gram2();
        let err = search(Variant::Plain, b"a", b"banana", &params).unwrap_err();
        assert!(matches!(
            err,
            SearchError::PatternTooShort { len: 1, gram_len: 2 }
        ));
    }

    #[test]
    fn invalid_params_fail_before_scanning() {
        let mut params = Params::gram2();
        params.table_bits = 2;
        assert!(matches!(
            search(Variant::Plain, b"ab", b"abab", &params),
            Err(SearchError::InvalidTableBits(2))
        ));
    }

    #[test]
    fn all_variants_agree_on_smoke_input() {
        let x = b"abcdab";
        let y = b"abcdabcdabxxabcdab";
        for variant in Variant::ALL {
            assert_eq!(
                search_default(variant, x, y).unwrap(),
                naive_count(x, y),
                "variant {}",
                variant
            );
        }
    }
}
