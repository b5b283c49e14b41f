pub mod algorithm;
pub mod hash;
pub mod kmp;
pub mod preprocess;
pub mod types;

// Re-exports for convenience
pub use algorithm::linear::search_linear;
pub use algorithm::plain::search_plain;
pub use algorithm::qverify::search_qverify;
pub use algorithm::rolling::search_rolling;
pub use algorithm::weaker::search_weaker;
pub use algorithm::{naive_count, search, search_default};
pub use hash::{fingerprint, gram_hash, roll_step, table_index};
pub use kmp::next_table;
pub use preprocess::{preprocess, preprocess_rolling};
pub use types::{
    Params, SearchError, Variant, MAX_BYTE_SHIFT, MAX_GRAM_LEN, MAX_ROLL_SHIFT, MAX_TABLE_BITS,
    MIN_TABLE_BITS,
};
