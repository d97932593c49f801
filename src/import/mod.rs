mod dedup;

pub use dedup::{dedup, is_new, Deduplicated};
