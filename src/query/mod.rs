//! Query cache: keyed results with de-duplicated in-flight fetches, a
//! freshness window, explicit invalidation and fetch retries.

mod cache;
mod key;

pub use cache::{QueryCache, QuerySnapshot};
pub use key::{KeyParams, QueryKey};
