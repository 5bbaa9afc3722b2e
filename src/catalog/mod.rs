//! Skin catalog: cached fetch chain and name search.

mod cache;
mod fetcher;

pub use cache::*;
pub use fetcher::*;
