//! dishrank storage - catalogue seam and the ranking cache
//!
//! [`RecipeCatalogue`] abstracts the document store. [`RankingCache`] sits on
//! top of it and serves today's ranking from a single in-memory snapshot.

pub mod cache;
pub mod catalogue;
pub mod loader;
pub mod memory;

pub use cache::{CacheStats, RankingCache, RankingRead};
pub use catalogue::RecipeCatalogue;
pub use loader::load_snapshot;
pub use memory::{CatalogueCalls, InMemoryCatalogue};
