//! Audience targeting: the filter specification wire contract, the compiled
//! predicate it builds into, and persisted named audiences.

pub mod filter;
pub mod predicate;
pub mod store;

pub use filter::FilterSpec;
pub use predicate::Predicate;
pub use store::{Audience, AudienceStore};
