// Job feed: the static catalog merged with HR-posted jobs, plus swipes.

pub mod catalog;
pub mod handlers;

pub use catalog::JobCatalog;
