//! Random hyperparameter search.
mod base;
mod config;
mod state;
pub use base::RandomSearch;
pub use config::RandomSearchConfig;
pub use state::{RandomSearchState, SearchArea};
