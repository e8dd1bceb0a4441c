//! Statistics of worker threads.
mod stat;
pub use stat::{worker_stats_fmt, WorkerStat};
