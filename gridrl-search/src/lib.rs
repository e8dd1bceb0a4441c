//! Concurrent hyperparameter search and sensitivity reports.
//!
//! Both orchestrators fan [`ParameterEvaluator`](gridrl_core::ParameterEvaluator)
//! calls out to worker threads. Each worker builds its own dynamics and agents,
//! nothing but the published state and the stop flags is shared.
//!
//! * [`RandomSearch`] keeps the best reward and hyperparameters found so far
//!   for every [`SearchTarget`](gridrl_core::SearchTarget). Workers send
//!   [`SearchMessage`]s over a channel to a single aggregator thread that
//!   publishes a new [`RandomSearchState`] snapshot per message.
//! * [`ReportGenerator`] sweeps one hyperparameter over its range and reduces
//!   the rewards at each sample point to a bootstrap confidence interval.
//!
//! Snapshots are immutable and replaced whole under a mutex that is never held
//! across a simulation run. Stopping is cooperative: workers poll a shared
//! flag between evaluation runs.
mod messages;
mod random_search;
mod report;
mod util;
mod worker;
pub use messages::SearchMessage;
pub use random_search::{RandomSearch, RandomSearchConfig, RandomSearchState, SearchArea};
pub use report::{
    bootstrap, ConfidenceInterval, Report, ReportGenerator, ReportGeneratorConfig, ReportPoint,
    ReportState,
};
pub use worker::{worker_stats_fmt, WorkerStat};
