use std::time::Duration;

/// Stats of one search or report worker.
#[derive(Clone, Debug, PartialEq)]
pub struct WorkerStat {
    /// Worker id.
    pub id: usize,

    /// The number of completed evaluations.
    pub evaluations: usize,

    /// Lifetime of the worker.
    pub duration: Duration,
}

/// Returns a formatted string of the set of [`WorkerStat`] for reporting.
pub fn worker_stats_fmt(stats: &[WorkerStat]) -> String {
    let mut s = "worker id, evaluations, duration [sec], evaluations per sec\n".to_string();
    for stat in stats.iter() {
        let n = stat.evaluations;
        let d = stat.duration.as_secs_f64();
        let p = if d > 0.0 { n as f64 / d } else { 0.0 };
        s += format!("{}, {}, {:.3}, {:.3}\n", stat.id, n, d, p).as_str();
    }
    s
}
