use super::ConfidenceInterval;
use gridrl_core::{HyperParameter, SearchTarget};
use std::{collections::BTreeMap, sync::Arc};

/// Rewards at one value of the swept parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportPoint {
    /// Value of the parameter.
    pub value: f64,

    /// Interval of the mean reward.
    pub interval: ConfidenceInterval,
}

/// Sensitivity of a target's reward to one hyperparameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    /// Swept parameter.
    pub parameter: HyperParameter,

    /// Target the rewards were measured on.
    pub target: SearchTarget,

    /// Points in increasing parameter value.
    pub points: Vec<ReportPoint>,
}

/// Snapshot of a [`ReportGenerator`](crate::ReportGenerator).
///
/// A parameter is either pending, with a progress in `[0, 1)`, available, or
/// neither.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportState {
    pending: BTreeMap<HyperParameter, f64>,
    available: BTreeMap<HyperParameter, Arc<Report>>,
}

/// Progress shown for pending reports never reaches this value.
pub(crate) const MAX_PENDING_PROGRESS: f64 = 0.99;

impl ReportState {
    /// Returns the state with `parameter` pending at zero progress.
    pub fn with_pending(&self, parameter: HyperParameter) -> Self {
        let mut next = self.clone();
        next.available.remove(&parameter);
        next.pending.insert(parameter, 0.0);
        next
    }

    /// Returns the state with the progress of a pending report updated.
    ///
    /// Progress never decreases, is capped below 1 and is ignored for reports
    /// that are not pending.
    pub fn with_progress(&self, parameter: HyperParameter, progress: f64) -> Self {
        let mut next = self.clone();
        if let Some(p) = next.pending.get_mut(&parameter) {
            *p = p.max(progress.clamp(0.0, MAX_PENDING_PROGRESS));
        }
        next
    }

    /// Returns the state with `report` available and no longer pending.
    pub fn with_report(&self, report: Report) -> Self {
        let mut next = self.clone();
        next.pending.remove(&report.parameter);
        next.available.insert(report.parameter, Arc::new(report));
        next
    }

    /// Returns the state with `parameter` no longer pending.
    pub fn without(&self, parameter: HyperParameter) -> Self {
        let mut next = self.clone();
        next.pending.remove(&parameter);
        next
    }

    /// Returns the state without any pending report.
    pub fn without_pending(&self) -> Self {
        Self {
            pending: BTreeMap::new(),
            available: self.available.clone(),
        }
    }

    /// Returns `true` if a report of `parameter` is being generated.
    pub fn is_pending(&self, parameter: HyperParameter) -> bool {
        self.pending.contains_key(&parameter)
    }

    /// Returns `true` if a report of `parameter` is finished.
    pub fn is_available(&self, parameter: HyperParameter) -> bool {
        self.available.contains_key(&parameter)
    }

    /// Progress of a pending report.
    pub fn progress(&self, parameter: HyperParameter) -> Option<f64> {
        self.pending.get(&parameter).copied()
    }

    /// Finished report of `parameter`.
    pub fn report(&self, parameter: HyperParameter) -> Option<&Arc<Report>> {
        self.available.get(&parameter)
    }

    /// Pending parameters with their progress.
    pub fn pending(&self) -> impl Iterator<Item = (HyperParameter, f64)> + '_ {
        self.pending.iter().map(|(&p, &v)| (p, v))
    }

    /// Finished reports.
    pub fn available(&self) -> impl Iterator<Item = &Arc<Report>> {
        self.available.values()
    }
}
