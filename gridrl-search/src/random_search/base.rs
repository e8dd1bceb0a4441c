use super::{RandomSearchConfig, RandomSearchState};
use crate::{
    util::{is_set, lock, replace, set},
    worker_stats_fmt, SearchMessage, WorkerStat,
};
use anyhow::{Context, Result};
use crossbeam_channel::{unbounded, Receiver, Sender};
use gridrl_core::{
    ConfigHyperParameters, DynamicsOption, Evaluator, LearningInstance, ParameterEvaluator,
    RandomHyperParameters, SearchTarget,
};
use log::{debug, info, warn};
use std::{
    collections::BTreeSet,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
    thread::JoinHandle,
    time::Instant,
};

/// Searches hyperparameters of several targets at random.
///
/// Idle until [`RandomSearch::start_search`] spawns the workers. Each worker
/// draws a target and fresh random hyperparameters, evaluates them and sends
/// the result to the aggregator, until [`RandomSearch::stop_search`] clears
/// the shared flag. A separate worker evaluates value iteration on each grid
/// world of the targets, giving the reward of the optimal policy.
pub struct RandomSearch {
    config: RandomSearchConfig,

    /// Evaluator cloned into each worker.
    evaluator: ParameterEvaluator,

    /// Latest published snapshot.
    state: Arc<Mutex<Arc<RandomSearchState>>>,

    /// Flag to keep workers running.
    searching: Arc<Mutex<bool>>,

    /// Thread handles of the workers and the aggregator.
    threads: Vec<JoinHandle<()>>,

    /// Stats of the workers, shared with worker threads.
    worker_stats: Vec<Arc<Mutex<Option<WorkerStat>>>>,

    /// Number of searches started so far, mixed into the seeds.
    generation: u64,

    /// Workers still looping. The last one to exit clears the searching flag.
    active_workers: Arc<AtomicUsize>,
}

impl RandomSearch {
    /// Builds an idle search.
    ///
    /// Fails if the dynamics or the agent of a target cannot be built from the
    /// configuration of `evaluator`.
    pub fn build(config: RandomSearchConfig, evaluator: ParameterEvaluator) -> Result<Self> {
        for target in config.targets.iter() {
            let mut hyper_parameters = ConfigHyperParameters::from_config(&evaluator.config().agent);
            LearningInstance::build(target, &mut hyper_parameters, evaluator.config(), config.seed)
                .with_context(|| format!("Invalid search target {}", target))?;
        }
        let state = Arc::new(Mutex::new(Arc::new(RandomSearchState::new(&config.targets))));
        Ok(Self {
            config,
            evaluator,
            state,
            searching: Arc::new(Mutex::new(false)),
            threads: vec![],
            worker_stats: vec![],
            generation: 0,
            active_workers: Arc::new(AtomicUsize::new(0)),
        })
    }

    /// Returns `true` between [`RandomSearch::start_search`] and [`RandomSearch::stop_search`].
    pub fn is_searching(&self) -> bool {
        is_set(&self.searching)
    }

    /// The latest snapshot.
    pub fn get_progress(&self) -> Arc<RandomSearchState> {
        lock(&self.state).clone()
    }

    /// Spawns the workers. Does nothing if already searching.
    ///
    /// Results of a previous search are kept and extended.
    pub fn start_search(&mut self) {
        if self.is_searching() {
            return;
        }
        self.join();
        set(&self.searching, true);
        self.generation += 1;
        info!(
            "Start random search with {} workers over {} targets",
            self.config.n_workers,
            self.config.targets.len()
        );

        let (sender, receiver) = unbounded();

        // Thread for the optimal rewards
        {
            let dynamics: BTreeSet<_> = self.config.targets.iter().map(|t| t.dynamics).collect();
            let evaluator = self.evaluator.clone();
            let searching = self.searching.clone();
            let sender = sender.clone();
            let seed = self.seed(usize::MAX);
            let handle = std::thread::spawn(move || {
                Self::run_optimal_reward_worker(dynamics, evaluator, searching, sender, seed);
            });
            self.threads.push(handle);
        }

        if !self.config.targets.is_empty() {
            self.active_workers.store(self.config.n_workers, Ordering::SeqCst);
            for id in 0..self.config.n_workers {
                let targets = self.config.targets.clone();
                let evaluator = self.evaluator.clone();
                let searching = self.searching.clone();
                let sender = sender.clone();
                let seed = self.seed(id);
                let stats = Arc::new(Mutex::new(None));
                self.worker_stats.push(stats.clone());
                let active_workers = self.active_workers.clone();

                let handle = std::thread::spawn(move || {
                    Self::run_worker(id, targets, evaluator, &searching, sender, seed, stats);
                    if active_workers.fetch_sub(1, Ordering::SeqCst) == 1 && is_set(&searching) {
                        warn!("Every random search worker exited, stop searching");
                        set(&searching, false);
                    }
                });
                self.threads.push(handle);
            }
        }

        // The aggregator stops once every worker dropped its sender.
        drop(sender);
        {
            let state = self.state.clone();
            let handle = std::thread::spawn(move || {
                Self::aggregate(receiver, state);
            });
            self.threads.push(handle);
        }
    }

    /// Clears the flag. Workers finish their current run and exit.
    pub fn stop_search(&self) {
        if self.is_searching() {
            info!("Stop random search");
        }
        set(&self.searching, false);
    }

    /// Waits until every thread of the last search exits.
    ///
    /// Blocks forever if the search was not stopped.
    pub fn join(&mut self) -> Vec<WorkerStat> {
        for h in self.threads.drain(..) {
            if h.join().is_err() {
                warn!("A random search thread panicked");
            }
        }
        let stats: Vec<_> = self
            .worker_stats
            .drain(..)
            .filter_map(|s| lock(&s).take())
            .collect();
        if !stats.is_empty() {
            info!("Random search workers:\n{}", worker_stats_fmt(&stats));
        }
        stats
    }

    /// Stops and joins the workers.
    pub fn stop_and_join(&mut self) -> Vec<WorkerStat> {
        self.stop_search();
        self.join()
    }

    fn seed(&self, id: usize) -> u64 {
        self.config
            .seed
            .wrapping_add(self.generation.wrapping_mul(1_000_003))
            .wrapping_add(id as u64)
    }

    /// Loop folding messages into snapshots, until every sender is dropped.
    fn aggregate(receiver: Receiver<SearchMessage>, state: Arc<Mutex<Arc<RandomSearchState>>>) {
        for msg in receiver.iter() {
            match msg {
                SearchMessage::Result {
                    worker,
                    target,
                    reward,
                    parameters,
                } => {
                    let next = replace(&state, |s| s.with_result(target, reward, &parameters));
                    if let Some(area) = next.area(&target) {
                        if area.best_reward() == reward && area.best_parameters() == &parameters {
                            info!("New best reward {:.3} for {} from worker {}", reward, target, worker);
                        }
                    }
                }
                SearchMessage::OptimalReward { dynamics, reward } => {
                    info!("Optimal reward on {}: {:.3}", dynamics, reward);
                    replace(&state, |s| s.with_optimal_reward(dynamics, reward));
                }
            }
        }
        info!("Stopped random search aggregator");
    }

    fn run_worker(
        id: usize,
        targets: Vec<SearchTarget>,
        evaluator: ParameterEvaluator,
        searching: &Mutex<bool>,
        sender: Sender<SearchMessage>,
        seed: u64,
        stats: Arc<Mutex<Option<WorkerStat>>>,
    ) {
        let start = Instant::now();
        let rng = fastrand::Rng::with_seed(seed);
        let mut evaluations = 0;
        let is_cancelled = || !is_set(searching);

        while !is_cancelled() {
            let target = targets[rng.usize(..targets.len())];
            let ranges = target
                .tunable_parameters()
                .into_iter()
                .map(|p| (p, evaluator.config().agent.range_of(p)))
                .collect();
            let mut hyper_parameters = RandomHyperParameters::new(ranges, rng.u64(..));

            match evaluator.evaluate_reward(&target, &mut hyper_parameters, rng.u64(..), &is_cancelled) {
                Ok(reward) if reward == f64::NEG_INFINITY => break,
                Ok(reward) => {
                    evaluations += 1;
                    debug!("Worker {}: {} -> {:.3}", id, target, reward);
                    let msg = SearchMessage::Result {
                        worker: id,
                        target,
                        reward,
                        parameters: hyper_parameters.sampled().clone(),
                    };
                    if sender.send(msg).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    warn!("Worker {} failed to evaluate {}: {}", id, target, e);
                    break;
                }
            }
        }

        *lock(&stats) = Some(WorkerStat {
            id,
            evaluations,
            duration: start.elapsed(),
        });
        info!("Stopped random search worker {}", id);
    }

    fn run_optimal_reward_worker(
        dynamics: BTreeSet<DynamicsOption>,
        evaluator: ParameterEvaluator,
        searching: Arc<Mutex<bool>>,
        sender: Sender<SearchMessage>,
        seed: u64,
    ) {
        let is_cancelled = || !is_set(&searching);
        for d in dynamics {
            let mut hyper_parameters = ConfigHyperParameters::from_config(&evaluator.config().agent);
            let target = SearchTarget::value_iteration(d);
            match evaluator.evaluate_reward(&target, &mut hyper_parameters, seed, &is_cancelled) {
                Ok(reward) if reward == f64::NEG_INFINITY => break,
                Ok(reward) => {
                    if sender
                        .send(SearchMessage::OptimalReward { dynamics: d, reward })
                        .is_err()
                    {
                        break;
                    }
                }
                Err(e) => {
                    warn!("Failed to evaluate the optimal policy on {}: {}", d, e);
                }
            }
        }
    }
}

impl Drop for RandomSearch {
    fn drop(&mut self) {
        self.stop_and_join();
    }
}
