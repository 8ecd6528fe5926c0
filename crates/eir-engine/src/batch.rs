//! Batch evaluation of many deals.
//!
//! Deals share no state, so a batch is a plain map over the deals. With the
//! `parallel` feature enabled, batches at or above
//! `EngineConfig::parallel_threshold` are spread over the rayon thread pool.

use crate::compare::{compare, ComparisonReport};
use crate::config::EngineConfig;
use crate::deal::Deal;
use crate::error::EngineResult;
use crate::floating::Method;
use crate::report::{run, ScheduleReport};

/// Maps a function over items, conditionally using parallel iteration.
///
/// Uses parallel iteration when:
/// - The `parallel` feature is enabled
/// - `config.parallel` is true
/// - The collection size reaches `config.parallel_threshold`
#[allow(unused_variables)]
pub fn maybe_parallel_map<T, U, F>(items: &[T], config: &EngineConfig, f: F) -> Vec<U>
where
    T: Sync,
    U: Send,
    F: Fn(&T) -> U + Sync + Send,
{
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        if config.should_parallelize(items.len()) {
            return items.par_iter().map(f).collect();
        }
    }

    items.iter().map(f).collect()
}

/// Computes the schedule report of every deal.
///
/// Results keep the order of `deals`; a failing deal does not stop the others.
pub fn run_batch(
    deals: &[Deal],
    method: Method,
    config: &EngineConfig,
) -> Vec<EngineResult<ScheduleReport>> {
    tracing::debug!(deals = deals.len(), %method, "running batch");
    maybe_parallel_map(deals, config, |deal| run(deal, method, config))
}

/// Compares both methods on every deal.
pub fn compare_batch(deals: &[Deal], config: &EngineConfig) -> Vec<EngineResult<ComparisonReport>> {
    tracing::debug!(deals = deals.len(), "comparing batch");
    maybe_parallel_map(deals, config, |deal| compare(deal, config))
}
