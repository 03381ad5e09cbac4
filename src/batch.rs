use std::env;

use rayon::prelude::*;

use crate::analyzer::{AnalysisResult, analyze};
use crate::config::ScoringConfig;
use crate::evidence::MatchEvidence;

pub const PARALLELISM_ENV: &str = "TENNIS_EDGE_PARALLELISM";

/// Scores every match on the global rayon pool. Output order matches input order.
pub fn analyze_batch(matches: &[MatchEvidence], cfg: &ScoringConfig) -> Vec<AnalysisResult> {
    matches.par_iter().map(|ev| analyze(ev, cfg)).collect()
}

/// Same as [`analyze_batch`] on a dedicated pool of `threads` workers.
pub fn analyze_batch_with_threads(
    matches: &[MatchEvidence],
    cfg: &ScoringConfig,
    threads: usize,
) -> Vec<AnalysisResult> {
    with_pool(threads, || analyze_batch(matches, cfg))
}

pub fn parallelism_from_env() -> usize {
    env::var(PARALLELISM_ENV)
        .ok()
        .and_then(|val| val.trim().parse::<usize>().ok())
        .unwrap_or(4)
        .clamp(1, 32)
}

fn with_pool<T>(threads: usize, action: impl FnOnce() -> T + Send) -> T
where
    T: Send,
{
    match rayon::ThreadPoolBuilder::new()
        .num_threads(threads.clamp(1, 32))
        .build()
    {
        Ok(pool) => pool.install(action),
        Err(_) => action(),
    }
}
