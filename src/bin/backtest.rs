use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

use tennis_edge::batch::{analyze_batch_with_threads, parallelism_from_env};
use tennis_edge::calibration;
use tennis_edge::{MatchEvidence, ScoringConfig, Side};

const DEFAULT_BINS: usize = 9;

#[derive(Debug, Deserialize)]
struct BacktestCase {
    evidence: MatchEvidence,
    winner: Side,
}

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let path = std::env::args()
        .skip(1)
        .find(|arg| !arg.starts_with("--"))
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("tests/fixtures/backtest_cases.json"));
    let bins = parse_usize_arg("--bins").unwrap_or(DEFAULT_BINS).clamp(2, 50);

    let raw = fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
    let cases: Vec<BacktestCase> =
        serde_json::from_str(&raw).with_context(|| format!("parse {}", path.display()))?;
    if cases.is_empty() {
        return Err(anyhow!("no backtest cases in {}", path.display()));
    }

    let cfg = ScoringConfig::from_env().context("scoring config")?;
    let (evidence, winners): (Vec<MatchEvidence>, Vec<Side>) =
        cases.into_iter().map(|c| (c.evidence, c.winner)).unzip();
    let results = analyze_batch_with_threads(&evidence, &cfg, parallelism_from_env());
    let report = calibration::backtest(&results, &winners, bins);

    if has_flag("--json") {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Head-to-head edge backtest");
    println!("File: {}", path.display());
    println!("Matches: {} (undecided {})", report.matches, report.undecided);
    println!();
    let all = report.all_picks;
    let q = report.qualified_picks;
    println!(
        "all picks       n={} acc={:.3} brier={:.4} ll={:.4}",
        all.samples, all.accuracy, all.brier, all.log_loss
    );
    println!(
        "qualified picks n={} acc={:.3} brier={:.4} ll={:.4}",
        q.samples, q.accuracy, q.brier, q.log_loss
    );
    println!();
    for tier in &report.tiers {
        println!(
            "{:<10} picks={:<4} hits={:<4} rate={:.3}",
            tier.confidence.label(),
            tier.picks,
            tier.hits,
            tier.hit_rate
        );
    }
    println!();
    for bin in report.bins.iter().filter(|b| b.count > 0) {
        println!(
            "[{:.3}, {:.3}) n={:<4} pred={:.3} actual={:.3}",
            bin.bucket_start, bin.bucket_end, bin.count, bin.avg_pred, bin.actual_rate
        );
    }
    Ok(())
}

fn parse_usize_arg(name: &str) -> Option<usize> {
    let prefix = format!("{name}=");
    std::env::args()
        .skip(1)
        .find_map(|arg| arg.strip_prefix(&prefix).and_then(|raw| raw.trim().parse::<usize>().ok()))
}

fn has_flag(name: &str) -> bool {
    std::env::args().skip(1).any(|arg| arg == name)
}
