use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use tennis_edge::batch::{analyze_batch_with_threads, parallelism_from_env};
use tennis_edge::evidence::parse_evidence_json;
use tennis_edge::{MatchEvidence, ScoringConfig};

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    init_tracing();

    let paths: Vec<PathBuf> = std::env::args().skip(1).map(PathBuf::from).collect();
    if paths.is_empty() {
        bail!("usage: tennis_edge <evidence.json> [more.json ...]");
    }

    let cfg = ScoringConfig::from_env().context("scoring config")?;
    let today = chrono::Local::now().date_naive();

    let mut evidence = Vec::new();
    for path in &paths {
        let batch = read_evidence(path, today)?;
        if batch.is_empty() {
            warn!(path = %path.display(), "no matches in file");
        }
        evidence.extend(batch);
    }

    let threads = parallelism_from_env();
    info!(matches = evidence.len(), threads, "scoring matches");
    let results = analyze_batch_with_threads(&evidence, &cfg, threads);

    let qualifying = results.iter().filter(|r| r.qualifies).count();
    info!(qualifying, "done");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for result in &results {
        let line = serde_json::to_string(result).context("serialize result")?;
        writeln!(out, "{line}")?;
    }
    Ok(())
}

fn read_evidence(path: &Path, today: NaiveDate) -> Result<Vec<MatchEvidence>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("read evidence {}", path.display()))?;
    parse_evidence_json(&raw, today).with_context(|| format!("parse evidence {}", path.display()))
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}
