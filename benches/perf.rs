use chrono::{Duration, NaiveDate};
use criterion::{Criterion, criterion_group, criterion_main};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::hint::black_box;

use tennis_edge::batch::{analyze_batch, analyze_batch_with_threads};
use tennis_edge::evidence::parse_evidence_json;
use tennis_edge::{
    MatchEvidence, MatchObservation, MatchResult, RecentMatch, ScoringConfig, Side, SurfaceRecord,
    analyze,
};

const SURFACES: [&str; 3] = ["clay", "grass", "hard"];
const SCORES: [&str; 4] = ["2-0", "2-1", "6-4 6-7(5) 7-5", "3-1"];

fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 10, 1).expect("valid date")
}

fn synthetic_match(rng: &mut StdRng) -> MatchEvidence {
    let mut ev = MatchEvidence::new(as_of());
    ev.surface = Some(SURFACES[rng.gen_range(0..SURFACES.len())].to_string());
    ev.tournament = if rng.gen_bool(0.2) {
        "Roland Garros".to_string()
    } else {
        "ATP Lyon".to_string()
    };
    for _ in 0..rng.gen_range(0..8) {
        ev.h2h.push(MatchObservation {
            date: Some(as_of() - Duration::days(rng.gen_range(1..1000))),
            winner: Some(if rng.gen_bool(0.5) { Side::A } else { Side::B }),
            score: SCORES[rng.gen_range(0..SCORES.len())].to_string(),
            ..MatchObservation::default()
        });
    }
    for side in [&mut ev.side_a, &mut ev.side_b] {
        let mut days_ago = 60i64;
        for _ in 0..12 {
            days_ago -= rng.gen_range(1..5);
            side.recent_matches.push(RecentMatch {
                date: Some(as_of() - Duration::days(days_ago.max(0))),
                result: Some(if rng.gen_bool(0.55) {
                    MatchResult::Win
                } else {
                    MatchResult::Loss
                }),
                score: SCORES[rng.gen_range(0..SCORES.len())].to_string(),
                surface: Some(SURFACES[rng.gen_range(0..SURFACES.len())].to_string()),
                opponent_rank: Some(rng.gen_range(1..250)),
            });
        }
        for surface in SURFACES {
            let total = rng.gen_range(0..80);
            let wins = rng.gen_range(0..=total);
            let record = SurfaceRecord::from_recent(surface, &side.recent_matches);
            side.surface_stats.insert(
                surface.to_string(),
                SurfaceRecord::new(wins, total, record.recent_form),
            );
        }
    }
    ev
}

fn synthetic_batch(n: usize) -> Vec<MatchEvidence> {
    let mut rng = StdRng::seed_from_u64(0x7e22);
    (0..n).map(|_| synthetic_match(&mut rng)).collect()
}

fn bench_evidence_parse(c: &mut Criterion) {
    c.bench_function("evidence_parse", |b| {
        b.iter(|| {
            let rows = parse_evidence_json(black_box(EVIDENCE_JSON), as_of()).unwrap();
            black_box(rows.len());
        })
    });
}

fn bench_analyze_single(c: &mut Criterion) {
    let ev = parse_evidence_json(EVIDENCE_JSON, as_of()).unwrap().remove(0);
    let cfg = ScoringConfig::default();
    c.bench_function("analyze_single", |b| {
        b.iter(|| {
            let res = analyze(black_box(&ev), &cfg);
            black_box(res.total_score);
        })
    });
}

fn bench_analyze_sequential(c: &mut Criterion) {
    let matches = synthetic_batch(1_000);
    let cfg = ScoringConfig::default();
    c.bench_function("analyze_sequential_1000", |b| {
        b.iter(|| {
            let qualifying = matches
                .iter()
                .map(|ev| analyze(ev, &cfg))
                .filter(|r| r.qualifies)
                .count();
            black_box(qualifying);
        })
    });
}

fn bench_analyze_batch(c: &mut Criterion) {
    let matches = synthetic_batch(1_000);
    let cfg = ScoringConfig::default();
    c.bench_function("analyze_batch_1000", |b| {
        b.iter(|| {
            let results = analyze_batch(black_box(&matches), &cfg);
            black_box(results.len());
        })
    });
    c.bench_function("analyze_batch_1000_4_threads", |b| {
        b.iter(|| {
            let results = analyze_batch_with_threads(black_box(&matches), &cfg, 4);
            black_box(results.len());
        })
    });
}

criterion_group!(
    perf,
    bench_evidence_parse,
    bench_analyze_single,
    bench_analyze_sequential,
    bench_analyze_batch
);
criterion_main!(perf);

static EVIDENCE_JSON: &str = include_str!("../tests/fixtures/evidence_full.json");
