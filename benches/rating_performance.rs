//! Performance benchmarks for rating and ranking calculations

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use crosstable::rating::calculator::RatingCalculator;
use crosstable::rating::elo::{EloConfig, EloRatingCalculator};
use crosstable::standings::ranking::{rank, MatchHistory};
use crosstable::standings::scoreboard::ScoreEntry;
use crosstable::types::MatchOutcome;

fn bench_rating_calculations(c: &mut Criterion) {
    let calculator = EloRatingCalculator::new(EloConfig::default()).unwrap();

    let pairs = [
        (1000.0, 1000.0),
        (1600.0, 1400.0),
        (2450.0, 2350.0),
        (1200.0, 2600.0),
    ];

    c.bench_function("elo_compute_new_ratings", |b| {
        b.iter(|| {
            for (rating_one, rating_two) in pairs {
                let result = calculator
                    .compute_new_ratings(
                        black_box(rating_one),
                        black_box(rating_two),
                        MatchOutcome::PlayerOneWin,
                    )
                    .unwrap();
                black_box(result);
            }
        })
    });
}

fn bench_scoreboard_ranking(c: &mut Criterion) {
    // A round of 64 players with scores spread over a few point groups
    let entries: Vec<ScoreEntry> = (0..64)
        .map(|i| ScoreEntry {
            player_id: format!("player{:02}", i),
            score: (i % 5) as f64 * 0.5,
        })
        .collect();

    c.bench_function("rank_64_entries", |b| {
        b.iter(|| {
            let ranked = rank(black_box(&entries), &MatchHistory::empty());
            black_box(ranked);
        })
    });
}

criterion_group!(benches, bench_rating_calculations, bench_scoreboard_ranking);
criterion_main!(benches);
