use criterion::{black_box, criterion_group, criterion_main, Criterion};

use examdeck_core::leaderboard::{rank_participants, ParticipantScore};

fn make_records(count: usize) -> Vec<ParticipantScore> {
    (0..count)
        .map(|i| ParticipantScore {
            user: format!("user-{i}"),
            // Plenty of ties to exercise the stable tie-break.
            score: (i % 50) as f64,
            correct_answers: Some((i % 20) as u32),
            time_spent: Some(60 + (i % 600) as u64),
        })
        .collect()
}

fn bench_rank_participants(c: &mut Criterion) {
    let mut group = c.benchmark_group("rank_participants");

    for size in [100usize, 1000, 10_000] {
        let records = make_records(size);
        group.bench_function(format!("participants={size}"), |b| {
            b.iter(|| rank_participants(black_box(&records), black_box(Some("user-42"))))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_rank_participants);
criterion_main!(benches);
