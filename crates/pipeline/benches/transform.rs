//! Benchmarks for the feature transformer
//!
//! Run with: cargo bench --package pipeline

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use data_loader::{Problem, RatingEvent, SubmissionRecord, Verdict};
use pipeline::{FeatureTransformer, build_profile};

const TAGS: [&str; 8] = [
    "dp",
    "greedy",
    "math",
    "graphs",
    "implementation",
    "data structures",
    "brute force",
    "constructive algorithms",
];

/// A heavy user: 10k submissions over ~3k distinct problems
fn synthetic_history() -> (Vec<SubmissionRecord>, Vec<RatingEvent>) {
    let submissions = (0..10_000u32)
        .map(|i| {
            let problem = i % 3_000;
            SubmissionRecord {
                handle: "bench".to_string(),
                problem: Problem {
                    contest_id: Some(1000 + problem / 6),
                    index: Some(((b'A' + (problem % 6) as u8) as char).to_string()),
                    name: Some(format!("Problem {}", problem)),
                    problem_type: Some("PROGRAMMING".to_string()),
                    points: None,
                    rating: Some(800 + 100 * (problem % 20)),
                    tags: (0..3)
                        .map(|t| TAGS[((problem + t) % TAGS.len() as u32) as usize].to_string())
                        .collect(),
                },
                verdict: if i % 3 == 0 { Verdict::Accepted } else { Verdict::Other },
                creation_time: 10_000_000 - i as i64,
            }
        })
        .collect();
    let ratings = (0..300)
        .map(|i| RatingEvent {
            timestamp: i * 30_000,
            new_rating: 1200 + (i as i32 % 50) * 10,
        })
        .collect();
    (submissions, ratings)
}

fn bench_build_profile(c: &mut Criterion) {
    let (submissions, ratings) = synthetic_history();

    c.bench_function("build_profile", |b| {
        b.iter(|| {
            let profile = build_profile(black_box(&submissions), black_box(&ratings)).unwrap();
            black_box(profile)
        })
    });
}

fn bench_transform(c: &mut Criterion) {
    let (submissions, ratings) = synthetic_history();
    let transformer = FeatureTransformer::new();

    c.bench_function("feature_transform", |b| {
        b.iter(|| {
            let stream = transformer
                .transform(black_box(&submissions), black_box(&ratings))
                .unwrap();
            black_box(stream)
        })
    });
}

criterion_group!(benches, bench_build_profile, bench_transform);
criterion_main!(benches);
