//! Measure building and querying a synthetic sorted lexicon.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use lexfst::Fst;

/// Sorted unique keys with a shared-suffix shape loosely resembling a real
/// dictionary: a numeric stem plus one of a few inflection tails.
fn lexicon(stems: usize) -> Vec<Vec<u8>> {
    const TAILS: &[&str] = &["", "ed", "ing", "ly", "s"];
    let mut keys = Vec::with_capacity(stems * TAILS.len());
    for stem in 0..stems {
        for tail in TAILS {
            keys.push(format!("{stem:06}{tail}").into_bytes());
        }
    }
    keys
}

fn build(keys: &[Vec<u8>]) -> Fst<Vec<i32>> {
    let mut fst = Fst::new();
    for (ord, key) in keys.iter().enumerate() {
        fst.add(key, vec![ord as i32]).unwrap();
    }
    fst.finish().unwrap();
    fst
}

fn bench_build(c: &mut Criterion) {
    let keys = lexicon(2_000);
    c.bench_function("build 10k keys", |b| {
        b.iter(|| build(black_box(&keys)))
    });
}

fn bench_run(c: &mut Criterion) {
    let keys = lexicon(2_000);
    let fst = build(&keys);
    c.bench_function("run 1k lookups", |b| {
        b.iter(|| {
            for key in keys.iter().step_by(keys.len() / 1_000) {
                black_box(fst.run(black_box(key), Vec::new()));
            }
        })
    });
}

criterion_group!(benches, bench_build, bench_run);
criterion_main!(benches);
