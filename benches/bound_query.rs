use criterion::{black_box, criterion_group, criterion_main, Criterion};

use cktrain::generator;
use cktrain::knowledge::{Feedback, KnowledgeBase};
use cktrain::permutation::Permutation;
use cktrain::rng::SecureRng;

fn rate(permutation: &Permutation) -> Feedback {
    match permutation.total() {
        0..=40 => Feedback::Easy,
        41..=90 => Feedback::Fair,
        91..=160 => Feedback::Hard,
        _ => Feedback::Brutal,
    }
}

fn populated_kb(rounds: usize) -> KnowledgeBase {
    let mut kb = KnowledgeBase::new();
    let mut rng = SecureRng::seeded(1);
    for _ in 0..rounds {
        let out = generator::generate(&kb, &mut rng);
        kb.record_feedback(out.permutation, rate(&out.permutation));
    }
    kb
}

fn bench_bound_query(c: &mut Criterion) {
    let kb = populated_kb(500);
    let mut probe = Permutation::empty();
    probe.set(3, 12);
    probe.set(9, 20);

    c.bench_function("bound_query", |b| b.iter(|| kb.bounds(black_box(&probe))));
}

fn bench_search(c: &mut Criterion) {
    let kb = populated_kb(500);
    let mut rng = SecureRng::seeded(2);

    c.bench_function("search", |b| b.iter(|| generator::generate(black_box(&kb), &mut rng)));
}

fn bench_ingest(c: &mut Criterion) {
    let kb = populated_kb(500);
    let mut probe = Permutation::empty();
    probe.set(0, 16);

    c.bench_function("ingest", |b| {
        b.iter(|| {
            let mut local = kb.clone();
            local.record_feedback(black_box(probe), Feedback::Fair)
        })
    });
}

criterion_group!(benches, bench_bound_query, bench_search, bench_ingest);
criterion_main!(benches);
