use std::hint::black_box;

use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use parejita_core::{DeckGenerator, Difficulty, Session, ShuffledDeckGenerator, TimerQueue};

fn deal(c: &mut Criterion) {
    c.bench_function("deal_hard", |b| {
        b.iter(|| ShuffledDeckGenerator::new(black_box(7)).generate(Difficulty::Hard))
    });
}

fn first_hint(c: &mut Criterion) {
    let mut timers = TimerQueue::new();
    let mut session = Session::new(Difficulty::Hard);
    session.start(&mut timers, ShuffledDeckGenerator::new(7));

    // worst case for the pair scan: the whole board face down
    c.bench_function("first_hint_hard", |b| {
        b.iter_batched(
            || (session.clone(), timers.clone()),
            |(mut session, mut timers)| session.hint(&mut timers),
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, deal, first_hint);
criterion_main!(benches);
