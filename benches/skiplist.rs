use criterion::{
    black_box,
    criterion_group,
    criterion_main,
    BatchSize,
    BenchmarkId,
    Criterion,
    Throughput,
};
use rand::{
    rngs::SmallRng,
    Rng,
    SeedableRng,
};
use strata::{
    Config,
    DeterministicSkipList,
    OrderedIndex,
    SkipList,
};

static SIZES: [usize; 4] = [1_000, 10_000, 100_000, 1_000_000];

fn random_keys(count: usize, seed: u64) -> Vec<i64> {
    let mut rng = SmallRng::seed_from_u64(seed);
    (0..count).map(|_| rng.gen()).collect()
}

fn filled<I: OrderedIndex>(mut index: I, keys: &[i64]) -> I {
    for k in keys {
        index.insert(*k).unwrap();
    }
    index
}

fn probabilistic() -> SkipList {
    SkipList::seeded(Config::default().with_max_height(24), 7).unwrap()
}

fn deterministic() -> DeterministicSkipList {
    DeterministicSkipList::new(Config::default().with_max_height(24)).unwrap()
}

pub fn insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert");
    for size in SIZES.iter().take(3) {
        let keys = random_keys(*size, 1);
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::new("probabilistic", size), &keys, |b, keys| {
            b.iter_batched(probabilistic, |list| filled(list, keys), BatchSize::LargeInput)
        });
        group.bench_with_input(BenchmarkId::new("deterministic", size), &keys, |b, keys| {
            b.iter_batched(deterministic, |list| filled(list, keys), BatchSize::LargeInput)
        });
    }
    group.finish();
}

pub fn search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");
    for size in SIZES.iter() {
        let keys = random_keys(*size, 2);
        let prob = filled(probabilistic(), &keys);
        let det = filled(deterministic(), &keys);
        let mut rng = SmallRng::seed_from_u64(3);

        group.bench_with_input(BenchmarkId::new("probabilistic", size), size, |b, _| {
            b.iter(|| black_box(prob.search(keys[rng.gen_range(0..keys.len())])))
        });
        group.bench_with_input(BenchmarkId::new("deterministic", size), size, |b, _| {
            b.iter(|| black_box(det.search(keys[rng.gen_range(0..keys.len())])))
        });
    }
    group.finish();
}

pub fn remove(c: &mut Criterion) {
    let mut group = c.benchmark_group("remove");
    let keys = random_keys(10_000, 4);
    group.throughput(Throughput::Elements(keys.len() as u64));
    group.bench_function("probabilistic", |b| {
        b.iter_batched(
            || filled(probabilistic(), &keys),
            |mut list| {
                for k in &keys {
                    list.remove(*k);
                }
                list
            },
            BatchSize::LargeInput,
        )
    });
    group.bench_function("deterministic", |b| {
        b.iter_batched(
            || filled(deterministic(), &keys),
            |mut list| {
                for k in &keys {
                    list.remove(*k);
                }
                list
            },
            BatchSize::LargeInput,
        )
    });
    group.finish();
}

criterion_group!(benches, insert, search, remove);
criterion_main!(benches);
