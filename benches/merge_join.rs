use criterion::{criterion_group, criterion_main, Criterion};
use sortmerge_core::prelude::{DataType, JoinConfig, JoinMode, KeySpec, Row, Scalar, SourceLocator};
use sortmerge_exec::VecLeftInput;
use sortmerge_io::MemorySortedSource;
use sortmerge_operators::{JoinPoll, MergeJoin};

fn make_rows(n: i64, step: i64, tag: &str) -> Vec<Row> {
    (0..n)
        .map(|i| Row::new(vec![Scalar::I64(i * step), Scalar::Str(format!("{tag}-{i}"))]))
        .collect()
}

fn join_all(mode: JoinMode, left: &[Row], right: &[Row]) -> usize {
    let spec = KeySpec::column(0, DataType::Int64);
    let config = JoinConfig::new(spec.clone(), spec.clone(), SourceLocator::new("mem://bench"))
        .with_mode(mode);
    let source = MemorySortedSource::new(right.to_vec(), spec).unwrap();
    let mut join = MergeJoin::new(&config, source).unwrap();
    let mut input = VecLeftInput::from_rows(left.to_vec());
    let mut emitted = 0;
    loop {
        match join.produce_next(&mut input).unwrap() {
            JoinPoll::Row(_) => emitted += 1,
            JoinPoll::EndOfStream => return emitted,
            JoinPoll::NeedMore | JoinPoll::EndOfSegment => {}
        }
    }
}

fn bench_dense_join(c: &mut Criterion) {
    let left = make_rows(10_000, 1, "l");
    let right = make_rows(10_000, 1, "r");
    c.bench_function("merge_join_dense", |b| {
        b.iter(|| join_all(JoinMode::Dense, &left, &right))
    });
}

fn bench_sparse_join(c: &mut Criterion) {
    // Few left keys spread across a large right side.
    let left = make_rows(100, 997, "l");
    let right = make_rows(100_000, 1, "r");
    c.bench_function("merge_join_sparse", |b| {
        b.iter(|| join_all(JoinMode::Sparse, &left, &right))
    });
}

criterion_group!(benches, bench_dense_join, bench_sparse_join);
criterion_main!(benches);
