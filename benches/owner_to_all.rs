use criterion::{black_box, Criterion, criterion_group, criterion_main};
use schwarz_sync::core::LinearOperator;
use schwarz_sync::index::{Attribute, IndexPair, ParallelIndexSet};
use schwarz_sync::matrix::CsrMatrix;
use schwarz_sync::operator::OverlappingSchwarzOperator;
use schwarz_sync::parallel::{
    Comm, CopyGatherScatter, OwnerOverlapCopyCommunication, ParallelInformation, SequentialInformation, ThreadComm,
};

const N: usize = 20_000;
const OVERLAP: usize = 64;

fn laplacian(n: usize) -> CsrMatrix<f64> {
    let mut t = Vec::with_capacity(3 * n);
    for i in 0..n {
        t.push((i, i, 2.0));
        if i > 0 { t.push((i, i - 1, -1.0)); }
        if i + 1 < n { t.push((i, i + 1, -1.0)); }
    }
    CsrMatrix::from_triplets(n, n, &t).unwrap()
}

// two ranks splitting 0..2N; each stores its half plus OVERLAP replicas of the other
fn partition(rank: usize) -> ParallelIndexSet {
    let (lo, hi) = if rank == 0 { (0, N + OVERLAP) } else { (N - OVERLAP, 2 * N) };
    let pairs = (lo..hi)
        .enumerate()
        .map(|(l, g)| {
            let owned = (g < N) == (rank == 0);
            IndexPair::new(g as i64, l, if owned { Attribute::Owner } else { Attribute::Overlap })
        })
        .collect();
    ParallelIndexSet::new(pairs).unwrap()
}

fn bench_owner_to_all(c: &mut Criterion) {
    c.bench_function("owner_to_all 2 ranks x100", |ben| {
        ben.iter(|| {
            ThreadComm::run(2, |comm| {
                let rank = comm.rank();
                let info = OwnerOverlapCopyCommunication::new(comm, partition(rank)).unwrap();
                let mut x = vec![rank as f64; N + OVERLAP];
                for _ in 0..100 {
                    info.copy_owner_to_all_in_place::<CopyGatherScatter, [f64]>(black_box(&mut x)).unwrap();
                }
                x[0]
            })
        })
    });
}

fn bench_operator(c: &mut Criterion) {
    let a = laplacian(N);
    let info = SequentialInformation::new();
    let op = OverlappingSchwarzOperator::new(&a, &info);
    let x: Vec<f64> = (0..N).map(|i| (i as f64).sin()).collect();
    let mut y = vec![0.0; N];
    c.bench_function("overlapping operator apply", |ben| {
        ben.iter(|| op.apply(black_box(&x), black_box(&mut y)).unwrap())
    });
}

criterion_group!(benches, bench_owner_to_all, bench_operator);
criterion_main!(benches);
