use bytes::Bytes;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::io::Write;
use tempfile::NamedTempFile;
use topkmer::config::Config;
use topkmer::counter::KmerCounter;
use topkmer::kmer::{decode, encode, KmerLength, RollingEncoder};
use topkmer::reader::Input;
use topkmer::run::count_kmers;
use topkmer::top::{select_top, TopCount};

fn read_of(len: usize) -> Bytes {
    Bytes::from("GATTACAGCT".repeat(len / 10 + 1)[..len].to_string())
}

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode");

    for k in [5, 11, 21, 31] {
        let kmer = read_of(k);
        group.bench_with_input(BenchmarkId::from_parameter(k), &kmer, |b, kmer| {
            b.iter(|| encode(black_box(kmer)))
        });
    }

    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");

    for k in [5, 11, 21, 31] {
        let len = KmerLength::new(k).unwrap();
        let code = encode(&read_of(k));
        group.bench_with_input(BenchmarkId::from_parameter(k), &code, |b, &code| {
            b.iter(|| decode(black_box(code), len))
        });
    }

    group.finish();
}

fn bench_rolling_vs_windows(c: &mut Criterion) {
    let mut group = c.benchmark_group("window_codes");
    let read = read_of(150);

    for k in [11, 31] {
        let len = KmerLength::new(k).unwrap();
        group.bench_with_input(BenchmarkId::new("rolling", k), &read, |b, read| {
            b.iter(|| RollingEncoder::new(black_box(read), len).fold(0u64, u64::wrapping_add))
        });
        group.bench_with_input(BenchmarkId::new("per_window", k), &read, |b, read| {
            b.iter(|| {
                black_box(read)
                    .windows(k)
                    .map(encode)
                    .fold(0u64, u64::wrapping_add)
            })
        });
    }

    group.finish();
}

fn bench_count_reads(c: &mut Criterion) {
    let mut group = c.benchmark_group("count_reads");
    let reads: Vec<Bytes> = (0..1000).map(|i| read_of(100 + i % 50)).collect();

    for k in [11, 21, 40] {
        let counter = KmerCounter::new(KmerLength::new(k).unwrap());
        group.bench_with_input(BenchmarkId::new("sequential", k), &reads, |b, reads| {
            b.iter(|| counter.count_reads(reads.iter().cloned()))
        });
        group.bench_with_input(BenchmarkId::new("parallel", k), &reads, |b, reads| {
            b.iter(|| counter.count_reads_parallel(reads))
        });
    }

    group.finish();
}

fn bench_select_top(c: &mut Criterion) {
    let mut group = c.benchmark_group("select_top");
    let reads: Vec<Bytes> = (0..1000).map(|i| read_of(100 + i % 50)).collect();
    let table = KmerCounter::new(KmerLength::new(11).unwrap())
        .count_reads(reads)
        .unwrap();

    for n in [1, 25, 1000] {
        let top = TopCount::new(n).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(n), &table, |b, table| {
            b.iter(|| select_top(table.clone(), top, true))
        });
    }

    group.finish();
}

fn bench_count_kmers_file(c: &mut Criterion) {
    let mut group = c.benchmark_group("count_kmers");

    let mut file = NamedTempFile::new().unwrap();
    for i in 0..100 {
        let seq = "ACGTACGTACGTACGTACGTACGTACGTACGT".repeat(10);
        writeln!(file, "@seq{i}\n{seq}\n+\n{}", "I".repeat(seq.len())).unwrap();
    }
    let input = Input::File(file.path().to_path_buf());

    for k in [5, 11, 21] {
        let config = Config::new(k, 10).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(k), &config, |b, config| {
            b.iter(|| count_kmers(black_box(&input), config))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_encode,
    bench_decode,
    bench_rolling_vs_windows,
    bench_count_reads,
    bench_select_top,
    bench_count_kmers_file,
);

criterion_main!(benches);
