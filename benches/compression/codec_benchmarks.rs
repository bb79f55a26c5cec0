use bytepress::compression::{Compression, HuffmanCompression, Lz77Compression, RleCompression};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

/// Text-like data: skewed byte distribution, short repeats.
fn generate_text_like(size: usize) -> Vec<u8> {
    let phrase = b"the quick brown fox jumps over the lazy dog. ";
    (0..size).map(|i| phrase[i % phrase.len()]).collect()
}

/// Run-heavy data: 64-byte blocks of a single value.
fn generate_runs(size: usize) -> Vec<u8> {
    (0..size).map(|i| ((i / 64) % 7) as u8).collect()
}

fn bench_compress(c: &mut Criterion) {
    let mut group = c.benchmark_group("compress");
    for &size in &[1024usize, 16384] {
        let text = generate_text_like(size);
        let runs = generate_runs(size);

        group.bench_with_input(BenchmarkId::new("huffman", size), &text, |b, data| {
            let codec = HuffmanCompression;
            b.iter(|| black_box(codec.compress(data).unwrap()));
        });
        group.bench_with_input(BenchmarkId::new("lz77", size), &text, |b, data| {
            let codec = Lz77Compression::default();
            b.iter(|| black_box(codec.compress(data).unwrap()));
        });
        group.bench_with_input(BenchmarkId::new("rle", size), &runs, |b, data| {
            let codec = RleCompression;
            b.iter(|| black_box(codec.compress(data).unwrap()));
        });
    }
    group.finish();
}

fn bench_decompress(c: &mut Criterion) {
    let mut group = c.benchmark_group("decompress");
    for &size in &[1024usize, 16384] {
        let text = generate_text_like(size);
        let runs = generate_runs(size);

        let huffman = HuffmanCompression;
        let compressed = huffman.compress(&text).unwrap();
        group.bench_with_input(BenchmarkId::new("huffman", size), &compressed, |b, data| {
            b.iter(|| black_box(huffman.decompress(data).unwrap()));
        });

        let lz77 = Lz77Compression::default();
        let compressed = lz77.compress(&text).unwrap();
        group.bench_with_input(BenchmarkId::new("lz77", size), &compressed, |b, data| {
            b.iter(|| black_box(lz77.decompress(data).unwrap()));
        });

        let rle = RleCompression;
        let compressed = rle.compress(&runs).unwrap();
        group.bench_with_input(BenchmarkId::new("rle", size), &compressed, |b, data| {
            b.iter(|| black_box(rle.decompress(data).unwrap()));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_compress, bench_decompress);
criterion_main!(benches);
