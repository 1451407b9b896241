//! Benchmarks for segmentation and position resolution.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use folio::{
    create_position, extract_paragraphs, resolve_position, BookBuilder, Position, SegmentBudget,
    Segmenter,
};

fn sample_chapter(size: usize) -> String {
    // Generate prose with paragraph structure
    let sentences = [
        "The quick brown fox jumps over the lazy dog. ",
        "Pack my box with five dozen liquor jugs. ",
        "How vexingly quick daft zebras jump!\n",
        "The five boxing wizards jump quickly. ",
        "Sphinx of black quartz, judge my vow.\n\n",
    ];
    let mut text = String::with_capacity(size);
    let mut i = 0;
    while text.len() < size {
        text.push_str(sentences[i % sentences.len()]);
        i += 1;
    }
    text.truncate(size);
    text
}

fn bench_segmenter(c: &mut Criterion) {
    let mut group = c.benchmark_group("segmenter");
    let segmenter = Segmenter::default();

    for size in [10_000, 100_000, 1_000_000] {
        let text = sample_chapter(size);

        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::new("segment", size), &text, |b, text| {
            b.iter(|| {
                let paragraphs = extract_paragraphs(black_box(text));
                segmenter.segment(text, &paragraphs, 0, "bench")
            })
        });
    }

    group.finish();
}

fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve");

    for size in [10_000, 100_000] {
        let mut builder = BookBuilder::new(SegmentBudget::default());
        builder.add_chapter("bench", sample_chapter(size));
        let model = builder.finish().model;

        let last = model.pages().len() - 1;
        let exact = create_position(&model, last, 100);
        let mut coarse = Position::chapter_start(0);
        coarse.chapter_progress = 0.75;

        group.bench_with_input(BenchmarkId::new("snippet", size), &exact, |b, p| {
            b.iter(|| resolve_position(&model, black_box(p)))
        });
        group.bench_with_input(BenchmarkId::new("progress", size), &coarse, |b, p| {
            b.iter(|| resolve_position(&model, black_box(p)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_segmenter, bench_resolve);
criterion_main!(benches);
