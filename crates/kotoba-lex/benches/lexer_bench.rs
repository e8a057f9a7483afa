//! Scanner benchmarks.
//!
//! Run with: `cargo bench --package kotoba-lex`

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use kotoba_lex::{relex_incremental, scan_recovering, scan_strict, tokenize_parallel, Edit};

fn token_count(source: &str) -> usize {
    scan_strict(source).map(|tokens| tokens.len()).unwrap_or(0)
}

fn bench_scanner_keywords(c: &mut Criterion) {
    let mut group = c.benchmark_group("scanner");

    let source = "変数 x: 整数型 ← 42\nif x ≧ 0 then\n  x ← x + 1\nendif\n";
    group.throughput(Throughput::Bytes(source.len() as u64));

    group.bench_function("simple_declaration", |b| b.iter(|| token_count(black_box("変数 x: 整数型 ← 42"))));
    group.bench_function("if_block", |b| b.iter(|| token_count(black_box(source))));

    group.finish();
}

fn bench_scanner_complex(c: &mut Criterion) {
    let mut group = c.benchmark_group("scanner_complex");

    let source = r#"
        function fibonacci(n: 整数型): 整数型
            if n ≦ 1 then
                return n
            endif
            return fibonacci(n - 1) + fibonacci(n - 2)
        endfunction

        procedure main()
            変数 i: 整数型 ← 0
            while i < 10 do
                i ← i + 1
            endwhile
        endprocedure
    "#;

    group.throughput(Throughput::Bytes(source.len() as u64));
    group.bench_function("complex_source", |b| b.iter(|| token_count(black_box(source))));
    group.finish();
}

fn bench_scanner_strings(c: &mut Criterion) {
    let mut group = c.benchmark_group("scanner_strings");

    group.bench_function("short_string", |b| b.iter(|| token_count(black_box("変数 s: 文字列型 ← \"hello\""))));

    let long = "変数 s: 文字列型 ← \"This is a longer string that contains some text for benchmarking purposes.\"";
    group.bench_function("long_string", |b| b.iter(|| token_count(black_box(long))));

    group.finish();
}

fn bench_scanner_numbers(c: &mut Criterion) {
    let mut group = c.benchmark_group("scanner_numbers");

    group.bench_function("integer", |b| b.iter(|| token_count(black_box("x ← 123456"))));
    group.bench_function("real", |b| b.iter(|| token_count(black_box("x ← 3.14159"))));
    group.bench_function("hex", |b| b.iter(|| token_count(black_box("x ← 0xDEAD_BEEF"))));

    group.finish();
}

fn bench_scanner_recovering(c: &mut Criterion) {
    let mut group = c.benchmark_group("scanner_recovering");

    let broken = "変数 x: 整数型 ← \"unterminated\n変数 y: 整数型 ← 0x\n";
    group.bench_function("diagnostics_collected", |b| b.iter(|| scan_recovering(black_box(broken)).tokens.len()));

    group.finish();
}

fn bench_scanner_parallel(c: &mut Criterion) {
    let mut group = c.benchmark_group("scanner_parallel");

    let source: String = (0..2000).map(|i| format!("x{} ← {}\n", i, i)).collect();
    group.throughput(Throughput::Bytes(source.len() as u64));

    group.bench_function("sequential", |b| b.iter(|| token_count(black_box(&source))));
    group.bench_function("four_chunks", |b| b.iter(|| tokenize_parallel(black_box(&source), 4).unwrap().len()));

    group.finish();
}

fn bench_incremental_relex(c: &mut Criterion) {
    let mut group = c.benchmark_group("incremental_relex");

    let source: String = (0..2000).map(|i| format!("x{} ← {}\n", i, i)).collect();
    let tokens = scan_strict(&source).unwrap();
    let mid_offset = source.chars().count() / 2;
    let edit = Edit { range: mid_offset..mid_offset + 1, replacement_text: "9".to_string() };

    group.bench_function("single_digit_edit", |b| {
        b.iter(|| relex_incremental(black_box(&tokens), black_box(&source), black_box(&edit)).unwrap().tokens.len())
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_scanner_keywords,
    bench_scanner_complex,
    bench_scanner_strings,
    bench_scanner_numbers,
    bench_scanner_recovering,
    bench_scanner_parallel,
    bench_incremental_relex,
);
criterion_main!(benches);
