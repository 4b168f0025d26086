use std::hint::black_box;
use std::time::Instant;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use tsestree_core::{ParseOptions, parse, parse_and_generate_services};

fn generate_typescript(blocks: usize) -> String {
    let mut code = String::with_capacity(blocks * 900);
    code.push_str("// Generated TypeScript source for benchmarking\n\n");

    for i in 0..blocks {
        code.push_str(&format!(
            r#"interface Entity{i} {{
    id: number;
    name: string;
    metadata?: Record<string, unknown>;
}}

export class Repository{i}<T extends Entity{i}> implements Store<T> {{
    #items = new Map<number, T>();
    static readonly label = "repo-{i}";

    constructor(private readonly prefix: string) {{}}

    get size(): number {{
        return this.#items.size;
    }}

    async fetch(id: number): Promise<T | null> {{
        const response = await fetch(`/api/${{this.prefix}}/{i}/${{id}}`);
        if (!response.ok) {{
            return null;
        }}
        return (await response.json()) as T;
    }}

    save(entity: T): T {{
        const {{ metadata, ...rest }} = entity;
        this.#items.set(entity.id, {{ ...rest, metadata: metadata ?? {{}} }} as T);
        return entity;
    }}
}}

"#,
            i = i
        ));
    }

    code
}

fn bench_conversion(c: &mut Criterion) {
    let mut group = c.benchmark_group("conversion");

    let code = generate_typescript(15);
    let options = ParseOptions::default();
    group.throughput(Throughput::Bytes(code.len() as u64));
    group.bench_function("convert_ast", |b| {
        b.iter(|| parse(black_box(&code), black_box(&options)))
    });

    let with_lists = ParseOptions::default().with_tokens(true).with_comments(true);
    group.bench_function("convert_with_tokens_and_comments", |b| {
        b.iter(|| parse(black_box(&code), black_box(&with_lists)))
    });

    group.bench_function("convert_with_node_maps", |b| {
        b.iter(|| parse_and_generate_services(black_box(&code), black_box(&options)))
    });

    group.finish();
}

fn bench_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("scaling");
    let options = ParseOptions::default();

    for blocks in [1, 10, 50] {
        let code = generate_typescript(blocks);
        group.throughput(Throughput::Bytes(code.len() as u64));
        group.bench_with_input(BenchmarkId::new("blocks", blocks), &code, |b, code| {
            b.iter(|| parse(black_box(code), black_box(&options)))
        });
    }

    group.finish();
}

fn bench_serialization(c: &mut Criterion) {
    let mut group = c.benchmark_group("serialization");

    let code = generate_typescript(15);
    let options = ParseOptions::default().with_tokens(true).with_comments(true);
    let Ok(result) = parse(&code, &options) else {
        return;
    };

    group.bench_function("to_json", |b| b.iter(|| black_box(&result).to_json()));
    group.finish();
}

fn bench_latency_percentiles(c: &mut Criterion) {
    let mut group = c.benchmark_group("latency");

    let code = generate_typescript(15);
    let options = ParseOptions::default();

    group.bench_function("p95_convert", |b| {
        b.iter_custom(|iters| {
            let mut durations: Vec<_> = (0..iters)
                .map(|_| {
                    let start = Instant::now();
                    let _ = parse(black_box(&code), black_box(&options));
                    start.elapsed()
                })
                .collect();
            durations.sort();
            let p95_idx = ((iters as f64) * 0.95) as usize;
            let p95_idx = p95_idx.min(durations.len().saturating_sub(1));
            durations[p95_idx]
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_conversion,
    bench_scaling,
    bench_serialization,
    bench_latency_percentiles
);
criterion_main!(benches);
