//! Benchmarks for plugin-aware markdown rendering.

#![allow(clippy::format_push_string)] // Benchmark setup code, performance not critical

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use haik_markdown::{
    FactoryRepository, HaikMarkdown, Params, Plugin, PluginContext, PluginOutput,
};

struct Wrap;

impl Plugin for Wrap {
    fn inline(&mut self, _params: &Params, body: &str, _ctx: &mut PluginContext<'_>) -> PluginOutput {
        PluginOutput::html(format!("<span>{body}</span>"))
    }

    fn convert(&mut self, _params: &Params, body: &str, ctx: &mut PluginContext<'_>) -> PluginOutput {
        PluginOutput::html(format!("<div>{}</div>", ctx.transform(body)))
    }
}

fn engine() -> HaikMarkdown {
    HaikMarkdown::new().with_repository(FactoryRepository::new().with_plugin("wrap", || Box::new(Wrap)))
}

/// Generate a document mixing prose, inline calls and block calls.
fn generate_markdown(sections: usize, calls_per_section: usize) -> String {
    let mut md = String::with_capacity(sections * calls_per_section * 80);
    md.push_str("# Document Title\n\n[note]: wrap info\n\n");

    for i in 0..sections {
        md.push_str(&format!("## Section {i}\n\n"));
        for j in 0..calls_per_section {
            md.push_str(&format!(
                "Paragraph {j} has /[**bold** text](wrap a, b) and /[a reference][note].\n\n"
            ));
        }
        md.push_str(":::wrap\nBlock body with /(wrap) inside.\n:::\n\n");
    }
    md
}

fn bench_plain_markdown(c: &mut Criterion) {
    let engine = engine();
    let markdown = "# Hello\n\nSimple content with *emphasis*.\n".repeat(20);

    c.bench_function("transform_plain_markdown", |b| {
        b.iter(|| engine.transform(&markdown));
    });
}

fn bench_varying_sizes(c: &mut Criterion) {
    let engine = engine();
    let mut group = c.benchmark_group("transform_by_size");

    for (sections, calls) in [(5, 2), (20, 3), (50, 5)] {
        let markdown = generate_markdown(sections, calls);
        group.throughput(Throughput::Bytes(markdown.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("markdown", format!("{sections}s_{calls}c")),
            &markdown,
            |b, md| b.iter(|| engine.transform(md)),
        );
    }

    group.finish();
}

fn bench_nested_blocks(c: &mut Criterion) {
    let engine = engine();
    let mut markdown = String::from("core\n");
    for depth in 0..8 {
        let fence = ":".repeat(3 + 8 - depth);
        markdown = format!("{fence}wrap\n{markdown}{fence}\n");
    }

    c.bench_function("transform_nested_blocks_8_deep", |b| {
        b.iter(|| engine.transform(&markdown));
    });
}

criterion_group!(
    benches,
    bench_plain_markdown,
    bench_varying_sizes,
    bench_nested_blocks
);
criterion_main!(benches);
