use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

use macroshock::views::{build_heatmap, build_timeline, gauge_summary, HeatmapOptions};
use macroshock::{Catalogs, Persistence, ScenarioEngine, ScenarioRunContext};

fn contexts(catalogs: &Catalogs) -> Vec<ScenarioRunContext> {
    catalogs
        .presets
        .iter()
        .map(|preset| {
            ScenarioRunContext::builder(preset.id.as_str())
                .surprise_size(3)
                .regime("late_cycle")
                .priced_in(true)
                .persistence(Persistence::TrendConfirming)
                .build()
        })
        .collect()
}

fn bench_run_all_presets(c: &mut Criterion) {
    let engine = ScenarioEngine::new(Arc::new(Catalogs::builtin().unwrap()));
    let ctxs = contexts(engine.catalogs());

    let mut group = c.benchmark_group("engine");
    group.throughput(Throughput::Elements(ctxs.len() as u64));
    group.bench_function("run_all_presets", |b| {
        b.iter(|| {
            for ctx in &ctxs {
                black_box(engine.run(ctx.clone()));
            }
        });
    });
    group.finish();
}

fn bench_views(c: &mut Criterion) {
    let engine = ScenarioEngine::builtin().unwrap();
    let result = engine.run(ScenarioRunContext::builder("fed_hike_hawkish_surprise").build());
    let indicators = &engine.catalogs().indicators;

    c.bench_function("views/gauge_heatmap_timeline", |b| {
        b.iter(|| {
            black_box(gauge_summary(&result));
            black_box(build_heatmap(indicators, Some(&result), &HeatmapOptions::default()));
            black_box(build_timeline(indicators, &result, None));
        });
    });
}

fn bench_catalog_load(c: &mut Criterion) {
    c.bench_function("catalog/builtin_load_and_fingerprint", |b| {
        b.iter(|| {
            let catalogs = Catalogs::builtin().unwrap();
            black_box(catalogs.fingerprint().unwrap())
        });
    });
}

criterion_group!(benches, bench_run_all_presets, bench_views, bench_catalog_load);
criterion_main!(benches);
