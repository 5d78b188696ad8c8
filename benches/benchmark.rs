//! Benchmarks for the preview compositor and tutorial session.
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use uimentor::tutorial::Advance;
use uimentor::{
    compose, CompletionResponse, EditorSettings, MentorConfig, PreviewCompositor, TutorialSession,
};

fn sample_settings(links: usize) -> EditorSettings {
    let mut settings = EditorSettings::default();
    settings.html.class_name = "h-full".to_string();
    settings.html.head_tags = "<meta charset=\"UTF-8\">".to_string();
    settings.css.external_links = (0..links)
        .map(|i| format!("https://cdn.example.com/style-{}.css", i))
        .collect();
    settings.js.external_links = (0..links)
        .map(|i| format!("https://cdn.example.com/script-{}.js", i))
        .collect();
    settings
}

fn bench_compose_small(c: &mut Criterion) {
    let settings = sample_settings(1);
    c.bench_function("compose_small", |b| {
        b.iter(|| {
            black_box(compose(
                black_box("<h1>Hello</h1>"),
                black_box("h1 { color: red; }"),
                black_box("console.log('hi');"),
                &settings,
            ))
        })
    });
}

fn bench_compose_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("compose_buffer_size");
    for size in [1_000usize, 10_000, 100_000] {
        let markup = "<div class=\"card\">content</div>\n".repeat(size / 32);
        let styles = ".card { padding: 1rem; }\n".repeat(size / 25);
        let script = "document.querySelectorAll('.card');\n".repeat(size / 37);
        let settings = sample_settings(4);
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| black_box(compose(&markup, &styles, &script, &settings)))
        });
    }
    group.finish();
}

fn bench_debounced_edits(c: &mut Criterion) {
    c.bench_function("debounced_edit_burst", |b| {
        b.iter(|| {
            let mut compositor = PreviewCompositor::new(sample_settings(2), 250);
            let mut markup = String::new();
            for t in 0..100u64 {
                markup.push_str("<p>x</p>");
                compositor.set_markup(markup.clone(), t * 10);
                black_box(compositor.poll(t * 10));
            }
            black_box(compositor.poll(10_000).map(str::len))
        })
    });
}

fn bench_session_steps(c: &mut Criterion) {
    c.bench_function("session_50_steps", |b| {
        b.iter(|| {
            let mut session = TutorialSession::new(&MentorConfig::default());
            session.begin_start("a dashboard", &[]).unwrap();
            session
                .complete(&CompletionResponse::from_text("step"))
                .unwrap();
            for _ in 1..50 {
                if let Advance::Fetch { request } = session.begin_advance().unwrap() {
                    black_box(request.messages.len());
                }
                session
                    .complete(&CompletionResponse::from_text("step"))
                    .unwrap();
            }
            black_box(session.steps().len())
        })
    });
}

criterion_group!(
    benches,
    bench_compose_small,
    bench_compose_scaling,
    bench_debounced_edits,
    bench_session_steps,
);
criterion_main!(benches);
