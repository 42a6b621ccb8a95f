//! Benchmarks for the story pipeline
//!
//! Measures the CPU-bound steps (prompt building, sanitizing, extractive
//! summaries) and a full offline pipeline run with stub content.

#![allow(clippy::expect_used)]

use std::sync::Arc;

use ai_core::{LlmProvider, ProviderRegistry};
use application::{
    ApplicationError, ContentPolicy, ContentSanitizer, ContinuityStore, NarrationBackends,
    NarrationService, StoryPipeline, StoryService, SummaryService, build_story_prompt,
    extractive_summary,
};
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use domain::{
    ChildAlias, ChildMemory, ChildProfile, ControlSettings, StoryPayload, StoryRequest,
    StoryRequestDraft,
};

/// Store that never remembers anything
#[derive(Debug)]
struct ForgetfulStore;

impl ContinuityStore for ForgetfulStore {
    fn load(&self, _alias: &ChildAlias) -> Result<Option<ChildMemory>, ApplicationError> {
        Ok(None)
    }

    fn save(&self, _memory: &ChildMemory) -> Result<(), ApplicationError> {
        Ok(())
    }
}

fn request() -> StoryRequest {
    let mut draft = StoryRequestDraft::new(
        "genitore@example.com",
        ChildProfile::new("Luca", 6, "curioso").with_interests(["draghi", "stelle", "mare"]),
    );
    draft.controls.educational = true;
    draft.style.generate_panels = true;
    draft
        .into_request(&["it", "en"])
        .expect("valid benchmark request")
}

fn story_text(sentences: usize) -> String {
    (0..sentences)
        .map(|i| format!("Luca e il drago Zeno volano sopra Venezia numero {i}."))
        .collect::<Vec<_>>()
        .join(" ")
}

fn bench_prompt(c: &mut Criterion) {
    let request = request();
    let summary = "Luca ha trovato il drago Zeno. Personaggi: Luca, Zeno.";

    c.bench_function("build_story_prompt", |b| {
        b.iter(|| build_story_prompt(&request, Some(summary)));
    });
}

fn bench_sanitizer(c: &mut Criterion) {
    let sanitizer = ContentSanitizer::new(&ContentPolicy::default()).expect("default policy");
    let controls = ControlSettings::default();
    let clean = StoryPayload::stub();
    let mut flagged = StoryPayload::stub();
    flagged.intro = "Il lupo non fa paura, nessuna morte nel bosco.".repeat(20);
    flagged.choice_1_options[0] = "Affrontare il mostro".to_string();

    let mut group = c.benchmark_group("sanitize");
    group.bench_function("clean", |b| b.iter(|| sanitizer.sanitize(&clean, &controls)));
    group.bench_function("flagged", |b| {
        b.iter(|| sanitizer.sanitize(&flagged, &controls));
    });
    group.finish();
}

fn bench_extractive_summary(c: &mut Criterion) {
    let mut group = c.benchmark_group("extractive_summary");
    for sentences in [2, 20, 200] {
        let text = story_text(sentences);
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(sentences), &text, |b, text| {
            b.iter(|| extractive_summary(text));
        });
    }
    group.finish();
}

fn bench_offline_pipeline(c: &mut Criterion) {
    let registry = ProviderRegistry::offline(LlmProvider::HuggingFace);
    let sanitizer =
        Arc::new(ContentSanitizer::new(&ContentPolicy::default()).expect("default policy"));
    let pipeline = StoryPipeline::new(
        StoryService::new(registry.clone(), Arc::clone(&sanitizer)),
        NarrationService::new(NarrationBackends::default()),
        SummaryService::new(registry),
        sanitizer,
        Arc::new(ForgetfulStore),
    );
    let request = request();

    c.bench_function("offline_pipeline", |b| {
        b.iter(|| pipeline.generate(&request).expect("offline generation"));
    });
}

criterion_group!(
    benches,
    bench_prompt,
    bench_sanitizer,
    bench_extractive_summary,
    bench_offline_pipeline
);
criterion_main!(benches);
