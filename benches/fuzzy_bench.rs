use criterion::{criterion_group, criterion_main, Criterion};
use cmdfloat::completion::{CompletionProvider, ExCommandProvider, SearchWordProvider};
use cmdfloat::fuzzy;
use std::hint::black_box;

fn command_names(n: usize) -> Vec<String> {
    let stems = ["buffer", "delete", "substitute", "split", "write", "quit", "edit", "tabnew"];
    (0..n)
        .map(|i| {
            let stem = stems[i % stems.len()];
            format!("{}{}[{}]", &stem[..2], i, &stem[2..])
        })
        .collect()
}

fn document(words: usize) -> String {
    let vocabulary = ["alpha", "beta_gamma", "delta-epsilon", "Zeta", "eta42", "theta"];
    (0..words)
        .map(|i| format!("{}{}", vocabulary[i % vocabulary.len()], i % 997))
        .collect::<Vec<_>>()
        .join(" ")
}

fn fuzzy_scoring(c: &mut Criterion) {
    let mut group = c.benchmark_group("fuzzy_scoring");
    let candidates = command_names(5_000);

    group.bench_function("score_5000_candidates", |b| {
        b.iter(|| {
            for candidate in &candidates {
                black_box(fuzzy::score(black_box("sbst"), candidate));
            }
        })
    });

    group.bench_function("match_positions", |b| {
        b.iter(|| black_box(fuzzy::match_positions(black_box("sbst"), "substitute_everything")))
    });

    group.finish();
}

fn provider_ranking(c: &mut Criterion) {
    let mut group = c.benchmark_group("provider_ranking");

    let provider = ExCommandProvider::new(command_names(5_000));
    group.bench_function("ex_command_suggest", |b| {
        b.iter(|| black_box(provider.suggest(black_box("spl"), 8)))
    });

    let text = document(50_000);
    group.bench_function("extract_search_words", |b| {
        b.iter(|| black_box(SearchWordProvider::extract(black_box(&text), 5_000)))
    });

    let words = SearchWordProvider::extract(&text, 5_000);
    group.bench_function("search_word_suggest", |b| {
        b.iter(|| black_box(words.suggest(black_box("eps"), 50)))
    });

    group.finish();
}

criterion_group!(benches, fuzzy_scoring, provider_ranking);
criterion_main!(benches);
