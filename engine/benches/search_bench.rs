use criterion::{criterion_group, criterion_main, Criterion};
use engine::tokenizer::Tokenizer;
use engine::{Document, SearchEngine};

fn corpus(n: u32) -> Vec<Document> {
    (1..=n)
        .map(|id| Document {
            id,
            text: format!(
                "校园 通知 公告 第{id}期 核酸 检测 安排 campus notice bulletin number {id}"
            ),
        })
        .collect()
}

fn bench_tokenize(c: &mut Criterion) {
    let tok = Tokenizer::new();
    let text = "深圳大学 校园 核酸检测点 位置 安排 通知 campus nucleic acid testing site notice";
    c.bench_function("tokenize_mixed_text", |b| b.iter(|| tok.terms(text)));
}

fn bench_search(c: &mut Criterion) {
    let engine = SearchEngine::new();
    engine.rebuild(corpus(500));
    c.bench_function("search_two_terms", |b| b.iter(|| engine.search("核酸 检测")));
}

fn bench_rebuild(c: &mut Criterion) {
    let engine = SearchEngine::new();
    let docs = corpus(200);
    c.bench_function("rebuild_200_docs", |b| b.iter(|| engine.rebuild(docs.clone())));
}

criterion_group!(benches, bench_tokenize, bench_search, bench_rebuild);
criterion_main!(benches);
