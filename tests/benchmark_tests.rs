use criterion::{black_box, criterion_group, criterion_main, Criterion};
use sori_core::{infer_language, SynthesisRequest};
use sori_engine::{encode_wav, SpeakerCatalog};

fn bench_language_inference(c: &mut Criterion) {
    let ascii: String = "the quick brown fox jumps over the lazy dog ".repeat(25);
    let hangul: String = "다람쥐 헌 쳇바퀴에 타고파 ".repeat(40);

    c.bench_function("infer_language_ascii_1k", |b| {
        b.iter(|| infer_language(black_box(&ascii), "ko", "en"))
    });

    c.bench_function("infer_language_hangul_1k", |b| {
        b.iter(|| infer_language(black_box(&hangul), "ko", "en"))
    });
}

fn bench_request_parsing(c: &mut Criterion) {
    let body = r#"{"text": ["Hello", "world"], "language": "en", "parameters": {"speaker": "alpha", "prompt": "Natural speech"}}"#;

    c.bench_function("parse_synthesis_request", |b| {
        b.iter(|| {
            let request: SynthesisRequest = serde_json::from_str(black_box(body)).unwrap();
            request.text()
        })
    });
}

fn bench_wav_encoding(c: &mut Criterion) {
    // One second of audio at 24 kHz
    let samples: Vec<f32> = (0..24_000).map(|i| ((i as f32) * 0.01).sin() * 0.8).collect();

    c.bench_function("encode_wav_1s_24khz", |b| {
        b.iter(|| encode_wav(black_box(&samples), 24_000).unwrap())
    });
}

fn bench_catalog_resolve(c: &mut Criterion) {
    let speakers: Vec<String> = (0..100).map(|i| format!("speaker-{:03}", i)).collect();
    let catalog = SpeakerCatalog::new(speakers).unwrap();

    c.bench_function("catalog_resolve_100", |b| {
        b.iter(|| catalog.resolve(black_box("speaker-099")))
    });
}

criterion_group!(
    benches,
    bench_language_inference,
    bench_request_parsing,
    bench_wav_encoding,
    bench_catalog_resolve
);
criterion_main!(benches);
