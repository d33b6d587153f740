use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use intentbot::ml::{Classifier, HashingVectorizer, Intent, IntentCatalog, SoftmaxClassifier};

fn catalog() -> IntentCatalog {
    IntentCatalog::new(vec![
        Intent::normal(
            0,
            "Where would you like to fly?",
            &["book a flight", "i want to book a flight", "reserve a plane ticket"],
        ),
        Intent::normal(
            1,
            "It will be sunny.",
            &["what is the weather", "weather forecast today", "will it rain tomorrow"],
        ),
        Intent::feedback_yes(2, "Glad I could help!", &["yes", "yes thanks", "correct"]),
        Intent::feedback_no(3, "Sorry about that.", &["no", "wrong", "incorrect"]),
    ])
    .unwrap()
}

fn bench_hashing(c: &mut Criterion) {
    let vectorizer = HashingVectorizer::new(1024).unwrap();
    let question = "i would like to book a flight to paris next tuesday morning";

    c.bench_function("hashing_transform", |b| {
        b.iter(|| black_box(vectorizer.transform(black_box(question)).unwrap()))
    });
}

fn bench_softmax(c: &mut Criterion) {
    let vectorizer = HashingVectorizer::new(1024).unwrap();
    let points = catalog().labeled_points(&vectorizer).unwrap();

    let mut group = c.benchmark_group("softmax");
    group.bench_function("train", |b| {
        b.iter(|| {
            let mut classifier = SoftmaxClassifier::default();
            classifier.train(black_box(&points)).unwrap();
            classifier
        })
    });

    let mut classifier = SoftmaxClassifier::default();
    classifier.train(&points).unwrap();
    let query = vectorizer.transform("book a flight to rome").unwrap();
    group.bench_function("predict", |b| {
        b.iter(|| black_box(classifier.predict(black_box(&query)).unwrap()))
    });
    group.finish();
}

criterion_group!(benches, bench_hashing, bench_softmax);
criterion_main!(benches);
