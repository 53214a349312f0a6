//! # Ruleset Validation Benchmarks
//!
//! Measures validation throughput of a realistic ruleset:
//! - valid instances (every subject evaluated)
//! - invalid instances in fail-fast and exhaustive mode
//! - single-rule cost per kind

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use itertools::Itertools;
use layerkit::functional::prelude::*;
use std::time::Duration;

/// Test data structure for benchmarking
#[derive(Debug, Clone)]
pub struct BenchmarkPerson {
    pub id: u32,
    pub name: Option<String>,
    pub email: String,
    pub age: u32,
    pub joined: i64,
    pub left: Option<i64>,
}

impl BenchmarkPerson {
    pub fn new(id: u32) -> Self {
        Self {
            id,
            name: if id % 7 == 0 { None } else { Some(format!("Person {}", id)) },
            email: if id % 5 == 0 {
                format!("person{}", id)
            } else {
                format!("person{}@example.com", id)
            },
            age: 20 + (id % 90),
            joined: 2000 + i64::from(id % 20),
            left: (id % 3 == 0).then_some(2030),
        }
    }
}

pub fn generate_test_data(size: usize) -> Vec<BenchmarkPerson> {
    (0..size).map(|i| BenchmarkPerson::new(i as u32)).collect_vec()
}

fn person_rules(config: ValidationConfig) -> Ruleset<BenchmarkPerson> {
    Ruleset::builder()
        .property("Name", |p: &BenchmarkPerson| p.name.clone())
        .property("Email", |p: &BenchmarkPerson| p.email.clone())
        .property("Age", |p: &BenchmarkPerson| p.age)
        .property("Joined", |p: &BenchmarkPerson| p.joined)
        .property("Left", |p: &BenchmarkPerson| p.left)
        .subject(RulesetSubject::new(
            "Name",
            vec![Rule::is_not_null(), Rule::min_length(2), Rule::max_length(100)],
        ))
        .subject(RulesetSubject::new("Email", vec![Rule::email(false), Rule::max_length(255)]))
        .subject(RulesetSubject::new("Age", vec![Rule::range(18, 100)]))
        .subject(RulesetSubject::new("Joined", vec![Rule::greater_than_subject("Left")]))
        .config(config)
        .build()
        .expect("benchmark ruleset is well formed")
}

/// Benchmark: Ruleset validation across data sizes
pub fn benchmark_ruleset_validation(c: &mut Criterion) {
    let mut group = c.benchmark_group("ruleset_validation");
    group.measurement_time(Duration::from_secs(5));

    let fail_fast = person_rules(ValidationConfig::default());
    let exhaustive = person_rules(ValidationConfig::exhaustive());
    let sink = |_: &str| {};

    for size in [100, 1000, 10000].iter() {
        let data = generate_test_data(*size);

        group.bench_with_input(BenchmarkId::new("fail_fast", size), &data, |b, data| {
            b.iter(|| {
                let valid = data
                    .iter()
                    .filter(|p| fail_fast.is_valid(p, &sink).unwrap_or(false))
                    .count();
                black_box(valid)
            })
        });

        group.bench_with_input(BenchmarkId::new("exhaustive", size), &data, |b, data| {
            b.iter(|| {
                let errors: usize = data
                    .iter()
                    .filter_map(|p| exhaustive.validate(p, &sink).ok())
                    .map(|outcome| outcome.error_messages().len())
                    .sum();
                black_box(errors)
            })
        });
    }

    group.finish();
}

/// Benchmark: Cost of individual rules
pub fn benchmark_single_rules(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_rules");

    let cases = [
        ("min", Rule::min(10), RuleValue::from(42)),
        ("range", Rule::range(1, 100), RuleValue::from(42)),
        ("max_length", Rule::max_length(64), RuleValue::from("a reasonably short name")),
        ("email", Rule::email(false), RuleValue::from("someone@example.com")),
        ("currency", Rule::currency(), RuleValue::from(19.99)),
    ];

    for (name, rule, value) in cases.iter() {
        group.bench_function(*name, |b| b.iter(|| black_box(rule.validate(black_box(value)))));
    }

    group.finish();
}

criterion_group!(benches, benchmark_ruleset_validation, benchmark_single_rules);

criterion_main!(benches);
