use std::fmt::Write;
use std::path::PathBuf;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use mockexam_core::parser::{parse_bank_str, validate_bank};

fn make_bank_toml(n: usize) -> String {
    let mut toml = String::from(
        r#"
[bank]
id = "bench"
name = "Bench bank"
subject = "physics"
year = "2022"
"#,
    );
    for i in 0..n {
        let _ = write!(
            toml,
            r#"
[[questions]]
id = "phy-{i:04}"
prompt = "A body of mass {i} kg moves with constant velocity. The net force on it is"
options = ["zero", "{i} N", "9.8 N", "cannot be determined"]
answer = 0
tags = ["mechanics", "newton-laws"]
"#
        );
    }
    toml
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_bank");
    let path = PathBuf::from("bench.toml");

    for n in [30usize, 500] {
        let toml = make_bank_toml(n);
        group.bench_function(format!("questions={n}"), |b| {
            b.iter(|| parse_bank_str(black_box(&toml), &path))
        });
    }

    group.finish();
}

fn bench_validate(c: &mut Criterion) {
    let bank = parse_bank_str(&make_bank_toml(500), &PathBuf::from("bench.toml"))
        .expect("bench bank should parse");
    c.bench_function("validate_bank questions=500", |b| {
        b.iter(|| validate_bank(black_box(&bank)))
    });
}

criterion_group!(benches, bench_parse, bench_validate);
criterion_main!(benches);
