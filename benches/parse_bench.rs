use criterion::{Criterion, black_box, criterion_group, criterion_main};

use vatid::core::*;

const SAMPLES: &[&str] = &[
    "DE123456789",
    "ATU12345678",
    "FR12345678901",
    "NL822010690B01",
    "GB123456789",
    "ESX1234567X",
    "IE1234567FA",
    "AU51824753556",
    "CHE123456789MWST",
    "XI123456789",
];

fn bench_parse_single(c: &mut Criterion) {
    c.bench_function("parse_de", |b| {
        b.iter(|| black_box(VatId::parse(black_box("DE123456789"))));
    });
}

fn bench_parse_messy_input(c: &mut Criterion) {
    c.bench_function("parse_whitespace_lowercase", |b| {
        b.iter(|| black_box(VatId::parse(black_box("  nl 8220 1069 0b01 \t"))));
    });
}

fn bench_parse_all_samples(c: &mut Criterion) {
    c.bench_function("parse_10_countries", |b| {
        b.iter(|| {
            for raw in SAMPLES {
                let _ = black_box(VatId::parse(black_box(raw)));
            }
        });
    });
}

fn bench_parse_rejections(c: &mut Criterion) {
    c.bench_function("parse_unknown_country", |b| {
        b.iter(|| black_box(VatId::parse(black_box("ZZ123456789"))));
    });
    c.bench_function("parse_bad_abn_checksum", |b| {
        b.iter(|| black_box(VatId::parse(black_box("AU41824753556"))));
    });
}

fn bench_abn_checksum(c: &mut Criterion) {
    c.bench_function("abn_checksum", |b| {
        b.iter(|| black_box(is_valid_abn(black_box("51824753556"))));
    });
}

fn bench_route(c: &mut Criterion) {
    let validator = Validator::new();
    let ids: Vec<VatId> = SAMPLES.iter().map(|s| VatId::must_parse(s)).collect();
    c.bench_function("route_10_ids", |b| {
        b.iter(|| {
            for id in &ids {
                black_box(validator.route_for(black_box(id)));
            }
        });
    });
}

criterion_group!(
    benches,
    bench_parse_single,
    bench_parse_messy_input,
    bench_parse_all_samples,
    bench_parse_rejections,
    bench_abn_checksum,
    bench_route,
);
criterion_main!(benches);
