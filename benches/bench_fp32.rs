use std::hint::black_box;
use std::str::FromStr;

use criterion::{Criterion, criterion_group, criterion_main};
use fixq::FixedPoint32;

fn bench_addition(c: &mut Criterion) {
    c.bench_function("fp32_addition", |b| {
        let x = FixedPoint32::from_str("123.456789").unwrap();
        let y = FixedPoint32::from_str("987.654321").unwrap();
        b.iter(|| black_box(black_box(x) + black_box(y)));
    });
}

fn bench_subtraction(c: &mut Criterion) {
    c.bench_function("fp32_subtraction", |b| {
        let x = FixedPoint32::from_str("987.654321").unwrap();
        let y = FixedPoint32::from_str("123.456789").unwrap();
        b.iter(|| black_box(black_box(x) - black_box(y)));
    });
}

fn bench_multiplication(c: &mut Criterion) {
    c.bench_function("fp32_multiplication", |b| {
        let x = FixedPoint32::from_str("123.456789").unwrap();
        let y = FixedPoint32::from_str("9.876543").unwrap();
        b.iter(|| black_box(black_box(x) * black_box(y)));
    });
}

fn bench_multiplication_saturating(c: &mut Criterion) {
    c.bench_function("fp32_multiplication_saturating", |b| {
        let x = FixedPoint32::from_int(30000);
        let y = FixedPoint32::from_int(-20000);
        b.iter(|| black_box(black_box(x) * black_box(y)));
    });
}

fn bench_checked_multiplication(c: &mut Criterion) {
    c.bench_function("fp32_checked_multiplication", |b| {
        let x = FixedPoint32::from_str("123.456789").unwrap();
        let y = FixedPoint32::from_str("9.876543").unwrap();
        b.iter(|| black_box(black_box(x).checked_mul(black_box(y))));
    });
}

fn bench_shaping(c: &mut Criterion) {
    c.bench_function("fp32_abs_floor_ceil", |b| {
        let x = FixedPoint32::from_str("-123.456789").unwrap();
        b.iter(|| {
            let v = black_box(x);
            black_box((v.abs(), v.floor(), v.ceil()))
        });
    });
}

fn bench_clamp01(c: &mut Criterion) {
    c.bench_function("fp32_clamp01", |b| {
        let x = FixedPoint32::from_str("0.75").unwrap();
        b.iter(|| black_box(black_box(x).clamp01()));
    });
}

fn bench_parsing(c: &mut Criterion) {
    c.bench_function("fp32_parsing", |b| {
        b.iter(|| black_box(FixedPoint32::from_str(black_box("123.456789")).unwrap()));
    });
}

fn bench_formatting(c: &mut Criterion) {
    c.bench_function("fp32_formatting", |b| {
        let d = FixedPoint32::from_str("123.456789").unwrap();
        b.iter(|| black_box(format!("{}", d)));
    });
}

fn bench_to_decimal(c: &mut Criterion) {
    c.bench_function("fp32_to_decimal", |b| {
        let d = FixedPoint32::from_str("123.456789").unwrap();
        b.iter(|| black_box(black_box(d).to_decimal()));
    });
}

fn bench_sum(c: &mut Criterion) {
    c.bench_function("fp32_sum_1000_values", |b| {
        let values: Vec<FixedPoint32> = (0..1000).map(|i| FixedPoint32::from_raw(i * 6553)).collect();
        b.iter(|| black_box(values.iter().copied().sum::<FixedPoint32>()));
    });
}

fn bench_binary_write_read(c: &mut Criterion) {
    c.bench_function("fp32_binary_write_read", |b| {
        let d = FixedPoint32::from_str("123.456789").unwrap();
        let mut buf = [0u8; 4];
        b.iter(|| {
            d.try_write_le_bytes(&mut buf).unwrap();
            black_box(FixedPoint32::try_read_le_bytes(&buf).unwrap())
        });
    });
}

fn bench_comparison(c: &mut Criterion) {
    c.bench_function("fp32_comparison", |b| {
        let x = FixedPoint32::from_str("123.456789").unwrap();
        let y = FixedPoint32::from_str("123.4568").unwrap();
        b.iter(|| black_box(black_box(x) < black_box(y)));
    });
}

fn bench_simulation_tick(c: &mut Criterion) {
    c.bench_function("fp32_simulation_tick_1000", |b| {
        let gravity = FixedPoint32::from_str("-9.81").unwrap();
        let drag = FixedPoint32::from_str("0.99").unwrap();
        let dt = FixedPoint32::from_str("0.016").unwrap();
        b.iter(|| {
            let mut position = FixedPoint32::ZERO;
            let mut velocity = FixedPoint32::from_int(20);
            for _ in 0..1000 {
                velocity = (velocity + gravity * dt) * drag;
                position += velocity * dt;
            }
            black_box(position)
        });
    });
}

criterion_group!(
    benches,
    bench_addition,
    bench_subtraction,
    bench_multiplication,
    bench_multiplication_saturating,
    bench_checked_multiplication,
    bench_shaping,
    bench_clamp01,
    bench_parsing,
    bench_formatting,
    bench_to_decimal,
    bench_sum,
    bench_binary_write_read,
    bench_comparison,
    bench_simulation_tick,
);

criterion_main!(benches);
