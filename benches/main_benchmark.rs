use sqrtfloat::{BigInt, Float, Lfsr};

fn sqrt2(prec: usize) {
    let x = Float::from_u64(prec, 2);
    let _ = black_box(x.sqrt());
}

fn test_sqrt_native_values() {
    let mut lfsr = Lfsr::new();
    for _ in 0..100 {
        let v = f64::from_bits(lfsr.next_u64() >> 2);
        let _ = black_box(Float::from_f64(v).sqrt());
    }
}

fn test_parse() {
    black_box(Float::parse(1000, "1.7320508075688772935274463415058723669428052538103806280558069794519330169088000370811461867572485756756261414154067030299699450949989524788116555120943736485280932319023055820679748201010846749232650153123432669033228866506722546689218379712270471316603678615880190499865373798593894676503475065760507566183481296061009476021871903250831458295239598").ok());
}

fn test_bigint_div() {
    let mut a = BigInt::one_hot(2000);
    let b = BigInt::from_u64(5).powi(300);
    black_box(a.inplace_div(&b));
}

use criterion::{black_box, criterion_group, criterion_main, Criterion};

pub fn criterion_benchmark(c: &mut Criterion) {
    c.bench_function("sqrt2_prec53", |b| b.iter(|| sqrt2(53)));
    c.bench_function("sqrt2_prec100", |b| b.iter(|| sqrt2(100)));
    c.bench_function("sqrt2_prec1000", |b| b.iter(|| sqrt2(1000)));
    c.bench_function("sqrt2_prec10000", |b| b.iter(|| sqrt2(10000)));
    c.bench_function("sqrt_native_values", |b| b.iter(test_sqrt_native_values));
    c.bench_function("parse_prec1000", |b| b.iter(test_parse));
    c.bench_function("bigint_div", |b| b.iter(test_bigint_div));
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
