use criterion::{criterion_group, criterion_main, Criterion};
use lalrun_tests::{g_arithmetic, g_sexpr, lexer};
use std::hint::black_box;

criterion_main!(benches);
criterion_group!(benches, bench_arithmetic, bench_sexpr);

fn long_expression(terms: usize) -> String {
    let mut input = String::from("1");
    for i in 0..terms {
        match i % 3 {
            0 => input.push_str(" + (2 * 3)"),
            1 => input.push_str(" * 1 ** 2"),
            _ => input.push_str(" + ((4))"),
        }
    }
    input
}

fn bench_arithmetic(c: &mut Criterion) {
    let parser = g_arithmetic::parser();

    let mut group = c.benchmark_group("arithmetic");
    for terms in [10, 1_000] {
        let input = long_expression(terms);
        let tokens: Vec<_> = lexer::arithmetic_with_eof(&input)
            .collect::<Result<_, _>>()
            .unwrap();
        group.bench_function(format!("parse/{}", terms), |b| {
            b.iter(|| parser.parse(black_box(tokens.clone())).unwrap());
        });
        group.bench_function(format!("lex+parse/{}", terms), |b| {
            b.iter(|| {
                parser
                    .try_parse(lexer::arithmetic_with_eof(black_box(&input)))
                    .unwrap()
            });
        });
    }
    group.finish();
}

fn bench_sexpr(c: &mut Criterion) {
    let parser = g_sexpr::parser();
    let input = "(define (f x) (g (h x) y)) ".repeat(500);
    c.bench_function("sexpr", |b| {
        b.iter(|| parser.try_parse(g_sexpr::tokens(black_box(&input))).unwrap());
    });
}
