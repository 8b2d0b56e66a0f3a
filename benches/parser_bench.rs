// benches/parser_bench.rs
use criterion::{black_box, criterion_group, criterion_main, Criterion};

use discount_finder::parsers::stores::{IconicParser, JbHifiParser};
use discount_finder::{price, SourceParser};

fn iconic_page(items: usize) -> String {
    let cards: String = (0..items)
        .map(|i| {
            format!(
                r#"<div class="product"><a href="/item-{i}.html"><span class="brand">Brand {i}</span><span class="name">Item {i}</span></a><span class="price original">${}.00</span><span class="price final">${}.00</span></div>"#,
                100 + i,
                60 + i
            )
        })
        .collect();
    format!("<html><body><div class=\"catalog\">{}</div></body></html>", cards)
}

fn jbhifi_page(items: usize) -> String {
    let cards: String = (0..items)
        .map(|i| {
            // Every third card has no labels and goes through the price scan.
            if i % 3 == 0 {
                format!(
                    r#"<div class="product-tile"><a href="/products/p{i}" title="Sony Speaker {i}"></a><div><span>${}</span><span>${}</span></div></div>"#,
                    300 + i,
                    200 + i
                )
            } else {
                format!(
                    r#"<div class="product-tile"><a href="/products/p{i}"><span class="product-title">JBL Flip {i}</span></a><span class="price-was">${}</span><span class="price-sale">${}</span></div>"#,
                    250 + i,
                    150 + i
                )
            }
        })
        .collect();
    format!("<html><body>{}</body></html>", cards)
}

fn bench_parsers(c: &mut Criterion) {
    let iconic = IconicParser::new();
    let iconic_doc = iconic_page(120);
    c.bench_function("iconic_parse_120", |b| {
        b.iter(|| {
            let records = iconic.parse(black_box(&iconic_doc), "Jeans");
            black_box(records.len())
        })
    });

    let jbhifi = JbHifiParser::new();
    let jbhifi_doc = jbhifi_page(60);
    c.bench_function("jbhifi_parse_60", |b| {
        b.iter(|| {
            let records = jbhifi.parse(black_box(&jbhifi_doc), "Speakers");
            black_box(records.len())
        })
    });
}

fn bench_prices(c: &mut Criterion) {
    c.bench_function("clean_and_discount", |b| {
        b.iter(|| {
            let current = price::clean_price(black_box("Now $1,299.95 AUD"));
            let original = price::clean_price(black_box("Was $1,899.00"));
            black_box(price::discount_percent(&current, &original))
        })
    });
}

criterion_group!(benches, bench_parsers, bench_prices);
criterion_main!(benches);
