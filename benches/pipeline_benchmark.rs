//! Performance benchmarks for PDF Forms Server
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use pdf_forms_server::form::{fields, FormPart};
use pdf_forms_server::options::PathOrUrl;
use pdf_forms_server::{xml, RawRequest, RenderOptions, Resource, ResourceLookup};
use std::path::PathBuf;

/// Form data with `rows` repeated line items
fn form_data(rows: usize) -> String {
    let mut doc = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<form1 xmlns:xfa=\"http://www.xfa.org/schema/xfa-data/1.0/\">\n",
    );
    for i in 0..rows {
        doc.push_str(&format!(
            "  <item id=\"{i}\"><name>Item &amp; {i}</name><!-- row {i} --><qty>{i}</qty></item>\n"
        ));
    }
    doc.push_str("</form1>\n");
    doc
}

struct FixedTemplates;

impl ResourceLookup for FixedTemplates {
    fn lookup(&self, uri: &str) -> Option<Resource> {
        Some(Resource {
            uri: uri.to_string(),
            location: PathOrUrl::Path(PathBuf::from("/srv/forms").join(uri)),
        })
    }
}

/// Benchmark XML canonicalization across document sizes
fn bench_canonicalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("canonicalize");

    for rows in [10, 1_000, 10_000] {
        let doc = form_data(rows);
        group.throughput(Throughput::Bytes(doc.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(rows), &doc, |b, doc| {
            b.iter(|| xml::canonicalize(black_box(doc.as_bytes())).unwrap());
        });
    }

    let utf16: Vec<u8> = std::iter::once(0xFEFFu16)
        .chain(form_data(1_000).encode_utf16())
        .flat_map(u16::to_le_bytes)
        .collect();
    group.throughput(Throughput::Bytes(utf16.len() as u64));
    group.bench_function("utf16_1000", |b| {
        b.iter(|| xml::canonicalize(black_box(&utf16)).unwrap());
    });

    group.finish();
}

/// Benchmark full option assembly for a render request
fn bench_assemble(c: &mut Criterion) {
    let request = RawRequest::new()
        .with_text(fields::TEMPLATE, "claims/sample.xdp")
        .with(
            fields::DATA,
            FormPart::binary(form_data(100).into_bytes(), None, None),
        )
        .with_text(fields::ACROBAT_VERSION, "Acrobat_10")
        .with_text(fields::CACHE_STRATEGY, "CONSERVATIVE")
        .with_text(fields::RENDER_LOCALE, "en-CA")
        .with_text(fields::SUBMIT_URL, "/submit/a")
        .with_text(fields::SUBMIT_URL, "https://forms.example.com/submit/b")
        .with_text(fields::TAGGED_PDF, "true");

    c.bench_function("assemble_render_options", |b| {
        b.iter(|| RenderOptions::assemble(black_box(&request), &FixedTemplates).unwrap());
    });
}

criterion_group!(benches, bench_canonicalize, bench_assemble);
criterion_main!(benches);
