//! Benchmark – `csvstream::Reader`
#![allow(missing_docs)]

use std::fmt::Write;
use std::time::Duration;

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use csvstream::Reader;
use csvstream::chunk_utils::ChunkedReader;

/// Produce a deterministic CSV document of roughly `rows` records, in the
/// shape of an insurance portfolio export. With `quoted`, every field is
/// wrapped in quotes and some carry escaped quotes and embedded commas.
fn make_csv_payload(rows: usize, quoted: bool) -> String {
    let mut s = String::with_capacity(rows * 96);
    s.push_str("policy_id,county,tiv_2011,tiv_2012,construction,line,lat,lng\n");
    for i in 0..rows {
        let county = if i % 7 == 0 { "ST. JOHNS, \"north\"" } else { "CLAY COUNTY" };
        let tiv = 1000.0 + (i as f64) * 3.25;
        if quoted {
            let county = county.replace('"', "\"\"");
            writeln!(
                s,
                "\"{i}\",\"{county}\",\"{tiv:.2}\",\"{:.2}\",\"Wood\",\"Residential\",\"30.10\",\"-81.71\"",
                tiv * 1.1
            )
            .unwrap();
        } else {
            let county = county.replace(['"', ','], "");
            writeln!(
                s,
                "{i},{county},{tiv:.2},{:.2},Wood,Residential,30.10,-81.71",
                tiv * 1.1
            )
            .unwrap();
        }
    }
    s
}

/// Read every row, returning the total field count so the work can not be
/// optimised away.
fn count_fields<R: std::io::Read>(mut reader: Reader<R>) -> usize {
    let mut fields = 0;
    while let Some(row) = reader.read().expect("valid csv") {
        fields += row.len();
    }
    fields
}

fn bench_reader(c: &mut Criterion) {
    let mut group = c.benchmark_group("reader");

    for &quoted in &[false, true] {
        let payload = make_csv_payload(10_000, quoted);
        let name = if quoted { "quoted" } else { "plain" };
        group.throughput(Throughput::Bytes(payload.len() as u64));

        group.bench_with_input(BenchmarkId::new("slice", name), &payload, |b, p| {
            b.iter(|| black_box(count_fields(Reader::new(black_box(p.as_bytes())))));
        });

        for &chunk in &[64usize, 4096] {
            group.bench_with_input(
                BenchmarkId::new(format!("chunked_{chunk}"), name),
                &payload,
                |b, p| {
                    b.iter(|| {
                        let source = ChunkedReader::new(black_box(p.as_bytes()), chunk);
                        black_box(count_fields(Reader::new(source)))
                    });
                },
            );
        }
    }
    group.finish();
}

fn criterion() -> Criterion {
    let mut c = Criterion::default();
    if cfg!(feature = "bench-fast") {
        c = c
            .warm_up_time(Duration::from_millis(10))
            .measurement_time(Duration::from_millis(100))
            .sample_size(10);
    } else {
        c = c
            .warm_up_time(Duration::from_secs(3))
            .measurement_time(Duration::from_secs(10));
    }
    c
}

criterion_group! { name = benches; config = criterion(); targets = bench_reader }
criterion_main!(benches);
