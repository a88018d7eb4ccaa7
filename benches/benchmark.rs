use criterion::{Criterion, criterion_group, criterion_main};
use nexblocks::{parse_nexus_str, write_nexus_string};
use std::fmt::Write;

const REGRESSION_SIZES: &[(&str, usize, usize)] = &[
    ("n20-c500", 20, 500),
    ("n100-c1k", 100, 1_000),
];

const REPORTING_SIZES: &[(&str, usize, usize)] = &[("n400-c5k", 400, 5_000)];

/// Document with DNA characters, full distances and a caterpillar tree over
/// `ntax` taxa, laid out interleaved in blocks of 60 columns.
fn generate_document(ntax: usize, nchar: usize) -> String {
    let bases = ['a', 'c', 'g', 't'];
    let mut text = String::from("#NEXUS\n");

    writeln!(text, "BEGIN TAXA;\n\tDIMENSIONS ntax={ntax};\n\tTAXLABELS").unwrap();
    for t in 1..=ntax {
        writeln!(text, "\t\ttaxon_{t}").unwrap();
    }
    text.push_str("\t;\nEND;\n");

    writeln!(text, "BEGIN CHARACTERS;\n\tDIMENSIONS nchar={nchar};").unwrap();
    text.push_str("\tFORMAT datatype=dna interleave;\n\tMATRIX\n");
    for start in (0..nchar).step_by(60) {
        for t in 1..=ntax {
            write!(text, "\t\ttaxon_{t} ").unwrap();
            for c in start..(start + 60).min(nchar) {
                text.push(bases[(t * 7 + c * 13 + c / 5) % 4]);
            }
            text.push('\n');
        }
        text.push('\n');
    }
    text.push_str("\t;\nEND;\n");

    text.push_str("BEGIN DISTANCES;\n\tFORMAT triangle=both;\n\tMATRIX\n");
    for i in 1..=ntax {
        write!(text, "\t\ttaxon_{i}").unwrap();
        for j in 1..=ntax {
            let d = if i == j { 0.0 } else { (i + j) as f64 / ntax as f64 };
            write!(text, " {d}").unwrap();
        }
        text.push('\n');
    }
    text.push_str("\t;\nEND;\n");

    text.push_str("BEGIN TREES;\n\tTREE caterpillar = [&R] ");
    let mut newick = String::from("taxon_1:0.5");
    for t in 2..=ntax {
        newick = format!("({newick},taxon_{t}:0.25):0.1");
    }
    writeln!(text, "{newick};\nEND;").unwrap();
    text
}

fn nexus_parsing(c: &mut Criterion) {
    for (name, ntax, nchar) in REGRESSION_SIZES {
        let text = generate_document(*ntax, *nchar);
        c.bench_function(&format!("parse {name}"), |b| {
            b.iter(|| parse_nexus_str(&text).unwrap());
        });
    }
}

fn nexus_writing(c: &mut Criterion) {
    for (name, ntax, nchar) in REGRESSION_SIZES {
        let (document, _) = parse_nexus_str(&generate_document(*ntax, *nchar)).unwrap();
        c.bench_function(&format!("write {name}"), |b| {
            b.iter(|| write_nexus_string(&document).unwrap());
        });
    }
}

fn nexus_reporting(c: &mut Criterion) {
    for (name, ntax, nchar) in REPORTING_SIZES {
        let text = generate_document(*ntax, *nchar);
        c.bench_function(name, |b| {
            b.iter(|| parse_nexus_str(&text).unwrap());
        });
    }
}

criterion_group!(regression, nexus_parsing, nexus_writing);
criterion_group! {
    name = reporting;
    config = Criterion::default().sample_size(10);
    targets = nexus_reporting
}
criterion_main!(regression, reporting);
