use nexblocks::model::{DistancesBlock, DistancesFormat, NexusDocument, TaxaBlock, Triangle};
use nexblocks::nexus::blocks::distances::{parse_distances, write_distances};
use nexblocks::nexus::blocks::TaxaContext;
use nexblocks::nexus::NexusWriter;
use nexblocks::parser::{Tokenizer, Warnings};
use nexblocks::{parse_nexus_str, write_nexus_string};

fn taxa(n: usize) -> TaxaBlock {
    TaxaBlock::from_names((1..=n).map(|i| format!("taxon{i}"))).unwrap()
}

fn parse_body(taxa: &TaxaBlock, body: &str) -> (DistancesBlock, Warnings) {
    let mut tokenizer = Tokenizer::for_str(body);
    let mut warnings = Warnings::new();
    let parsed = parse_distances(&mut tokenizer, TaxaContext::known(taxa), &mut warnings).unwrap();
    (parsed.block, warnings)
}

/// Block with d(i, j) = i * j + 0.5 for i != j.
fn sample(n: usize) -> DistancesBlock {
    let mut block = DistancesBlock::new(n);
    for i in 1..=n {
        for j in (i + 1)..=n {
            block.set(i, j, (i * j) as f64 + 0.5);
        }
    }
    block
}

#[test]
fn test_asymmetric_matrix_averaged() {
    let (block, warnings) = parse_body(
        &taxa(2),
        "FORMAT triangle=both;
        MATRIX
            taxon1 0 3
            taxon2 5 0
        ;",
    );

    assert_eq!(block.get(1, 2), 4.0);
    assert_eq!(block.get(2, 1), 4.0);
    assert_eq!(warnings.len(), 1);
    assert!(warnings.any_mentions("symmetrized"));
}

#[test]
fn test_upper_triangle_without_diagonal() {
    let (block, warnings) = parse_body(
        &taxa(3),
        "FORMAT triangle=upper nodiagonal;
        MATRIX
            taxon1 1 2
            taxon2 3
            taxon3
        ;",
    );

    assert!(warnings.is_empty());
    assert_eq!(block.get(1, 1), 0.0);
    assert_eq!(block.get(3, 1), 2.0);
    assert_eq!(block.get(3, 2), 3.0);
    assert_eq!(block.format().triangle, Triangle::Upper);
    assert!(!block.format().diagonal);
}

#[test]
fn test_rows_in_any_order() {
    let (block, _) = parse_body(
        &taxa(3),
        "FORMAT triangle=lower;
        MATRIX
            taxon3 2 3 0
            taxon1 0
            taxon2 1 0
        ;",
    );
    assert_eq!(block.get(1, 3), 2.0);
    assert_eq!(block.get(2, 3), 3.0);
}

#[test]
fn test_repeated_row_is_fatal() {
    let taxa = taxa(2);
    let mut tokenizer = Tokenizer::for_str("FORMAT triangle=both; MATRIX taxon1 0 1 taxon1 1 0;");
    let mut warnings = Warnings::new();
    let err = parse_distances(&mut tokenizer, TaxaContext::known(&taxa), &mut warnings).unwrap_err();
    assert!(err.is_structural());
}

#[test]
fn test_variance_matrix() {
    let (block, _) = parse_body(
        &taxa(2),
        "FORMAT triangle=lower nodiagonal variance;
        MATRIX
            taxon1
            taxon2 1.5
        ;
        VARMATRIX
            taxon1
            taxon2 0.01
        ;",
    );
    assert!(block.has_variances());
    assert_eq!(block.variance(2, 1), Some(0.01));
    assert!(block.format().variance);
}

#[test]
fn test_all_modes_reproduce_entries() {
    let n = 5;
    let taxa = taxa(n);
    let block = sample(n);

    for triangle in [Triangle::Lower, Triangle::Upper, Triangle::Both] {
        for diagonal in [true, false] {
            for labels in [true, false] {
                let format = DistancesFormat::default()
                    .with_triangle(triangle)
                    .with_diagonal(diagonal)
                    .with_labels(labels);
                let mut writer = NexusWriter::new(Vec::new());
                write_distances(&mut writer, &taxa, &block, &format).unwrap();
                let text = String::from_utf8(writer.into_inner()).unwrap();

                let (read, warnings) = parse_body(&taxa, &text);
                assert!(warnings.is_empty(), "{text}");
                assert_eq!(read.format(), &format, "{text}");
                for i in 1..=n {
                    for j in 1..=n {
                        assert_eq!(read.get(i, j), block.get(i, j), "d({i}, {j}) of\n{text}");
                    }
                }
            }
        }
    }
}

#[test]
fn test_document_round_trip() {
    let mut document = NexusDocument::new();
    document.push(taxa(4));
    document.push(sample(4).with_format(DistancesFormat::default().with_triangle(Triangle::Lower)));

    let text = write_nexus_string(&document).unwrap();
    let (read, _) = parse_nexus_str(&text).unwrap();
    assert_eq!(read, document);
}
