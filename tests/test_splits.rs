use nexblocks::model::{ASplit, Compatibility, NexusDocument, SplitsBlock, SplitsFormat, TaxaBlock, TaxaSet};
use nexblocks::nexus::blocks::splits::parse_splits;
use nexblocks::nexus::blocks::TaxaContext;
use nexblocks::parser::{ParsingError, Tokenizer, Warnings};
use nexblocks::{parse_nexus_str, write_nexus_string};

fn five_taxa() -> TaxaBlock {
    TaxaBlock::from_names(["A", "B", "C", "D", "E"]).unwrap()
}

fn parse_body(body: &str) -> Result<SplitsBlock, ParsingError> {
    let taxa = five_taxa();
    let mut tokenizer = Tokenizer::for_str(body);
    let mut warnings = Warnings::new();
    parse_splits(&mut tokenizer, TaxaContext::known(&taxa), &mut warnings)
}

fn taxa_set(taxa: &[usize]) -> TaxaSet {
    let mut set = TaxaSet::new();
    for t in taxa {
        set.insert(*t);
    }
    set
}

#[test]
fn test_parse_splits_with_all_columns() {
    let block = parse_body(
        "DIMENSIONS ntax=5 nsplits=2;
        FORMAT labels weights confidences;
        THRESHOLD=0.1;
        PROPERTIES fit=97.25 weakly compatible;
        CYCLE 1 3 2 5 4;
        MATRIX
            [1, size=2] first 2.5 0.9  1 3,
            [2, size=2] second 0.5 0.4  2 5,
        ;",
    )
    .unwrap();

    assert_eq!(block.nsplits(), 2);
    assert_eq!(block.compatibility(), Compatibility::WeaklyCompatible);
    assert_eq!(block.fit(), Some(97.25));
    assert_eq!(block.threshold(), Some(0.1));
    assert_eq!(block.cycle(), Some(&[1, 3, 2, 5, 4][..]));

    let first = block.get(1).unwrap();
    assert_eq!(first.label.as_deref(), Some("first"));
    assert_eq!(first.weight, 2.5);
    assert_eq!(first.confidence, Some(0.9));
    assert_eq!(first.taxa, taxa_set(&[1, 3]));
}

#[test]
fn test_unweighted_splits_default_to_one() {
    let block = parse_body("FORMAT weights=no; MATRIX 1 2, 3 4 5;").unwrap();
    assert_eq!(block.nsplits(), 2);
    assert_eq!(block.get(2).unwrap().weight, 1.0);
    assert_eq!(block.get(2).unwrap().taxa, taxa_set(&[3, 4, 5]));
}

#[test]
fn test_empty_split_is_fatal() {
    let err = parse_body("MATRIX\n1.0 1 2,\n2.0 ,\n;").unwrap_err();
    assert!(err.is_structural());
    assert_eq!(err.line(), 3);
    assert!(err.to_string().contains("trivial split"));
}

#[test]
fn test_full_split_is_fatal() {
    let err = parse_body("MATRIX\n1.0 5 4 3 2 1,\n;").unwrap_err();
    assert!(err.is_structural());
    assert!(err.to_string().contains("trivial split"));
}

#[test]
fn test_index_out_of_range_is_fatal() {
    let err = parse_body("MATRIX 1.0 1 6, ;").unwrap_err();
    assert!(err.to_string().contains("[1, 5]"));
}

#[test]
fn test_split_count_checked() {
    let err = parse_body("DIMENSIONS nsplits=3; MATRIX 1.0 1 2, 1.0 1 3;").unwrap_err();
    assert!(err.is_structural());
}

#[test]
fn test_cycle_must_be_permutation() {
    let err = parse_body("CYCLE 1 2 2 4 5; MATRIX 1.0 1 2;").unwrap_err();
    assert!(err.is_structural());
    assert!(err.to_string().contains("permutation"));
}

#[test]
fn test_splits_require_known_taxa() {
    let input = "#NEXUS\nBEGIN SPLITS;\nMATRIX 1.0 1 2;\nEND;\n";
    let err = parse_nexus_str(input).unwrap_err();
    assert!(err.is_structural());
}

#[test]
fn test_document_round_trip() {
    let mut block = SplitsBlock::new(5)
        .with_format(SplitsFormat::default().with_labels(true).with_confidences(true))
        .with_compatibility(Compatibility::Cyclic)
        .with_fit(Some(88.5))
        .with_cycle(vec![1, 2, 3, 4, 5]);
    let mut split = ASplit::new(taxa_set(&[1, 2]), 0.75);
    split.label = Some(String::from("Kea and Kaka"));
    split.confidence = Some(1.0);
    block.push(split);
    let mut split = ASplit::new(taxa_set(&[4]), 0.5);
    split.label = Some(String::from("pendant"));
    split.confidence = Some(0.5);
    block.push(split);

    let mut document = NexusDocument::new();
    document.push(five_taxa());
    document.push(block);

    let text = write_nexus_string(&document).unwrap();
    let (read, warnings) = parse_nexus_str(&text).unwrap();
    assert!(warnings.is_empty());
    assert_eq!(read, document);
}

#[test]
fn test_unlabeled_split_round_trips_with_labels() {
    let mut block = SplitsBlock::new(5).with_format(SplitsFormat::default().with_labels(true));
    let mut split = ASplit::new(taxa_set(&[1, 2]), 1.5);
    split.label = Some(String::from("AB"));
    block.push(split);
    block.push(ASplit::new(taxa_set(&[3, 4]), 0.5));

    let mut document = NexusDocument::new();
    document.push(five_taxa());
    document.push(block);

    let text = write_nexus_string(&document).unwrap();
    let (read, warnings) = parse_nexus_str(&text).unwrap();
    assert!(warnings.is_empty());
    assert_eq!(read, document);
}
