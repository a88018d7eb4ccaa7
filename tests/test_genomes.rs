use nexblocks::model::{Genome, GenomePart, GenomesBlock, GenomesFormat, NexusDocument, PartContent, TaxaBlock};
use nexblocks::nexus::blocks::genomes::parse_genomes;
use nexblocks::nexus::blocks::TaxaContext;
use nexblocks::parser::{ParsingError, ParsingErrorType, Tokenizer, Warnings};
use nexblocks::{parse_nexus_str, write_nexus_string};

fn ab() -> TaxaBlock {
    TaxaBlock::from_names(["A", "B"]).unwrap()
}

fn parse_body(body: &str) -> Result<GenomesBlock, ParsingError> {
    let taxa = ab();
    let mut tokenizer = Tokenizer::for_str(body);
    let mut warnings = Warnings::new();
    parse_genomes(&mut tokenizer, TaxaContext::known(&taxa), &mut warnings).map(|parsed| parsed.block)
}

#[test]
fn test_inline_and_file_parts() {
    let block = parse_body(
        "DIMENSIONS ntax=2;
        FORMAT labels multiPart files;
        MATRIX
            B length=4 parts=1 sequence=acgt,
            A length=110 parts=2
                name=chr1 sequence=aaaaaaaaaa
                name=chr2 file='genomes/a.fasta' offset=40 size=100
        ;",
    )
    .unwrap();

    assert_eq!(block.ntax(), 2);
    let a = block.get(1).unwrap();
    assert_eq!(a.length(), 110);
    assert_eq!(a.parts[0].name.as_deref(), Some("chr1"));
    assert_eq!(
        a.parts[1].content,
        PartContent::File {
            path: String::from("genomes/a.fasta"),
            offset: 40,
            size: 100
        }
    );
    assert_eq!(block.get(2).unwrap().parts[0].content, PartContent::Sequence(String::from("acgt")));
}

#[test]
fn test_length_must_match_parts() {
    let err = parse_body("MATRIX\nA length=4 sequence=acgt,\nB length=5 sequence=acgt\n;").unwrap_err();
    assert!(err.is_structural());
    assert_eq!(err.line(), 3);
    assert!(err.to_string().contains("length 5"));
}

#[test]
fn test_several_parts_require_multipart() {
    let err = parse_body("MATRIX A length=2 parts=2 sequence=a sequence=c, B length=1 sequence=g;").unwrap_err();
    assert!(err.to_string().contains("MULTIPART"));
}

#[test]
fn test_part_count_beyond_parts_is_an_error() {
    let err = parse_body(
        "FORMAT multiPart;
        MATRIX A length=3 parts=18446744073709551615 sequence=acg, B length=1 sequence=g;",
    )
    .unwrap_err();
    assert!(matches!(err.kind(), ParsingErrorType::Lexical(_)));
    assert_eq!(err.line(), 2);
}

#[test]
fn test_file_parts_require_files() {
    let err = parse_body("MATRIX A length=3 file=a.fa offset=0 size=3, B length=1 sequence=g;").unwrap_err();
    assert!(err.to_string().contains("FILES"));
}

#[test]
fn test_document_round_trip() {
    let genomes = vec![
        Genome::new(vec![
            GenomePart::sequence("acgtacgt").with_name("plasmid"),
            GenomePart::file("data/chromosome 1.fa", 1024, 5000).with_name("chr1"),
        ]),
        Genome::new(vec![GenomePart::sequence("ttga")]),
    ];
    let format = GenomesFormat::default().with_multi_part(true).with_files(true);

    let mut document = NexusDocument::new();
    document.push(ab());
    document.push(GenomesBlock::new(genomes).with_format(format));

    let text = write_nexus_string(&document).unwrap();
    let (read, warnings) = parse_nexus_str(&text).unwrap();
    assert!(warnings.is_empty());
    assert_eq!(read, document);
    assert_eq!(read.genomes().unwrap().get(1).unwrap().length(), 5008);
}
