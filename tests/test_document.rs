use nexblocks::model::{BlockKind, DataType, NexusDocument, TaxaBlock};
use nexblocks::nexus::NexusReaderBuilder;
use nexblocks::parser::ParsingErrorType;
use nexblocks::{parse_nexus_str, write_nexus_string};

const FULL_DOCUMENT: &str = "#NEXUS
[ written by hand ]
BEGIN TAXA;
    TITLE Birds;
    DIMENSIONS ntax=4;
    TAXLABELS Kea Kaka 'Hihi bird' Tui;
END;

BEGIN CHARACTERS;
    LINK TAXA = Birds;
    DIMENSIONS nchar=6;
    FORMAT datatype=dna missing=? gap=-;
    MATRIX
        Kea          acgtac
        Kaka         acgtaa
        'Hihi bird'  ac-tac
        Tui          tcgt?c
    ;
END;

BEGIN DISTANCES;
    DIMENSIONS ntax=4;
    FORMAT triangle=lower nodiagonal;
    MATRIX
        Kea
        Kaka         1
        'Hihi bird'  2 3
        Tui          4 5 6
    ;
END;

BEGIN SPLITS;
    DIMENSIONS ntax=4 nsplits=2;
    FORMAT labels=no weights=yes confidences=no;
    PROPERTIES fit=99.5 compatible;
    CYCLE 1 2 3 4;
    MATRIX
        1.5  1 2,
        0.25 1 4,
    ;
END;

BEGIN TREES;
    TRANSLATE
        1 Kea,
        2 Kaka,
        3 'Hihi bird',
        4 Tui
    ;
    TREE first = [&U] ((1:1,2:2):0.5,3:1,4:1);
    TREE second = [&U] ((1:1,3:2):0.5,2:1,4:1);
END;

BEGIN NETWORK;
    DIMENSIONS nNodes=3 nEdges=2;
    TYPE HaplotypeNetwork;
    NODES
        id=1 label=Kea,
        id=2,
        id=3 label=Tui
    ;
    EDGES
        id=1 sid=1 tid=2 weight=2,
        id=2 sid=2 tid=3
    ;
END;

BEGIN TRAITS;
    DIMENSIONS ntraits=2;
    FORMAT labels=yes missing=? separator=whitespace;
    TRAITLABELS Mass Colour;
    MATRIX
        Kea          1.1 green
        Kaka         0.5 brown
        'Hihi bird'  ?   yellow
        Tui          0.9 green
    ;
END;

BEGIN ANALYSIS;
    RESULT 'Kea''s result';
END;
";

fn read_ok(input: &str) -> NexusDocument {
    let (document, warnings) = parse_nexus_str(input).unwrap();
    assert!(warnings.is_empty(), "unexpected warnings: {:?}", warnings);
    document
}

// --- READING ---
#[test]
fn test_read_full_document() {
    let document = read_ok(FULL_DOCUMENT);

    assert_eq!(document.len(), 8);
    let kinds: Vec<BlockKind> = document.blocks().iter().map(|b| b.kind()).collect();
    assert_eq!(
        kinds,
        vec![
            BlockKind::Taxa,
            BlockKind::Characters,
            BlockKind::Distances,
            BlockKind::Splits,
            BlockKind::Trees,
            BlockKind::Network,
            BlockKind::Traits,
            BlockKind::Analysis,
        ]
    );

    let taxa = document.taxa().unwrap();
    assert_eq!(taxa.name(3), Some("Hihi bird"));
    assert_eq!(document.blocks()[0].title.as_deref(), Some("Birds"));
    assert_eq!(document.blocks()[1].links[0].title, "Birds");

    assert_eq!(document.characters().unwrap().row_string(4), "tcgt?c");
    assert_eq!(document.distances().unwrap().get(2, 4), 5.0);
    assert_eq!(document.splits().unwrap().nsplits(), 2);
    assert_eq!(document.trees().unwrap().ntrees(), 2);
    assert_eq!(document.network().unwrap().edges().len(), 2);
    assert_eq!(document.traits().unwrap().trait_info(2).label, "Colour");
    assert_eq!(document.analysis().unwrap().result(), "Kea's result");
}

#[test]
fn test_write_is_fixed_point() {
    let document = read_ok(FULL_DOCUMENT);
    let written = write_nexus_string(&document).unwrap();

    let again = read_ok(&written);
    assert_eq!(again, document);
    assert_eq!(write_nexus_string(&again).unwrap(), written);
}

#[test]
fn test_header_optional_unless_required() {
    let input = "BEGIN TAXA; DIMENSIONS ntax=2; TAXLABELS A B; END;";
    assert_eq!(read_ok(input).taxa().unwrap().ntax(), 2);

    let reader = NexusReaderBuilder::new().require_header().build();
    let err = reader.read_str(input).unwrap_err();
    assert_eq!(err.kind(), &ParsingErrorType::MissingNexusHeader);

    let header_lower_case = format!("#nexus\n{input}");
    assert!(reader.read_str(&header_lower_case).is_ok());
}

#[test]
fn test_endblock_closes_block() {
    let input = "#NEXUS\nbegin taxa;\ndimensions ntax=2;\ntaxlabels A B;\nendblock;\n";
    assert_eq!(read_ok(input).taxa().unwrap().ntax(), 2);
}

// --- TAXON INFERENCE ---
#[test]
fn test_taxa_synthesized_from_distances() {
    let input = "#NEXUS
BEGIN DISTANCES;
    DIMENSIONS ntax=3;
    FORMAT triangle=both;
    MATRIX
        A 0 1 2
        B 1 0 3
        C 2 3 0
    ;
END;
";
    let document = read_ok(input);

    assert_eq!(document.blocks()[0].kind(), BlockKind::Taxa);
    let names: Vec<&str> = document.taxa().unwrap().names().collect();
    assert_eq!(names, vec!["A", "B", "C"]);
}

#[test]
fn test_taxa_synthesized_in_first_seen_order() {
    let input = "#NEXUS
BEGIN DATA;
    DIMENSIONS ntax=2 nchar=3;
    FORMAT datatype=standard symbols=\"01\";
    MATRIX
        Zebu 010
        Aurochs 110
    ;
END;
BEGIN TREES;
    TREE t1 = ((Aurochs,Zebu),Yak);
END;
";
    let document = read_ok(input);
    let names: Vec<&str> = document.taxa().unwrap().names().collect();
    assert_eq!(names, vec!["Zebu", "Aurochs", "Yak"]);
    assert!(!document.trees().unwrap().is_partial());
}

#[test]
fn test_explicit_taxa_end_discovery() {
    let input = "#NEXUS
BEGIN TAXA; DIMENSIONS ntax=2; TAXLABELS A B; END;
BEGIN DISTANCES;
    FORMAT triangle=lower;
    MATRIX
        A 0
        C 1 0
    ;
END;
";
    let err = parse_nexus_str(input).unwrap_err();
    assert!(err.is_structural());
    assert!(err.to_string().contains("unknown taxon 'C'"));
}

#[test]
fn test_supplied_taxa_are_not_added() {
    let taxa = TaxaBlock::from_names(["A", "B", "C"]).unwrap();
    let reader = NexusReaderBuilder::new().with_taxa(taxa).build();
    let input = "#NEXUS
BEGIN CHARACTERS;
    DIMENSIONS nchar=2;
    FORMAT datatype=standard labels=no;
    MATRIX
        01
        11
        10
    ;
END;
";
    let (document, _) = reader.read_str(input).unwrap();

    assert!(document.taxa().is_none());
    let characters = document.characters().unwrap();
    assert_eq!(characters.data_type(), DataType::Standard);
    assert_eq!(characters.row_string(3), "10");
}

#[test]
fn test_conflicting_taxa_block_is_fatal() {
    let input = "#NEXUS
BEGIN DISTANCES;
    DIMENSIONS ntax=2;
    MATRIX
        A 0 1
        B 1 0
    ;
END;
BEGIN TAXA; DIMENSIONS ntax=2; TAXLABELS A X; END;
";
    let err = parse_nexus_str(input).unwrap_err();
    assert!(err.is_structural());
    assert_eq!(err.line(), 9);
}

// --- TITLE / LINK ---
#[test]
fn test_link_to_missing_block_is_fatal() {
    let input = "#NEXUS
BEGIN TAXA; TITLE Birds; DIMENSIONS ntax=2; TAXLABELS A B; END;
BEGIN DISTANCES;
    LINK TAXA = Fish;
    MATRIX
        A 0 1
        B 1 0
    ;
END;
";
    let err = parse_nexus_str(input).unwrap_err();
    assert!(err.is_structural());
    assert!(err.to_string().contains("Fish"));
    assert_eq!(err.line(), 4);
}

#[test]
fn test_link_to_unsupported_block_is_kept() {
    let input = "#NEXUS
BEGIN TAXA; DIMENSIONS ntax=2; TAXLABELS A B; END;
BEGIN ANALYSIS;
    TITLE Report;
    LINK ALGORITHM = 'Neighbor Joining';
    RESULT done;
END;
";
    let (document, warnings) = parse_nexus_str(input).unwrap();

    assert_eq!(warnings.len(), 1);
    assert!(warnings.any_mentions("ALGORITHM"));
    let analysis = document.find(BlockKind::Analysis, "Report").unwrap();
    assert_eq!(analysis.links[0].block_name, "ALGORITHM");
    assert_eq!(analysis.links[0].title, "Neighbor Joining");
}

// --- LENIENCY ---
#[test]
fn test_unknown_block_skipped_with_warning() {
    let input = "#NEXUS
BEGIN ASSUMPTIONS;
    USERTYPE mine = 3 1 2;
    [ END; inside a comment does not close ]
END;
BEGIN TAXA; DIMENSIONS ntax=2; TAXLABELS A B; END;
";
    let (document, warnings) = parse_nexus_str(input).unwrap();

    assert_eq!(document.len(), 1);
    assert_eq!(warnings.len(), 1);
    let warning = warnings.iter().next().unwrap();
    assert_eq!(warning.line, 2);
    assert!(warning.message.contains("ASSUMPTIONS"));
}

#[test]
fn test_unknown_command_skipped_with_warning() {
    let input = "#NEXUS
BEGIN TAXA;
    DIMENSIONS ntax=2;
    TAXLABELS A B;
    COLOR A=red B=blue;
END;
";
    let (document, warnings) = parse_nexus_str(input).unwrap();
    assert_eq!(document.taxa().unwrap().ntax(), 2);
    assert!(warnings.any_mentions("COLOR"));
}

#[test]
fn test_unclosed_block_is_eof_error() {
    let input = "#NEXUS\nBEGIN TAXA;\nDIMENSIONS ntax=2;\nTAXLABELS A B;\n";
    let err = parse_nexus_str(input).unwrap_err();
    assert_eq!(err.kind(), &ParsingErrorType::UnexpectedEof);
}

#[test]
fn test_no_warnings_on_fatal_error() {
    // The illegal symbol is seen before the fatal dimension mismatch
    let input = "#NEXUS
BEGIN CHARACTERS;
    DIMENSIONS ntax=2 nchar=2;
    FORMAT datatype=dna;
    MATRIX
        A aq
        B ac
    ;
END;
BEGIN SPLITS;
    DIMENSIONS ntax=5 nsplits=1;
    MATRIX 1 1 2;
END;
";
    let err = parse_nexus_str(input).unwrap_err();
    assert!(err.is_structural());
}
