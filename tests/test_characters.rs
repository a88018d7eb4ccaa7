use nexblocks::model::{CharactersBlock, CharactersFormat, DataType, NexusDocument, TaxaBlock};
use nexblocks::nexus::blocks::characters::parse_characters;
use nexblocks::nexus::blocks::TaxaContext;
use nexblocks::parser::{ParsingErrorType, Tokenizer, Warnings};
use nexblocks::{parse_nexus_str, write_nexus_string};

fn abc() -> TaxaBlock {
    TaxaBlock::from_names(["A", "B", "C"]).unwrap()
}

/// Parses a CHARACTERS body against taxa A, B, C.
fn parse_body(body: &str) -> (CharactersBlock, Warnings) {
    let taxa = abc();
    let mut tokenizer = Tokenizer::for_str(body);
    let mut warnings = Warnings::new();
    let parsed = parse_characters(&mut tokenizer, TaxaContext::known(&taxa), &mut warnings).unwrap();
    assert!(parsed.discovered.is_empty());
    (parsed.block, warnings)
}

fn parse_body_err(body: &str) -> nexblocks::parser::ParsingError {
    let taxa = abc();
    let mut tokenizer = Tokenizer::for_str(body);
    let mut warnings = Warnings::new();
    parse_characters(&mut tokenizer, TaxaContext::known(&taxa), &mut warnings).unwrap_err()
}

// --- LENIENCY ---
#[test]
fn test_illegal_symbol_replaced_by_gap() {
    let (block, warnings) = parse_body(
        "DIMENSIONS nchar=5;
        FORMAT datatype=dna;
        MATRIX
            A acgqt
            B acgtt
            C nnrya
        ;
        END;",
    );

    assert_eq!(block.row_string(1), "acg-t");
    // ambiguity codes are legal for DNA
    assert_eq!(block.row_string(3), "nnrya");
    assert_eq!(warnings.len(), 1);
    assert!(warnings.any_mentions("'q'"));
}

#[test]
fn test_symbols_lower_cased_unless_respect_case() {
    let (block, warnings) = parse_body(
        "DIMENSIONS nchar=4;
        FORMAT datatype=dna;
        MATRIX
            A ACGT
            B acgt
            C AcGt
        ;",
    );
    assert!(warnings.is_empty());
    assert_eq!(block.row_string(1), "acgt");
    assert_eq!(block.row_string(3), "acgt");

    let (block, warnings) = parse_body(
        "DIMENSIONS nchar=2;
        FORMAT datatype=standard respectcase symbols=\"aA\";
        MATRIX
            A aA
            B Aa
            C aa
        ;",
    );
    assert!(warnings.is_empty());
    assert_eq!(block.row_string(2), "Aa");
}

// --- MATCH CHARACTER ---
#[test]
fn test_match_char_copies_first_row() {
    let (block, warnings) = parse_body(
        "DIMENSIONS nchar=6;
        FORMAT datatype=dna matchchar=.;
        MATRIX
            A acgtac
            B ...g..
            C t...-.
        ;",
    );

    assert!(warnings.is_empty());
    assert_eq!(block.get(2, 5), 'a');
    assert_eq!(block.row_string(2), "acggac");
    assert_eq!(block.row_string(3), "tcgt-c");
}

#[test]
fn test_match_char_in_first_row_is_fatal() {
    let err = parse_body_err(
        "DIMENSIONS nchar=6;
        FORMAT datatype=dna matchchar=.;
        MATRIX
            A acgt.c
            B acgtac
            C acgtac
        ;",
    );
    assert!(err.is_structural());
    assert_eq!(err.line(), 4);
    assert!(err.to_string().contains("character 5"));
}

// --- LAYOUTS ---
#[test]
fn test_interleaved_matrix() {
    let (block, _) = parse_body(
        "DIMENSIONS nchar=7;
        FORMAT datatype=dna interleave;
        MATRIX
            A acg
            B aag
            C tcg

            A tacc
            B tac-
            C ?acc
        ;",
    );
    assert_eq!(block.row_string(1), "acgtacc");
    assert_eq!(block.row_string(2), "aagtac-");
    assert_eq!(block.row_string(3), "tcg?acc");
}

#[test]
fn test_interleaved_matrix_ending_on_last_line() {
    let (block, warnings) = parse_body(
        "DIMENSIONS nchar=6;
        FORMAT datatype=dna interleave;
        MATRIX
            A acg
            B acg
            C acg

            A tta
            B ttc
            C tt-;
        END;",
    );
    assert!(warnings.is_empty());
    assert_eq!(block.row_string(1), "acgtta");
    assert_eq!(block.row_string(2), "acgttc");
    assert_eq!(block.row_string(3), "acgtt-");
}

#[test]
fn test_interleaved_line_length_mismatch_is_fatal() {
    let err = parse_body_err(
        "DIMENSIONS nchar=6;
        FORMAT datatype=dna interleave;
        MATRIX
            A acg
            B aa
            C tcg
            A tac
            B tacg
            C tac
        ;",
    );
    assert!(err.is_structural());
    assert_eq!(err.line(), 5);
}

#[test]
fn test_transposed_matrix_with_char_labels() {
    let (block, _) = parse_body(
        "DIMENSIONS nchar=3;
        FORMAT datatype=dna transpose;
        MATRIX
            first  aac
            2      cct
            third  gg-
        ;",
    );
    assert_eq!(block.row_string(1), "acg");
    assert_eq!(block.row_string(3), "ct-");
    assert_eq!(block.char_label(1), Some("first"));
    assert_eq!(block.char_label(2), None);
    assert_eq!(block.char_label(3), Some("third"));
}

#[test]
fn test_transpose_and_interleave_is_fatal() {
    let err = parse_body_err("DIMENSIONS nchar=3; FORMAT transpose interleave; MATRIX ;");
    assert!(err.is_structural());
}

#[test]
fn test_unknown_format_option_is_fatal() {
    let err = parse_body_err("DIMENSIONS nchar=3; FORMAT datatype=dna sparkle=yes; MATRIX ;");
    assert!(matches!(err.kind(), ParsingErrorType::UnknownConstruct(_)));
}

#[test]
fn test_layouts_decode_to_same_matrix() {
    let rows = ["acgtacgtac", "aggtac-tac", "acgtt?gtaa"];
    let base = CharactersBlock::from_rows(DataType::Dna, &rows);
    let layouts = [
        CharactersFormat::default(),
        CharactersFormat::default().with_transpose(true),
        CharactersFormat::default().with_interleave(true).with_columns(4),
        CharactersFormat::default().with_labels(false),
    ];

    for format in layouts {
        let mut document = NexusDocument::new();
        document.push(abc());
        document.push(base.clone().with_format(format.clone()));
        let text = write_nexus_string(&document).unwrap();

        let (read, warnings) = parse_nexus_str(&text).unwrap();
        assert!(warnings.is_empty());
        let characters = read.characters().unwrap();
        assert_eq!(characters.format(), &format, "format of\n{text}");
        for (t, row) in rows.iter().enumerate() {
            assert_eq!(characters.row_string(t + 1), *row, "row {} of\n{text}", t + 1);
        }
    }
}

#[test]
fn test_match_char_written_compressed() {
    let block = CharactersBlock::from_rows(DataType::Dna, &["acgt", "acgg", "tcgt"]).with_match_char(Some('.'));
    let mut document = NexusDocument::new();
    document.push(abc());
    document.push(block.clone());

    let text = write_nexus_string(&document).unwrap();
    assert!(text.contains("...g"));
    assert!(text.contains("t..."));

    let (read, _) = parse_nexus_str(&text).unwrap();
    assert_eq!(read.characters(), Some(&block));
}

// --- TOKENS, WEIGHTS, LABELS ---
#[test]
fn test_tokens_with_state_labels() {
    let (block, warnings) = parse_body(
        "DIMENSIONS nchar=2;
        FORMAT datatype=standard tokens;
        CHARSTATELABELS
            1 colour / red green,
            2 size / small large
        ;
        MATRIX
            A red   small
            B green large
            C green ?
        ;",
    );

    assert!(warnings.is_empty());
    assert_eq!(block.row_string(1), "00");
    assert_eq!(block.row_string(2), "11");
    assert_eq!(block.row_string(3), "1?");
    assert_eq!(block.char_label(2), Some("size"));

    let labeler = block.state_labeler().unwrap();
    assert_eq!(labeler.symbol_to_token(1, '1').as_deref(), Some("green"));
}

#[test]
fn test_unknown_protein_token_replaced_by_gap() {
    let (block, warnings) = parse_body(
        "DIMENSIONS nchar=2;
        FORMAT datatype=protein tokens;
        MATRIX
            A Ala Arg
            B Gly Xyz
            C Ala -
        ;",
    );
    assert_eq!(block.row_string(1), "ar");
    assert_eq!(block.row_string(2), "g-");
    assert_eq!(warnings.len(), 1);
    assert!(warnings.any_mentions("Xyz"));
}

#[test]
fn test_char_weights() {
    let (block, _) = parse_body(
        "DIMENSIONS nchar=3;
        FORMAT datatype=dna;
        CHARWEIGHTS 1 0.5 2;
        MATRIX A acg B acg C acg;",
    );
    assert_eq!(block.char_weights(), Some(&[1.0, 0.5, 2.0][..]));

    let err = parse_body_err("DIMENSIONS nchar=3; CHARWEIGHTS 1 2; MATRIX A 012 B 012 C 012;");
    assert_eq!(err.line(), 1);
}

#[test]
fn test_data_block_declares_taxa() {
    let input = "#NEXUS
BEGIN DATA;
    DIMENSIONS ntax=2 nchar=3;
    FORMAT datatype=rna missing=N gap=.;
    MATRIX
        Kea  acu
        Kaka ac.
    ;
END;
";
    let (document, warnings) = parse_nexus_str(input).unwrap();
    assert!(warnings.is_empty());
    assert_eq!(document.taxa().unwrap().ntax(), 2);

    let characters = document.characters().unwrap();
    assert_eq!(characters.data_type(), DataType::Rna);
    assert_eq!(characters.gap(), '.');
    assert_eq!(characters.row_string(2), "ac.");
}

#[test]
fn test_too_few_rows_for_known_taxa() {
    let err = parse_body_err("DIMENSIONS ntax=2 nchar=2; MATRIX A 01 B 01;");
    assert!(err.is_structural());
}

#[test]
fn test_dimensions_beyond_input_are_fatal() {
    let err = parse_body_err("DIMENSIONS nchar=4000000000000000000; FORMAT datatype=dna; MATRIX A acgt B acgt C acgt;");
    assert!(err.is_structural());
    assert!(err.to_string().contains("remaining input"));
}

// --- PROPERTIES ---
#[test]
fn test_properties_read_and_written() {
    let (block, warnings) = parse_body(
        "DIMENSIONS nchar=2;
        PROPERTIES gammaShape=0.5 pInvar=0.25;
        FORMAT datatype=dna;
        MATRIX A ac B ag C at;",
    );
    assert!(warnings.is_empty());
    assert_eq!(block.gamma_shape(), Some(0.5));
    assert_eq!(block.p_invar(), Some(0.25));

    let mut document = NexusDocument::new();
    document.push(abc());
    document.push(block.clone());
    let text = write_nexus_string(&document).unwrap();
    assert!(text.contains("PROPERTIES gammaShape=0.5 pInvar=0.25;"));

    let (read, _) = parse_nexus_str(&text).unwrap();
    let characters = read.characters().unwrap();
    assert_eq!(characters.gamma_shape(), Some(0.5));
    assert_eq!(characters.p_invar(), Some(0.25));
    assert_eq!(characters.row_string(3), "at");
}

#[test]
fn test_unknown_properties_option_is_fatal() {
    let err = parse_body_err("DIMENSIONS nchar=2; PROPERTIES gammaShape=0.5 bogusOption; FORMAT datatype=dna; MATRIX A ac B ag C at;");
    assert!(matches!(err.kind(), ParsingErrorType::UnknownConstruct(_)));
    assert!(err.to_string().contains("bogusoption"));
}
