use nexblocks::model::{TaxaBlock, TreesBlock, TreesFormat};
use nexblocks::nexus::blocks::trees::{parse_trees, write_trees};
use nexblocks::nexus::blocks::TaxaContext;
use nexblocks::nexus::NexusWriter;
use nexblocks::parser::{ParsingError, Tokenizer, Warnings};

fn abc() -> TaxaBlock {
    TaxaBlock::from_names(["A", "B", "C"]).unwrap()
}

fn parse_body(body: &str) -> Result<TreesBlock, ParsingError> {
    let taxa = abc();
    let mut tokenizer = Tokenizer::for_str(body);
    let mut warnings = Warnings::new();
    let parsed = parse_trees(&mut tokenizer, TaxaContext::known(&taxa), &mut warnings)?;
    assert!(parsed.discovered.is_empty());
    Ok(parsed.block)
}

fn write_body(block: &TreesBlock, format: &TreesFormat) -> String {
    let mut writer = NexusWriter::new(Vec::new());
    write_trees(&mut writer, &abc(), block, format).unwrap();
    String::from_utf8(writer.into_inner()).unwrap()
}

// --- READING ---
#[test]
fn test_translate_maps_tokens_to_taxa() {
    let block = parse_body(
        "TRANSLATE
            1 A,
            2 B,
            3 C
        ;
        TREE one = ((1:1,2:2):0.5,3);",
    )
    .unwrap();

    let tree = block.get(1).unwrap();
    assert_eq!(tree.name(), "one");
    assert_eq!(tree.leaf_labels(), vec!["A", "B", "C"]);
    assert!(block.format().translate);
    assert_eq!(block.translation().unwrap()[2], (String::from("3"), String::from("C")));
    assert!(!block.is_partial());
}

#[test]
fn test_partial_trees_inferred() {
    let block = parse_body("TREE full = (A,B,C); TREE part = (A,B);").unwrap();
    assert_eq!(block.ntrees(), 2);
    assert!(block.is_partial());
}

#[test]
fn test_missing_taxa_with_partial_trees_no_is_fatal() {
    let err = parse_body("PROPERTIES partialTrees=no;\nTREE part = (A,B);").unwrap_err();
    assert!(err.is_structural());
    assert_eq!(err.line(), 2);
    assert!(err.to_string().contains("part"));
}

#[test]
fn test_rooted_comment_and_properties() {
    let block = parse_body("TREE r = [&R] (A,(B,C)); TREE u = [&U] (A,B,C); TREE plain = (A,B,C);").unwrap();
    assert!(block.get(1).unwrap().is_rooted());
    assert!(!block.get(2).unwrap().is_rooted());
    assert!(!block.get(3).unwrap().is_rooted());
    assert_eq!(block.common_rootedness(), None);

    let block = parse_body("PROPERTIES rooted=no; TREE r = [&R] (A,(B,C));").unwrap();
    assert!(!block.get(1).unwrap().is_rooted());
}

#[test]
fn test_tree_name_normalized() {
    let block = parse_body("TREE * 'best tree' = (A,B,C);").unwrap();
    assert_eq!(block.get(1).unwrap().name(), "best_tree");
}

#[test]
fn test_unknown_taxon_is_fatal() {
    let err = parse_body("TREE t = (A,X);").unwrap_err();
    assert!(err.is_structural());
    assert!(err.to_string().contains("unknown taxon 'X'"));
}

#[test]
fn test_taxon_twice_in_tree_is_fatal() {
    let err = parse_body("TREE t = (A,(A,B));").unwrap_err();
    assert!(err.to_string().contains("occurs twice"));
}

#[test]
fn test_malformed_newick_is_lexical() {
    let err = parse_body("TREE t = (A,B;").unwrap_err();
    assert!(!err.is_structural());
}

// --- WRITING ---
#[test]
fn test_writer_marks_rootedness_per_tree() {
    let block = parse_body("TREE r = [&R] (A,(B,C)); TREE u = [&U] (A,B,C);").unwrap();
    let text = write_body(&block, &TreesFormat::default());

    assert!(text.contains("[&R] (A,(B,C));"));
    assert!(text.contains("[&U] (A,B,C);"));
    assert!(!text.contains("rooted="));
}

#[test]
fn test_writer_builds_translate_table_from_taxa() {
    let block = parse_body("TREE t = ((A:1,B:2):0.5,C:1);").unwrap();
    let text = write_body(&block, &TreesFormat::default().with_translate(true));
    assert!(text.contains("TRANSLATE"));
    assert!(text.contains("((1:1,2:2):0.5,3:1);"));

    let read = parse_body(&text).unwrap();
    assert!(read.iter().eq(block.iter()));
    assert!(read.format().translate);
}
