use nexblocks::model::{NetworkBlock, NetworkType, NexusDocument, TaxaBlock};
use nexblocks::nexus::blocks::network::parse_network;
use nexblocks::parser::{ParsingError, Tokenizer, Warnings};
use nexblocks::{parse_nexus_str, write_nexus_string};

fn parse_body(body: &str) -> Result<NetworkBlock, ParsingError> {
    let mut tokenizer = Tokenizer::for_str(body);
    let mut warnings = Warnings::new();
    parse_network(&mut tokenizer, &mut warnings)
}

const HAPLOTYPES: &str = "DIMENSIONS nNodes=3 nEdges=2;
    TYPE HaplotypeNetwork;
    PROPERTIES layout=circular;
    NODES
        id=1 label='Kea 1' x=0.5 y=1.5,
        id=2 y=2 x=1,
        id=3 label=Tui
    ;
    EDGES
        id=10 sid=1 tid=2 weight=2 colour=red,
        id=11 sid=2 tid=3
    ;
    END;";

#[test]
fn test_parse_network() {
    let block = parse_body(HAPLOTYPES).unwrap();

    assert_eq!(block.network_type(), NetworkType::HaplotypeNetwork);
    assert_eq!(block.properties().get("layout"), Some("circular"));
    assert_eq!(block.nodes().len(), 3);
    assert_eq!(block.node(1).unwrap().label.as_deref(), Some("Kea 1"));
    assert_eq!(block.node(2).unwrap().label, None);

    let edge = &block.edges()[0];
    assert_eq!((edge.id, edge.source, edge.target), (10, 1, 2));
    assert_eq!(edge.attributes.get("weight"), Some("2"));
    assert_eq!(edge.attributes.get("colour"), Some("red"));
}

#[test]
fn test_attribute_order_kept() {
    let block = parse_body(HAPLOTYPES).unwrap();
    let keys: Vec<&str> = block.node(2).unwrap().attributes.iter().map(|(k, _)| k).collect();
    assert_eq!(keys, vec!["y", "x"]);
}

#[test]
fn test_node_count_checked() {
    let err = parse_body("DIMENSIONS nNodes=3 nEdges=0; NODES id=1, id=2; EDGES ; END;").unwrap_err();
    assert!(err.is_structural());
    assert!(err.to_string().contains("3 nodes"));
}

#[test]
fn test_duplicate_node_id_is_fatal() {
    let err = parse_body("NODES\nid=1,\nid=1\n;\nEND;").unwrap_err();
    assert!(err.is_structural());
    assert_eq!(err.line(), 3);
}

#[test]
fn test_unresolved_edge_endpoint_is_fatal() {
    let err = parse_body("NODES id=1, id=2; EDGES id=1 sid=1 tid=7; END;").unwrap_err();
    assert!(err.is_structural());
    assert!(err.to_string().contains("unresolved node id 7"));
}

#[test]
fn test_edge_without_source_is_fatal() {
    let err = parse_body("NODES id=1, id=2; EDGES id=1 tid=2; END;").unwrap_err();
    assert!(err.to_string().contains("SID"));
}

#[test]
fn test_unknown_network_type() {
    let err = parse_body("TYPE Spaghetti; END;").unwrap_err();
    assert!(!err.is_structural());
    assert!(err.to_string().contains("Spaghetti"));
}

#[test]
fn test_document_round_trip() {
    let mut document = NexusDocument::new();
    document.push(TaxaBlock::from_names(["Kea", "Tui"]).unwrap());
    document.push(parse_body(HAPLOTYPES).unwrap());

    let text = write_nexus_string(&document).unwrap();
    assert!(text.contains("label='Kea 1' x=0.5 y=1.5"));

    let (read, warnings) = parse_nexus_str(&text).unwrap();
    assert!(warnings.is_empty());
    assert_eq!(read, document);
}
