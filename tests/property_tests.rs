//! Property-based tests using proptest
//!
//! Matrices written in any supported layout must read back to the same
//! entries.

use nexblocks::model::{
    CharactersBlock, CharactersFormat, DataType, DistancesBlock, DistancesFormat, NexusDocument, TaxaBlock, TaxaSet,
    Triangle,
};
use nexblocks::nexus::blocks::distances::{parse_distances, write_distances};
use nexblocks::nexus::blocks::TaxaContext;
use nexblocks::nexus::NexusWriter;
use nexblocks::parser::utils::escape_label;
use nexblocks::parser::{Tokenizer, Warnings};
use nexblocks::{parse_nexus_str, write_nexus_string};
use proptest::prelude::*;

fn taxa(n: usize) -> TaxaBlock {
    TaxaBlock::from_names((1..=n).map(|i| format!("taxon{i}"))).unwrap()
}

fn dna_rows() -> impl Strategy<Value = Vec<String>> {
    (1usize..6, 1usize..30).prop_flat_map(|(ntax, nchar)| {
        let symbol = prop::sample::select(vec!['a', 'c', 'g', 't', '-', '?']);
        let row = prop::collection::vec(symbol, nchar).prop_map(|s| s.into_iter().collect::<String>());
        prop::collection::vec(row, ntax)
    })
}

fn characters_format() -> impl Strategy<Value = CharactersFormat> {
    prop_oneof![
        any::<bool>().prop_map(|labels| CharactersFormat::default().with_labels(labels)),
        Just(CharactersFormat::default().with_transpose(true)),
        (1usize..12, any::<bool>()).prop_map(|(columns, labels)| {
            CharactersFormat::default()
                .with_interleave(true)
                .with_columns(columns)
                .with_labels(labels)
        }),
    ]
}

fn distances_format() -> impl Strategy<Value = DistancesFormat> {
    let triangle = prop::sample::select(vec![Triangle::Lower, Triangle::Upper, Triangle::Both]);
    (triangle, any::<bool>(), any::<bool>()).prop_map(|(triangle, diagonal, labels)| {
        DistancesFormat::default()
            .with_triangle(triangle)
            .with_diagonal(diagonal)
            .with_labels(labels)
    })
}

// =============================================================================
// Matrix layouts
// =============================================================================

proptest! {
    /// Characters read back unchanged from every layout
    #[test]
    fn test_characters_layouts(rows in dna_rows(), format in characters_format()) {
        let mut document = NexusDocument::new();
        document.push(taxa(rows.len()));
        document.push(CharactersBlock::from_rows(DataType::Dna, &rows).with_format(format));
        let text = write_nexus_string(&document).unwrap();

        let (read, warnings) = parse_nexus_str(&text).unwrap();
        prop_assert!(warnings.is_empty());
        let characters = read.characters().unwrap();
        for (t, row) in rows.iter().enumerate() {
            prop_assert_eq!(&characters.row_string(t + 1), row);
        }
    }

    /// Distances read back unchanged in every triangle, diagonal and label mode
    #[test]
    fn test_distances_modes(
        entries in prop::collection::vec(0u32..1000, 15),
        n in 2usize..6,
        format in distances_format(),
    ) {
        let taxa = taxa(n);
        let mut block = DistancesBlock::new(n);
        let mut next = entries.iter();
        for i in 1..=n {
            for j in (i + 1)..=n {
                block.set(i, j, f64::from(*next.next().unwrap()) / 8.0);
            }
        }

        let mut writer = NexusWriter::new(Vec::new());
        write_distances(&mut writer, &taxa, &block, &format).unwrap();
        let text = String::from_utf8(writer.into_inner()).unwrap();

        let mut tokenizer = Tokenizer::for_str(&text);
        let mut warnings = Warnings::new();
        let read = parse_distances(&mut tokenizer, TaxaContext::known(&taxa), &mut warnings).unwrap().block;
        prop_assert!(warnings.is_empty());
        for i in 1..=n {
            for j in 1..=n {
                prop_assert_eq!(read.get(i, j), block.get(i, j));
            }
        }
    }
}

// =============================================================================
// Labels and taxa sets
// =============================================================================

proptest! {
    /// Escaped labels are read back as one word
    #[test]
    fn test_escaped_label_is_one_word(label in "[ -~]{1,16}") {
        let text = format!("{} ;", escape_label(&label));
        let mut tokenizer = Tokenizer::for_str(&text);
        prop_assert_eq!(tokenizer.next_label().unwrap(), label);
        prop_assert!(tokenizer.consume_if_ignore_case(";").unwrap());
    }

    /// A split side and its complement partition the taxa
    #[test]
    fn test_complement_partitions(members in prop::collection::btree_set(1usize..80, 0..20)) {
        let ntax = 80;
        let side: TaxaSet = members.iter().copied().collect();
        let other = side.complement(ntax);

        prop_assert_eq!(side.cardinality() + other.cardinality(), ntax);
        prop_assert!(side.iter().all(|t| !other.contains(t)));
        prop_assert_eq!(other.complement(ntax), side);
    }
}
