//! In-memory block objects.
//!
//! # Blocks
//! Every block kind has its own type, wrapped by [BlockContent] and
//! [Block] (which adds title and links) inside a [NexusDocument]:
//!
//! | Block | Type | Content |
//! |-------|------|---------|
//! | TAXA | [TaxaBlock] | Ordered, uniquely named [Taxon]s |
//! | CHARACTERS | [CharactersBlock] | ntax × nchar symbol matrix |
//! | DISTANCES | [DistancesBlock] | Symmetric ntax × ntax matrix |
//! | SPLITS | [SplitsBlock] | Weighted non-trivial [ASplit]s |
//! | TREES | [TreesBlock] | [PhyloTree]s over taxon names |
//! | NETWORK | [NetworkBlock] | Nodes and edges with [Attributes] |
//! | TRAITS | [TraitsBlock] | Per-taxon [TraitValue]s |
//! | GENOMES | [GenomesBlock] | Per-taxon multi-part [Genome]s |
//! | ANALYSIS | [AnalysisBlock] | Free text result |
//!
//! # Indices
//! Taxa, characters, traits, splits and trees are referred to by 1-based
//! index, matching the text format.
//!
//! # Formats
//! Layout options of a block (e.g. [CharactersFormat]) are plain values
//! built with `with_*` methods and handed to writers by parameter.

pub mod analysis;
pub mod block;
pub mod characters;
pub mod distances;
pub mod genomes;
pub mod network;
pub mod splits;
pub mod state_labeler;
pub mod taxa;
pub mod traits;
pub mod trees;

pub use analysis::AnalysisBlock;
pub use block::{Block, BlockContent, BlockKind, BlockLink, NexusDocument};
pub use characters::{CharactersBlock, CharactersFormat, DataType};
pub use distances::{DistancesBlock, DistancesFormat, Triangle};
pub use genomes::{Genome, GenomePart, GenomesBlock, GenomesFormat, PartContent};
pub use network::{Attributes, NetworkBlock, NetworkEdge, NetworkNode, NetworkType};
pub use splits::{is_permutation, ASplit, Compatibility, SplitsBlock, SplitsFormat, TaxaSet};
pub use state_labeler::{StandardLabeler, StateLabeler};
pub use taxa::{DuplicateTaxon, TaxaBlock, Taxon};
pub use traits::{Separator, Trait, TraitValue, TraitsBlock, TraitsFormat};
pub use trees::{Node, NodeIndex, PhyloTree, TreesBlock, TreesFormat};
