//! The tagged block variant and the document holding blocks in order.

use crate::model::analysis::AnalysisBlock;
use crate::model::characters::CharactersBlock;
use crate::model::distances::DistancesBlock;
use crate::model::genomes::GenomesBlock;
use crate::model::network::NetworkBlock;
use crate::model::splits::SplitsBlock;
use crate::model::taxa::TaxaBlock;
use crate::model::traits::TraitsBlock;
use crate::model::trees::TreesBlock;

/// Kinds of blocks this crate reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    Taxa,
    Characters,
    Distances,
    Splits,
    Trees,
    Network,
    Traits,
    Genomes,
    Analysis,
}

impl BlockKind {
    /// All kinds, in canonical document order.
    pub const ALL: [BlockKind; 9] = [
        BlockKind::Taxa,
        BlockKind::Characters,
        BlockKind::Distances,
        BlockKind::Splits,
        BlockKind::Trees,
        BlockKind::Network,
        BlockKind::Traits,
        BlockKind::Genomes,
        BlockKind::Analysis,
    ];

    /// Name used after `BEGIN`.
    pub fn name(&self) -> &'static str {
        match self {
            BlockKind::Taxa => "TAXA",
            BlockKind::Characters => "CHARACTERS",
            BlockKind::Distances => "DISTANCES",
            BlockKind::Splits => "SPLITS",
            BlockKind::Trees => "TREES",
            BlockKind::Network => "NETWORK",
            BlockKind::Traits => "TRAITS",
            BlockKind::Genomes => "GENOMES",
            BlockKind::Analysis => "ANALYSIS",
        }
    }

    /// Kind for a block name (case-insensitive); `DATA` is read as characters.
    pub fn from_name(name: &str) -> Option<Self> {
        if name.eq_ignore_ascii_case("DATA") {
            return Some(BlockKind::Characters);
        }
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(name))
    }
}

/// Content of a block.
#[derive(Debug, Clone, PartialEq)]
pub enum BlockContent {
    Taxa(TaxaBlock),
    Characters(CharactersBlock),
    Distances(DistancesBlock),
    Splits(SplitsBlock),
    Trees(TreesBlock),
    Network(NetworkBlock),
    Traits(TraitsBlock),
    Genomes(GenomesBlock),
    Analysis(AnalysisBlock),
}

impl BlockContent {
    pub fn kind(&self) -> BlockKind {
        match self {
            BlockContent::Taxa(_) => BlockKind::Taxa,
            BlockContent::Characters(_) => BlockKind::Characters,
            BlockContent::Distances(_) => BlockKind::Distances,
            BlockContent::Splits(_) => BlockKind::Splits,
            BlockContent::Trees(_) => BlockKind::Trees,
            BlockContent::Network(_) => BlockKind::Network,
            BlockContent::Traits(_) => BlockKind::Traits,
            BlockContent::Genomes(_) => BlockKind::Genomes,
            BlockContent::Analysis(_) => BlockKind::Analysis,
        }
    }
}

/// Reference to an earlier block by block name and title (`LINK name = title;`).
#[derive(Debug, Clone, PartialEq)]
pub struct BlockLink {
    /// Block name as written, e.g. `TAXA`
    pub block_name: String,
    pub title: String,
}

impl BlockLink {
    pub fn new<N: Into<String>, T: Into<String>>(block_name: N, title: T) -> Self {
        Self {
            block_name: block_name.into(),
            title: title.into(),
        }
    }

    /// Kind of the linked block, `None` for block names not modeled here.
    pub fn kind(&self) -> Option<BlockKind> {
        BlockKind::from_name(&self.block_name)
    }
}

// =#========================================================================#=
// BLOCK
// =#========================================================================$=
/// A block with optional title and links to earlier blocks.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub title: Option<String>,
    pub links: Vec<BlockLink>,
    pub content: BlockContent,
}

impl Block {
    pub fn new(content: BlockContent) -> Self {
        Self {
            title: None,
            links: Vec::new(),
            content,
        }
    }

    pub fn with_title<T: Into<String>>(mut self, title: T) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_link(mut self, link: BlockLink) -> Self {
        self.links.push(link);
        self
    }

    pub fn kind(&self) -> BlockKind {
        self.content.kind()
    }
}

macro_rules! block_from {
    ($($variant:ident($block:ty)),* $(,)?) => {
        $(
            impl From<$block> for Block {
                fn from(block: $block) -> Self {
                    Block::new(BlockContent::$variant(block))
                }
            }
        )*
    };
}

block_from!(
    Taxa(TaxaBlock),
    Characters(CharactersBlock),
    Distances(DistancesBlock),
    Splits(SplitsBlock),
    Trees(TreesBlock),
    Network(NetworkBlock),
    Traits(TraitsBlock),
    Genomes(GenomesBlock),
    Analysis(AnalysisBlock),
);

// =#========================================================================#=
// NEXUS DOCUMENT
// =#========================================================================$=
/// Blocks of one document in reading order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NexusDocument {
    blocks: Vec<Block>,
}

impl NexusDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a block.
    pub fn push<B: Into<Block>>(&mut self, block: B) {
        self.blocks.push(block.into());
    }

    /// Inserts a block at the front.
    pub fn push_front<B: Into<Block>>(&mut self, block: B) {
        self.blocks.insert(0, block.into());
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// The first taxa block.
    pub fn taxa(&self) -> Option<&TaxaBlock> {
        self.blocks.iter().find_map(|b| match &b.content {
            BlockContent::Taxa(taxa) => Some(taxa),
            _ => None,
        })
    }

    /// All blocks of a kind, in order.
    pub fn blocks_of(&self, kind: BlockKind) -> impl Iterator<Item = &Block> {
        self.blocks.iter().filter(move |b| b.kind() == kind)
    }

    /// The block of a kind with the given title.
    pub fn find(&self, kind: BlockKind, title: &str) -> Option<&Block> {
        self.blocks_of(kind)
            .find(|b| b.title.as_deref() == Some(title))
    }

    pub fn characters(&self) -> Option<&CharactersBlock> {
        self.blocks.iter().find_map(|b| match &b.content {
            BlockContent::Characters(characters) => Some(characters),
            _ => None,
        })
    }

    pub fn distances(&self) -> Option<&DistancesBlock> {
        self.blocks.iter().find_map(|b| match &b.content {
            BlockContent::Distances(distances) => Some(distances),
            _ => None,
        })
    }

    pub fn splits(&self) -> Option<&SplitsBlock> {
        self.blocks.iter().find_map(|b| match &b.content {
            BlockContent::Splits(splits) => Some(splits),
            _ => None,
        })
    }

    pub fn trees(&self) -> Option<&TreesBlock> {
        self.blocks.iter().find_map(|b| match &b.content {
            BlockContent::Trees(trees) => Some(trees),
            _ => None,
        })
    }

    pub fn network(&self) -> Option<&NetworkBlock> {
        self.blocks.iter().find_map(|b| match &b.content {
            BlockContent::Network(network) => Some(network),
            _ => None,
        })
    }

    pub fn traits(&self) -> Option<&TraitsBlock> {
        self.blocks.iter().find_map(|b| match &b.content {
            BlockContent::Traits(traits) => Some(traits),
            _ => None,
        })
    }

    pub fn genomes(&self) -> Option<&GenomesBlock> {
        self.blocks.iter().find_map(|b| match &b.content {
            BlockContent::Genomes(genomes) => Some(genomes),
            _ => None,
        })
    }

    pub fn analysis(&self) -> Option<&AnalysisBlock> {
        self.blocks.iter().find_map(|b| match &b.content {
            BlockContent::Analysis(analysis) => Some(analysis),
            _ => None,
        })
    }
}
