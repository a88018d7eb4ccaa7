//! Nexblocks is a library to read and write block-structured Nexus files of
//! phylogenetic data.
//!
//! Core functionality provided:
//! - Blocks: TAXA, CHARACTERS (and DATA), DISTANCES, SPLITS, TREES, NETWORK,
//!   TRAITS, GENOMES and ANALYSIS, each read into its own model type, see
//!   [crate::model].
//! - Document: blocks are kept in reading order with their `TITLE` and
//!   `LINK` commands; a TAXA block is synthesized when taxa are only
//!   introduced by row labels or tree leaves.
//! - Leniency: illegal matrix symbols, asymmetric distances and unknown
//!   commands or blocks are substituted or skipped and reported as
//!   [Warnings](crate::parser::Warnings); everything else is a fatal
//!   [ParsingError](crate::parser::ParsingError) with line number.
//! - Writing: every block is written in its declared layout (e.g.
//!   interleaved or transposed matrices, lower triangle distances), and
//!   reading the output gives back an equal block.
//!
//! Limitations:
//! - Documents are read fully into memory
//! - Blocks are read in one pass, so a `LINK` must point backwards
//!
//! # Usage patterns
//! 1. [parse_nexus_str] / [parse_nexus_file] and [write_nexus_string] /
//!    [write_nexus_file] with default settings.
//! 2. Configure a reader with [NexusReaderBuilder](crate::nexus::NexusReaderBuilder),
//!    e.g. to require the `#NEXUS` header or to supply taxa.
//! 3. Call the block codecs of [crate::nexus::blocks] directly on a
//!    [Tokenizer](crate::parser::Tokenizer).
//!
//! ## Example
//! ```
//! use nexblocks::{parse_nexus_str, write_nexus_string};
//!
//! let input = "#NEXUS\n\
//!     BEGIN CHARACTERS;\n\
//!     DIMENSIONS ntax=3 nchar=4;\n\
//!     FORMAT datatype=dna;\n\
//!     MATRIX\n\
//!     A acgt\n\
//!     B acga\n\
//!     C tcga\n\
//!     ;\n\
//!     END;\n";
//! let (document, warnings) = parse_nexus_str(input).unwrap();
//! assert!(warnings.is_empty());
//!
//! let characters = document.characters().unwrap();
//! assert_eq!(characters.get(3, 1), 't');
//! assert_eq!(document.taxa().unwrap().ntax(), 3);
//!
//! let text = write_nexus_string(&document).unwrap();
//! let (again, _) = parse_nexus_str(&text).unwrap();
//! assert_eq!(again.characters().unwrap().row_string(2), "acga");
//! ```

pub mod model;
pub mod newick;
pub mod nexus;
pub mod parser;

pub use crate::nexus::{parse_nexus_file, parse_nexus_str, write_nexus_file, write_nexus_string};
