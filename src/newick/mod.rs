//! Newick tree strings, as used inside TREES blocks.
//!
//! * [NewickParser] reads one tree into a [PhyloTree](crate::model::PhyloTree)
//! * [to_newick()] writes one back

pub(crate) mod defs;
pub mod parser;
pub mod writer;

pub use parser::NewickParser;
pub use writer::to_newick;
