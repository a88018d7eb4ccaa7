//! Nexus document reader and writer.
//!
//! This module provides:
//! - [NexusReaderBuilder] / [NexusReader]: read a document into a
//!   [NexusDocument](crate::model::NexusDocument) plus [Warnings](crate::parser::Warnings)
//! - [NexusWriter]: write a document or single blocks
//! - [blocks]: one codec per block kind, usable on their own
//!
//! # Quick API
//! For simple use cases with default settings:
//! - [`parse_nexus_str`] / [`parse_nexus_file`]
//! - [`write_nexus_string`] / [`write_nexus_file`]
//!
//! # Format
//! A document is an optional `#NEXUS` header followed by blocks
//! `BEGIN <NAME>; .. END;` (or `ENDBLOCK;`). Each block may start with
//! - `TITLE <title>;`
//! - `LINK <blockname> = <title> [<blockname> = <title> ..];`
//!
//! followed by its commands, each terminated by `;`. Keywords are
//! case-insensitive, `[...]` comments may appear anywhere between tokens.
//!
//! ## Assumptions
//! * Blocks of unknown names are skipped with a warning
//! * Unknown commands inside known blocks are skipped with a warning
//! * A `LINK` refers to a block read before
//! * Without TAXA block, taxa are introduced by row labels and tree leaves in
//!   order of first appearance

pub(crate) mod defs;
pub mod blocks;
mod document;
pub(crate) mod writer;

pub use self::document::{parse_nexus_file, parse_nexus_str, NexusReader, NexusReaderBuilder};
pub use self::writer::{write_nexus_file, write_nexus_string, NexusWriter};
