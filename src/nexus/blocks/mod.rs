//! One codec per block kind, plus helpers they share.
//!
//! Every codec offers a `parse_*` function that starts right after
//! `BEGIN <NAME>;` (and any TITLE/LINK commands) and stops in front of
//! `END;`, and a `write_*` function for the block body.
//!
//! Codecs that name taxa in row labels or tree leaves report the names they
//! did not know as [Parsed::discovered], which lets a document without TAXA
//! block define its taxa implicitly.

pub mod analysis;
pub mod characters;
pub mod distances;
pub mod genomes;
pub(crate) mod matrix;
pub mod network;
pub mod splits;
pub mod taxa;
pub mod traits;
pub mod trees;

use crate::model::TaxaBlock;
use crate::nexus::writer::NexusWriter;
use crate::parser::utils::escape_label;
use crate::parser::{ByteSource, ParsingError, Token, Tokenizer, Warnings};
use std::io;
use std::io::Write;

/// A parsed block and the taxon names it introduced, in first-seen order.
#[derive(Debug, Clone, PartialEq)]
pub struct Parsed<B> {
    pub block: B,
    pub discovered: Vec<String>,
}

/// Taxa known when a block is read.
#[derive(Debug, Clone, Copy)]
pub struct TaxaContext<'a> {
    pub taxa: &'a TaxaBlock,
    /// Unknown names are registered instead of rejected
    pub discovery: bool,
}

impl<'a> TaxaContext<'a> {
    /// Context with fixed, fully known taxa.
    pub fn known(taxa: &'a TaxaBlock) -> Self {
        Self {
            taxa,
            discovery: false,
        }
    }

    /// Context that registers unknown names after the given taxa.
    pub fn discovering(taxa: &'a TaxaBlock) -> Self {
        Self {
            taxa,
            discovery: true,
        }
    }
}

// =#========================================================================#=
// TAXON RESOLVER
// =#========================================================================$=
/// Resolves taxon names to 1-based indices, registering new names in
/// discovery mode. New names get the indices following the known taxa.
pub(crate) struct TaxonResolver<'a> {
    context: TaxaContext<'a>,
    discovered: Vec<String>,
}

impl<'a> TaxonResolver<'a> {
    pub(crate) fn new(context: TaxaContext<'a>) -> Self {
        Self {
            context,
            discovered: Vec::new(),
        }
    }

    /// Number of taxa known so far, including newly discovered ones.
    pub(crate) fn ntax(&self) -> usize {
        self.context.taxa.ntax() + self.discovered.len()
    }

    /// Number of taxa known before this block.
    pub(crate) fn ntax_known(&self) -> usize {
        self.context.taxa.ntax()
    }

    pub(crate) fn is_discovering(&self) -> bool {
        self.context.discovery
    }

    /// Returns the index of `name`, registering it in discovery mode.
    ///
    /// # Returns
    /// `None` for an unknown name outside of discovery mode.
    pub(crate) fn try_resolve(&mut self, name: &str) -> Option<usize> {
        if let Some(t) = self.context.taxa.index_of(name) {
            return Some(t);
        }
        if let Some(position) = self.discovered.iter().position(|d| d == name) {
            return Some(self.ntax_known() + position + 1);
        }
        if self.context.discovery {
            self.discovered.push(name.to_string());
            return Some(self.ntax());
        }
        None
    }

    /// Like [Self::try_resolve], failing with a structural error.
    pub(crate) fn resolve<S: ByteSource>(
        &mut self,
        name: &str,
        tokenizer: &Tokenizer<S>,
    ) -> Result<usize, ParsingError> {
        self.try_resolve(name)
            .ok_or_else(|| ParsingError::structural(tokenizer, format!("unknown taxon '{name}'")))
    }

    pub(crate) fn into_discovered(self) -> Vec<String> {
        self.discovered
    }
}

// ============================================================================
// Command helpers (crate)
// ============================================================================

/// Whether the next command is `END;` or `ENDBLOCK;`, or the input is exhausted.
///
/// A body read on its own may end with the input; a document requires the
/// closing command.
pub(crate) fn at_block_end<S: ByteSource>(tokenizer: &mut Tokenizer<S>) -> Result<bool, ParsingError> {
    if tokenizer.peek_token()? == Token::Eof {
        return Ok(true);
    }
    tokenizer.peek_matches_any(&["end", "endblock"])
}

/// Fails if the input is exhausted inside a command.
pub(crate) fn check_not_eof<S: ByteSource>(tokenizer: &mut Tokenizer<S>) -> Result<(), ParsingError> {
    if tokenizer.peek_token()? == Token::Eof {
        return Err(ParsingError::unexpected_eof(tokenizer));
    }
    Ok(())
}

/// Skips a command the codec does not know, up to and including its `;`.
pub(crate) fn skip_command<S: ByteSource>(
    tokenizer: &mut Tokenizer<S>,
    block_name: &str,
    warnings: &mut Warnings,
) -> Result<(), ParsingError> {
    let line = tokenizer.line();
    let command = tokenizer.next_label()?;
    loop {
        match tokenizer.next_token()? {
            Token::Punctuation(';') => break,
            Token::Eof => return Err(ParsingError::unexpected_eof(tokenizer)),
            _ => {}
        }
    }
    log::debug!("skipped command {command} in {block_name} block (line {line})");
    warnings.push(line, format!("skipped unknown command {command} in {block_name} block"));
    Ok(())
}

/// Reads `key=value` pairs (keys lower-cased, values case preserved) up to
/// `,` or `;`, returning the pairs and whether the list ended with `;`.
pub(crate) fn read_key_values<S: ByteSource>(
    tokenizer: &mut Tokenizer<S>,
) -> Result<(Vec<(String, String)>, bool), ParsingError> {
    let mut pairs = Vec::new();
    loop {
        match tokenizer.next_token()? {
            Token::Punctuation(',') => return Ok((pairs, false)),
            Token::Punctuation(';') => return Ok((pairs, true)),
            Token::Word(key) => {
                tokenizer.match_ignore_case("=")?;
                let value = tokenizer.next_label()?;
                pairs.push((key.to_lowercase(), value));
            }
            Token::Eof => return Err(ParsingError::unexpected_eof(tokenizer)),
            other => {
                return Err(ParsingError::lexical(
                    tokenizer,
                    format!("key=value, ',' or ';', got {other}"),
                ));
            }
        }
    }
}

/// Reads `count` numbers followed by `;`.
pub(crate) fn read_numbers<S: ByteSource>(
    tokenizer: &mut Tokenizer<S>,
    count: usize,
) -> Result<Vec<f64>, ParsingError> {
    let mut numbers = Vec::new();
    for _ in 0..count {
        numbers.push(tokenizer.next_f64()?);
    }
    tokenizer.match_ignore_case(";")?;
    Ok(numbers)
}

/// Number of rows of the matrix, checked against the known taxa.
pub(crate) fn matrix_ntax<S: ByteSource>(
    declared: Option<usize>,
    resolver: &TaxonResolver,
    tokenizer: &Tokenizer<S>,
) -> Result<usize, ParsingError> {
    let known = resolver.ntax_known();
    let ntax = match declared {
        Some(ntax) => ntax,
        None if known > 0 => known,
        None => {
            return Err(ParsingError::structural(
                tokenizer,
                String::from("NTAX must be declared when taxa are unknown"),
            ));
        }
    };
    let fits = ntax == known || (resolver.is_discovering() && ntax > known);
    if !fits {
        return Err(ParsingError::structural(
            tokenizer,
            format!("matrix declares {ntax} taxa, but {known} taxa are known"),
        ));
    }
    Ok(ntax)
}

/// Fails unless `rows` times `cols` cells, each at least one byte long, fit
/// into the rest of the input.
pub(crate) fn check_cells_fit<S: ByteSource>(
    tokenizer: &Tokenizer<S>,
    rows: usize,
    cols: usize,
) -> Result<(), ParsingError> {
    match rows.checked_mul(cols) {
        Some(cells) if tokenizer.has_remaining(cells) => Ok(()),
        _ => Err(ParsingError::structural(
            tokenizer,
            format!("matrix of {rows} x {cols} cells exceeds the remaining input"),
        )),
    }
}

/// Width of the longest label, for cosmetic column alignment.
pub(crate) fn max_label_width<'a, I: IntoIterator<Item = &'a str>>(labels: I) -> usize {
    labels
        .into_iter()
        .map(|l| escape_label(l).chars().count())
        .max()
        .unwrap_or(0)
}

/// Writes an escaped label followed by padding up to `width` plus one space.
pub(crate) fn write_padded_label<W: Write>(writer: &mut NexusWriter<W>, label: &str, width: usize) -> io::Result<()> {
    let escaped = escape_label(label);
    let padding = width.saturating_sub(escaped.chars().count()) + 1;
    writer.text(&escaped)?.pad(padding)?;
    Ok(())
}
