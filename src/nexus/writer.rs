//! Nexus document writer.

use crate::model::{Block, BlockContent, NexusDocument, TaxaBlock};
use crate::nexus::blocks;
use crate::nexus::defs::{BLOCK_BEGIN, BLOCK_END, LINK, NEXUS_HEADER, TITLE};
use crate::parser::utils::escape_label;
use std::fmt;
use std::fs::File;
use std::io;
use std::io::{BufWriter, Write};
use std::path::Path;

// =#========================================================================#=
// NEXUS WRITER
// =#========================================================================#=
/// Writer for [NexusDocument]s and single [Block]s.
///
/// Writing is total over well-formed blocks: the only errors are those of
/// the underlying [Write].
///
/// # Format Structure
/// - `#NEXUS` header
/// - per block: `BEGIN <NAME>;`, optional `TITLE` and `LINK` commands, the
///   block body, `END;`
///
/// # Example
/// ```
/// use nexblocks::model::{NexusDocument, TaxaBlock};
/// use nexblocks::nexus::NexusWriter;
///
/// let mut document = NexusDocument::new();
/// document.push(TaxaBlock::from_names(["Kea", "Kaka"]).unwrap());
///
/// let mut writer = NexusWriter::new(Vec::new());
/// writer.write_document(&document).unwrap();
/// let text = String::from_utf8(writer.into_inner()).unwrap();
/// assert!(text.starts_with("#NEXUS"));
/// ```
pub struct NexusWriter<W: Write> {
    out: W,
}

// ============================================================================
// API (public)
// ============================================================================
impl<W: Write> NexusWriter<W> {
    /// Creates a new Nexus writer on the given output.
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Returns the underlying output.
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Writes a complete document: header and all blocks in order.
    ///
    /// Blocks refer to the first TAXA block of the document for taxon names.
    ///
    /// # Errors
    /// Returns an I/O error if writing fails
    pub fn write_document(&mut self, document: &NexusDocument) -> io::Result<()> {
        let empty = TaxaBlock::new();
        let taxa = document.taxa().unwrap_or(&empty);

        self.write_all(NEXUS_HEADER)?.newline()?;
        for block in document.blocks() {
            self.newline()?;
            self.write_block(block, taxa)?;
        }
        self.out.flush()
    }

    /// Writes a single block from `BEGIN` to `END;`.
    ///
    /// # Arguments
    /// * `block` - The block to write
    /// * `taxa` - Taxa the block refers to (for row labels and tree leaves)
    pub fn write_block(&mut self, block: &Block, taxa: &TaxaBlock) -> io::Result<()> {
        // "BEGIN NAME;"
        self.write_all(BLOCK_BEGIN)?
            .space()?
            .text(block.kind().name())?
            .semicolon_ln()?;

        // "\tTITLE title;"
        if let Some(title) = &block.title {
            self.tab()?.write_all(TITLE)?.space()?.label(title)?.semicolon_ln()?;
        }
        // "\tLINK name = title;"
        for link in &block.links {
            self.tab()?
                .write_all(LINK)?
                .space()?
                .label(&link.block_name)?
                .space()?
                .equals()?
                .space()?
                .label(&link.title)?
                .semicolon_ln()?;
        }

        match &block.content {
            BlockContent::Taxa(b) => blocks::taxa::write_taxa(self, b)?,
            BlockContent::Characters(b) => blocks::characters::write_characters(self, taxa, b, b.format())?,
            BlockContent::Distances(b) => blocks::distances::write_distances(self, taxa, b, b.format())?,
            BlockContent::Splits(b) => blocks::splits::write_splits(self, b, b.format())?,
            BlockContent::Trees(b) => blocks::trees::write_trees(self, taxa, b, b.format())?,
            BlockContent::Network(b) => blocks::network::write_network(self, b)?,
            BlockContent::Traits(b) => blocks::traits::write_traits(self, taxa, b, b.format())?,
            BlockContent::Genomes(b) => blocks::genomes::write_genomes(self, taxa, b, b.format())?,
            BlockContent::Analysis(b) => blocks::analysis::write_analysis(self, b)?,
        }

        self.write_all(BLOCK_END)?.newline()?;
        Ok(())
    }
}

/// Writes a document into a string.
///
/// # Errors
/// Only if formatting fails, which does not happen for in-memory output.
pub fn write_nexus_string(document: &NexusDocument) -> io::Result<String> {
    let mut writer = NexusWriter::new(Vec::new());
    writer.write_document(document)?;
    String::from_utf8(writer.into_inner()).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

/// Writes a document into a (new or truncated) file.
pub fn write_nexus_file<P: AsRef<Path>>(document: &NexusDocument, path: P) -> io::Result<()> {
    let file = File::create(path)?;
    let mut writer = NexusWriter::new(BufWriter::new(file));
    writer.write_document(document)
}

// ============================================================================
// Little Helpers (crate)
// ============================================================================
impl<W: Write> NexusWriter<W> {
    /// Appends a byte slice, returning itself for chaining.
    pub(crate) fn write_all(&mut self, buf: &[u8]) -> io::Result<&mut Self> {
        self.out.write_all(buf)?;
        Ok(self)
    }

    /// Appends text verbatim, returning itself for chaining.
    pub(crate) fn text(&mut self, text: &str) -> io::Result<&mut Self> {
        self.out.write_all(text.as_bytes())?;
        Ok(self)
    }

    /// Appends a label, quoted if necessary, returning itself for chaining.
    pub(crate) fn label(&mut self, label: &str) -> io::Result<&mut Self> {
        self.out.write_all(escape_label(label).as_bytes())?;
        Ok(self)
    }

    /// Appends a number in shortest round-trip form, returning itself for chaining.
    pub(crate) fn number(&mut self, value: f64) -> io::Result<&mut Self> {
        write!(self.out, "{value}")?;
        Ok(self)
    }

    /// Appends an integer, returning itself for chaining.
    pub(crate) fn integer<I: fmt::Display>(&mut self, value: I) -> io::Result<&mut Self> {
        write!(self.out, "{value}")?;
        Ok(self)
    }

    /// Appends `key=value` with the value written verbatim.
    pub(crate) fn option(&mut self, key: &str, value: &str) -> io::Result<&mut Self> {
        self.space()?.text(key)?.equals()?.text(value)
    }

    /// Appends `n` spaces, returning itself for chaining.
    pub(crate) fn pad(&mut self, n: usize) -> io::Result<&mut Self> {
        for _ in 0..n {
            self.out.write_all(b" ")?;
        }
        Ok(self)
    }

    /// Appends a space character (' '), returning itself for chaining.
    pub(crate) fn space(&mut self) -> io::Result<&mut Self> {
        self.out.write_all(b" ")?;
        Ok(self)
    }

    /// Appends a tab character ('\t'), returning itself for chaining.
    pub(crate) fn tab(&mut self) -> io::Result<&mut Self> {
        self.out.write_all(b"\t")?;
        Ok(self)
    }

    /// Appends a newline character ('\n'), returning itself for chaining.
    pub(crate) fn newline(&mut self) -> io::Result<&mut Self> {
        self.out.write_all(b"\n")?;
        Ok(self)
    }

    /// Appends a semicolon (';'), returning itself for chaining.
    pub(crate) fn semicolon(&mut self) -> io::Result<&mut Self> {
        self.out.write_all(b";")?;
        Ok(self)
    }

    /// Appends a semicolon followed by a newline (';\n'), returning itself for chaining.
    pub(crate) fn semicolon_ln(&mut self) -> io::Result<&mut Self> {
        self.semicolon()?.newline()
    }

    /// Appends a comma (','), returning itself for chaining.
    pub(crate) fn comma(&mut self) -> io::Result<&mut Self> {
        self.out.write_all(b",")?;
        Ok(self)
    }

    /// Appends an equals sign ('='), returning itself for chaining.
    pub(crate) fn equals(&mut self) -> io::Result<&mut Self> {
        self.out.write_all(b"=")?;
        Ok(self)
    }
}
