//! Block locator and document assembler.
//!
//! Reads `#NEXUS` and a sequence of `BEGIN <name>; .. END;` sections,
//! dispatching each to the codec of its [BlockKind]. Blocks are read in a
//! single pass: a `LINK` must name a block that was read earlier.
//!
//! A document without TAXA block may introduce its taxa through row labels
//! or tree leaves; the names are collected in first-seen order and a
//! TAXA block is synthesized at the front of the document.

use crate::model::{Block, BlockContent, BlockKind, BlockLink, NexusDocument, TaxaBlock, Taxon};
use crate::nexus::blocks;
use crate::nexus::blocks::{at_block_end, TaxaContext};
use crate::parser::{ByteSource, ParsingError, ParsingErrorType, Token, Tokenizer, Warnings};
use std::path::Path;

// =#========================================================================#=
// NEXUS READER BUILDER
// =#========================================================================$=
/// Builder for configuring and creating a [NexusReader].
///
/// # Configuration Options
/// * [`require_header()`](Self::require_header): fail if the document does
///   not start with `#NEXUS` (default: header optional)
/// * [`with_taxa()`](Self::with_taxa): taxa to resolve and validate names
///   against; disables taxon discovery
///
/// # Example
/// ```
/// use nexblocks::model::TaxaBlock;
/// use nexblocks::nexus::NexusReaderBuilder;
///
/// let taxa = TaxaBlock::from_names(["A", "B", "C"]).unwrap();
/// let reader = NexusReaderBuilder::new().with_taxa(taxa).build();
/// let input = "#NEXUS\nBEGIN DISTANCES;\nFORMAT triangle=lower nodiagonal;\n\
///              MATRIX\nA\nB 2\nC 4 6\n;\nEND;\n";
/// let (document, warnings) = reader.read_str(input).unwrap();
///
/// assert!(warnings.is_empty());
/// assert_eq!(document.distances().unwrap().get(3, 2), 6.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct NexusReaderBuilder {
    require_header: bool,
    taxa: Option<TaxaBlock>,
}

impl NexusReaderBuilder {
    /// Creates a builder with default settings: header optional, taxa
    /// discovered from the document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requires the document to start with `#NEXUS`.
    pub fn require_header(mut self) -> Self {
        self.require_header = true;
        self
    }

    /// Supplies the taxa blocks refer to.
    ///
    /// Names not in `taxa` are structural errors. The supplied block is
    /// not added to the document.
    pub fn with_taxa(mut self, taxa: TaxaBlock) -> Self {
        self.taxa = Some(taxa);
        self
    }

    pub fn build(self) -> NexusReader {
        NexusReader {
            require_header: self.require_header,
            taxa: self.taxa,
        }
    }
}

// =#========================================================================#=
// NEXUS READER
// =#========================================================================$=
/// Immutable document reader; see [NexusReaderBuilder].
///
/// A reader holds no state between reads, so one reader can be used for
/// any number of documents.
#[derive(Debug, Clone)]
pub struct NexusReader {
    require_header: bool,
    taxa: Option<TaxaBlock>,
}

impl NexusReader {
    /// Reads a document from a string.
    ///
    /// # Returns
    /// The document and the warnings about substituted values, skipped
    /// commands and skipped blocks.
    ///
    /// # Errors
    /// The first fatal [ParsingError]; no partial document is returned.
    pub fn read_str(&self, input: &str) -> Result<(NexusDocument, Warnings), ParsingError> {
        self.read(Tokenizer::for_str(input))
    }

    pub fn read_bytes(&self, input: &[u8]) -> Result<(NexusDocument, Warnings), ParsingError> {
        self.read(Tokenizer::for_bytes(input))
    }

    /// Reads a document from a file, loaded into memory first.
    pub fn read_file<P: AsRef<Path>>(&self, path: P) -> Result<(NexusDocument, Warnings), ParsingError> {
        self.read(Tokenizer::for_file(path)?)
    }

    /// Reads a document from a tokenizer over any [ByteSource].
    pub fn read<S: ByteSource>(
        &self,
        mut tokenizer: Tokenizer<S>,
    ) -> Result<(NexusDocument, Warnings), ParsingError> {
        let mut warnings = Warnings::new();
        let mut document = NexusDocument::new();
        let mut assembly = Assembly::new(self.taxa.clone());

        if !tokenizer.consume_if_ignore_case("#nexus")? && self.require_header {
            return Err(ParsingError::missing_nexus_header(&tokenizer));
        }

        while tokenizer.peek_token()? != Token::Eof {
            tokenizer.match_ignore_case("begin")?;
            let line = tokenizer.line();
            let name = tokenizer.next_label()?;
            tokenizer.match_ignore_case(";")?;

            let Some(kind) = BlockKind::from_name(&name) else {
                skip_block(&mut tokenizer)?;
                log::debug!("skipped unknown block {name} (line {line})");
                warnings.push(line, format!("skipped unknown block {name}"));
                continue;
            };
            log::debug!("reading {} block (line {line})", kind.name());

            let mut block = read_title_and_links(&mut tokenizer, &document, &mut warnings)?;
            let content = read_content(kind, &mut tokenizer, &mut assembly, &mut warnings, line)?;
            match_block_end(&mut tokenizer)?;

            block.content = content;
            document.push(block);
        }

        if let Some(taxa) = assembly.into_synthesized() {
            log::debug!("synthesized TAXA block of {} taxa", taxa.ntax());
            document.push_front(taxa);
        }
        warnings.emit();
        Ok((document, warnings))
    }
}

// ============================================================================
// Quick API (public)
// ============================================================================
/// Parses a document from a string with default settings.
///
/// # Example
/// ```
/// let input = "#NEXUS\nBEGIN DISTANCES;\nDIMENSIONS ntax=3;\n\
///              FORMAT triangle=both;\nMATRIX\n\
///              A 0 1 2\nB 1 0 3\nC 2 3 0\n;\nEND;\n";
/// let (document, _) = nexblocks::parse_nexus_str(input).unwrap();
///
/// let names: Vec<&str> = document.taxa().unwrap().names().collect();
/// assert_eq!(names, vec!["A", "B", "C"]);
/// ```
pub fn parse_nexus_str(input: &str) -> Result<(NexusDocument, Warnings), ParsingError> {
    NexusReaderBuilder::new().build().read_str(input)
}

/// Parses a document from a file with default settings.
///
/// # Arguments
/// * `path` - Path to the file (accepting `&str`, `String`, `Path`, or `PathBuf`)
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
pub fn parse_nexus_file<P: AsRef<Path>>(path: P) -> Result<(NexusDocument, Warnings), ParsingError> {
    NexusReaderBuilder::new().build().read_file(path)
}

// ============================================================================
// Assembly (private)
// ============================================================================
/// Taxa known while a document is read.
struct Assembly {
    taxa: TaxaBlock,
    /// Names not found in `taxa` are added instead of rejected
    discovery: bool,
}

impl Assembly {
    fn new(supplied: Option<TaxaBlock>) -> Self {
        match supplied {
            Some(taxa) => Self {
                taxa,
                discovery: false,
            },
            None => Self {
                taxa: TaxaBlock::new(),
                discovery: true,
            },
        }
    }

    fn context(&self) -> TaxaContext<'_> {
        TaxaContext {
            taxa: &self.taxa,
            discovery: self.discovery,
        }
    }

    /// Takes the taxa of an explicit TAXA block.
    ///
    /// # Errors
    /// Structural error if taxa are known already and named differently.
    fn set_explicit(&mut self, taxa: &TaxaBlock, line: usize) -> Result<(), ParsingError> {
        if !self.taxa.is_empty() && !self.taxa.names().eq(taxa.names()) {
            return Err(ParsingError::at_line(
                ParsingErrorType::Structural(String::from(
                    "TAXA block differs from the taxa known at this point",
                )),
                line,
            ));
        }
        self.taxa = taxa.clone();
        self.discovery = false;
        Ok(())
    }

    /// Registers names a codec discovered.
    fn discover(&mut self, names: Vec<String>, line: usize) -> Result<(), ParsingError> {
        for name in names {
            self.taxa.add(Taxon::new(name)).map_err(|e| {
                ParsingError::at_line(ParsingErrorType::Structural(e.to_string()), line)
            })?;
        }
        Ok(())
    }

    /// The discovered taxa, if the document had no TAXA block of its own.
    fn into_synthesized(self) -> Option<TaxaBlock> {
        (self.discovery && !self.taxa.is_empty()).then_some(self.taxa)
    }
}

// ============================================================================
// Helpers (private)
// ============================================================================

/// Dispatches to the codec of `kind`.
fn read_content<S: ByteSource>(
    kind: BlockKind,
    tokenizer: &mut Tokenizer<S>,
    assembly: &mut Assembly,
    warnings: &mut Warnings,
    line: usize,
) -> Result<BlockContent, ParsingError> {
    let content = match kind {
        BlockKind::Taxa => {
            let taxa = blocks::taxa::parse_taxa(tokenizer, warnings)?;
            assembly.set_explicit(&taxa, line)?;
            BlockContent::Taxa(taxa)
        }
        BlockKind::Characters => {
            let parsed = blocks::characters::parse_characters(tokenizer, assembly.context(), warnings)?;
            assembly.discover(parsed.discovered, line)?;
            BlockContent::Characters(parsed.block)
        }
        BlockKind::Distances => {
            let parsed = blocks::distances::parse_distances(tokenizer, assembly.context(), warnings)?;
            assembly.discover(parsed.discovered, line)?;
            BlockContent::Distances(parsed.block)
        }
        BlockKind::Splits => {
            BlockContent::Splits(blocks::splits::parse_splits(tokenizer, assembly.context(), warnings)?)
        }
        BlockKind::Trees => {
            let parsed = blocks::trees::parse_trees(tokenizer, assembly.context(), warnings)?;
            assembly.discover(parsed.discovered, line)?;
            BlockContent::Trees(parsed.block)
        }
        BlockKind::Network => BlockContent::Network(blocks::network::parse_network(tokenizer, warnings)?),
        BlockKind::Traits => {
            let parsed = blocks::traits::parse_traits(tokenizer, assembly.context(), warnings)?;
            assembly.discover(parsed.discovered, line)?;
            BlockContent::Traits(parsed.block)
        }
        BlockKind::Genomes => {
            let parsed = blocks::genomes::parse_genomes(tokenizer, assembly.context(), warnings)?;
            assembly.discover(parsed.discovered, line)?;
            BlockContent::Genomes(parsed.block)
        }
        BlockKind::Analysis => BlockContent::Analysis(blocks::analysis::parse_analysis(tokenizer, warnings)?),
    };
    Ok(content)
}

/// Reads optional `TITLE t;` and `LINK name = title ..;` commands.
///
/// # Returns
/// A block with title and links set and placeholder content.
fn read_title_and_links<S: ByteSource>(
    tokenizer: &mut Tokenizer<S>,
    document: &NexusDocument,
    warnings: &mut Warnings,
) -> Result<Block, ParsingError> {
    let mut block = Block::new(BlockContent::Analysis(Default::default()));
    loop {
        if tokenizer.consume_if_ignore_case("title")? {
            block.title = Some(tokenizer.next_label()?);
            tokenizer.match_ignore_case(";")?;
        } else if tokenizer.consume_if_ignore_case("link")? {
            let line = tokenizer.line();
            loop {
                let name = tokenizer.next_label()?;
                tokenizer.match_ignore_case("=")?;
                let title = tokenizer.next_label()?;
                let link = BlockLink::new(name, title);
                match link.kind() {
                    Some(kind) if document.find(kind, &link.title).is_none() => {
                        return Err(ParsingError::at_line(
                            ParsingErrorType::Structural(format!(
                                "LINK to unknown {} block '{}'",
                                kind.name(),
                                link.title
                            )),
                            line,
                        ));
                    }
                    Some(_) => {}
                    None => warnings.push(
                        line,
                        format!("LINK to unsupported block {} kept", link.block_name),
                    ),
                }
                block.links.push(link);

                if tokenizer.consume_if_ignore_case(";")? {
                    break;
                }
                tokenizer.consume_if_ignore_case(",")?;
            }
        } else {
            return Ok(block);
        }
    }
}

/// Consumes `END;` or `ENDBLOCK;`.
fn match_block_end<S: ByteSource>(tokenizer: &mut Tokenizer<S>) -> Result<(), ParsingError> {
    if tokenizer.peek_token()? == Token::Eof {
        return Err(ParsingError::unexpected_eof(tokenizer));
    }
    if !at_block_end(tokenizer)? {
        return Err(ParsingError::lexical(tokenizer, String::from("END; or ENDBLOCK;")));
    }
    tokenizer.next_token()?;
    tokenizer.match_ignore_case(";")
}

/// Skips a block up to and including its `END;` or `ENDBLOCK;`.
fn skip_block<S: ByteSource>(tokenizer: &mut Tokenizer<S>) -> Result<(), ParsingError> {
    loop {
        match tokenizer.next_token()? {
            Token::Word(word) if word.eq_ignore_ascii_case("end") || word.eq_ignore_ascii_case("endblock") => {
                if tokenizer.consume_if_ignore_case(";")? {
                    return Ok(());
                }
            }
            Token::Eof => return Err(ParsingError::unexpected_eof(tokenizer)),
            _ => {}
        }
    }
}
