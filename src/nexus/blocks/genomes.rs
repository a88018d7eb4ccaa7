//! GENOMES block codec.
//!
//! ```text
//! DIMENSIONS NTAX=n;
//! [FORMAT [LABELS] [MULTIPART] [FILES];]
//! MATRIX
//!     [label] LENGTH=N [PARTS=k] part .. part,
//!     ..
//! ;
//! part := [NAME=w] (SEQUENCE=w | FILE=w OFFSET=N SIZE=N)
//! ```

use crate::model::{Genome, GenomePart, GenomesBlock, GenomesFormat, PartContent, TaxaBlock};
use crate::nexus::blocks::{
    at_block_end, check_cells_fit, matrix_ntax, skip_command, Parsed, TaxaContext, TaxonResolver,
};
use crate::nexus::defs::{DIMENSIONS, FORMAT, MATRIX};
use crate::nexus::writer::NexusWriter;
use crate::parser::command::OptionList;
use crate::parser::{ByteSource, ParsingError, ParsingErrorType, Tokenizer, Warnings};
use std::io;
use std::io::Write;

// =#========================================================================#=
// PARSING
// =#========================================================================$=
/// Parses the body of a GENOMES block.
///
/// # Errors
/// Structural error if a genome's LENGTH differs from the sum of its part
/// lengths, a row has several parts without MULTIPART or file parts without
/// FILES, or rows do not match the taxa.
pub fn parse_genomes<S: ByteSource>(
    tokenizer: &mut Tokenizer<S>,
    context: TaxaContext,
    warnings: &mut Warnings,
) -> Result<Parsed<GenomesBlock>, ParsingError> {
    let mut resolver = TaxonResolver::new(context);
    let mut declared_ntax: Option<usize> = None;
    let mut format = GenomesFormat::default();
    let mut genomes: Option<Vec<Genome>> = None;

    while !at_block_end(tokenizer)? {
        if tokenizer.consume_if_ignore_case("dimensions")? {
            let mut dimensions = OptionList::read(tokenizer, "DIMENSIONS")?;
            declared_ntax = dimensions.take_usize("ntax")?;
            dimensions.finish()?;
        } else if tokenizer.consume_if_ignore_case("format")? {
            let mut options = OptionList::read(tokenizer, "FORMAT")?;
            format.labels = options.take_flag("labels")?.unwrap_or(true);
            format.multi_part = options.take_flag("multipart")?.unwrap_or(false);
            format.files = options.take_flag("files")?.unwrap_or(false);
            options.finish()?;
        } else if tokenizer.consume_if_ignore_case("matrix")? {
            let ntax = matrix_ntax(declared_ntax, &resolver, tokenizer)?;
            genomes = Some(parse_matrix(tokenizer, &mut resolver, &format, ntax)?);
        } else {
            skip_command(tokenizer, "GENOMES", warnings)?;
        }
    }

    let Some(genomes) = genomes else {
        return Err(ParsingError::structural(tokenizer, String::from("GENOMES block without MATRIX")));
    };
    Ok(Parsed {
        block: GenomesBlock::new(genomes).with_format(format),
        discovered: resolver.into_discovered(),
    })
}

/// Parses the rows of MATRIX including the terminating `;`.
fn parse_matrix<S: ByteSource>(
    tokenizer: &mut Tokenizer<S>,
    resolver: &mut TaxonResolver,
    format: &GenomesFormat,
    ntax: usize,
) -> Result<Vec<Genome>, ParsingError> {
    if !format.labels && resolver.ntax_known() != ntax {
        return Err(ParsingError::structural(
            tokenizer,
            String::from("matrix without row labels requires known taxa"),
        ));
    }

    check_cells_fit(tokenizer, ntax, 1)?;
    let mut genomes: Vec<Option<Genome>> = vec![None; ntax];
    for row in 1..=ntax {
        tokenizer.skip_comment_and_whitespace()?;
        let line = tokenizer.line();
        let structural = |msg: String| ParsingError::at_line(ParsingErrorType::Structural(msg), line);

        let t = if format.labels {
            let label = tokenizer.next_label()?;
            match resolver.resolve(&label, tokenizer)? {
                t if t > ntax => return Err(structural(format!("taxon '{label}' exceeds the {ntax} taxa"))),
                t => t,
            }
        } else {
            row
        };
        if genomes[t - 1].is_some() {
            return Err(structural(format!("taxon {t} occurs twice in matrix")));
        }

        tokenizer.match_ignore_case("length")?;
        tokenizer.match_ignore_case("=")?;
        let length = tokenizer.next_usize()? as u64;
        let nparts = if tokenizer.consume_if_ignore_case("parts")? {
            tokenizer.match_ignore_case("=")?;
            tokenizer.next_usize()?
        } else {
            1
        };
        if nparts > 1 && !format.multi_part {
            return Err(structural(format!("genome of taxon {t} has {nparts} parts, but not MULTIPART")));
        }

        let mut parts = Vec::new();
        for _ in 0..nparts {
            let part = parse_part(tokenizer)?;
            if part.is_file() && !format.files {
                return Err(structural(format!("genome of taxon {t} refers to a file, but not FILES")));
            }
            parts.push(part);
        }

        let genome = Genome::new(parts);
        if genome.length() != length {
            return Err(structural(format!(
                "genome of taxon {t} has length {length}, but its parts sum to {}",
                genome.length()
            )));
        }
        genomes[t - 1] = Some(genome);

        if row < ntax {
            tokenizer.match_ignore_case(",")?;
        } else {
            tokenizer.consume_if_ignore_case(",")?;
        }
    }
    tokenizer.match_ignore_case(";")?;
    Ok(genomes.into_iter().flatten().collect())
}

/// Parses `[NAME=w] (SEQUENCE=w | FILE=w OFFSET=N SIZE=N)`.
fn parse_part<S: ByteSource>(tokenizer: &mut Tokenizer<S>) -> Result<GenomePart, ParsingError> {
    let name = if tokenizer.consume_if_ignore_case("name")? {
        tokenizer.match_ignore_case("=")?;
        Some(tokenizer.next_label()?)
    } else {
        None
    };

    let mut part = if tokenizer.consume_if_ignore_case("sequence")? {
        tokenizer.match_ignore_case("=")?;
        GenomePart::sequence(tokenizer.next_label()?)
    } else if tokenizer.consume_if_ignore_case("file")? {
        tokenizer.match_ignore_case("=")?;
        let path = tokenizer.next_label()?;
        tokenizer.match_ignore_case("offset")?;
        tokenizer.match_ignore_case("=")?;
        let offset = tokenizer.next_usize()? as u64;
        tokenizer.match_ignore_case("size")?;
        tokenizer.match_ignore_case("=")?;
        let size = tokenizer.next_usize()? as u64;
        GenomePart::file(path, offset, size)
    } else {
        return Err(ParsingError::lexical(tokenizer, String::from("SEQUENCE= or FILE= in genome part")));
    };
    part.name = name;
    Ok(part)
}

// =#========================================================================#=
// WRITING
// =#========================================================================$=
/// Writes the body of a GENOMES block.
///
/// MULTIPART and FILES are written whenever a genome needs them, regardless
/// of `format`.
pub fn write_genomes<W: Write>(
    writer: &mut NexusWriter<W>,
    taxa: &TaxaBlock,
    block: &GenomesBlock,
    format: &GenomesFormat,
) -> io::Result<()> {
    let multi_part = format.multi_part || block.iter().any(|g| g.parts.len() > 1);
    let files = format.files || block.iter().any(|g| g.parts.iter().any(GenomePart::is_file));
    let yes_no = |flag: bool| if flag { "yes" } else { "no" };

    writer
        .tab()?
        .write_all(DIMENSIONS)?
        .option("ntax", &block.ntax().to_string())?
        .semicolon_ln()?;

    writer
        .tab()?
        .write_all(FORMAT)?
        .option("labels", yes_no(format.labels))?
        .option("multiPart", yes_no(multi_part))?
        .option("files", yes_no(files))?
        .semicolon_ln()?;

    // "\t\tlabel length=N parts=k name=w sequence=w,"
    writer.tab()?.write_all(MATRIX)?.newline()?;
    for (i, genome) in block.iter().enumerate() {
        let t = i + 1;
        writer.tab()?.tab()?;
        if format.labels {
            let label = taxa.name(t).map(str::to_string).unwrap_or_else(|| format!("t{t}"));
            writer.label(&label)?.space()?;
        }
        writer.text("length")?.equals()?.integer(genome.length())?;
        if multi_part {
            writer.option("parts", &genome.parts.len().to_string())?;
        }
        for part in &genome.parts {
            if let Some(name) = &part.name {
                writer.space()?.text("name")?.equals()?.label(name)?;
            }
            match &part.content {
                PartContent::Sequence(sequence) => {
                    writer.space()?.text("sequence")?.equals()?.label(sequence)?;
                }
                PartContent::File { path, offset, size } => {
                    writer
                        .space()?
                        .text("file")?
                        .equals()?
                        .label(path)?
                        .option("offset", &offset.to_string())?
                        .option("size", &size.to_string())?;
                }
            }
        }
        if t < block.ntax() {
            writer.comma()?;
        }
        writer.newline()?;
    }
    writer.tab()?.semicolon_ln()?;
    Ok(())
}
