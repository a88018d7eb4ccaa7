//! DISTANCES block codec.
//!
//! ```text
//! DIMENSIONS [NTAX=n];
//! [FORMAT [TRIANGLE=LOWER|UPPER|BOTH] [[NO]DIAGONAL] [LABELS[=LEFT|NO]] [VARIANCE];]
//! MATRIX ..;
//! [VARMATRIX ..;]
//! ```
//! Values outside the stored triangle are mirrored, an omitted diagonal is
//! zero. An asymmetric `both` matrix is averaged with a warning.

use crate::model::{DistancesBlock, DistancesFormat, TaxaBlock, Triangle};
use crate::nexus::blocks::{
    at_block_end, check_cells_fit, matrix_ntax, max_label_width, skip_command, write_padded_label,
    Parsed, TaxaContext, TaxonResolver,
};
use crate::nexus::defs::{DIMENSIONS, FORMAT, MATRIX, VARMATRIX};
use crate::nexus::writer::NexusWriter;
use crate::parser::command::OptionList;
use crate::parser::{ByteSource, ParsingError, ParsingErrorType, Tokenizer, Warnings};
use std::io;
use std::io::Write;

/// Entries as read; `None` where the layout stores nothing.
type RawEntries = Vec<Vec<Option<f64>>>;

// =#========================================================================#=
// PARSING
// =#========================================================================$=
/// Parses the body of a DISTANCES block.
///
/// # Arguments
/// * `tokenizer` - Positioned after `BEGIN DISTANCES;` and TITLE/LINK
/// * `context` - Known taxa; in discovery mode row labels may name new taxa
/// * `warnings` - Receives the symmetrization warning
///
/// # Errors
/// Fatal on dimension mismatches, repeated rows, unlabeled rows for
/// unknown taxa, and unrecognized FORMAT options.
pub fn parse_distances<S: ByteSource>(
    tokenizer: &mut Tokenizer<S>,
    context: TaxaContext,
    warnings: &mut Warnings,
) -> Result<Parsed<DistancesBlock>, ParsingError> {
    let mut resolver = TaxonResolver::new(context);
    let mut declared_ntax: Option<usize> = None;
    let mut format = DistancesFormat::default();
    let mut distances: Option<(RawEntries, usize)> = None;
    let mut variances: Option<(RawEntries, usize)> = None;

    while !at_block_end(tokenizer)? {
        if tokenizer.consume_if_ignore_case("dimensions")? {
            let mut dimensions = OptionList::read(tokenizer, "DIMENSIONS")?;
            declared_ntax = dimensions.take_usize("ntax")?;
            dimensions.finish()?;
        } else if tokenizer.consume_if_ignore_case("format")? {
            format = parse_format(tokenizer)?;
        } else if tokenizer.consume_if_ignore_case("matrix")? {
            let ntax = matrix_ntax(declared_ntax, &resolver, tokenizer)?;
            let line = tokenizer.line();
            distances = Some((read_entries(tokenizer, &mut resolver, &format, ntax)?, line));
        } else if tokenizer.consume_if_ignore_case("varmatrix")? {
            let ntax = matrix_ntax(declared_ntax, &resolver, tokenizer)?;
            let line = tokenizer.line();
            variances = Some((read_entries(tokenizer, &mut resolver, &format, ntax)?, line));
        } else {
            skip_command(tokenizer, "DISTANCES", warnings)?;
        }
    }

    let Some((entries, line)) = distances else {
        return Err(ParsingError::structural(tokenizer, String::from("DISTANCES block without MATRIX")));
    };
    let ntax = entries.len();
    format.variance = variances.is_some();
    let mut block = DistancesBlock::new(ntax).with_format(format);

    if symmetrize(&entries, |i, j, v| block.set(i, j, v)) {
        warnings.push(line, String::from("asymmetric distance matrix symmetrized by averaging"));
    }
    if let Some((entries, line)) = variances {
        if entries.len() != ntax {
            return Err(ParsingError::at_line(
                ParsingErrorType::Structural(String::from("VARMATRIX and MATRIX differ in size")),
                line,
            ));
        }
        if symmetrize(&entries, |i, j, v| block.set_variance(i, j, v)) {
            warnings.push(line, String::from("asymmetric variance matrix symmetrized by averaging"));
        }
    }

    Ok(Parsed {
        block,
        discovered: resolver.into_discovered(),
    })
}

/// Parses the options of FORMAT (after the keyword).
fn parse_format<S: ByteSource>(tokenizer: &mut Tokenizer<S>) -> Result<DistancesFormat, ParsingError> {
    let mut options = OptionList::read(tokenizer, "FORMAT")?;
    let mut format = DistancesFormat::default();
    if let Some(name) = options.take_value("triangle")? {
        format.triangle = Triangle::from_name(&name).ok_or_else(|| {
            ParsingError::at_line(
                ParsingErrorType::UnknownConstruct(format!("triangle '{name}'")),
                options.line(),
            )
        })?;
    }
    format.diagonal = options.take_flag("diagonal")?.unwrap_or(true);
    format.labels = options.take_flag("labels")?.unwrap_or(true);
    format.variance = options.take_flag("variance")?.unwrap_or(false);
    options.finish()?;
    Ok(format)
}

/// Reads the rows of MATRIX or VARMATRIX including the terminating `;`.
fn read_entries<S: ByteSource>(
    tokenizer: &mut Tokenizer<S>,
    resolver: &mut TaxonResolver,
    format: &DistancesFormat,
    ntax: usize,
) -> Result<RawEntries, ParsingError> {
    if !format.labels && resolver.ntax_known() != ntax {
        return Err(ParsingError::structural(
            tokenizer,
            String::from("matrix without row labels requires known taxa"),
        ));
    }

    check_cells_fit(tokenizer, ntax, ntax.saturating_sub(1) / 2)?;
    let mut entries: RawEntries = vec![vec![None; ntax]; ntax];
    let mut seen = vec![false; ntax];
    for row in 1..=ntax {
        let t = if format.labels {
            let label = tokenizer.next_label()?;
            let t = resolver.resolve(&label, tokenizer)?;
            if t > ntax {
                return Err(ParsingError::structural(
                    tokenizer,
                    format!("taxon '{label}' exceeds the {ntax} taxa of the matrix"),
                ));
            }
            t
        } else {
            row
        };
        if seen[t - 1] {
            return Err(ParsingError::structural(tokenizer, format!("taxon {t} occurs twice in matrix")));
        }
        seen[t - 1] = true;

        let (first, last) = format.triangle.columns(t, ntax, format.diagonal);
        for c in first..=last {
            entries[t - 1][c - 1] = Some(tokenizer.next_f64()?);
        }
    }
    tokenizer.match_ignore_case(";")?;
    Ok(entries)
}

/// Passes the symmetric closure of `entries` to `set` (1-based indices).
///
/// # Returns
/// Whether any pair had to be averaged.
fn symmetrize<F: FnMut(usize, usize, f64)>(entries: &RawEntries, mut set: F) -> bool {
    let n = entries.len();
    let mut averaged = false;
    for i in 0..n {
        set(i + 1, i + 1, entries[i][i].unwrap_or(0.0));
        for j in (i + 1)..n {
            let value = match (entries[i][j], entries[j][i]) {
                (Some(a), Some(b)) if a != b => {
                    averaged = true;
                    (a + b) / 2.0
                }
                (Some(a), _) => a,
                (None, Some(b)) => b,
                (None, None) => 0.0,
            };
            set(i + 1, j + 1, value);
        }
    }
    averaged
}

// =#========================================================================#=
// WRITING
// =#========================================================================$=
/// Writes the body of a DISTANCES block, including VARMATRIX if the block
/// has variances.
pub fn write_distances<W: Write>(
    writer: &mut NexusWriter<W>,
    taxa: &TaxaBlock,
    block: &DistancesBlock,
    format: &DistancesFormat,
) -> io::Result<()> {
    // "\tDIMENSIONS ntax=n;"
    writer
        .tab()?
        .write_all(DIMENSIONS)?
        .option("ntax", &block.ntax().to_string())?
        .semicolon_ln()?;

    // "\tFORMAT triangle=both diagonal labels=left;"
    writer
        .tab()?
        .write_all(FORMAT)?
        .option("triangle", format.triangle.name())?
        .space()?
        .text(if format.diagonal { "diagonal" } else { "nodiagonal" })?
        .option("labels", if format.labels { "left" } else { "no" })?;
    if block.has_variances() {
        writer.space()?.text("variance")?;
    }
    writer.semicolon_ln()?;

    writer.tab()?.write_all(MATRIX)?.newline()?;
    write_entries(writer, taxa, block.ntax(), format, |i, j| block.get(i, j))?;

    if block.has_variances() {
        writer.tab()?.write_all(VARMATRIX)?.newline()?;
        write_entries(writer, taxa, block.ntax(), format, |i, j| {
            block.variance(i, j).unwrap_or(0.0)
        })?;
    }
    Ok(())
}

fn write_entries<W: Write, F: Fn(usize, usize) -> f64>(
    writer: &mut NexusWriter<W>,
    taxa: &TaxaBlock,
    ntax: usize,
    format: &DistancesFormat,
    value: F,
) -> io::Result<()> {
    let labels: Vec<String> = (1..=ntax)
        .map(|t| taxa.name(t).map(str::to_string).unwrap_or_else(|| format!("t{t}")))
        .collect();
    let width = max_label_width(labels.iter().map(|l| l.as_str()));

    for t in 1..=ntax {
        writer.tab()?;
        if format.labels {
            write_padded_label(writer, &labels[t - 1], width)?;
        }
        let (first, last) = format.triangle.columns(t, ntax, format.diagonal);
        for c in first..=last {
            if c > first {
                writer.space()?;
            }
            writer.number(value(t, c))?;
        }
        writer.newline()?;
    }
    writer.tab()?.semicolon_ln()?;
    Ok(())
}
