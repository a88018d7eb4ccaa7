//! TRAITS block codec.
//!
//! ```text
//! DIMENSIONS [NTAX=n] NTRAITS=m;
//! [FORMAT [LABELS[=YES|NO]] [MISSING=c] [SEPARATOR=WHITESPACE|COMMA];]
//! [TRAITLATITUDE x1 .. xm;]
//! [TRAITLONGITUDE y1 .. ym;]
//! [TRAITLABELS l1 .. lm;]
//! MATRIX [label] v1 .. vm ..;
//! ```
//! A value is a number, the missing symbol, or a category. The first unseen
//! category of a trait gets the next code.

use crate::model::{Separator, TaxaBlock, TraitValue, TraitsBlock, TraitsFormat};
use crate::nexus::blocks::{
    at_block_end, check_cells_fit, matrix_ntax, max_label_width, read_numbers, skip_command,
    write_padded_label, Parsed, TaxaContext, TaxonResolver,
};
use crate::nexus::defs::{DIMENSIONS, FORMAT, MATRIX, TRAITLABELS, TRAITLATITUDE, TRAITLONGITUDE};
use crate::nexus::writer::NexusWriter;
use crate::parser::command::{read_label_list, OptionList};
use crate::parser::{ByteSource, ParsingError, ParsingErrorType, Tokenizer, Warnings};
use std::io;
use std::io::Write;

// =#========================================================================#=
// PARSING
// =#========================================================================$=
/// Parses the body of a TRAITS block.
///
/// # Errors
/// Structural error if NTRAITS is missing, a per-trait list does not have
/// NTRAITS entries, or rows do not match the taxa.
pub fn parse_traits<S: ByteSource>(
    tokenizer: &mut Tokenizer<S>,
    context: TaxaContext,
    warnings: &mut Warnings,
) -> Result<Parsed<TraitsBlock>, ParsingError> {
    let mut resolver = TaxonResolver::new(context);
    let mut declared_ntax: Option<usize> = None;
    let mut ntraits: Option<usize> = None;
    let mut format = TraitsFormat::default();
    let mut latitudes: Option<Vec<f64>> = None;
    let mut longitudes: Option<Vec<f64>> = None;
    let mut labels: Option<Vec<String>> = None;
    let mut block: Option<TraitsBlock> = None;

    while !at_block_end(tokenizer)? {
        if tokenizer.consume_if_ignore_case("dimensions")? {
            let mut dimensions = OptionList::read(tokenizer, "DIMENSIONS")?;
            declared_ntax = dimensions.take_usize("ntax")?;
            ntraits = dimensions.take_usize("ntraits")?;
            dimensions.finish()?;
        } else if tokenizer.consume_if_ignore_case("format")? {
            format = parse_format(tokenizer)?;
        } else if tokenizer.consume_if_ignore_case("traitlatitude")? {
            let ntraits = require_ntraits(ntraits, tokenizer)?;
            latitudes = Some(read_numbers(tokenizer, ntraits)?);
        } else if tokenizer.consume_if_ignore_case("traitlongitude")? {
            let ntraits = require_ntraits(ntraits, tokenizer)?;
            longitudes = Some(read_numbers(tokenizer, ntraits)?);
        } else if tokenizer.consume_if_ignore_case("traitlabels")? {
            let expected = require_ntraits(ntraits, tokenizer)?;
            let list = read_label_list(tokenizer)?;
            if list.len() != expected {
                return Err(ParsingError::structural(
                    tokenizer,
                    format!("expected {expected} trait labels, got {}", list.len()),
                ));
            }
            labels = Some(list);
        } else if tokenizer.consume_if_ignore_case("matrix")? {
            let ntraits = require_ntraits(ntraits, tokenizer)?;
            let ntax = matrix_ntax(declared_ntax, &resolver, tokenizer)?;
            block = Some(parse_matrix(tokenizer, &mut resolver, &format, ntax, ntraits)?);
        } else {
            skip_command(tokenizer, "TRAITS", warnings)?;
        }
    }

    let Some(mut block) = block else {
        return Err(ParsingError::structural(tokenizer, String::from("TRAITS block without MATRIX")));
    };
    for i in 1..=block.ntraits() {
        let info = block.trait_info_mut(i);
        if let Some(labels) = &labels {
            info.label = labels[i - 1].clone();
        }
        info.latitude = latitudes.as_ref().map(|l| l[i - 1]);
        info.longitude = longitudes.as_ref().map(|l| l[i - 1]);
    }

    Ok(Parsed {
        block,
        discovered: resolver.into_discovered(),
    })
}

fn require_ntraits<S: ByteSource>(ntraits: Option<usize>, tokenizer: &Tokenizer<S>) -> Result<usize, ParsingError> {
    ntraits.ok_or_else(|| ParsingError::structural(tokenizer, String::from("DIMENSIONS with NTRAITS must come first")))
}

fn parse_format<S: ByteSource>(tokenizer: &mut Tokenizer<S>) -> Result<TraitsFormat, ParsingError> {
    let mut options = OptionList::read(tokenizer, "FORMAT")?;
    let mut format = TraitsFormat::default();
    format.labels = options.take_flag("labels")?.unwrap_or(true);
    if let Some(missing) = options.take_char("missing")? {
        format.missing = missing;
    }
    if let Some(name) = options.take_value("separator")? {
        format.separator = Separator::from_name(&name).ok_or_else(|| {
            ParsingError::at_line(
                ParsingErrorType::UnknownConstruct(format!("separator '{name}'")),
                options.line(),
            )
        })?;
    }
    options.finish()?;
    Ok(format)
}

/// Parses the rows of MATRIX including the terminating `;`.
fn parse_matrix<S: ByteSource>(
    tokenizer: &mut Tokenizer<S>,
    resolver: &mut TaxonResolver,
    format: &TraitsFormat,
    ntax: usize,
    ntraits: usize,
) -> Result<TraitsBlock, ParsingError> {
    if !format.labels && resolver.ntax_known() != ntax {
        return Err(ParsingError::structural(
            tokenizer,
            String::from("matrix without row labels requires known taxa"),
        ));
    }

    check_cells_fit(tokenizer, ntax, ntraits)?;
    let mut block = TraitsBlock::new(ntax, ntraits).with_format(format.clone());
    let mut seen = vec![false; ntax];
    let missing = format.missing.to_string();

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

        for i in 1..=ntraits {
            if i > 1 && format.separator == Separator::Comma {
                tokenizer.match_ignore_case(",")?;
            }
            let value = tokenizer.next_label()?;
            if value == missing {
                block.set(t, i, TraitValue::Missing);
            } else if let Some(number) = value.parse::<f64>().ok().filter(|n| n.is_finite()) {
                block.set(t, i, TraitValue::Number(number));
            } else {
                block.set_category(t, i, &value);
            }
        }
    }
    tokenizer.match_ignore_case(";")?;
    Ok(block)
}

// =#========================================================================#=
// WRITING
// =#========================================================================$=
/// Writes the body of a TRAITS block.
pub fn write_traits<W: Write>(
    writer: &mut NexusWriter<W>,
    taxa: &TaxaBlock,
    block: &TraitsBlock,
    format: &TraitsFormat,
) -> io::Result<()> {
    // "\tDIMENSIONS ntax=n ntraits=m;"
    writer
        .tab()?
        .write_all(DIMENSIONS)?
        .option("ntax", &block.ntax().to_string())?
        .option("ntraits", &block.ntraits().to_string())?
        .semicolon_ln()?;

    // "\tFORMAT labels=yes missing=? separator=whitespace;"
    writer
        .tab()?
        .write_all(FORMAT)?
        .option("labels", if format.labels { "yes" } else { "no" })?
        .option("missing", &format.missing.to_string())?
        .option("separator", format.separator.name())?
        .semicolon_ln()?;

    if block.traits().iter().any(|t| t.latitude.is_some()) {
        writer.tab()?.write_all(TRAITLATITUDE)?;
        for info in block.traits() {
            writer.space()?.number(info.latitude.unwrap_or(0.0))?;
        }
        writer.semicolon_ln()?;
    }
    if block.traits().iter().any(|t| t.longitude.is_some()) {
        writer.tab()?.write_all(TRAITLONGITUDE)?;
        for info in block.traits() {
            writer.space()?.number(info.longitude.unwrap_or(0.0))?;
        }
        writer.semicolon_ln()?;
    }

    writer.tab()?.write_all(TRAITLABELS)?;
    for info in block.traits() {
        writer.space()?.label(&info.label)?;
    }
    writer.semicolon_ln()?;

    let labels: Vec<String> = (1..=block.ntax())
        .map(|t| taxa.name(t).map(str::to_string).unwrap_or_else(|| format!("t{t}")))
        .collect();
    let width = max_label_width(labels.iter().map(|l| l.as_str()));
    let separator = match format.separator {
        Separator::Whitespace => " ",
        Separator::Comma => ",",
    };

    writer.tab()?.write_all(MATRIX)?.newline()?;
    for t in 1..=block.ntax() {
        writer.tab()?;
        if format.labels {
            write_padded_label(writer, &labels[t - 1], width)?;
        }
        for i in 1..=block.ntraits() {
            if i > 1 {
                writer.text(separator)?;
            }
            match block.get(t, i) {
                TraitValue::Missing => writer.text(&format.missing.to_string())?,
                TraitValue::Number(value) => writer.number(value)?,
                TraitValue::Category(code) => writer.label(block.category_label(i, code).unwrap_or(""))?,
            };
        }
        writer.newline()?;
    }
    writer.tab()?.semicolon_ln()?;
    Ok(())
}
