//! TAXA block codec.
//!
//! ```text
//! DIMENSIONS NTAX=n;
//! [TAXLABELS l1 .. ln;]
//! [DISPLAYLABELS d1 .. dn;]
//! [TAXINFO i1 .. in;]
//! ```
//! Without TAXLABELS the taxa are named `t1 .. tn`; `null` stands for an
//! absent display label or info.

use crate::model::{TaxaBlock, Taxon};
use crate::nexus::blocks::{at_block_end, skip_command};
use crate::nexus::defs::{DIMENSIONS, DISPLAYLABELS, NULL, TAXINFO, TAXLABELS};
use crate::nexus::writer::NexusWriter;
use crate::parser::command::{read_label_list, OptionList};
use crate::parser::{ByteSource, ParsingError, Tokenizer, Warnings};
use std::io;
use std::io::Write;

/// Parses the body of a TAXA block.
///
/// # Errors
/// Structural error if a label list does not have NTAX entries or names
/// are not unique.
pub fn parse_taxa<S: ByteSource>(
    tokenizer: &mut Tokenizer<S>,
    warnings: &mut Warnings,
) -> Result<TaxaBlock, ParsingError> {
    tokenizer.match_ignore_case("dimensions")?;
    let mut dimensions = OptionList::read(tokenizer, "DIMENSIONS")?;
    let ntax = dimensions.take_usize("ntax")?.ok_or_else(|| {
        ParsingError::structural(tokenizer, String::from("DIMENSIONS of TAXA requires NTAX"))
    })?;
    dimensions.finish()?;

    let mut names: Option<Vec<String>> = None;
    let mut display_labels: Option<Vec<String>> = None;
    let mut infos: Option<Vec<String>> = None;

    while !at_block_end(tokenizer)? {
        let target = if tokenizer.consume_if_ignore_case("taxlabels")? {
            &mut names
        } else if tokenizer.consume_if_ignore_case("displaylabels")? {
            &mut display_labels
        } else if tokenizer.consume_if_ignore_case("taxinfo")? {
            &mut infos
        } else {
            skip_command(tokenizer, "TAXA", warnings)?;
            continue;
        };
        let labels = read_label_list(tokenizer)?;
        if labels.len() != ntax {
            return Err(ParsingError::structural(
                tokenizer,
                format!("expected {ntax} labels, got {}", labels.len()),
            ));
        }
        *target = Some(labels);
    }

    let names = names.unwrap_or_else(|| (1..=ntax).map(|t| format!("t{t}")).collect());
    let mut taxa = TaxaBlock::new();
    for (i, name) in names.into_iter().enumerate() {
        let mut taxon = Taxon::new(name);
        taxon.display_label = non_null(display_labels.as_ref().map(|d| &d[i]));
        taxon.info = non_null(infos.as_ref().map(|d| &d[i]));
        taxa.add(taxon)
            .map_err(|e| ParsingError::structural(tokenizer, e.to_string()))?;
    }
    Ok(taxa)
}

fn non_null(value: Option<&String>) -> Option<String> {
    value.filter(|v| v.as_str() != NULL).cloned()
}

/// Writes the body of a TAXA block.
pub fn write_taxa<W: Write>(writer: &mut NexusWriter<W>, taxa: &TaxaBlock) -> io::Result<()> {
    // "\tDIMENSIONS ntax=n;"
    writer
        .tab()?
        .write_all(DIMENSIONS)?
        .option("ntax", &taxa.ntax().to_string())?
        .semicolon_ln()?;

    // "\tTAXLABELS\n\t\t[label]\n...;"
    writer.tab()?.write_all(TAXLABELS)?.newline()?;
    for taxon in taxa.iter() {
        writer.tab()?.tab()?.label(&taxon.name)?.newline()?;
    }
    writer.tab()?.semicolon_ln()?;

    if taxa.has_display_labels() {
        write_optional_list(writer, DISPLAYLABELS, taxa.iter().map(|t| t.display_label.as_deref()))?;
    }
    if taxa.has_info() {
        write_optional_list(writer, TAXINFO, taxa.iter().map(|t| t.info.as_deref()))?;
    }
    Ok(())
}

fn write_optional_list<'a, W: Write, I: Iterator<Item = Option<&'a str>>>(
    writer: &mut NexusWriter<W>,
    command: &[u8],
    values: I,
) -> io::Result<()> {
    writer.tab()?.write_all(command)?.newline()?;
    for value in values {
        writer.tab()?.tab()?.label(value.unwrap_or(NULL))?.newline()?;
    }
    writer.tab()?.semicolon_ln()?;
    Ok(())
}
