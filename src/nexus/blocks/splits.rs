//! SPLITS block codec.
//!
//! ```text
//! DIMENSIONS [NTAX=n] NSPLITS=m;
//! [FORMAT [LABELS] [WEIGHTS] [CONFIDENCES];]
//! [THRESHOLD[=]x;]
//! [PROPERTIES [FIT=x] [COMPATIBLE|CYCLIC|WEAKLY COMPATIBLE|INCOMPATIBLE];]
//! [CYCLE i1 .. in;]
//! MATRIX [label] [weight] [confidence] i1 i2 .., ..;
//! ```

use crate::model::{is_permutation, ASplit, Compatibility, SplitsBlock, SplitsFormat, TaxaSet};
use crate::nexus::blocks::{at_block_end, check_not_eof, skip_command, TaxaContext};
use crate::nexus::defs::{CYCLE, DIMENSIONS, FORMAT, MATRIX, PROPERTIES, THRESHOLD};
use crate::nexus::writer::NexusWriter;
use crate::parser::command::OptionList;
use crate::parser::{ByteSource, ParsingError, ParsingErrorType, Token, Tokenizer, Warnings};
use std::io;
use std::io::Write;

// =#========================================================================#=
// PARSING
// =#========================================================================$=
/// Parses the body of a SPLITS block. Taxa must be known beforehand.
///
/// # Errors
/// Structural error on a split that is empty or contains all taxa, an index
/// outside `1..=ntax`, a CYCLE that is not a permutation, or a split count
/// different from NSPLITS.
pub fn parse_splits<S: ByteSource>(
    tokenizer: &mut Tokenizer<S>,
    context: TaxaContext,
    warnings: &mut Warnings,
) -> Result<SplitsBlock, ParsingError> {
    let ntax = context.taxa.ntax();
    if ntax == 0 {
        return Err(ParsingError::structural(tokenizer, String::from("SPLITS block requires known taxa")));
    }

    let mut nsplits: Option<usize> = None;
    let mut format = SplitsFormat::default();
    let mut threshold: Option<f64> = None;
    let mut fit: Option<f64> = None;
    let mut compatibility = Compatibility::default();
    let mut cycle: Option<Vec<usize>> = None;
    let mut splits: Option<Vec<ASplit>> = None;

    while !at_block_end(tokenizer)? {
        if tokenizer.consume_if_ignore_case("dimensions")? {
            let mut dimensions = OptionList::read(tokenizer, "DIMENSIONS")?;
            if let Some(declared) = dimensions.take_usize("ntax")? {
                if declared != ntax {
                    return Err(ParsingError::structural(
                        tokenizer,
                        format!("SPLITS declares {declared} taxa, but {ntax} taxa are known"),
                    ));
                }
            }
            nsplits = dimensions.take_usize("nsplits")?;
            dimensions.finish()?;
        } else if tokenizer.consume_if_ignore_case("format")? {
            let mut options = OptionList::read(tokenizer, "FORMAT")?;
            format.labels = options.take_flag("labels")?.unwrap_or(format.labels);
            format.weights = options.take_flag("weights")?.unwrap_or(format.weights);
            format.confidences = options.take_flag("confidences")?.unwrap_or(format.confidences);
            options.finish()?;
        } else if tokenizer.consume_if_ignore_case("threshold")? {
            tokenizer.consume_if_ignore_case("=")?;
            threshold = Some(tokenizer.next_f64()?);
            tokenizer.match_ignore_case(";")?;
        } else if tokenizer.consume_if_ignore_case("properties")? {
            let mut options = OptionList::read(tokenizer, "PROPERTIES")?;
            fit = options.take_f64("fit")?;
            if let Some(value) = parse_compatibility(&mut options) {
                compatibility = value;
            }
            options.finish()?;
        } else if tokenizer.consume_if_ignore_case("cycle")? {
            cycle = Some(parse_cycle(tokenizer, ntax)?);
        } else if tokenizer.consume_if_ignore_case("matrix")? {
            splits = Some(parse_matrix(tokenizer, ntax, nsplits, &format)?);
        } else {
            skip_command(tokenizer, "SPLITS", warnings)?;
        }
    }

    let mut block = SplitsBlock::new(ntax)
        .with_format(format)
        .with_compatibility(compatibility)
        .with_fit(fit)
        .with_threshold(threshold);
    if let Some(cycle) = cycle {
        block = block.with_cycle(cycle);
    }
    for split in splits.unwrap_or_default() {
        block.push(split);
    }
    Ok(block)
}

fn parse_compatibility(options: &mut OptionList) -> Option<Compatibility> {
    if options.take_word("weaklycompatible") {
        return Some(Compatibility::WeaklyCompatible);
    }
    if options.take_word("weakly") {
        options.take_word("compatible");
        return Some(Compatibility::WeaklyCompatible);
    }
    if options.take_word("compatible") {
        return Some(Compatibility::Compatible);
    }
    if options.take_word("cyclic") {
        return Some(Compatibility::Cyclic);
    }
    if options.take_word("incompatible") {
        return Some(Compatibility::Incompatible);
    }
    None
}

/// Parses `i1 .. in;` (after CYCLE).
fn parse_cycle<S: ByteSource>(tokenizer: &mut Tokenizer<S>, ntax: usize) -> Result<Vec<usize>, ParsingError> {
    let mut cycle = Vec::new();
    while !tokenizer.consume_if_ignore_case(";")? {
        check_not_eof(tokenizer)?;
        cycle.push(tokenizer.next_usize()?);
    }
    if !is_permutation(&cycle, ntax) {
        return Err(ParsingError::structural(
            tokenizer,
            format!("CYCLE is not a permutation of 1..{ntax}"),
        ));
    }
    Ok(cycle)
}

/// Parses the rows of MATRIX including the terminating `;`.
fn parse_matrix<S: ByteSource>(
    tokenizer: &mut Tokenizer<S>,
    ntax: usize,
    nsplits: Option<usize>,
    format: &SplitsFormat,
) -> Result<Vec<ASplit>, ParsingError> {
    let mut splits = Vec::new();

    while !tokenizer.consume_if_ignore_case(";")? {
        check_not_eof(tokenizer)?;
        tokenizer.skip_comment_and_whitespace()?;
        let line = tokenizer.line();
        // An unlabeled split is written as ''
        let label = format.labels.then(|| tokenizer.next_label()).transpose()?.filter(|l| !l.is_empty());
        let weight = if format.weights { tokenizer.next_f64()? } else { 1.0 };
        let confidence = format.confidences.then(|| tokenizer.next_f64()).transpose()?;

        let mut taxa = TaxaSet::new();
        while let Token::Word(_) = tokenizer.peek_token()? {
            taxa.insert(tokenizer.next_usize_in(1, ntax)?);
        }
        if taxa.is_empty() || taxa.is_full(ntax) {
            return Err(ParsingError::at_line(
                ParsingErrorType::Structural(format!(
                    "trivial split {{{taxa}}}: must be neither empty nor contain all {ntax} taxa"
                )),
                line,
            ));
        }
        tokenizer.consume_if_ignore_case(",")?;

        let mut split = ASplit::new(taxa, weight);
        split.label = label;
        split.confidence = confidence;
        splits.push(split);
    }

    if let Some(expected) = nsplits {
        if expected != splits.len() {
            return Err(ParsingError::structural(
                tokenizer,
                format!("expected {expected} splits, got {}", splits.len()),
            ));
        }
    }
    Ok(splits)
}

// =#========================================================================#=
// WRITING
// =#========================================================================$=
/// Writes the body of a SPLITS block.
pub fn write_splits<W: Write>(
    writer: &mut NexusWriter<W>,
    block: &SplitsBlock,
    format: &SplitsFormat,
) -> io::Result<()> {
    let yes_no = |flag: bool| if flag { "yes" } else { "no" };

    // "\tDIMENSIONS ntax=n nsplits=m;"
    writer
        .tab()?
        .write_all(DIMENSIONS)?
        .option("ntax", &block.ntax().to_string())?
        .option("nsplits", &block.nsplits().to_string())?
        .semicolon_ln()?;

    // "\tFORMAT labels=no weights=yes confidences=no;"
    writer
        .tab()?
        .write_all(FORMAT)?
        .option("labels", yes_no(format.labels))?
        .option("weights", yes_no(format.weights))?
        .option("confidences", yes_no(format.confidences))?
        .semicolon_ln()?;

    if let Some(threshold) = block.threshold() {
        writer.tab()?.write_all(THRESHOLD)?.equals()?.number(threshold)?.semicolon_ln()?;
    }

    // "\tPROPERTIES fit=x compatible;"
    writer.tab()?.write_all(PROPERTIES)?;
    if let Some(fit) = block.fit() {
        writer.space()?.text("fit")?.equals()?.number(fit)?;
    }
    writer.space()?.text(block.compatibility().name())?.semicolon_ln()?;

    if let Some(cycle) = block.cycle() {
        writer.tab()?.write_all(CYCLE)?;
        for t in cycle {
            writer.space()?.integer(t)?;
        }
        writer.semicolon_ln()?;
    }

    // "\t\t[s, size=k] 'label' weight confidence i1 i2 ..,"
    writer.tab()?.write_all(MATRIX)?.newline()?;
    for (s, split) in block.iter().enumerate() {
        writer.tab()?.tab()?;
        writer.text(&format!("[{}, size={}]", s + 1, split.taxa.cardinality()))?;
        if format.labels {
            writer.space()?.label(split.label.as_deref().unwrap_or(""))?;
        }
        if format.weights {
            writer.space()?.number(split.weight)?;
        }
        if format.confidences {
            writer.space()?.number(split.confidence.unwrap_or(-1.0))?;
        }
        writer.space()?;
        for t in split.taxa.iter() {
            writer.space()?.integer(t)?;
        }
        writer.comma()?.newline()?;
    }
    writer.tab()?.semicolon_ln()?;
    Ok(())
}
