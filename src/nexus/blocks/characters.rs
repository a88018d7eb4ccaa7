//! CHARACTERS (and DATA) block codec.
//!
//! ```text
//! DIMENSIONS [NTAX=n] NCHAR=m;
//! FORMAT [DATATYPE=..] [RESPECTCASE] [MISSING=c] [GAP=c] [MATCHCHAR=c]
//!        [SYMBOLS="..."] [LABELS[=LEFT|NO]] [TRANSPOSE] [INTERLEAVE]
//!        [TOKENS] [COLUMNS=n];
//! [CHARWEIGHTS w1 .. wm;]
//! [CHARSTATELABELS i [name] [/ state ..], ..;]
//! MATRIX ..;
//! ```
//! Illegal symbols are replaced by the gap character and reported as one
//! warning; everything else that does not fit is fatal.

use crate::model::{CharactersBlock, CharactersFormat, DataType, StateLabeler, TaxaBlock};
use crate::nexus::blocks::matrix::{
    column_groups, read_interleaved, read_row_major, read_transposed, CellReader, MatrixShape,
};
use crate::nexus::blocks::{
    at_block_end, matrix_ntax, max_label_width, read_numbers, skip_command,
    write_padded_label, Parsed, TaxaContext, TaxonResolver,
};
use crate::nexus::defs::{CHARSTATELABELS, CHARWEIGHTS, DIMENSIONS, FORMAT, MATRIX, PROPERTIES};
use crate::nexus::writer::NexusWriter;
use crate::parser::command::OptionList;
use crate::parser::{ByteSource, ParsingError, ParsingErrorType, Token, Tokenizer, Warnings};
use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::io::Write;

/// Symbol alphabet for standard data with token states, when none is declared.
const STANDARD_TOKEN_SYMBOLS: &str = "0123456789abcdefghijklmnopqrstuvwxyz";

/// Options of the FORMAT command.
#[derive(Debug, Clone)]
struct FormatSettings {
    data_type: DataType,
    respect_case: bool,
    missing: char,
    gap: char,
    match_char: Option<char>,
    symbols: Option<String>,
    format: CharactersFormat,
}

impl Default for FormatSettings {
    fn default() -> Self {
        Self {
            data_type: DataType::Standard,
            respect_case: false,
            missing: '?',
            gap: '-',
            match_char: None,
            symbols: None,
            format: CharactersFormat::default(),
        }
    }
}

impl FormatSettings {
    fn symbols(&self) -> String {
        let symbols = match &self.symbols {
            Some(symbols) => symbols.clone(),
            None if self.format.tokens && self.data_type == DataType::Standard => {
                STANDARD_TOKEN_SYMBOLS.to_string()
            }
            None => self.data_type.default_symbols().to_string(),
        };
        if self.respect_case {
            symbols
        } else {
            symbols.to_lowercase()
        }
    }
}

// =#========================================================================#=
// PARSING
// =#========================================================================$=
/// Parses the body of a CHARACTERS or DATA block.
///
/// # Arguments
/// * `tokenizer` - Positioned after `BEGIN CHARACTERS;` and TITLE/LINK
/// * `context` - Known taxa; in discovery mode row labels may name new taxa
/// * `warnings` - Receives the illegal symbol warning
///
/// # Errors
/// Fatal on dimension mismatches, match character in the first row,
/// unequal interleaved line lengths and unrecognized FORMAT options.
pub fn parse_characters<S: ByteSource>(
    tokenizer: &mut Tokenizer<S>,
    context: TaxaContext,
    warnings: &mut Warnings,
) -> Result<Parsed<CharactersBlock>, ParsingError> {
    let mut resolver = TaxonResolver::new(context);
    let mut declared_ntax: Option<usize> = None;
    let mut nchar: Option<usize> = None;
    let mut settings = FormatSettings::default();
    let mut weights: Option<Vec<f64>> = None;
    let mut gamma_shape: Option<f64> = None;
    let mut p_invar: Option<f64> = None;
    let mut char_labels: BTreeMap<usize, String> = BTreeMap::new();
    let mut state_names: BTreeMap<usize, Vec<String>> = BTreeMap::new();
    let mut block: Option<CharactersBlock> = None;

    while !at_block_end(tokenizer)? {
        if tokenizer.consume_if_ignore_case("dimensions")? {
            let mut dimensions = OptionList::read(tokenizer, "DIMENSIONS")?;
            declared_ntax = dimensions.take_usize("ntax")?;
            nchar = dimensions.take_usize("nchar")?;
            dimensions.finish()?;
        } else if tokenizer.consume_if_ignore_case("properties")? {
            let mut options = OptionList::read(tokenizer, "PROPERTIES")?;
            gamma_shape = options.take_f64("gammashape")?;
            p_invar = options.take_f64("pinvar")?;
            options.finish()?;
        } else if tokenizer.consume_if_ignore_case("format")? {
            settings = parse_format(tokenizer)?;
        } else if tokenizer.consume_if_ignore_case("charweights")? {
            let nchar = require_nchar(nchar, tokenizer)?;
            weights = Some(read_numbers(tokenizer, nchar)?);
        } else if tokenizer.consume_if_ignore_case("charstatelabels")? {
            let nchar = require_nchar(nchar, tokenizer)?;
            parse_char_state_labels(tokenizer, nchar, &mut char_labels, &mut state_names)?;
        } else if tokenizer.consume_if_ignore_case("matrix")? {
            let nchar = require_nchar(nchar, tokenizer)?;
            let ntax = matrix_ntax(declared_ntax, &resolver, tokenizer)?;
            block = Some(parse_matrix(
                tokenizer,
                &mut resolver,
                &settings,
                MatrixShape {
                    ntax,
                    nchar,
                    labels: settings.format.labels,
                },
                &mut char_labels,
                &state_names,
                warnings,
            )?);
        } else {
            skip_command(tokenizer, "CHARACTERS", warnings)?;
        }
    }

    let Some(mut block) = block else {
        return Err(ParsingError::structural(tokenizer, String::from("CHARACTERS block without MATRIX")));
    };
    for (c, label) in char_labels {
        block.set_char_label(c, label);
    }
    if let Some(weights) = weights {
        block = block.with_char_weights(weights);
    }
    block = block.with_gamma_shape(gamma_shape).with_p_invar(p_invar);

    Ok(Parsed {
        block,
        discovered: resolver.into_discovered(),
    })
}

fn require_nchar<S: ByteSource>(nchar: Option<usize>, tokenizer: &Tokenizer<S>) -> Result<usize, ParsingError> {
    nchar.ok_or_else(|| ParsingError::structural(tokenizer, String::from("DIMENSIONS with NCHAR must come first")))
}

/// Parses the options of FORMAT (after the keyword).
fn parse_format<S: ByteSource>(tokenizer: &mut Tokenizer<S>) -> Result<FormatSettings, ParsingError> {
    let mut options = OptionList::read(tokenizer, "FORMAT")?;
    let mut settings = FormatSettings::default();

    if let Some(name) = options.take_value("datatype")? {
        settings.data_type = DataType::from_name(&name).ok_or_else(|| {
            ParsingError::at_line(
                ParsingErrorType::UnknownConstruct(format!("datatype '{name}'")),
                options.line(),
            )
        })?;
    }
    settings.respect_case = options.take_flag("respectcase")?.unwrap_or(false);
    if let Some(missing) = options.take_char("missing")? {
        settings.missing = missing;
    }
    if let Some(gap) = options.take_char("gap")? {
        settings.gap = gap;
    }
    settings.match_char = options.take_char("matchchar")?;
    settings.symbols = options
        .take_value("symbols")?
        .map(|s| s.chars().filter(|c| !c.is_whitespace()).collect());

    let format = &mut settings.format;
    format.labels = options.take_flag("labels")?.unwrap_or(true);
    format.transpose = options.take_flag("transpose")?.unwrap_or(false);
    format.interleave = options.take_flag("interleave")?.unwrap_or(false);
    format.tokens = options.take_flag("tokens")?.unwrap_or(false);
    format.columns = options.take_usize("columns")?;
    let line = options.line();
    options.finish()?;

    if settings.format.transpose && settings.format.interleave {
        return Err(ParsingError::at_line(
            ParsingErrorType::Structural(String::from("TRANSPOSE and INTERLEAVE cannot be combined")),
            line,
        ));
    }
    if settings.format.tokens && settings.data_type == DataType::Dna {
        return Err(ParsingError::at_line(
            ParsingErrorType::Structural(String::from("TOKENS is not supported for DNA")),
            line,
        ));
    }
    Ok(settings)
}

/// Parses `i [name] [/ state ..], ..;` (after the keyword).
fn parse_char_state_labels<S: ByteSource>(
    tokenizer: &mut Tokenizer<S>,
    nchar: usize,
    char_labels: &mut BTreeMap<usize, String>,
    state_names: &mut BTreeMap<usize, Vec<String>>,
) -> Result<(), ParsingError> {
    loop {
        if tokenizer.consume_if_ignore_case(";")? {
            return Ok(());
        }
        let c = tokenizer.next_usize_in(1, nchar)?;
        if let Token::Word(_) = tokenizer.peek_token()? {
            char_labels.insert(c, tokenizer.next_label()?);
        }
        if tokenizer.consume_if_ignore_case("/")? {
            let mut states = Vec::new();
            while let Token::Word(_) = tokenizer.peek_token()? {
                states.push(tokenizer.next_label()?);
            }
            state_names.insert(c, states);
        }
        if !tokenizer.consume_if_ignore_case(",")? && !tokenizer.peek_matches_ignore_case(";")? {
            return Err(ParsingError::lexical(tokenizer, String::from("',' or ';' in CHARSTATELABELS")));
        }
    }
}

/// Parses MATRIX (after the keyword) including the terminating `;`.
#[allow(clippy::too_many_arguments)]
fn parse_matrix<S: ByteSource>(
    tokenizer: &mut Tokenizer<S>,
    resolver: &mut TaxonResolver,
    settings: &FormatSettings,
    shape: MatrixShape,
    char_labels: &mut BTreeMap<usize, String>,
    state_names: &BTreeMap<usize, Vec<String>>,
    warnings: &mut Warnings,
) -> Result<CharactersBlock, ParsingError> {
    let format = &settings.format;
    let line = tokenizer.line();
    let symbols = settings.symbols();

    if (!format.labels || format.transpose) && resolver.ntax_known() != shape.ntax {
        return Err(ParsingError::structural(
            tokenizer,
            String::from("matrix without row labels requires known taxa"),
        ));
    }

    // State labeler, seeded with declared state names
    let mut labeler = (format.tokens || !state_names.is_empty())
        .then(|| StateLabeler::for_data_type(settings.data_type, &symbols));
    if let Some(standard) = labeler.as_mut().and_then(StateLabeler::as_standard_mut) {
        for (c, states) in state_names {
            standard.set_states(*c, states.clone());
        }
    }

    let previous_case = tokenizer.set_respect_case(settings.respect_case);
    let mut specials = vec![settings.missing, settings.gap];
    specials.extend(settings.match_char);
    let (raw, unknown_tokens) = {
        let mut cells = match labeler.as_mut() {
            Some(labeler) if format.tokens => CellReader::tokens(labeler, specials, settings.gap),
            _ => CellReader::symbols(),
        };
        let raw = if format.transpose {
            read_transposed(tokenizer, &mut cells, shape, char_labels)
        } else if format.interleave {
            read_interleaved(tokenizer, resolver, &mut cells, shape)
        } else {
            read_row_major(tokenizer, resolver, &mut cells, shape)
        };
        (raw, cells.into_unknown_tokens())
    };
    tokenizer.set_respect_case(previous_case);
    let raw = raw?;
    tokenizer.match_ignore_case(";")?;

    let mut block = CharactersBlock::new(settings.data_type, shape.ntax, shape.nchar)
        .with_symbols(symbols)
        .with_missing(settings.missing)
        .with_gap(settings.gap)
        .with_match_char(settings.match_char)
        .with_respect_case(settings.respect_case)
        .with_format(format.clone())
        .with_state_labeler(labeler);

    // Resolve match characters, replace illegal symbols
    let mut illegal = BTreeSet::new();
    for t in 1..=shape.ntax {
        for c in 1..=shape.nchar {
            let mut symbol = raw.get(t, c);
            if Some(symbol) == settings.match_char {
                if t == 1 {
                    return Err(ParsingError::at_line(
                        ParsingErrorType::Structural(format!(
                            "match character '{symbol}' used in first row (character {c})"
                        )),
                        raw.line(1),
                    ));
                }
                symbol = block.get(1, c);
            }
            if !block.is_legal(symbol) {
                illegal.insert(symbol);
                symbol = settings.gap;
            }
            block.set(t, c, symbol);
        }
    }

    if !illegal.is_empty() {
        let list: Vec<String> = illegal.iter().map(|s| format!("'{s}'")).collect();
        warnings.push(
            line,
            format!("illegal symbol(s) {} replaced by gap '{}'", list.join(", "), settings.gap),
        );
    }
    if !unknown_tokens.is_empty() {
        let list: Vec<String> = unknown_tokens.iter().map(|s| format!("'{s}'")).collect();
        warnings.push(
            line,
            format!("unknown state token(s) {} replaced by gap '{}'", list.join(", "), settings.gap),
        );
    }
    Ok(block)
}

// =#========================================================================#=
// WRITING
// =#========================================================================$=
/// Writes the body of a CHARACTERS block.
///
/// # Arguments
/// * `writer` - Output
/// * `taxa` - Names for row labels (`t<i>` for taxa missing there)
/// * `block` - The matrix
/// * `format` - Layout to write the matrix in
pub fn write_characters<W: Write>(
    writer: &mut NexusWriter<W>,
    taxa: &TaxaBlock,
    block: &CharactersBlock,
    format: &CharactersFormat,
) -> io::Result<()> {
    // "\tDIMENSIONS ntax=n nchar=m;"
    writer
        .tab()?
        .write_all(DIMENSIONS)?
        .option("ntax", &block.ntax().to_string())?
        .option("nchar", &block.nchar().to_string())?
        .semicolon_ln()?;

    // "\tPROPERTIES gammaShape=x pInvar=y;"
    if block.gamma_shape().is_some() || block.p_invar().is_some() {
        writer.tab()?.write_all(PROPERTIES)?;
        if let Some(gamma_shape) = block.gamma_shape() {
            writer.space()?.text("gammaShape")?.equals()?.number(gamma_shape)?;
        }
        if let Some(p_invar) = block.p_invar() {
            writer.space()?.text("pInvar")?.equals()?.number(p_invar)?;
        }
        writer.semicolon_ln()?;
    }

    write_format(writer, block, format)?;

    if let Some(weights) = block.char_weights() {
        writer.tab()?.write_all(CHARWEIGHTS)?;
        for weight in weights {
            writer.space()?.number(*weight)?;
        }
        writer.semicolon_ln()?;
    }

    write_char_state_labels(writer, block)?;

    writer.tab()?.write_all(MATRIX)?.newline()?;
    let row_label = |t: usize| taxa.name(t).map(str::to_string).unwrap_or_else(|| format!("t{t}"));
    let separator = if format.tokens { " " } else { "" };

    if format.transpose {
        let labels: Vec<String> = (1..=block.nchar())
            .map(|c| block.char_label(c).map(str::to_string).unwrap_or_else(|| c.to_string()))
            .collect();
        let width = max_label_width(labels.iter().map(|l| l.as_str()));
        for c in 1..=block.nchar() {
            writer.tab()?;
            if format.labels {
                write_padded_label(writer, &labels[c - 1], width)?;
            }
            let cells: Vec<String> = (1..=block.ntax()).map(|t| cell_text(block, format, t, c)).collect();
            writer.text(&cells.join(separator))?.newline()?;
        }
    } else {
        let labels: Vec<String> = (1..=block.ntax()).map(row_label).collect();
        let width = max_label_width(labels.iter().map(|l| l.as_str()));
        let groups = if format.interleave {
            column_groups(block.nchar(), format.columns_per_block())
        } else {
            vec![(1, block.nchar())]
        };
        for (g, (start, end)) in groups.into_iter().enumerate() {
            if g > 0 {
                writer.newline()?;
            }
            for t in 1..=block.ntax() {
                writer.tab()?;
                if format.labels {
                    write_padded_label(writer, &labels[t - 1], width)?;
                }
                let cells: Vec<String> = (start..=end).map(|c| cell_text(block, format, t, c)).collect();
                writer.text(&cells.join(separator))?.newline()?;
            }
        }
    }
    writer.tab()?.semicolon_ln()?;
    Ok(())
}

fn write_format<W: Write>(
    writer: &mut NexusWriter<W>,
    block: &CharactersBlock,
    format: &CharactersFormat,
) -> io::Result<()> {
    // "\tFORMAT datatype=.. missing=? gap=- ..;"
    writer
        .tab()?
        .write_all(FORMAT)?
        .option("datatype", block.data_type().name())?;
    if block.respect_case() {
        writer.space()?.text("respectcase")?;
    }
    writer
        .option("missing", &block.missing().to_string())?
        .option("gap", &block.gap().to_string())?;
    if let Some(match_char) = block.match_char() {
        writer.option("matchchar", &match_char.to_string())?;
    }
    if !block.symbols().is_empty() {
        let quoted = format!("\"{}\"", block.symbols().replace('"', "\"\""));
        writer.option("symbols", &quoted)?;
    }
    writer.option("labels", if format.labels { "left" } else { "no" })?;
    if format.transpose {
        writer.space()?.text("transpose")?;
    }
    if format.interleave && !format.transpose {
        writer.space()?.text("interleave")?;
    }
    if format.tokens {
        writer.space()?.text("tokens")?;
    }
    if let Some(columns) = format.columns {
        writer.option("columns", &columns.to_string())?;
    }
    writer.semicolon_ln()?;
    Ok(())
}

fn write_char_state_labels<W: Write>(writer: &mut NexusWriter<W>, block: &CharactersBlock) -> io::Result<()> {
    let standard = block.state_labeler().and_then(StateLabeler::as_standard);
    let mut characters: BTreeSet<usize> = block.char_labels().map(|(c, _)| c).collect();
    if let Some(standard) = standard {
        characters.extend(standard.iter().filter(|(_, s)| !s.is_empty()).map(|(c, _)| c));
    }
    if characters.is_empty() {
        return Ok(());
    }

    // "\tCHARSTATELABELS\n\t\ti name / s1 s2,\n...;"
    writer.tab()?.write_all(CHARSTATELABELS)?.newline()?;
    let count = characters.len();
    for (i, c) in characters.into_iter().enumerate() {
        writer.tab()?.tab()?.integer(c)?;
        if let Some(label) = block.char_label(c) {
            writer.space()?.label(label)?;
        }
        if let Some(states) = standard.and_then(|s| s.states(c)).filter(|s| !s.is_empty()) {
            writer.space()?.text("/")?;
            for state in states {
                writer.space()?.label(state)?;
            }
        }
        if i + 1 < count {
            writer.comma()?;
        }
        writer.newline()?;
    }
    writer.tab()?.semicolon_ln()?;
    Ok(())
}

/// Text of one cell, compressed by the match character where possible.
fn cell_text(block: &CharactersBlock, format: &CharactersFormat, t: usize, c: usize) -> String {
    let symbol = block.get(t, c);
    let special = symbol == block.missing() || symbol == block.gap();
    if let Some(match_char) = block.match_char() {
        if t > 1 && !special && symbol == block.get(1, c) {
            return match_char.to_string();
        }
    }
    if format.tokens && !special {
        if let Some(token) = block.state_labeler().and_then(|l| l.symbol_to_token(c, symbol)) {
            return token;
        }
    }
    symbol.to_string()
}
