//! Matrix layout strategies shared by matrix-shaped codecs.
//!
//! A matrix of ntax rows and nchar columns can be laid out
//! * row-major: one (possibly multi-line) row per taxon,
//! * transposed: one row per character, taxa as columns,
//! * interleaved: line groups, each covering a range of columns for all
//!   taxa; the first line of a group fixes the group's width.
//!
//! Reading is split into decoding single cells ([CellReader]) and the
//! layout, so symbol and token matrices share the layout code.

use crate::model::StateLabeler;
use crate::nexus::blocks::{check_cells_fit, TaxonResolver};
use crate::parser::{ByteSource, ParsingError, Tokenizer};
use std::collections::{BTreeMap, BTreeSet};

/// Placeholder for cells not read yet.
const UNSET: char = '\0';

// =#========================================================================#=
// CELL READER
// =#========================================================================$=
/// Reads single matrix cells, either single symbols or whitespace separated
/// state tokens translated by a [StateLabeler].
pub(crate) struct CellReader<'a> {
    labeler: Option<&'a mut StateLabeler>,
    /// Characters taken verbatim in token mode
    specials: Vec<char>,
    gap: char,
    unknown_tokens: BTreeSet<String>,
}

impl<'a> CellReader<'a> {
    /// Reader for single-symbol cells.
    pub(crate) fn symbols() -> Self {
        Self {
            labeler: None,
            specials: Vec::new(),
            gap: '-',
            unknown_tokens: BTreeSet::new(),
        }
    }

    /// Reader for token cells; `specials` (missing, gap, match) are taken
    /// verbatim, unknown tokens become `gap`.
    pub(crate) fn tokens(labeler: &'a mut StateLabeler, specials: Vec<char>, gap: char) -> Self {
        Self {
            labeler: Some(labeler),
            specials,
            gap,
            unknown_tokens: BTreeSet::new(),
        }
    }

    /// Reads the cell of (1-based) character `c`.
    pub(crate) fn read<S: ByteSource>(&mut self, tokenizer: &mut Tokenizer<S>, c: usize) -> Result<char, ParsingError> {
        let Some(labeler) = self.labeler.as_deref_mut() else {
            return tokenizer.next_symbol();
        };

        let token = tokenizer.next_label()?;
        let mut chars = token.chars();
        if let (Some(ch), None) = (chars.next(), chars.next()) {
            if self.specials.contains(&ch) {
                return Ok(ch);
            }
        }
        match labeler.token_to_symbol(c, &token) {
            Some(symbol) => Ok(symbol),
            None => {
                self.unknown_tokens.insert(token);
                Ok(self.gap)
            }
        }
    }

    /// Tokens that could not be translated, sorted.
    pub(crate) fn into_unknown_tokens(self) -> BTreeSet<String> {
        self.unknown_tokens
    }
}

// =#========================================================================#=
// RAW MATRIX
// =#========================================================================$=
/// Cells as read, indexed by taxon and character (both 1-based).
pub(crate) struct RawMatrix {
    cells: Vec<Vec<char>>,
    /// Line each taxon's data started on
    lines: Vec<usize>,
}

impl RawMatrix {
    pub(crate) fn new(ntax: usize, nchar: usize) -> Self {
        Self {
            cells: vec![vec![UNSET; nchar]; ntax],
            lines: vec![0; ntax],
        }
    }

    pub(crate) fn get(&self, t: usize, c: usize) -> char {
        self.cells[t - 1][c - 1]
    }

    pub(crate) fn set(&mut self, t: usize, c: usize, symbol: char) {
        self.cells[t - 1][c - 1] = symbol;
    }

    /// Line on which taxon `t` was (first) read.
    pub(crate) fn line(&self, t: usize) -> usize {
        self.lines[t - 1]
    }

    fn mark_row<S: ByteSource>(&mut self, t: usize, tokenizer: &Tokenizer<S>, line: usize) -> Result<(), ParsingError> {
        if self.lines[t - 1] != 0 {
            return Err(ParsingError::structural(tokenizer, format!("taxon {t} occurs twice in matrix")));
        }
        self.lines[t - 1] = line;
        Ok(())
    }
}

/// Dimensions and label presence of a matrix to read.
#[derive(Debug, Clone, Copy)]
pub(crate) struct MatrixShape {
    pub ntax: usize,
    pub nchar: usize,
    pub labels: bool,
}

/// Reads the taxon of the next row: its label, or the row number.
fn read_row_taxon<S: ByteSource>(
    tokenizer: &mut Tokenizer<S>,
    resolver: &mut TaxonResolver,
    shape: MatrixShape,
    row: usize,
) -> Result<usize, ParsingError> {
    if !shape.labels {
        return Ok(row);
    }
    let label = tokenizer.next_label()?;
    let t = resolver.resolve(&label, tokenizer)?;
    if t > shape.ntax {
        return Err(ParsingError::structural(
            tokenizer,
            format!("taxon '{label}' exceeds the {} taxa of the matrix", shape.ntax),
        ));
    }
    Ok(t)
}

// ============================================================================
// Layouts (crate)
// ============================================================================

/// Reads a row-major matrix (without the terminating `;`).
pub(crate) fn read_row_major<S: ByteSource>(
    tokenizer: &mut Tokenizer<S>,
    resolver: &mut TaxonResolver,
    cells: &mut CellReader,
    shape: MatrixShape,
) -> Result<RawMatrix, ParsingError> {
    check_cells_fit(tokenizer, shape.ntax, shape.nchar)?;
    let mut raw = RawMatrix::new(shape.ntax, shape.nchar);
    for row in 1..=shape.ntax {
        tokenizer.skip_comment_and_whitespace()?;
        let line = tokenizer.line();
        let t = read_row_taxon(tokenizer, resolver, shape, row)?;
        raw.mark_row(t, tokenizer, line)?;
        for c in 1..=shape.nchar {
            let symbol = cells.read(tokenizer, c)?;
            raw.set(t, c, symbol);
        }
    }
    Ok(raw)
}

/// Reads a transposed matrix (without the terminating `;`): one row per
/// character, optionally starting with the character's label.
///
/// Taxa must be known, columns are taxa in index order.
pub(crate) fn read_transposed<S: ByteSource>(
    tokenizer: &mut Tokenizer<S>,
    cells: &mut CellReader,
    shape: MatrixShape,
    char_labels: &mut BTreeMap<usize, String>,
) -> Result<RawMatrix, ParsingError> {
    check_cells_fit(tokenizer, shape.ntax, shape.nchar)?;
    let mut raw = RawMatrix::new(shape.ntax, shape.nchar);
    tokenizer.skip_comment_and_whitespace()?;
    raw.lines.fill(tokenizer.line());
    for c in 1..=shape.nchar {
        if shape.labels {
            let label = tokenizer.next_label()?;
            if label != c.to_string() {
                char_labels.insert(c, label);
            }
        }
        for t in 1..=shape.ntax {
            let symbol = cells.read(tokenizer, c)?;
            raw.set(t, c, symbol);
        }
    }
    Ok(raw)
}

/// Reads an interleaved matrix (without the terminating `;`).
///
/// The number of cells on the first line of each group fixes the group's
/// width; every other line of the group must have exactly that many cells.
/// The last group may be narrower than the previous ones.
pub(crate) fn read_interleaved<S: ByteSource>(
    tokenizer: &mut Tokenizer<S>,
    resolver: &mut TaxonResolver,
    cells: &mut CellReader,
    shape: MatrixShape,
) -> Result<RawMatrix, ParsingError> {
    let previous = tokenizer.set_eol_significant(true);
    let result = read_interleaved_groups(tokenizer, resolver, cells, shape);
    tokenizer.set_eol_significant(previous);
    result
}

fn read_interleaved_groups<S: ByteSource>(
    tokenizer: &mut Tokenizer<S>,
    resolver: &mut TaxonResolver,
    cells: &mut CellReader,
    shape: MatrixShape,
) -> Result<RawMatrix, ParsingError> {
    check_cells_fit(tokenizer, shape.ntax, shape.nchar)?;
    let mut raw = RawMatrix::new(shape.ntax, shape.nchar);
    let mut done = 0;

    while done < shape.nchar {
        let mut width: Option<usize> = None;
        let mut seen = vec![false; shape.ntax];

        for row in 1..=shape.ntax {
            tokenizer.skip_eols()?;
            let line = tokenizer.line();
            let t = read_row_taxon(tokenizer, resolver, shape, row)?;
            if seen[t - 1] {
                return Err(ParsingError::structural(
                    tokenizer,
                    format!("taxon {t} occurs twice in one interleave group"),
                ));
            }
            seen[t - 1] = true;
            if done == 0 {
                raw.mark_row(t, tokenizer, line)?;
            }

            // The last line of the matrix may end with its ';'
            let mut count = 0;
            while !tokenizer.at_eol()? && tokenizer.peek_byte() != Some(b';') {
                let c = done + count + 1;
                if c > shape.nchar {
                    return Err(ParsingError::structural(
                        tokenizer,
                        format!("line has more than the {} characters of the matrix", shape.nchar),
                    ));
                }
                let symbol = cells.read(tokenizer, c)?;
                raw.set(t, c, symbol);
                count += 1;
            }

            match width {
                None if count == 0 => {
                    return Err(ParsingError::structural(tokenizer, String::from("empty matrix line")));
                }
                None => width = Some(count),
                Some(expected) if expected != count => {
                    return Err(ParsingError::structural(
                        tokenizer,
                        format!("line has {count} characters, the first line of its group has {expected}"),
                    ));
                }
                Some(_) => {}
            }
        }
        done += width.unwrap_or(0);
    }
    tokenizer.skip_eols()?;
    Ok(raw)
}

// ============================================================================
// Writing helpers (crate)
// ============================================================================

/// Column ranges `[start, end]` (1-based, inclusive) of interleave groups.
pub(crate) fn column_groups(nchar: usize, width: usize) -> Vec<(usize, usize)> {
    let width = width.max(1);
    (1..=nchar)
        .step_by(width)
        .map(|start| (start, (start + width - 1).min(nchar)))
        .collect()
}
