//! Character matrices: one row of symbols per taxon.

use crate::model::state_labeler::StateLabeler;
use std::collections::BTreeMap;

/// Default number of columns per line group when writing interleaved.
pub const DEFAULT_COLUMNS: usize = 60;

/// Ambiguity codes always legal for nucleotide data.
const NUCLEOTIDE_AMBIGUITY_CODES: &str = "rymkswbdhvn";

/// Datatype of a characters matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DataType {
    #[default]
    Standard,
    Dna,
    Rna,
    Protein,
    Microsat,
    Unknown,
}

impl DataType {
    /// Keyword used in `FORMAT datatype=...`.
    pub fn name(&self) -> &'static str {
        match self {
            DataType::Standard => "standard",
            DataType::Dna => "dna",
            DataType::Rna => "rna",
            DataType::Protein => "protein",
            DataType::Microsat => "microsat",
            DataType::Unknown => "unknown",
        }
    }

    /// Parses a datatype keyword (case-insensitive); `nucleotide` means DNA.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "standard" => Some(DataType::Standard),
            "dna" | "nucleotide" => Some(DataType::Dna),
            "rna" => Some(DataType::Rna),
            "protein" => Some(DataType::Protein),
            "microsat" => Some(DataType::Microsat),
            "unknown" => Some(DataType::Unknown),
            _ => None,
        }
    }

    /// Symbols used when FORMAT does not declare any.
    pub fn default_symbols(&self) -> &'static str {
        match self {
            DataType::Dna => "acgt",
            DataType::Rna => "acgu",
            DataType::Protein => "arndcqeghilkmfpstwyvz",
            DataType::Standard => "01",
            DataType::Microsat | DataType::Unknown => "",
        }
    }

    /// Extra symbols that are legal without being declared.
    pub fn ambiguity_codes(&self) -> &'static str {
        match self {
            DataType::Dna | DataType::Rna => NUCLEOTIDE_AMBIGUITY_CODES,
            _ => "",
        }
    }
}

/// Layout options of a characters MATRIX.
#[derive(Debug, Clone, PartialEq)]
pub struct CharactersFormat {
    /// Rows (columns, if transposed) start with a label
    pub labels: bool,
    pub transpose: bool,
    pub interleave: bool,
    /// States are whitespace separated tokens, translated by a [StateLabeler]
    pub tokens: bool,
    /// Columns per line group when writing interleaved
    pub columns: Option<usize>,
}

impl Default for CharactersFormat {
    fn default() -> Self {
        Self {
            labels: true,
            transpose: false,
            interleave: false,
            tokens: false,
            columns: None,
        }
    }
}

impl CharactersFormat {
    pub fn with_labels(mut self, labels: bool) -> Self {
        self.labels = labels;
        self
    }

    pub fn with_transpose(mut self, transpose: bool) -> Self {
        self.transpose = transpose;
        self
    }

    pub fn with_interleave(mut self, interleave: bool) -> Self {
        self.interleave = interleave;
        self
    }

    pub fn with_tokens(mut self, tokens: bool) -> Self {
        self.tokens = tokens;
        self
    }

    pub fn with_columns(mut self, columns: usize) -> Self {
        self.columns = Some(columns);
        self
    }

    /// Effective line group width for interleaved output.
    pub fn columns_per_block(&self) -> usize {
        self.columns.filter(|c| *c > 0).unwrap_or(DEFAULT_COLUMNS)
    }
}

// =#========================================================================#=
// CHARACTERS BLOCK
// =#========================================================================$=
/// An ntax × nchar matrix of symbols, both dimensions 1-based.
///
/// Alongside the matrix the block keeps everything needed to write it back:
/// datatype, symbol alphabet, missing/gap/match characters, optional
/// character weights, sparse character labels, an optional [StateLabeler]
/// and the [CharactersFormat].
#[derive(Debug, Clone, PartialEq)]
pub struct CharactersBlock {
    data_type: DataType,
    nchar: usize,
    matrix: Vec<Vec<char>>,
    symbols: String,
    missing: char,
    gap: char,
    match_char: Option<char>,
    respect_case: bool,
    char_weights: Option<Vec<f64>>,
    /// Shape of the gamma distribution of site rates
    gamma_shape: Option<f64>,
    /// Proportion of invariable sites
    p_invar: Option<f64>,
    char_labels: BTreeMap<usize, String>,
    state_labeler: Option<StateLabeler>,
    format: CharactersFormat,
}

impl CharactersBlock {
    /// Creates a block of the given size filled with the missing character.
    pub fn new(data_type: DataType, ntax: usize, nchar: usize) -> Self {
        let missing = '?';
        Self {
            data_type,
            nchar,
            matrix: vec![vec![missing; nchar]; ntax],
            symbols: data_type.default_symbols().to_string(),
            missing,
            gap: '-',
            match_char: None,
            respect_case: false,
            char_weights: None,
            gamma_shape: None,
            p_invar: None,
            char_labels: BTreeMap::new(),
            state_labeler: None,
            format: CharactersFormat::default(),
        }
    }

    /// Creates a block from one string per taxon.
    ///
    /// Rows shorter than the longest row are padded with the missing character.
    pub fn from_rows<R: AsRef<str>>(data_type: DataType, rows: &[R]) -> Self {
        let nchar = rows.iter().map(|r| r.as_ref().chars().count()).max().unwrap_or(0);
        let mut block = Self::new(data_type, rows.len(), nchar);
        for (t, row) in rows.iter().enumerate() {
            for (c, symbol) in row.as_ref().chars().enumerate() {
                block.matrix[t][c] = symbol;
            }
        }
        block
    }

    // ------------------------------------------------------------------------
    // Builders
    // ------------------------------------------------------------------------
    pub fn with_symbols<S: Into<String>>(mut self, symbols: S) -> Self {
        self.symbols = symbols.into();
        self
    }

    pub fn with_missing(mut self, missing: char) -> Self {
        self.missing = missing;
        self
    }

    pub fn with_gap(mut self, gap: char) -> Self {
        self.gap = gap;
        self
    }

    pub fn with_match_char(mut self, match_char: Option<char>) -> Self {
        self.match_char = match_char;
        self
    }

    pub fn with_respect_case(mut self, respect_case: bool) -> Self {
        self.respect_case = respect_case;
        self
    }

    pub fn with_format(mut self, format: CharactersFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_state_labeler(mut self, labeler: Option<StateLabeler>) -> Self {
        self.state_labeler = labeler;
        self
    }

    /// Sets the character weights; ignored unless there is one per character.
    pub fn with_char_weights(mut self, weights: Vec<f64>) -> Self {
        if weights.len() == self.nchar {
            self.char_weights = Some(weights);
        }
        self
    }

    pub fn with_gamma_shape(mut self, gamma_shape: Option<f64>) -> Self {
        self.gamma_shape = gamma_shape;
        self
    }

    pub fn with_p_invar(mut self, p_invar: Option<f64>) -> Self {
        self.p_invar = p_invar;
        self
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------
    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    pub fn ntax(&self) -> usize {
        self.matrix.len()
    }

    pub fn nchar(&self) -> usize {
        self.nchar
    }

    pub fn symbols(&self) -> &str {
        &self.symbols
    }

    pub fn missing(&self) -> char {
        self.missing
    }

    pub fn gap(&self) -> char {
        self.gap
    }

    pub fn match_char(&self) -> Option<char> {
        self.match_char
    }

    pub fn respect_case(&self) -> bool {
        self.respect_case
    }

    pub fn format(&self) -> &CharactersFormat {
        &self.format
    }

    pub fn char_weights(&self) -> Option<&[f64]> {
        self.char_weights.as_deref()
    }

    pub fn gamma_shape(&self) -> Option<f64> {
        self.gamma_shape
    }

    pub fn p_invar(&self) -> Option<f64> {
        self.p_invar
    }

    pub fn state_labeler(&self) -> Option<&StateLabeler> {
        self.state_labeler.as_ref()
    }

    /// Symbol of taxon `t` at character `c` (both 1-based).
    ///
    /// # Panics
    /// Panics if an index is out of range.
    pub fn get(&self, t: usize, c: usize) -> char {
        self.matrix[t - 1][c - 1]
    }

    /// Sets the symbol of taxon `t` at character `c` (both 1-based).
    ///
    /// # Panics
    /// Panics if an index is out of range.
    pub fn set(&mut self, t: usize, c: usize, symbol: char) {
        self.matrix[t - 1][c - 1] = symbol;
    }

    /// Row of taxon `t` (1-based).
    pub fn row(&self, t: usize) -> &[char] {
        &self.matrix[t - 1]
    }

    /// Row of taxon `t` (1-based) as string.
    pub fn row_string(&self, t: usize) -> String {
        self.matrix[t - 1].iter().collect()
    }

    /// Label of character `c` (1-based), if any.
    pub fn char_label(&self, c: usize) -> Option<&str> {
        self.char_labels.get(&c).map(|l| l.as_str())
    }

    pub fn set_char_label<L: Into<String>>(&mut self, c: usize, label: L) {
        self.char_labels.insert(c, label.into());
    }

    /// Iterates over labeled characters in index order.
    pub fn char_labels(&self) -> impl Iterator<Item = (usize, &str)> {
        self.char_labels.iter().map(|(c, l)| (*c, l.as_str()))
    }

    pub fn has_char_labels(&self) -> bool {
        !self.char_labels.is_empty()
    }

    /// Whether `symbol` is legal: part of the alphabet, an ambiguity code of
    /// the datatype, missing, gap, match character, or a labeler code.
    pub fn is_legal(&self, symbol: char) -> bool {
        let normalized = if self.respect_case {
            symbol
        } else {
            symbol.to_ascii_lowercase()
        };
        normalized == self.missing
            || normalized == self.gap
            || Some(normalized) == self.match_char
            || self.symbols.contains(normalized)
            || self.data_type.ambiguity_codes().contains(normalized)
            || self.data_type == DataType::Unknown
            || self
                .state_labeler
                .as_ref()
                .is_some_and(|labeler| labeler.is_code(normalized))
    }
}
