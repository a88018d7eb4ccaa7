//! Bidirectional mapping between multi-character state tokens and the
//! single-character codes stored in a characters matrix.
//!
//! Three strategies exist, selected by the declared [DataType]:
//! * [StateLabeler::Standard]: per-character lists of state names, the i-th
//!   name of a character maps to the i-th symbol of the alphabet
//! * [StateLabeler::Protein]: three-letter amino acid codes (`Ala`, `Arg`, ...)
//! * [StateLabeler::Microsat]: integer repeat counts, mapped to code points
//!   in the Unicode private use area

use crate::model::characters::DataType;
use std::collections::BTreeMap;

/// First code point used for microsatellite repeat counts.
const MICROSAT_BASE: u32 = 0xE000;
/// Largest representable repeat count.
pub const MICROSAT_MAX: u32 = 0x18FF;

/// Three-letter amino acid codes and their one-letter symbols.
const AMINO_ACIDS: &[(&str, char)] = &[
    ("ala", 'a'),
    ("arg", 'r'),
    ("asn", 'n'),
    ("asp", 'd'),
    ("cys", 'c'),
    ("gln", 'q'),
    ("glu", 'e'),
    ("gly", 'g'),
    ("his", 'h'),
    ("ile", 'i'),
    ("leu", 'l'),
    ("lys", 'k'),
    ("met", 'm'),
    ("phe", 'f'),
    ("pro", 'p'),
    ("ser", 's'),
    ("thr", 't'),
    ("trp", 'w'),
    ("tyr", 'y'),
    ("val", 'v'),
    ("glx", 'z'),
];

/// State names per character, mapped onto a symbol alphabet.
#[derive(Debug, Clone, PartialEq)]
pub struct StandardLabeler {
    symbols: Vec<char>,
    /// 1-based character index to its state names (position = symbol index)
    states: BTreeMap<usize, Vec<String>>,
}

impl StandardLabeler {
    pub fn new(symbols: &str) -> Self {
        Self {
            symbols: symbols.chars().collect(),
            states: BTreeMap::new(),
        }
    }

    /// Declares the state names of a character (CHARSTATELABELS).
    pub fn set_states(&mut self, character: usize, states: Vec<String>) {
        self.states.insert(character, states);
    }

    /// State names of a character, if any were declared or seen.
    pub fn states(&self, character: usize) -> Option<&[String]> {
        self.states.get(&character).map(|s| s.as_slice())
    }

    /// Iterates over characters that have state names.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &[String])> {
        self.states.iter().map(|(c, s)| (*c, s.as_slice()))
    }
}

// =#========================================================================#=
// STATE LABELER
// =#========================================================================$=
/// Strategy to translate state tokens to matrix symbols and back.
#[derive(Debug, Clone, PartialEq)]
pub enum StateLabeler {
    Standard(StandardLabeler),
    Protein,
    Microsat,
}

impl StateLabeler {
    /// Selects the strategy for a datatype.
    ///
    /// # Arguments
    /// * `data_type` - Declared datatype
    /// * `symbols` - Symbol alphabet, used by the standard strategy
    pub fn for_data_type(data_type: DataType, symbols: &str) -> Self {
        match data_type {
            DataType::Protein => StateLabeler::Protein,
            DataType::Microsat => StateLabeler::Microsat,
            _ => StateLabeler::Standard(StandardLabeler::new(symbols)),
        }
    }

    /// Translates a token of the given (1-based) character into a symbol.
    ///
    /// The standard strategy allocates the next free symbol for a token it
    /// has not seen for that character yet.
    ///
    /// # Returns
    /// `None` if the token is not valid for the strategy or the alphabet
    /// is exhausted.
    pub fn token_to_symbol(&mut self, character: usize, token: &str) -> Option<char> {
        match self {
            StateLabeler::Standard(labeler) => {
                let states = labeler.states.entry(character).or_default();
                let position = match states.iter().position(|s| s == token) {
                    Some(position) => position,
                    None => {
                        if states.len() >= labeler.symbols.len() {
                            return None;
                        }
                        states.push(token.to_string());
                        states.len() - 1
                    }
                };
                labeler.symbols.get(position).copied()
            }
            StateLabeler::Protein => {
                let lower = token.to_ascii_lowercase();
                AMINO_ACIDS
                    .iter()
                    .find(|(code, _)| *code == lower)
                    .map(|(_, symbol)| *symbol)
            }
            StateLabeler::Microsat => {
                let count = token.parse::<u32>().ok()?;
                if count > MICROSAT_MAX {
                    return None;
                }
                char::from_u32(MICROSAT_BASE + count)
            }
        }
    }

    /// Translates a symbol of the given (1-based) character back into its token.
    pub fn symbol_to_token(&self, character: usize, symbol: char) -> Option<String> {
        match self {
            StateLabeler::Standard(labeler) => {
                let position = labeler.symbols.iter().position(|s| *s == symbol)?;
                labeler.states.get(&character)?.get(position).cloned()
            }
            StateLabeler::Protein => AMINO_ACIDS
                .iter()
                .find(|(_, s)| *s == symbol.to_ascii_lowercase())
                .map(|(code, _)| capitalize(code)),
            StateLabeler::Microsat => {
                let code = symbol as u32;
                (MICROSAT_BASE..=MICROSAT_BASE + MICROSAT_MAX)
                    .contains(&code)
                    .then(|| (code - MICROSAT_BASE).to_string())
            }
        }
    }

    /// Whether the symbol is a code this strategy produces.
    pub fn is_code(&self, symbol: char) -> bool {
        match self {
            StateLabeler::Standard(labeler) => labeler.symbols.contains(&symbol),
            StateLabeler::Protein => AMINO_ACIDS.iter().any(|(_, s)| *s == symbol),
            StateLabeler::Microsat => {
                (MICROSAT_BASE..=MICROSAT_BASE + MICROSAT_MAX).contains(&(symbol as u32))
            }
        }
    }

    /// Returns the standard labeler, if this is one.
    pub fn as_standard(&self) -> Option<&StandardLabeler> {
        match self {
            StateLabeler::Standard(labeler) => Some(labeler),
            _ => None,
        }
    }

    pub fn as_standard_mut(&mut self) -> Option<&mut StandardLabeler> {
        match self {
            StateLabeler::Standard(labeler) => Some(labeler),
            _ => None,
        }
    }
}

fn capitalize(code: &str) -> String {
    let mut chars = code.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_allocates_per_character() {
        let mut labeler = StateLabeler::for_data_type(DataType::Standard, "012");
        assert_eq!(labeler.token_to_symbol(1, "red"), Some('0'));
        assert_eq!(labeler.token_to_symbol(1, "blue"), Some('1'));
        assert_eq!(labeler.token_to_symbol(1, "red"), Some('0'));
        assert_eq!(labeler.token_to_symbol(2, "blue"), Some('0'));
        assert_eq!(labeler.token_to_symbol(1, "green"), Some('2'));
        assert_eq!(labeler.token_to_symbol(1, "black"), None);
        assert_eq!(labeler.symbol_to_token(1, '1').as_deref(), Some("blue"));
    }

    #[test]
    fn test_protein_and_microsat() {
        let mut protein = StateLabeler::for_data_type(DataType::Protein, "");
        assert_eq!(protein.token_to_symbol(1, "Trp"), Some('w'));
        assert_eq!(protein.symbol_to_token(1, 'w').as_deref(), Some("Trp"));
        assert_eq!(protein.token_to_symbol(1, "Xyz"), None);

        let mut microsat = StateLabeler::for_data_type(DataType::Microsat, "");
        let code = microsat.token_to_symbol(3, "17").unwrap();
        assert!(microsat.is_code(code));
        assert_eq!(microsat.symbol_to_token(3, code).as_deref(), Some("17"));
        assert_eq!(microsat.token_to_symbol(3, "x"), None);
    }
}
