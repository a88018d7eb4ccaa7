//! Option lists of Nexus commands such as DIMENSIONS, FORMAT and PROPERTIES.
//!
//! An option list is read in full up to the terminating `;` and then
//! consumed option by option by the codec. Whatever the codec did not ask
//! for is reported by [OptionList::finish()], so a semantics-altering option
//! is never ignored silently.

use crate::parser::byte_source::ByteSource;
use crate::parser::parsing_error::{ParsingError, ParsingErrorType};
use crate::parser::tokenizer::{Token, Tokenizer};

/// One `key[=value]` entry, key lower-cased.
#[derive(Debug, Clone, PartialEq)]
struct Entry {
    key: String,
    value: Option<String>,
}

/// Options of one command, read up to (and including) its `;`.
#[derive(Debug, Clone)]
pub struct OptionList {
    command: String,
    line: usize,
    entries: Vec<Entry>,
}

impl OptionList {
    /// Reads `key[=value] ...;` after the command keyword was consumed.
    ///
    /// `no <flag>` is merged into the single key `no<flag>`.
    ///
    /// # Arguments
    /// * `tokenizer` - Positioned right after the command keyword
    /// * `command` - Command name, used in error messages
    ///
    /// # Errors
    /// Lexical error on stray punctuation, [ParsingErrorType::UnexpectedEof]
    /// if the `;` is missing.
    pub fn read<S: ByteSource>(tokenizer: &mut Tokenizer<S>, command: &str) -> Result<Self, ParsingError> {
        let line = tokenizer.line();
        let mut entries = Vec::new();

        loop {
            match tokenizer.next_token()? {
                Token::Punctuation(';') => break,
                Token::Eof => return Err(ParsingError::unexpected_eof(tokenizer)),
                Token::Eol => continue,
                Token::Word(word) => {
                    let key = word.to_lowercase();
                    if tokenizer.peek_token()?.is_punctuation('=') {
                        tokenizer.next_token()?;
                        let value = tokenizer.next_label()?;
                        entries.push(Entry { key, value: Some(value) });
                    } else if key == "no" && matches!(tokenizer.peek_token()?, Token::Word(_)) {
                        let flag = tokenizer.next_label()?.to_lowercase();
                        entries.push(Entry { key: format!("no{flag}"), value: None });
                    } else {
                        entries.push(Entry { key, value: None });
                    }
                }
                other => {
                    return Err(ParsingError::lexical(
                        tokenizer,
                        format!("option of {command}, got {other}"),
                    ));
                }
            }
        }

        Ok(Self {
            command: command.to_string(),
            line,
            entries,
        })
    }

    /// Line the command started on.
    pub fn line(&self) -> usize {
        self.line
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Takes a boolean flag: `flag`, `flag=yes|no|true|false|left|right`
    /// or `noflag`.
    ///
    /// # Returns
    /// `Ok(None)` if the flag is not given.
    pub fn take_flag(&mut self, name: &str) -> Result<Option<bool>, ParsingError> {
        let negated = format!("no{name}");
        if self.remove(&negated).is_some() {
            return Ok(Some(false));
        }
        match self.remove(name) {
            None => Ok(None),
            Some(None) => Ok(Some(true)),
            Some(Some(value)) => match value.to_lowercase().as_str() {
                "yes" | "true" | "left" | "right" => Ok(Some(true)),
                "no" | "false" => Ok(Some(false)),
                _ => Err(self.error(format!("value '{value}' of {name}"))),
            },
        }
    }

    /// Takes the value of `name=value`.
    pub fn take_value(&mut self, name: &str) -> Result<Option<String>, ParsingError> {
        match self.remove(name) {
            None => Ok(None),
            Some(Some(value)) => Ok(Some(value)),
            Some(None) => Err(ParsingError::at_line(
                ParsingErrorType::Lexical(format!("'{name}=<value>' in {}", self.command)),
                self.line,
            )),
        }
    }

    /// Takes a single-character value such as `missing=?`.
    pub fn take_char(&mut self, name: &str) -> Result<Option<char>, ParsingError> {
        let Some(value) = self.take_value(name)? else {
            return Ok(None);
        };
        let mut chars = value.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) => Ok(Some(ch)),
            _ => Err(ParsingError::at_line(
                ParsingErrorType::Lexical(format!("single character for {name}, got '{value}'")),
                self.line,
            )),
        }
    }

    /// Takes a non-negative integer value.
    pub fn take_usize(&mut self, name: &str) -> Result<Option<usize>, ParsingError> {
        let Some(value) = self.take_value(name)? else {
            return Ok(None);
        };
        value.parse::<usize>().map(Some).map_err(|_| {
            ParsingError::at_line(
                ParsingErrorType::Lexical(format!("integer for {name}, got '{value}'")),
                self.line,
            )
        })
    }

    /// Takes a floating point value.
    pub fn take_f64(&mut self, name: &str) -> Result<Option<f64>, ParsingError> {
        let Some(value) = self.take_value(name)? else {
            return Ok(None);
        };
        value.parse::<f64>().map(Some).map_err(|_| {
            ParsingError::at_line(
                ParsingErrorType::Lexical(format!("number for {name}, got '{value}'")),
                self.line,
            )
        })
    }

    /// Takes a bare word without value, returning whether it was present.
    pub fn take_word(&mut self, name: &str) -> bool {
        match self.entries.iter().position(|e| e.key == name && e.value.is_none()) {
            Some(index) => {
                self.entries.remove(index);
                true
            }
            None => false,
        }
    }

    /// Fails with [ParsingErrorType::UnknownConstruct] if options are left.
    pub fn finish(self) -> Result<(), ParsingError> {
        match self.entries.first() {
            None => Ok(()),
            Some(entry) => {
                let option = match &entry.value {
                    Some(value) => format!("{}={}", entry.key, value),
                    None => entry.key.clone(),
                };
                Err(ParsingError::at_line(
                    ParsingErrorType::UnknownConstruct(format!(
                        "unrecognized option '{option}' in {}",
                        self.command
                    )),
                    self.line,
                ))
            }
        }
    }

    fn remove(&mut self, name: &str) -> Option<Option<String>> {
        let index = self.entries.iter().position(|e| e.key == name)?;
        Some(self.entries.remove(index).value)
    }

    fn error(&self, msg: String) -> ParsingError {
        ParsingError::at_line(
            ParsingErrorType::UnknownConstruct(format!("{msg} in {}", self.command)),
            self.line,
        )
    }
}

/// Reads the words (labels) of a command up to its `;`, e.g. TAXLABELS.
pub fn read_label_list<S: ByteSource>(tokenizer: &mut Tokenizer<S>) -> Result<Vec<String>, ParsingError> {
    let mut labels = Vec::new();
    loop {
        match tokenizer.next_token()? {
            Token::Punctuation(';') => return Ok(labels),
            Token::Word(word) => labels.push(word),
            Token::Eol => {}
            Token::Eof => return Err(ParsingError::unexpected_eof(tokenizer)),
            other => {
                return Err(ParsingError::lexical(tokenizer, format!("label or ';', got {other}")));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_values_and_negation() {
        let mut tokenizer = Tokenizer::for_str(
            "datatype=DNA missing=? gap=- labels=left no interleave transpose=no tokens;",
        );
        let mut options = OptionList::read(&mut tokenizer, "FORMAT").unwrap();
        assert_eq!(options.take_value("datatype").unwrap().as_deref(), Some("DNA"));
        assert_eq!(options.take_char("missing").unwrap(), Some('?'));
        assert_eq!(options.take_char("gap").unwrap(), Some('-'));
        assert_eq!(options.take_flag("labels").unwrap(), Some(true));
        assert_eq!(options.take_flag("interleave").unwrap(), Some(false));
        assert_eq!(options.take_flag("transpose").unwrap(), Some(false));
        assert_eq!(options.take_flag("tokens").unwrap(), Some(true));
        assert_eq!(options.take_flag("respectcase").unwrap(), None);
        options.finish().unwrap();
    }

    #[test]
    fn test_leftover_option_is_unknown_construct() {
        let mut tokenizer = Tokenizer::for_str("\ntriangle=lower frobnicate;");
        let mut options = OptionList::read(&mut tokenizer, "FORMAT").unwrap();
        options.take_value("triangle").unwrap();
        let err = options.finish().unwrap_err();
        assert!(matches!(err.kind(), ParsingErrorType::UnknownConstruct(_)));
        assert_eq!(err.line(), 2);
    }

    #[test]
    fn test_label_list() {
        let mut tokenizer = Tokenizer::for_str("A 'B c' D; rest");
        assert_eq!(read_label_list(&mut tokenizer).unwrap(), vec!["A", "B c", "D"]);
        assert_eq!(tokenizer.next_label().unwrap(), "rest");
    }
}
