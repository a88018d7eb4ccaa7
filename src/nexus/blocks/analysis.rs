//! ANALYSIS block codec: `RESULT '<text>';`

use crate::model::AnalysisBlock;
use crate::nexus::blocks::{at_block_end, skip_command};
use crate::nexus::defs::RESULT;
use crate::nexus::writer::NexusWriter;
use crate::parser::utils::quote;
use crate::parser::{ByteSource, ParsingError, Tokenizer, Warnings};
use std::io;
use std::io::Write;

/// Parses the body of an ANALYSIS block; a missing RESULT reads as empty text.
pub fn parse_analysis<S: ByteSource>(
    tokenizer: &mut Tokenizer<S>,
    warnings: &mut Warnings,
) -> Result<AnalysisBlock, ParsingError> {
    let mut result = String::new();
    while !at_block_end(tokenizer)? {
        if tokenizer.consume_if_ignore_case("result")? {
            result = tokenizer.next_label()?;
            tokenizer.match_ignore_case(";")?;
        } else {
            skip_command(tokenizer, "ANALYSIS", warnings)?;
        }
    }
    Ok(AnalysisBlock::new(result))
}

pub fn write_analysis<W: Write>(writer: &mut NexusWriter<W>, block: &AnalysisBlock) -> io::Result<()> {
    writer
        .tab()?
        .write_all(RESULT)?
        .space()?
        .text(&quote(block.result()))?
        .semicolon_ln()?;
    Ok(())
}
